//! One-line text codec for tasks.
//!
//! # Responsibility
//! - Encode a task into its persisted line.
//! - Classify and decode a persisted line back into a validated task.
//!
//! # Invariants
//! - Line shapes are exact:
//!   `[T][s] desc`, `[D][s] desc (by:YYYY-MM-DD)`,
//!   `[E][s] desc (from:YYYY-MM-DD to:YYYY-MM-DD)` where `s` is `X` or a space.
//! - Decoded tasks go through the same validators as user input.
//! - Snooze state is not part of the line format.

use crate::model::parse::{build_deadline, build_event, build_plain, TaskParseError};
use crate::model::task::Task;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::error::Error;
use std::fmt::{Display, Formatter};

static DEADLINE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[D\]\[([X ])\] (.+) \(by:([^)]*)\)$").expect("valid deadline line regex")
});
static EVENT_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[E\]\[([X ])\] (.+) \(from:([^)]*) to:([^)]*)\)$")
        .expect("valid event line regex")
});
static PLAIN_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[T\]\[([X ])\] (.+)$").expect("valid plain line regex"));

#[derive(Debug, Clone, Copy)]
enum LineShape {
    Deadline,
    Event,
    Plain,
}

// Most specific first; plain is the catch-all for `[T]` lines.
const LINE_SHAPES: [LineShape; 3] = [LineShape::Deadline, LineShape::Event, LineShape::Plain];

impl LineShape {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::Deadline => &DEADLINE_LINE_RE,
            Self::Event => &EVENT_LINE_RE,
            Self::Plain => &PLAIN_LINE_RE,
        }
    }

    fn build(self, caps: &Captures<'_>, today: NaiveDate) -> Result<Task, TaskParseError> {
        match self {
            Self::Deadline => build_deadline(&caps[2], &caps[3], today),
            Self::Event => build_event(&caps[2], &caps[3], &caps[4]),
            Self::Plain => build_plain(&caps[2]),
        }
    }
}

/// Per-line decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The line matches none of the three task shapes.
    UnrecognizedLine,
    /// The line has a task shape but its fields fail validation.
    Task(TaskParseError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedLine => write!(f, "line does not match any task format"),
            Self::Task(err) => write!(f, "invalid task fields: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnrecognizedLine => None,
            Self::Task(err) => Some(err),
        }
    }
}

impl From<TaskParseError> for CodecError {
    fn from(value: TaskParseError) -> Self {
        Self::Task(value)
    }
}

/// A decoded line: the freshly built task plus its stored status cell.
///
/// Completion is applied by the loader after the task is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    pub task: Task,
    pub completed: bool,
}

/// Encodes `task` as exactly one persisted line, without a newline.
pub fn encode_task(task: &Task) -> String {
    format!(
        "[{}][{}] {}{}",
        task.kind().tag(),
        task.status_char(),
        task.description(),
        task.kind().date_suffix()
    )
}

/// Decodes one non-blank persisted line.
///
/// `today` anchors the deadline sanity window.
pub fn decode_line(line: &str, today: NaiveDate) -> Result<DecodedLine, CodecError> {
    for shape in LINE_SHAPES {
        if let Some(caps) = shape.pattern().captures(line) {
            let task = shape.build(&caps, today)?;
            return Ok(DecodedLine {
                task,
                completed: &caps[1] == "X",
            });
        }
    }
    Err(CodecError::UnrecognizedLine)
}
