//! Variant parsers that turn raw command text into validated tasks.
//!
//! # Responsibility
//! - Split raw argument text on the `/by`, `/from` and `/to` markers.
//! - Validate descriptions and dates before any task is constructed.
//!
//! # Invariants
//! - A returned `Task` always has a non-empty, trimmed description free of
//!   line breaks and other control characters.
//! - Deadline due dates lie inside the sanity window around `today`.
//! - Event ranges are never swapped; `start > end` is an error.

use crate::model::date::{format_iso_date, parse_iso_date, within_deadline_window};
use crate::model::task::{Task, TaskKind};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BY_MARKER: &str = "/by";
const FROM_MARKER: &str = "/from";
const TO_MARKER: &str = "/to";

pub type ParseResult<T> = Result<T, TaskParseError>;

/// Validation failure raised while building a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskParseError {
    EmptyDescription,
    ControlCharacter,
    MissingDeadline,
    MissingEvent,
    InvalidDate { input: String },
    DateOutOfRange { date: NaiveDate },
    WrongOrientation { start: NaiveDate, end: NaiveDate },
}

impl Display for TaskParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "The description of a todo cannot be empty."),
            Self::ControlCharacter => write!(
                f,
                "A description cannot contain line breaks or other control characters."
            ),
            Self::MissingDeadline => write!(
                f,
                "A deadline needs a description and a due date: <description> /by YYYY-MM-DD"
            ),
            Self::MissingEvent => write!(
                f,
                "An event needs a description, a start and an end: <description> /from YYYY-MM-DD /to YYYY-MM-DD"
            ),
            Self::InvalidDate { input } => {
                write!(f, "`{input}` is not a valid date. Use the format YYYY-MM-DD.")
            }
            Self::DateOutOfRange { date } => write!(
                f,
                "The date {} is too far from today to be a real deadline.",
                format_iso_date(*date)
            ),
            Self::WrongOrientation { start, end } => write!(
                f,
                "An event cannot end before it starts (from:{} to:{}).",
                format_iso_date(*start),
                format_iso_date(*end)
            ),
        }
    }
}

impl Error for TaskParseError {}

/// Parses the text after the `todo` command word.
pub fn parse_plain(raw: &str) -> ParseResult<Task> {
    build_plain(raw)
}

/// Parses `<description> /by <YYYY-MM-DD>`.
pub fn parse_deadline(raw: &str, today: NaiveDate) -> ParseResult<Task> {
    let parts: Vec<&str> = raw.split(BY_MARKER).collect();
    let [description, due] = parts.as_slice() else {
        return Err(TaskParseError::MissingDeadline);
    };
    if description.trim().is_empty() || due.trim().is_empty() {
        return Err(TaskParseError::MissingDeadline);
    }
    build_deadline(description, due, today)
}

/// Parses `<description> /from <YYYY-MM-DD> /to <YYYY-MM-DD>`.
pub fn parse_event(raw: &str) -> ParseResult<Task> {
    if raw.matches(FROM_MARKER).count() != 1 || raw.matches(TO_MARKER).count() != 1 {
        return Err(TaskParseError::MissingEvent);
    }
    let (description, rest) = raw
        .split_once(FROM_MARKER)
        .ok_or(TaskParseError::MissingEvent)?;
    // `/to` sitting before `/from` leaves no `/to` in the remainder.
    let (start, end) = rest
        .split_once(TO_MARKER)
        .ok_or(TaskParseError::MissingEvent)?;
    build_event(description, start, end)
}

/// Builds a plain task from its description field.
pub fn build_plain(description: &str) -> ParseResult<Task> {
    let description = clean_description(description, TaskParseError::EmptyDescription)?;
    Ok(Task::from_parts(description.to_string(), TaskKind::Plain))
}

/// Builds a deadline task from separate description and due-date fields.
pub fn build_deadline(description: &str, due: &str, today: NaiveDate) -> ParseResult<Task> {
    let description = clean_description(description, TaskParseError::MissingDeadline)?;
    let due_text = due.trim();
    let due = parse_iso_date(due_text).ok_or_else(|| TaskParseError::InvalidDate {
        input: due_text.to_string(),
    })?;
    if !within_deadline_window(due, today) {
        return Err(TaskParseError::DateOutOfRange { date: due });
    }
    Ok(Task::from_parts(
        description.to_string(),
        TaskKind::Deadline { due },
    ))
}

/// Builds an event task from separate description, start and end fields.
pub fn build_event(description: &str, start: &str, end: &str) -> ParseResult<Task> {
    let description = clean_description(description, TaskParseError::MissingEvent)?;
    let start = parse_iso_date(start).ok_or(TaskParseError::MissingEvent)?;
    let end = parse_iso_date(end).ok_or(TaskParseError::MissingEvent)?;
    if start > end {
        return Err(TaskParseError::WrongOrientation { start, end });
    }
    Ok(Task::from_parts(
        description.to_string(),
        TaskKind::Event { start, end },
    ))
}

// One task is one stored line, so descriptions must stay on one line.
fn clean_description(description: &str, when_empty: TaskParseError) -> ParseResult<&str> {
    let description = description.trim();
    if description.is_empty() {
        return Err(when_empty);
    }
    if description.chars().any(char::is_control) {
        return Err(TaskParseError::ControlCharacter);
    }
    Ok(description)
}
