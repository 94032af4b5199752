//! Task domain model.
//!
//! # Responsibility
//! - Define the single task shape shared by todo, deadline and event items.
//! - Own the completion flag and the snooze state machine.
//! - Render the user-facing display string.
//!
//! # Invariants
//! - `description` is non-empty and never changes after construction.
//! - Event `start <= end`.
//! - `completed` and `snooze` are the only mutable fields.

use crate::model::date::format_iso_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Variant-specific payload of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TaskKind {
    /// Description only.
    Plain,
    /// Single due date.
    Deadline { due: NaiveDate },
    /// Inclusive date range.
    Event { start: NaiveDate, end: NaiveDate },
}

impl TaskKind {
    /// One-letter tag used in both display and persisted forms.
    pub fn tag(&self) -> char {
        match self {
            Self::Plain => 'T',
            Self::Deadline { .. } => 'D',
            Self::Event { .. } => 'E',
        }
    }

    /// Parenthesized date suffix, empty for plain tasks.
    pub fn date_suffix(&self) -> String {
        match self {
            Self::Plain => String::new(),
            Self::Deadline { due } => format!(" (by:{})", format_iso_date(*due)),
            Self::Event { start, end } => format!(
                " (from:{} to:{})",
                format_iso_date(*start),
                format_iso_date(*end)
            ),
        }
    }
}

/// Stored snooze state.
///
/// Whether a task is *currently* hidden is derived by [`Task::is_snoozed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "until")]
pub enum SnoozeState {
    #[default]
    NotSnoozed,
    Until(NaiveDate),
    Forever,
}

/// One item of work owned by a [`crate::TaskList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    description: String,
    #[serde(flatten)]
    kind: TaskKind,
    completed: bool,
    snooze: SnoozeState,
}

impl Task {
    /// Builds a task from already-validated parts.
    ///
    /// Only the parsers in [`crate::model::parse`] call this.
    pub(crate) fn from_parts(description: String, kind: TaskKind) -> Self {
        debug_assert!(!description.trim().is_empty());
        Self {
            description,
            kind,
            completed: false,
            snooze: SnoozeState::NotSnoozed,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn snooze_state(&self) -> SnoozeState {
        self.snooze
    }

    /// `X` when completed, a space otherwise.
    pub fn status_char(&self) -> char {
        if self.completed {
            'X'
        } else {
            ' '
        }
    }

    pub fn mark_done(&mut self) {
        self.completed = true;
    }

    pub fn mark_not_done(&mut self) {
        self.completed = false;
    }

    /// Snoozes until `date`. Past dates are accepted and read as not snoozed.
    pub fn snooze_until(&mut self, date: NaiveDate) {
        self.snooze = SnoozeState::Until(date);
    }

    pub fn snooze_forever(&mut self) {
        self.snooze = SnoozeState::Forever;
    }

    pub fn unsnooze(&mut self) {
        self.snooze = SnoozeState::NotSnoozed;
    }

    /// Returns whether the task is hidden on `today`.
    ///
    /// A task snoozed until `D` stays hidden through `D` itself.
    pub fn is_snoozed(&self, today: NaiveDate) -> bool {
        match self.snooze {
            SnoozeState::NotSnoozed => false,
            SnoozeState::Until(until) => until >= today,
            SnoozeState::Forever => true,
        }
    }

    fn snooze_suffix(&self) -> String {
        match self.snooze {
            SnoozeState::NotSnoozed => String::new(),
            SnoozeState::Until(until) => format!(" (snoozed until {})", format_iso_date(until)),
            SnoozeState::Forever => " (snoozed forever)".to_string(),
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}][{}] {}{}{}",
            self.kind.tag(),
            self.status_char(),
            self.description,
            self.kind.date_suffix(),
            self.snooze_suffix()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{SnoozeState, Task, TaskKind};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn display_includes_tag_status_and_dates() {
        let mut task = Task::from_parts(
            "conference".to_string(),
            TaskKind::Event {
                start: ymd(2026, 3, 1),
                end: ymd(2026, 3, 3),
            },
        );
        assert_eq!(
            task.to_string(),
            "[E][ ] conference (from:2026-03-01 to:2026-03-03)"
        );

        task.mark_done();
        task.snooze_forever();
        assert_eq!(
            task.to_string(),
            "[E][X] conference (from:2026-03-01 to:2026-03-03) (snoozed forever)"
        );
    }

    #[test]
    fn snooze_until_is_inclusive_of_the_until_date() {
        let mut task = Task::from_parts("water plants".to_string(), TaskKind::Plain);
        task.snooze_until(ymd(2026, 5, 10));

        assert!(task.is_snoozed(ymd(2026, 5, 9)));
        assert!(task.is_snoozed(ymd(2026, 5, 10)));
        assert!(!task.is_snoozed(ymd(2026, 5, 11)));
        assert_eq!(task.snooze_state(), SnoozeState::Until(ymd(2026, 5, 10)));
    }
}
