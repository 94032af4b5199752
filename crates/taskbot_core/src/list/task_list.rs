//! Owning task container and its user-facing operations.
//!
//! # Responsibility
//! - Own the ordered task sequence (insertion order = display order = file order).
//! - Translate raw command arguments into validated tasks via the parsers.
//! - Produce exactly one human-readable message per operation.
//!
//! # Invariants
//! - External indices are 1-based; index `i` is valid iff `1 <= i <= size`.
//! - Deleting physically removes and shifts; there are no tombstones.
//! - Public operations never panic and never return errors; failures are
//!   rendered into the returned message without mutating state.

use crate::clock::{Clock, SystemClock};
use crate::model::date::{format_iso_date, parse_iso_date};
use crate::model::parse::{parse_deadline, parse_event, parse_plain, TaskParseError};
use crate::model::task::{SnoozeState, Task};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NO_ACTIVE_TASKS: &str = "No active tasks in your list!";
const EMPTY_LIST: &str = "Your list is empty.";
const NO_MATCHES: &str = "No matching tasks found.";
const FIND_USAGE: &str = "Please tell me what to search for: find <keyword>";

/// Failure of a single TaskList operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListError {
    /// 1-based index outside `1..=size`.
    TaskNotFound { index: usize },
    Parse(TaskParseError),
    InvalidSnoozeDate { input: String },
}

impl TaskListError {
    /// Stable code used in log events.
    fn code(&self) -> &'static str {
        match self {
            Self::TaskNotFound { .. } => "task_not_found",
            Self::Parse(_) => "invalid_task",
            Self::InvalidSnoozeDate { .. } => "invalid_snooze_date",
        }
    }
}

impl Display for TaskListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound { .. } => write!(f, "Task does not exist!"),
            Self::Parse(err) => write!(f, "{err}"),
            Self::InvalidSnoozeDate { input } => {
                write!(f, "`{input}` is not a valid date. Use the format YYYY-MM-DD.")
            }
        }
    }
}

impl Error for TaskListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::TaskNotFound { .. } | Self::InvalidSnoozeDate { .. } => None,
        }
    }
}

impl From<TaskParseError> for TaskListError {
    fn from(value: TaskParseError) -> Self {
        Self::Parse(value)
    }
}

type ListResult<T> = Result<T, TaskListError>;

/// In-memory task list; the authoritative mirror of the persisted file.
#[derive(Debug, Clone)]
pub struct TaskList<C: Clock = SystemClock> {
    tasks: Vec<Task>,
    clock: C,
}

impl TaskList<SystemClock> {
    /// Creates an empty list reading dates from the system calendar.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TaskList<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TaskList<C> {
    /// Creates an empty list that evaluates dates against `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            tasks: Vec::new(),
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn size(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the task at 0-based `index`, or `None` when out of range.
    pub fn get_task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// All tasks in list order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Appends an already-validated task.
    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_completed()).count()
    }

    pub fn active_count(&self) -> usize {
        let today = self.today();
        self.tasks
            .iter()
            .filter(|task| !task.is_snoozed(today))
            .count()
    }

    /// Adds a plain todo from the text after the command word.
    pub fn add_plain(&mut self, text: &str) -> String {
        let result = parse_plain(text)
            .map_err(TaskListError::from)
            .map(|task| self.append(task));
        respond("task_add_plain", result)
    }

    /// Adds a deadline from `<description> /by <YYYY-MM-DD>`.
    pub fn add_deadline(&mut self, text: &str) -> String {
        let result = parse_deadline(text, self.today())
            .map_err(TaskListError::from)
            .map(|task| self.append(task));
        respond("task_add_deadline", result)
    }

    /// Adds an event from `<description> /from <YYYY-MM-DD> /to <YYYY-MM-DD>`.
    pub fn add_event(&mut self, text: &str) -> String {
        let result = parse_event(text)
            .map_err(TaskListError::from)
            .map(|task| self.append(task));
        respond("task_add_event", result)
    }

    pub fn mark_task(&mut self, index: usize) -> String {
        let result = self.task_mut(index).map(|task| {
            task.mark_done();
            format!("Nice! I've marked this task as done:\n  {task}")
        });
        respond("task_mark", result)
    }

    pub fn unmark_task(&mut self, index: usize) -> String {
        let result = self.task_mut(index).map(|task| {
            task.mark_not_done();
            format!("OK, I've marked this task as not done yet:\n  {task}")
        });
        respond("task_unmark", result)
    }

    pub fn delete(&mut self, index: usize) -> String {
        let result = self.position(index).map(|position| {
            let removed = self.tasks.remove(position);
            format!(
                "Noted. I've removed this task:\n  {removed}\n{}",
                self.count_line()
            )
        });
        respond("task_delete", result)
    }

    /// Tasks whose display string contains `keyword`, in list order.
    ///
    /// Matching is case-sensitive; a blank keyword matches nothing.
    pub fn find_tasks(&self, keyword: &str) -> Vec<&Task> {
        if keyword.trim().is_empty() {
            return Vec::new();
        }
        self.tasks
            .iter()
            .filter(|task| task.to_string().contains(keyword))
            .collect()
    }

    /// Renders [`Self::find_tasks`] for display.
    pub fn find_tasks_message(&self, keyword: &str) -> String {
        if keyword.trim().is_empty() {
            return FIND_USAGE.to_string();
        }
        let matches = self.find_tasks(keyword);
        info!(
            "event=task_find module=task_list status=ok matches={}",
            matches.len()
        );
        if matches.is_empty() {
            return NO_MATCHES.to_string();
        }
        let body = matches
            .iter()
            .enumerate()
            .map(|(position, task)| format!("{}. {task}", position + 1))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Here are the matching tasks in your list:\n{body}")
    }

    pub fn snooze_task_forever(&mut self, index: usize) -> String {
        let result = self.task_mut(index).map(|task| {
            task.snooze_forever();
            format!("Got it. I've snoozed this task indefinitely:\n  {task}")
        });
        respond("task_snooze_forever", result)
    }

    /// Snoozes until `date_text` (`YYYY-MM-DD`). Past dates are accepted.
    pub fn snooze_task_until(&mut self, index: usize, date_text: &str) -> String {
        let result = self.snooze_until_inner(index, date_text);
        respond("task_snooze_until", result)
    }

    pub fn unsnooze_task(&mut self, index: usize) -> String {
        let result = self.task_mut(index).map(|task| {
            task.unsnooze();
            format!("Okay, this task is no longer snoozed:\n  {task}")
        });
        respond("task_unsnooze", result)
    }

    /// Active tasks only, each with its real 1-based index.
    pub fn show_list(&self) -> String {
        let today = self.today();
        let lines = self
            .numbered()
            .filter(|(_, task)| !task.is_snoozed(today))
            .map(|(number, task)| format!("{number}. {task}"))
            .collect::<Vec<_>>();
        if lines.is_empty() {
            return NO_ACTIVE_TASKS.to_string();
        }
        format!("Here are the tasks in your list:\n{}", lines.join("\n"))
    }

    /// Every task, snoozed or not.
    pub fn show_all_tasks(&self) -> String {
        if self.tasks.is_empty() {
            return EMPTY_LIST.to_string();
        }
        let lines = self
            .numbered()
            .map(|(number, task)| format!("{number}. {task}"))
            .collect::<Vec<_>>();
        format!("Here are all the tasks in your list:\n{}", lines.join("\n"))
    }

    /// Every task, tagged with its stored snooze state.
    pub fn show_snoozable_tasks(&self) -> String {
        if self.tasks.is_empty() {
            return EMPTY_LIST.to_string();
        }
        let lines = self
            .numbered()
            .map(|(number, task)| match task.snooze_state() {
                SnoozeState::NotSnoozed => format!("{number}. {task}"),
                SnoozeState::Forever => format!("{number}. [SNOOZED FOREVER] {task}"),
                SnoozeState::Until(until) => format!(
                    "{number}. [SNOOZED UNTIL {}] {task}",
                    format_iso_date(until)
                ),
            })
            .collect::<Vec<_>>();
        format!(
            "Here are your tasks with their snooze status:\n{}",
            lines.join("\n")
        )
    }

    /// Tasks that are not currently snoozed, in list order.
    pub fn get_active_tasks(&self) -> Vec<&Task> {
        let today = self.today();
        self.tasks
            .iter()
            .filter(|task| !task.is_snoozed(today))
            .collect()
    }

    fn append(&mut self, task: Task) -> String {
        let rendered = task.to_string();
        self.tasks.push(task);
        format!(
            "Got it. I've added this task:\n  {rendered}\n{}",
            self.count_line()
        )
    }

    fn snooze_until_inner(&mut self, index: usize, date_text: &str) -> ListResult<String> {
        let position = self.position(index)?;
        let until = parse_iso_date(date_text).ok_or_else(|| TaskListError::InvalidSnoozeDate {
            input: date_text.trim().to_string(),
        })?;
        let task = &mut self.tasks[position];
        task.snooze_until(until);
        Ok(format!(
            "Got it. I've snoozed this task until {}:\n  {task}",
            format_iso_date(until)
        ))
    }

    fn count_line(&self) -> String {
        match self.tasks.len() {
            1 => "Now you have 1 task in the list.".to_string(),
            count => format!("Now you have {count} tasks in the list."),
        }
    }

    fn numbered(&self) -> impl Iterator<Item = (usize, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(position, task)| (position + 1, task))
    }

    fn position(&self, index: usize) -> ListResult<usize> {
        if index >= 1 && index <= self.tasks.len() {
            Ok(index - 1)
        } else {
            Err(TaskListError::TaskNotFound { index })
        }
    }

    fn task_mut(&mut self, index: usize) -> ListResult<&mut Task> {
        let position = self.position(index)?;
        Ok(&mut self.tasks[position])
    }
}

fn respond(event: &str, result: ListResult<String>) -> String {
    match result {
        Ok(message) => {
            info!("event={event} module=task_list status=ok");
            message
        }
        Err(err) => {
            warn!(
                "event={event} module=task_list status=rejected error_code={}",
                err.code()
            );
            err.to_string()
        }
    }
}
