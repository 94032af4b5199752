//! Front-end session: one task list bound to one task file.
//!
//! # Responsibility
//! - Load the list at startup and persist it after mutating commands.
//! - Keep persistence failures out of the command flow: they are appended to
//!   the reply, never raised.
//!
//! # Invariants
//! - A session whose file could not be read never writes to it, so an
//!   unreadable file (and its backup) is not overwritten by an empty list.

use crate::clock::{Clock, SystemClock};
use crate::command::{dispatch, Reply};
use crate::list::TaskList;
use crate::storage::{LoadReport, TaskStore};
use log::warn;

pub struct Session<C: Clock = SystemClock> {
    list: TaskList<C>,
    store: TaskStore,
    load_report: LoadReport,
    load_error: Option<String>,
}

impl<C: Clock + Clone> Session<C> {
    /// Opens `store`, falling back to an empty read-only session on I/O failure.
    pub fn open(store: TaskStore, clock: C) -> Self {
        match store.load(clock.clone()) {
            Ok((list, load_report)) => Self {
                list,
                store,
                load_report,
                load_error: None,
            },
            Err(err) => {
                warn!(
                    "event=session_open module=session status=degraded error_code=load_failed error={}",
                    err
                );
                Self {
                    list: TaskList::with_clock(clock),
                    store,
                    load_report: LoadReport::default(),
                    load_error: Some(err.to_string()),
                }
            }
        }
    }
}

impl<C: Clock> Session<C> {
    pub fn list(&self) -> &TaskList<C> {
        &self.list
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn load_report(&self) -> LoadReport {
        self.load_report
    }

    /// Whether changes are written back to the task file.
    pub fn is_writable(&self) -> bool {
        self.load_error.is_none()
    }

    /// Message worth showing once at startup, if any.
    pub fn startup_notice(&self) -> Option<String> {
        if let Some(err) = &self.load_error {
            return Some(format!(
                "Could not read your saved tasks ({err}). Starting with an empty list; changes will not be saved."
            ));
        }
        match self.load_report.failures {
            0 => None,
            1 => Some("Skipped 1 unreadable line in your saved tasks.".to_string()),
            count => Some(format!(
                "Skipped {count} unreadable lines in your saved tasks."
            )),
        }
    }

    /// Dispatches one input line and persists when the command asks for it.
    pub fn handle(&mut self, input: &str) -> Reply {
        let mut reply = dispatch(&mut self.list, input);
        if reply.persist {
            if let Err(err) = self.save() {
                reply.message.push('\n');
                reply.message.push_str(&err);
            }
        }
        reply
    }

    /// Writes the list to the task file.
    ///
    /// # Errors
    /// - Returns a user-facing message when the session is read-only or the
    ///   write fails. The in-memory list is unaffected either way.
    pub fn save(&self) -> Result<(), String> {
        if !self.is_writable() {
            return Err("Changes are not being saved because your task file could not be read.".to_string());
        }
        self.store
            .save(&self.list)
            .map_err(|err| format!("Could not save your tasks: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::clock::FixedClock;
    use crate::storage::{LoadReport, TaskStore};
    use chrono::NaiveDate;
    use std::fs;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid test date"))
    }

    #[test]
    fn mutating_commands_are_written_through() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = TaskStore::new(dir.path().join("tasks.txt"));
        let mut session = Session::open(store, clock());

        assert!(session.handle("todo read").persist);
        assert!(session.handle("mark 1").persist);
        assert!(!session.handle("mark 7").persist);

        assert_eq!(
            fs::read_to_string(session.store().path()).expect("read task file"),
            "[T][X] read\n"
        );
        assert!(session.startup_notice().is_none());
    }

    #[test]
    fn unreadable_file_makes_session_read_only() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = TaskStore::new(dir.path().join("tasks.txt"));
        fs::create_dir(store.path()).expect("create directory at task path");

        let mut session = Session::open(store, clock());
        let reply = session.handle("todo read");

        assert!(!session.is_writable());
        assert_eq!(session.load_report(), LoadReport::default());
        assert!(session
            .startup_notice()
            .expect("read-only notice")
            .contains("will not be saved"));
        assert!(reply.message.contains("not being saved"));
        assert!(session.store().path().is_dir());
        assert!(!session.store().backup_path().exists());
    }

    #[test]
    fn skipped_lines_are_announced() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = TaskStore::new(dir.path().join("tasks.txt"));
        fs::write(store.path(), "[T][ ] ok\nbroken\nalso broken\n")
            .expect("write task file");

        let session = Session::open(store, clock());

        assert_eq!(session.list().size(), 1);
        assert_eq!(session.load_report().failures, 2);
        assert_eq!(session.load_report().tasks_loaded, 1);
        assert_eq!(
            session.startup_notice().expect("skipped-lines notice"),
            "Skipped 2 unreadable lines in your saved tasks."
        );
    }
}
