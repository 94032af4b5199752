//! FFI use-case API for the Flutter front-end.
//!
//! # Responsibility
//! - Expose the string-returning task list operations to Dart via FRB.
//! - Own the one process-wide session and serialize access to it.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call returns a UTF-8 string or a plain struct of strings/bools.
//! - The task list is only touched while holding the session lock.

use log::info;
use serde_json::json;
use std::sync::{Mutex, MutexGuard};
use taskbot_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, AppConfig, Session,
    SystemClock, TaskStore,
};

static SESSION: Mutex<Option<Session>> = Mutex::new(None);

const NO_SESSION: &str = "No task file is open.";

/// Reply envelope for one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// Human-readable result, shown as-is by the UI.
    pub message: String,
    /// Whether the UI should close the session view.
    pub exit: bool,
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core file logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens (or reopens) the session on `data_path`.
///
/// A blank `data_path` falls back to the `TASKBOT_DATA_PATH` configuration.
///
/// # FFI contract
/// - Sync call; reads the task file.
/// - Returns the startup notice, or an empty string when there is none.
#[flutter_rust_bridge::frb(sync)]
pub fn session_open(data_path: String) -> String {
    let path = match data_path.trim() {
        "" => match AppConfig::from_env() {
            Ok(config) => config.data_path,
            Err(err) => return err.to_string(),
        },
        trimmed => trimmed.into(),
    };

    let session = Session::open(TaskStore::new(path), SystemClock);
    let notice = session.startup_notice().unwrap_or_default();
    info!(
        "event=session_open module=ffi status=ok tasks={} skipped={} writable={}",
        session.list().size(),
        session.load_report().failures,
        session.is_writable()
    );
    *lock_session() = Some(session);
    notice
}

/// Runs one command line (`todo ...`, `mark 2`, `list`, ...).
///
/// # FFI contract
/// - Sync call; persists after mutating commands.
/// - Never panics; failures are carried in `message`.
#[flutter_rust_bridge::frb(sync)]
pub fn session_command(line: String) -> CommandReply {
    let mut guard = lock_session();
    let Some(session) = guard.as_mut() else {
        return CommandReply {
            message: NO_SESSION.to_string(),
            exit: false,
        };
    };
    let reply = session.handle(&line);
    CommandReply {
        message: reply.message,
        exit: reply.exit,
    }
}

/// Returns the current list as JSON for structured rendering.
///
/// Shape: `{"tasks":[...],"active":[bool...],"completed_count":n}`.
/// Returns `{}` when no session is open.
#[flutter_rust_bridge::frb(sync)]
pub fn session_snapshot_json() -> String {
    let guard = lock_session();
    let Some(session) = guard.as_ref() else {
        return "{}".to_string();
    };
    let list = session.list();
    let today = list.today();
    let active = list
        .tasks()
        .iter()
        .map(|task| !task.is_snoozed(today))
        .collect::<Vec<_>>();
    json!({
        "tasks": list.tasks(),
        "active": active,
        "completed_count": list.completed_count(),
    })
    .to_string()
}

/// Saves the open session.
///
/// Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn session_save() -> String {
    match lock_session().as_ref() {
        Some(session) => session.save().err().unwrap_or_default(),
        None => NO_SESSION.to_string(),
    }
}

fn lock_session() -> MutexGuard<'static, Option<Session>> {
    // A panic while holding the lock leaves the list in a consistent state:
    // every operation mutates at most one task field or one Vec slot.
    SESSION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, session_command, session_open, session_save,
        session_snapshot_json,
    };
    use std::fs;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    // Single test: the session is process-wide state.
    #[test]
    fn session_flow_persists_and_snapshots() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("tasks.txt");
        fs::write(&path, "[T][ ] existing\nbroken line\n")
            .expect("write task file");

        let notice = session_open(path.to_string_lossy().into_owned());
        assert!(notice.contains("Skipped 1 unreadable line"));

        let added = session_command("deadline submit report /by 2099-10-15".to_string());
        assert!(added.message.contains("[D][ ] submit report (by:2099-10-15)"));
        assert!(!added.exit);

        session_command("mark 1".to_string());
        session_command("snooze 2".to_string());

        let snapshot: serde_json::Value =
            serde_json::from_str(&session_snapshot_json()).expect("snapshot should be JSON");
        assert_eq!(snapshot["tasks"][0]["completed"], true);
        assert_eq!(snapshot["tasks"][1]["type"], "deadline");
        assert_eq!(snapshot["active"], serde_json::json!([true, false]));
        assert_eq!(snapshot["completed_count"], 1);

        assert_eq!(session_save(), "");
        assert_eq!(
            fs::read_to_string(&path).expect("read task file"),
            "[T][X] existing\n[D][ ] submit report (by:2099-10-15)\n"
        );

        let bye = session_command("bye".to_string());
        assert!(bye.exit);
    }
}
