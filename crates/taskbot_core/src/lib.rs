//! Core task-list engine for the taskbot assistant.
//! This crate is the single source of truth for task invariants.

pub mod clock;
pub mod command;
pub mod config;
pub mod list;
pub mod logging;
pub mod model;
pub mod session;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{dispatch, Reply, HELP_TEXT};
pub use config::{AppConfig, ConfigError};
pub use list::{TaskList, TaskListError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::parse::{
    parse_deadline, parse_event, parse_plain, ParseResult, TaskParseError,
};
pub use model::task::{SnoozeState, Task, TaskKind};
pub use session::Session;
pub use storage::codec::{decode_line, encode_task, CodecError, DecodedLine};
pub use storage::{load, save, LoadReport, StorageError, StorageResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
