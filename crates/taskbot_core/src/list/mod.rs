//! Task list container.
//!
//! # Responsibility
//! - Host the single owner of all tasks and its message-producing operations.
//!
//! # Invariants
//! - No other component keeps references to tasks beyond one call.

mod task_list;

pub use task_list::{TaskList, TaskListError};
