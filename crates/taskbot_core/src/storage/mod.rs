//! Persistence boundary for the task list.
//!
//! # Responsibility
//! - Map tasks to and from the one-line text format.
//! - Read and write the task file with backup/restore semantics.
//!
//! # Invariants
//! - Malformed lines are recovered here and never surface as load errors.
//! - I/O failures abort only the current load/save attempt.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod codec;
mod file_store;

pub use file_store::{load, load_lines, save, LoadReport, TaskStore};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, source } => {
                write!(f, "failed to {op} `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}
