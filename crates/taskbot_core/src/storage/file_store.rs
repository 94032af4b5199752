//! Flat-file persistence for the task list.
//!
//! # Responsibility
//! - Bulk-load a task file line by line into a [`TaskList`].
//! - Bulk-save a [`TaskList`] without corrupting the previous file.
//!
//! # Invariants
//! - One bad line never aborts a load; it is counted and skipped.
//! - Saves write a staging file first and only then replace the primary file.
//! - The previous primary is kept as `<file>.bak` and is read when the primary
//!   cannot be.
//!
//! # See also
//! - [`crate::storage::codec`] for the line format.

use super::codec::{decode_line, encode_task};
use super::{StorageError, StorageResult};
use crate::clock::{Clock, SystemClock};
use crate::list::TaskList;
use log::{debug, error, info, warn};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const BACKUP_SUFFIX: &str = ".bak";
const STAGING_SUFFIX: &str = ".tmp";

/// Diagnostic counters for one bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Every line read, blank ones included.
    pub lines_read: usize,
    pub blank_lines: usize,
    pub tasks_loaded: usize,
    /// Lines skipped because they matched no format or failed validation.
    pub failures: usize,
}

/// Task file handle bound to one primary path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the last-known-good copy.
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.path, BACKUP_SUFFIX)
    }

    fn staging_path(&self) -> PathBuf {
        with_suffix(&self.path, STAGING_SUFFIX)
    }

    /// Loads the file into a fresh list driven by `clock`.
    ///
    /// A missing file yields an empty list.
    pub fn load<C: Clock>(&self, clock: C) -> StorageResult<(TaskList<C>, LoadReport)> {
        let mut list = TaskList::with_clock(clock);
        let report = self.load_into(&mut list)?;
        Ok((list, report))
    }

    /// Appends every decodable line of the file to `list`.
    ///
    /// # Errors
    /// - Returns `StorageError::Io` when neither the primary file nor its
    ///   backup can be read. `list` is unchanged in that case.
    pub fn load_into<C: Clock>(&self, list: &mut TaskList<C>) -> StorageResult<LoadReport> {
        let started_at = Instant::now();
        let content = match self.read_content()? {
            Some(content) => content,
            None => {
                info!("event=tasks_load module=storage status=ok mode=missing_file");
                return Ok(LoadReport::default());
            }
        };

        let report = load_lines(&content, list);
        info!(
            "event=tasks_load module=storage status=ok lines={} loaded={} failures={} duration_ms={}",
            report.lines_read,
            report.tasks_loaded,
            report.failures,
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Writes every task of `list`, replacing the file only after a full write.
    ///
    /// # Errors
    /// - Returns `StorageError::Io` when the staging file cannot be written or
    ///   moved into place. The previous primary file is left as it was.
    pub fn save<C: Clock>(&self, list: &TaskList<C>) -> StorageResult<()> {
        let started_at = Instant::now();
        match self.save_inner(list) {
            Ok(()) => {
                info!(
                    "event=tasks_save module=storage status=ok count={} duration_ms={}",
                    list.size(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                let _ = fs::remove_file(self.staging_path());
                error!(
                    "event=tasks_save module=storage status=error duration_ms={} error_code=save_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save_inner<C: Clock>(&self, list: &TaskList<C>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::io("create", parent, source))?;
        }

        let staging = self.staging_path();
        write_lines(&staging, list)?;

        if self.path.exists() {
            let backup = self.backup_path();
            if let Err(err) = fs::copy(&self.path, &backup) {
                warn!(
                    "event=tasks_backup module=storage status=error error_code=backup_failed error={}",
                    err
                );
            }
        }

        fs::rename(&staging, &self.path)
            .map_err(|source| StorageError::io("replace", &self.path, source))
    }

    // Raw bytes: encoding is checked per line so one bad line cannot
    // reject the whole file.
    fn read_content(&self) -> StorageResult<Option<Vec<u8>>> {
        let primary_err = match fs::read(&self.path) {
            Ok(content) => return Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => err,
        };

        warn!(
            "event=tasks_load module=storage status=fallback error_code=primary_unreadable error={}",
            primary_err
        );
        match fs::read(self.backup_path()) {
            Ok(content) => Ok(Some(content)),
            Err(backup_err) => {
                error!(
                    "event=tasks_load module=storage status=error error_code=backup_unreadable error={}",
                    backup_err
                );
                Err(StorageError::io("read", &self.path, primary_err))
            }
        }
    }
}

/// Decodes `content` line by line into `list`, skipping lines that fail.
///
/// Lines are split on `\n` (a trailing `\r` is dropped). A line that is not
/// valid UTF-8 counts as a failure like any other undecodable line.
/// A stored `X` status is applied after the task is appended, through the
/// same mark operation a user would issue.
pub fn load_lines<C: Clock>(content: impl AsRef<[u8]>, list: &mut TaskList<C>) -> LoadReport {
    let today = list.today();
    let mut report = LoadReport::default();

    for (line_index, raw) in split_lines(content.as_ref()).enumerate() {
        report.lines_read += 1;
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(err) => {
                report.failures += 1;
                debug!(
                    "event=tasks_load_line module=storage status=skipped line={} error_code=invalid_utf8 error={}",
                    line_index + 1,
                    err
                );
                continue;
            }
        };
        if line.trim().is_empty() {
            report.blank_lines += 1;
            continue;
        }
        match decode_line(line, today) {
            Ok(decoded) => {
                list.push(decoded.task);
                if decoded.completed {
                    list.mark_task(list.size());
                }
                report.tasks_loaded += 1;
            }
            Err(err) => {
                report.failures += 1;
                debug!(
                    "event=tasks_load_line module=storage status=skipped line={} error={}",
                    line_index + 1,
                    err
                );
            }
        }
    }

    report
}

// Same line boundaries as `str::lines`: no empty line after a final `\n`.
fn split_lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    let lines = if content.is_empty() {
        None
    } else {
        Some(body.split(|byte| *byte == b'\n'))
    };
    lines
        .into_iter()
        .flatten()
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Loads `path` with the system clock.
pub fn load(path: impl AsRef<Path>) -> StorageResult<TaskList> {
    let (list, _) = TaskStore::new(path.as_ref()).load(SystemClock)?;
    Ok(list)
}

/// Saves `list` to `path`.
pub fn save<C: Clock>(list: &TaskList<C>, path: impl AsRef<Path>) -> StorageResult<()> {
    TaskStore::new(path.as_ref()).save(list)
}

fn write_lines<C: Clock>(path: &Path, list: &TaskList<C>) -> StorageResult<()> {
    let io_err = |source| StorageError::io("write", path, source);
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    for task in list.tasks() {
        writeln!(writer, "{}", encode_task(task)).map_err(io_err)?;
    }
    let file = writer
        .into_inner()
        .map_err(|err| StorageError::io("write", path, err.into_error()))?;
    file.sync_all().map_err(io_err)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
