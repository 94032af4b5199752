//! Calendar clock abstraction.
//!
//! # Responsibility
//! - Provide "today" to date-window validation and snooze evaluation.
//! - Allow tests to pin the calendar date.
//!
//! # Invariants
//! - Only calendar dates are exposed; no time-of-day or timezone offsets.

use chrono::{Local, NaiveDate};

/// Source of the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the local system calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock that always reports the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
