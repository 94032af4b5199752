//! Task domain model and its validating constructors.
//!
//! # Responsibility
//! - Define the task sum type shared by todo, deadline and event items.
//! - Keep every validation rule next to the type it protects.
//!
//! # Invariants
//! - Tasks are only constructed through the parsers in [`parse`].

pub mod date;
pub mod parse;
pub mod task;
