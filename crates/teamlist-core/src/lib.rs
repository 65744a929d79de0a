//! Core library for teamlist.
//!
//! Provides the member model, the roster engine (sorting, name lookup,
//! filtering and partial-match search) and CSV import/export. The TUI
//! front end builds on these.

pub mod models;
pub mod roster;
pub mod storage;
pub mod utils;

pub use models::{Member, SortOrder};
pub use roster::{Filter, RecordList};
pub use storage::{ImportReport, RowError, StorageError};
