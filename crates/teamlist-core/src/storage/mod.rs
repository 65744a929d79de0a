//! Flat-file CSV persistence for the roster.
//!
//! Import reads `firstName,lastName,email,grade[,subteam[,eventID]]` rows
//! after a header line and adds each valid row to a `RecordList`; malformed
//! rows come back as `RowError`s in the `ImportReport`. Export writes the
//! whole roster in roster order under the six-column header.

pub mod error;
pub mod roster_file;

pub use error::{RowError, RowErrorKind, StorageError};
pub use roster_file::{
    export_members, import_from_reader, import_members, read_members, write_members, ImportReport,
    HEADER, STORAGE_FILE,
};
