use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::models::Member;
use crate::roster::RecordList;

use super::error::{RowError, RowErrorKind, StorageError};

/// Default roster file name.
pub const STORAGE_FILE: &str = "storage.csv";

/// Header row on export, matching `Member`'s serialized field names. The
/// first line of an import is skipped as the header.
pub const HEADER: [&str; 6] = [
    "First Name",
    "Last Name",
    "Email",
    "Grade",
    "Subteam",
    "Event ID",
];

/// Required leading columns: first name, last name, email, grade.
const MIN_FIELDS: usize = 4;

/// Outcome of an import: how many members were added and which rows were rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub row_errors: Vec<RowError>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.row_errors.is_empty()
    }
}

/// Parse roster CSV rows into members.
///
/// Rows are `firstName,lastName,email,grade[,subteam[,eventID]]`. Rows with
/// fewer than four fields or a non-numeric grade are reported and skipped.
pub fn read_members<R: Read>(reader: R) -> Result<(Vec<Member>, Vec<RowError>), StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut members = Vec::new();
    let mut row_errors = Vec::new();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                // A row that is not valid UTF-8 is skipped; the reader can continue
                if let csv::ErrorKind::Utf8 { pos, .. } = e.kind() {
                    let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
                    let error = RowError {
                        line,
                        kind: RowErrorKind::InvalidEncoding,
                    };
                    warn!("Skipping roster row: {}", error);
                    row_errors.push(error);
                    continue;
                }
                return Err(StorageError::Read(e));
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        match parse_record(&record) {
            Ok(member) => members.push(member),
            Err(kind) => {
                let error = RowError { line, kind };
                warn!("Skipping roster row: {}", error);
                row_errors.push(error);
            }
        }
    }

    Ok((members, row_errors))
}

fn parse_record(record: &StringRecord) -> Result<Member, RowErrorKind> {
    if record.len() < MIN_FIELDS {
        return Err(RowErrorKind::TooFewFields {
            found: record.len(),
        });
    }

    let field = |index: usize| record.get(index).unwrap_or_default();
    let grade = field(3)
        .trim()
        .parse::<i32>()
        .map_err(|_| RowErrorKind::InvalidGrade {
            value: field(3).trim().to_string(),
        })?;

    Ok(Member::new(
        field(0),
        field(1),
        field(2),
        grade,
        field(4),
        field(5),
    ))
}

/// Add every valid row from `reader` to `list`.
pub fn import_from_reader<R: Read>(
    list: &mut RecordList,
    reader: R,
) -> Result<ImportReport, StorageError> {
    let (members, row_errors) = read_members(reader)?;
    let imported = members.len();
    for member in members {
        list.add_member(member);
    }
    Ok(ImportReport {
        imported,
        row_errors,
    })
}

/// Import the roster file at `path` into `list`.
pub fn import_members(list: &mut RecordList, path: &Path) -> Result<ImportReport, StorageError> {
    let file = File::open(path).map_err(|source| StorageError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let report = import_from_reader(list, file)?;
    info!(
        path = %path.display(),
        imported = report.imported,
        rejected = report.row_errors.len(),
        "Imported roster"
    );
    Ok(report)
}

/// Write the header and one row per member, in the given order.
///
/// The header comes from `Member`'s serde field names with the first row;
/// an empty roster gets [`HEADER`] written directly.
pub fn write_members<W: Write>(members: &[Member], writer: W) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_writer(writer);

    if members.is_empty() {
        writer.write_record(HEADER).map_err(StorageError::Write)?;
    }
    for member in members {
        writer.serialize(member).map_err(StorageError::Write)?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the whole roster (not the filtered view) to `path`, replacing the file.
pub fn export_members(list: &RecordList, path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| StorageError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_members(list.members(), file)?;
    info!(path = %path.display(), count = list.len(), "Exported roster");
    Ok(())
}
