use crate::error::{AnalyticsError, Result};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, MISSING_VALUE_TOKENS};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A required column and the header names it may appear under.
pub struct ColumnSpec {
    pub name: &'static str,
    pub headers: &'static [&'static str],
}

/// Open a named CSV source. A path that is absent, not a regular file or
/// cannot be opened is reported as a missing source.
pub fn open_source(source_name: &str, path: &Path) -> Result<Reader<BufReader<File>>> {
    let not_found = |reason: &str| {
        tracing::error!(
            source = source_name,
            path = %path.display(),
            error = reason,
            "Cannot open data source"
        );
        AnalyticsError::SourceNotFound {
            source_name: source_name.to_string(),
            path: path.to_path_buf(),
        }
    };

    if !path.is_file() {
        return Err(not_found("not a readable file"));
    }
    let file = File::open(path).map_err(|e| not_found(&e.to_string()))?;

    Ok(csv_reader(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)))
}

pub fn csv_reader<R: Read>(input: R) -> Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(input)
}

/// Fail with `MissingColumn` for the first required column absent from the header row.
pub fn check_columns(
    source_name: &str,
    headers: &StringRecord,
    required: &[ColumnSpec],
) -> Result<()> {
    for column in required {
        let present = headers
            .iter()
            .any(|h| column.headers.iter().any(|candidate| h == *candidate));
        if !present {
            return Err(AnalyticsError::MissingColumn {
                source_name: source_name.to_string(),
                column: column.name.to_string(),
            });
        }
    }
    Ok(())
}

/// Replace missing-value tokens (`NA`, `null`, `NaN`, ...) with empty cells so
/// every column deserializes them to `None`. Also reports whether the row had
/// any missing cell at all.
pub fn blank_missing(record: &StringRecord) -> (StringRecord, bool) {
    let mut has_missing = false;
    let cleaned = record
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                has_missing = true;
                ""
            } else {
                cell
            }
        })
        .collect();
    (cleaned, has_missing)
}

fn is_missing(cell: &str) -> bool {
    MISSING_VALUE_TOKENS
        .iter()
        .any(|token| cell.trim().eq_ignore_ascii_case(token))
}

/// Row number as shown in a spreadsheet: the header is row 1.
pub fn row_number(index: usize) -> usize {
    index + 2
}

/// Map a deserialization failure onto a preprocessing error for the given row.
pub fn row_error(source_name: &str, index: usize, error: csv::Error) -> AnalyticsError {
    AnalyticsError::preprocessing(source_name, row_number(index), error.to_string())
}
