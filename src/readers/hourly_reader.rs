use crate::error::Result;
use crate::models::HourlyRecord;
use crate::readers::source::{
    blank_missing, check_columns, csv_reader, open_source, row_error, ColumnSpec,
};
use crate::utils::constants::HOURLY_SOURCE_NAME;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const HOURLY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        name: "date",
        headers: &["dteday", "date"],
    },
    ColumnSpec {
        name: "hour",
        headers: &["hr", "hour"],
    },
    ColumnSpec {
        name: "is_working_day",
        headers: &["workingday", "is_working_day"],
    },
    ColumnSpec {
        name: "rental_count",
        headers: &["cnt", "rental_count"],
    },
];

/// An hourly row as it appears in the source, before preprocessing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHourlyRow {
    #[serde(rename = "dteday", alias = "date")]
    pub date: Option<String>,

    #[serde(rename = "hr", alias = "hour")]
    pub hour: Option<u8>,

    #[serde(rename = "workingday", alias = "is_working_day")]
    pub working_day: Option<u8>,

    #[serde(rename = "cnt", alias = "rental_count")]
    pub rental_count: Option<u32>,

    #[serde(skip)]
    pub incomplete: bool,
}

impl RawHourlyRow {
    /// Render a cleaned record back into source form.
    pub fn from_record(record: &HourlyRecord, date_format: &str) -> Self {
        Self {
            date: Some(record.date.format(date_format).to_string()),
            hour: Some(record.hour),
            working_day: Some(u8::from(record.is_working_day)),
            rental_count: Some(record.rental_count),
            incomplete: false,
        }
    }
}

pub struct HourlyReader;

impl HourlyReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the hourly source from disk
    pub fn read_hourly(&self, path: &Path) -> Result<Vec<RawHourlyRow>> {
        debug!(path = %path.display(), "Reading hourly source");
        let reader = open_source(HOURLY_SOURCE_NAME, path)?;
        self.read_rows(reader)
    }

    /// Read hourly rows from any CSV input
    pub fn read_from<R: Read>(&self, input: R) -> Result<Vec<RawHourlyRow>> {
        self.read_rows(csv_reader(input))
    }

    fn read_rows<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<Vec<RawHourlyRow>> {
        let headers = reader.headers()?.clone();
        check_columns(HOURLY_SOURCE_NAME, &headers, HOURLY_COLUMNS)?;

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| row_error(HOURLY_SOURCE_NAME, index, e))?;
            let (record, has_missing) = blank_missing(&record);
            let mut row: RawHourlyRow = record
                .deserialize(Some(&headers))
                .map_err(|e| row_error(HOURLY_SOURCE_NAME, index, e))?;
            row.incomplete = has_missing;
            rows.push(row);
        }

        debug!(rows = rows.len(), "Hourly source read");
        Ok(rows)
    }
}

impl Default for HourlyReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_hourly_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            "instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt"
        )?;
        writeln!(temp_file, "1,2011-01-01,1,0,1,0,0,6,0,1,0.24,0.2879,0.81,0,3,13,16")?;
        writeln!(temp_file, "2,2011-01-01,1,0,1,1,0,6,0,1,0.22,0.2727,0.8,0,8,32,40")?;

        let rows = HourlyReader::new().read_hourly(temp_file.path())?;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].hour, Some(1));
        assert_eq!(rows[1].working_day, Some(0));
        assert_eq!(rows[1].rental_count, Some(40));
        Ok(())
    }

    #[test]
    fn test_null_tokens_in_integer_columns_are_missing() -> Result<()> {
        let csv = "dteday,hr,workingday,cnt\n2011-01-01,N/A,NULL,16\n2011-01-01,1,0,40\n";
        let rows = HourlyReader::new().read_from(csv.as_bytes())?;

        assert_eq!(rows[0].hour, None);
        assert_eq!(rows[0].working_day, None);
        assert!(rows[0].incomplete);
        assert!(!rows[1].incomplete);
        Ok(())
    }

    #[test]
    fn test_missing_hour_column() {
        let csv = "dteday,workingday,cnt\n2011-01-01,0,16\n";
        let err = HourlyReader::new().read_from(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::MissingColumn { ref column, .. } if column == "hour"
        ));
    }

    #[test]
    fn test_missing_source() {
        let result = HourlyReader::new().read_hourly(Path::new("/nonexistent/hour.csv"));
        assert!(matches!(result, Err(AnalyticsError::SourceNotFound { .. })));
    }
}
