use crate::error::Result;
use crate::models::DailyRecord;
use crate::readers::source::{
    blank_missing, check_columns, csv_reader, open_source, row_error, ColumnSpec,
};
use crate::utils::constants::DAILY_SOURCE_NAME;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const DAILY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        name: "date",
        headers: &["dteday", "date"],
    },
    ColumnSpec {
        name: "temperature_norm",
        headers: &["temp", "temperature_norm"],
    },
    ColumnSpec {
        name: "feels_like_norm",
        headers: &["atemp", "feels_like_norm"],
    },
    ColumnSpec {
        name: "humidity_norm",
        headers: &["hum", "humidity_norm"],
    },
    ColumnSpec {
        name: "windspeed_norm",
        headers: &["windspeed", "windspeed_norm"],
    },
    ColumnSpec {
        name: "weather_situation",
        headers: &["weathersit", "weather_situation"],
    },
    ColumnSpec {
        name: "rental_count",
        headers: &["cnt", "rental_count"],
    },
];

/// A daily row as it appears in the source, before preprocessing.
/// Missing cells deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDailyRow {
    #[serde(rename = "dteday", alias = "date")]
    pub date: Option<String>,

    #[serde(rename = "temp", alias = "temperature_norm")]
    pub temperature_norm: Option<f64>,

    #[serde(rename = "atemp", alias = "feels_like_norm")]
    pub feels_like_norm: Option<f64>,

    #[serde(rename = "hum", alias = "humidity_norm")]
    pub humidity_norm: Option<f64>,

    #[serde(rename = "windspeed", alias = "windspeed_norm")]
    pub windspeed_norm: Option<f64>,

    #[serde(rename = "weathersit", alias = "weather_situation")]
    pub weather_situation: Option<u8>,

    #[serde(rename = "cnt", alias = "rental_count")]
    pub rental_count: Option<u32>,

    /// Some cell of the source row, analyzed or not, was missing.
    #[serde(skip)]
    pub incomplete: bool,
}

impl RawDailyRow {
    /// Render a cleaned record back into source form.
    pub fn from_record(record: &DailyRecord, date_format: &str) -> Self {
        Self {
            date: Some(record.date.format(date_format).to_string()),
            temperature_norm: Some(record.temperature_norm),
            feels_like_norm: Some(record.feels_like_norm),
            humidity_norm: Some(record.humidity_norm),
            windspeed_norm: Some(record.windspeed_norm),
            weather_situation: Some(record.weather_situation.code()),
            rental_count: Some(record.rental_count),
            incomplete: false,
        }
    }
}

pub struct DailyReader;

impl DailyReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the daily source from disk
    pub fn read_daily(&self, path: &Path) -> Result<Vec<RawDailyRow>> {
        debug!(path = %path.display(), "Reading daily source");
        let reader = open_source(DAILY_SOURCE_NAME, path)?;
        self.read_rows(reader)
    }

    /// Read daily rows from any CSV input
    pub fn read_from<R: Read>(&self, input: R) -> Result<Vec<RawDailyRow>> {
        self.read_rows(csv_reader(input))
    }

    fn read_rows<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<Vec<RawDailyRow>> {
        let headers = reader.headers()?.clone();
        check_columns(DAILY_SOURCE_NAME, &headers, DAILY_COLUMNS)?;

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| row_error(DAILY_SOURCE_NAME, index, e))?;
            let (record, has_missing) = blank_missing(&record);
            let mut row: RawDailyRow = record
                .deserialize(Some(&headers))
                .map_err(|e| row_error(DAILY_SOURCE_NAME, index, e))?;
            row.incomplete = has_missing;
            rows.push(row);
        }

        debug!(rows = rows.len(), "Daily source read");
        Ok(rows)
    }
}

impl Default for DailyReader {
    fn default() -> Self {
        Self::new()
    }
}
