use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Data source '{source_name}' not found at {}", path.display())]
    SourceNotFound { source_name: String, path: PathBuf },

    #[error("Preprocessing failed for '{source_name}' at row {row}: {cause}")]
    Preprocessing {
        source_name: String,
        row: usize,
        cause: String,
    },

    #[error("Preprocessing failed for '{source_name}': required column '{column}' is missing")]
    MissingColumn { source_name: String, column: String },

    #[error("Insufficient data for {view}: {rows} row(s), at least {required} required")]
    InsufficientData {
        view: String,
        rows: usize,
        required: usize,
    },

    #[error("Invalid {kind} selection '{value}' (expected one of: {expected})")]
    InvalidSelection {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("Invalid weather situation code: {0} (expected 1-4)")]
    InvalidWeatherCode(u8),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl AnalyticsError {
    /// Soft errors only disable the view that raised them.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AnalyticsError::InsufficientData { .. })
    }

    pub fn insufficient(view: impl Into<String>, rows: usize, required: usize) -> Self {
        AnalyticsError::InsufficientData {
            view: view.into(),
            rows,
            required,
        }
    }

    pub fn preprocessing(source_name: &str, row: usize, cause: impl Into<String>) -> Self {
        AnalyticsError::Preprocessing {
            source_name: source_name.to_string(),
            row,
            cause: cause.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_is_soft() {
        let err = AnalyticsError::insufficient("weather correlation", 1, 2);
        assert!(!err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Insufficient data for weather correlation: 1 row(s), at least 2 required"
        );
    }

    #[test]
    fn test_source_not_found_names_source() {
        let err = AnalyticsError::SourceNotFound {
            source_name: "daily".to_string(),
            path: PathBuf::from("data/day.csv"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("'daily'"));
        assert!(err.to_string().contains("data/day.csv"));
    }
}
