use crate::error::Result;
use crate::models::{DailyRecord, HourlyRecord};
use crate::processors::integrity_checker::{CleaningReport, IntegrityChecker};
use crate::processors::preprocessor::Preprocessor;
use crate::readers::{RawDailyRow, RawHourlyRow};
use crate::utils::constants::{DAILY_SOURCE_NAME, HOURLY_SOURCE_NAME};
use tracing::{debug, info};

/// A cleaned base table together with how it was obtained.
#[derive(Debug, Clone)]
pub struct CleanedTable<T> {
    pub records: Vec<T>,
    pub report: CleaningReport,
}

/// Runs preprocessing followed by duplicate removal for each source.
pub struct Cleaner {
    preprocessor: Preprocessor,
    checker: IntegrityChecker,
}

impl Cleaner {
    pub fn new(date_format: &str) -> Self {
        Self {
            preprocessor: Preprocessor::new(date_format),
            checker: IntegrityChecker::new(),
        }
    }

    pub fn clean_daily(&self, rows: &[RawDailyRow]) -> Result<CleanedTable<DailyRecord>> {
        let preprocessed = self.preprocessor.preprocess_daily(rows)?;
        debug!(
            incomplete = preprocessed.incomplete_rows,
            "Daily rows preprocessed"
        );

        let deduplicated = self
            .checker
            .deduplicate(DAILY_SOURCE_NAME, preprocessed.records);

        let report = CleaningReport {
            rows_read: preprocessed.rows_read,
            incomplete_rows: preprocessed.incomplete_rows,
            exact_duplicates: deduplicated.exact_duplicates,
            key_conflicts: deduplicated.key_conflicts,
            out_of_range_rows: self.checker.count_out_of_range(&deduplicated.records),
            rows_retained: deduplicated.records.len(),
            ..CleaningReport::new(DAILY_SOURCE_NAME)
        };
        info!(
            source = DAILY_SOURCE_NAME,
            retained = report.rows_retained,
            dropped = report.rows_dropped(),
            "Source cleaned"
        );

        Ok(CleanedTable {
            records: deduplicated.records,
            report,
        })
    }

    pub fn clean_hourly(&self, rows: &[RawHourlyRow]) -> Result<CleanedTable<HourlyRecord>> {
        let preprocessed = self.preprocessor.preprocess_hourly(rows)?;
        debug!(
            incomplete = preprocessed.incomplete_rows,
            "Hourly rows preprocessed"
        );

        let deduplicated = self
            .checker
            .deduplicate(HOURLY_SOURCE_NAME, preprocessed.records);

        let report = CleaningReport {
            rows_read: preprocessed.rows_read,
            incomplete_rows: preprocessed.incomplete_rows,
            exact_duplicates: deduplicated.exact_duplicates,
            key_conflicts: deduplicated.key_conflicts,
            rows_retained: deduplicated.records.len(),
            ..CleaningReport::new(HOURLY_SOURCE_NAME)
        };
        info!(
            source = HOURLY_SOURCE_NAME,
            retained = report.rows_retained,
            dropped = report.rows_dropped(),
            "Source cleaned"
        );

        Ok(CleanedTable {
            records: deduplicated.records,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_daily(date: &str, cnt: Option<u32>) -> RawDailyRow {
        RawDailyRow {
            incomplete: false,
            date: Some(date.to_string()),
            temperature_norm: Some(0.34),
            feels_like_norm: Some(0.36),
            humidity_norm: Some(0.80),
            windspeed_norm: Some(0.16),
            weather_situation: Some(1),
            rental_count: cnt,
        }
    }

    fn raw_hourly(hour: u8, cnt: Option<u32>) -> RawHourlyRow {
        RawHourlyRow {
            incomplete: false,
            date: Some("2011-01-01".to_string()),
            hour: Some(hour),
            working_day: Some(0),
            rental_count: cnt,
        }
    }

    #[test]
    fn test_clean_daily_report() -> Result<()> {
        let rows = vec![
            raw_daily("2011-01-01", Some(985)),
            raw_daily("2011-01-01", Some(985)),
            raw_daily("2011-01-02", None),
            raw_daily("2011-01-03", Some(1349)),
        ];

        let cleaned = Cleaner::new("%Y-%m-%d").clean_daily(&rows)?;

        assert_eq!(cleaned.records.len(), 2);
        assert_eq!(cleaned.report.rows_read, 4);
        assert_eq!(cleaned.report.incomplete_rows, 1);
        assert_eq!(cleaned.report.exact_duplicates, 1);
        assert_eq!(cleaned.report.rows_retained, 2);
        Ok(())
    }

    #[test]
    fn test_cleaning_is_idempotent() -> Result<()> {
        let cleaner = Cleaner::new("%Y-%m-%d");
        let rows = vec![
            raw_hourly(0, Some(16)),
            raw_hourly(0, Some(16)),
            raw_hourly(1, None),
            raw_hourly(2, Some(32)),
            raw_hourly(2, Some(33)),
        ];

        let once = cleaner.clean_hourly(&rows)?;
        let round_trip: Vec<RawHourlyRow> = once
            .records
            .iter()
            .map(|r| RawHourlyRow::from_record(r, "%Y-%m-%d"))
            .collect();
        let twice = cleaner.clean_hourly(&round_trip)?;

        assert_eq!(once.records, twice.records);
        assert_eq!(twice.report.rows_dropped(), 0);
        Ok(())
    }

    #[test]
    fn test_daily_cleaning_is_idempotent() -> Result<()> {
        let cleaner = Cleaner::new("%Y-%m-%d");
        let rows = vec![
            raw_daily("2011-01-01", Some(985)),
            raw_daily("2011-01-01", Some(985)),
            raw_daily("2011-01-02", Some(801)),
        ];

        let once = cleaner.clean_daily(&rows)?;
        let round_trip: Vec<RawDailyRow> = once
            .records
            .iter()
            .map(|r| RawDailyRow::from_record(r, "%Y-%m-%d"))
            .collect();
        let twice = cleaner.clean_daily(&round_trip)?;

        assert_eq!(once.records, twice.records);
        Ok(())
    }
}
