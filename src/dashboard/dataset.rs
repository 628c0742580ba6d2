use crate::analyzers::{summary_statistics, total_rentals, SummaryStatistics};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::models::{DailyRecord, HourlyRecord};
use crate::processors::{Cleaner, CleaningReport};
use crate::readers::{ConcurrentReader, RawTables};
use crate::utils::progress::ProgressReporter;
use std::sync::Arc;
use tracing::info;

/// The cleaned, read-only base tables for a session.
///
/// Cloning is cheap; every clone shares the same tables.
#[derive(Debug, Clone)]
pub struct Dataset {
    daily: Arc<[DailyRecord]>,
    hourly: Arc<[HourlyRecord]>,
    daily_report: Arc<CleaningReport>,
    hourly_report: Arc<CleaningReport>,
    summary: Arc<SummaryStatistics>,
}

impl Dataset {
    /// Read and clean both configured sources. Any failure is fatal and
    /// clears the spinner.
    pub async fn load(
        config: &AnalyticsConfig,
        progress: Option<&ProgressReporter>,
    ) -> Result<Self> {
        let result = Self::read_and_clean(config, progress).await;

        if let Some(p) = progress {
            match &result {
                Ok(dataset) => p.finish_with_message(&format!(
                    "Loaded {} days and {} hourly rows",
                    dataset.daily.len(),
                    dataset.hourly.len()
                )),
                Err(_) => p.finish_and_clear(),
            }
        }

        result
    }

    async fn read_and_clean(
        config: &AnalyticsConfig,
        progress: Option<&ProgressReporter>,
    ) -> Result<Self> {
        if let Some(p) = progress {
            p.set_message("Reading rental data...");
        }

        let reader = ConcurrentReader::new();
        let raw = reader
            .read_all(&config.daily_source, &config.hourly_source)
            .await?;

        if let Some(p) = progress {
            p.set_message("Cleaning rental data...");
        }

        Self::from_raw(&raw, &config.date_format)
    }

    /// Clean already-read rows into base tables.
    pub fn from_raw(raw: &RawTables, date_format: &str) -> Result<Self> {
        let cleaner = Cleaner::new(date_format);
        let daily = cleaner.clean_daily(&raw.daily)?;
        let hourly = cleaner.clean_hourly(&raw.hourly)?;

        Ok(Self::from_records(
            daily.records,
            hourly.records,
            daily.report,
            hourly.report,
        ))
    }

    pub fn from_records(
        daily: Vec<DailyRecord>,
        hourly: Vec<HourlyRecord>,
        daily_report: CleaningReport,
        hourly_report: CleaningReport,
    ) -> Self {
        let summary = summary_statistics(&daily, &hourly);
        info!(
            days = daily.len(),
            hourly_rows = hourly.len(),
            "Base tables ready"
        );

        Self {
            daily: daily.into(),
            hourly: hourly.into(),
            daily_report: Arc::new(daily_report),
            hourly_report: Arc::new(hourly_report),
            summary: Arc::new(summary),
        }
    }

    pub fn daily(&self) -> &[DailyRecord] {
        &self.daily
    }

    pub fn hourly(&self) -> &[HourlyRecord] {
        &self.hourly
    }

    pub fn daily_report(&self) -> &CleaningReport {
        &self.daily_report
    }

    pub fn hourly_report(&self) -> &CleaningReport {
        &self.hourly_report
    }

    /// Computed once when the tables are built.
    pub fn summary(&self) -> &SummaryStatistics {
        &self.summary
    }

    /// Computed on every call.
    pub fn total_rentals(&self) -> u64 {
        total_rentals(&self.daily)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use crate::readers::{RawDailyRow, RawHourlyRow};

    fn raw_tables() -> RawTables {
        let day = |date: &str, cnt: u32| RawDailyRow {
            incomplete: false,
            date: Some(date.to_string()),
            temperature_norm: Some(0.3),
            feels_like_norm: Some(0.3),
            humidity_norm: Some(0.6),
            windspeed_norm: Some(0.2),
            weather_situation: Some(1),
            rental_count: Some(cnt),
        };
        let hour = |hr: u8, working: u8, cnt: u32| RawHourlyRow {
            incomplete: false,
            date: Some("2011-01-03".to_string()),
            hour: Some(hr),
            working_day: Some(working),
            rental_count: Some(cnt),
        };

        RawTables {
            daily: vec![day("2011-01-01", 100), day("2011-01-02", 200), day("2011-01-03", 300)],
            hourly: vec![hour(8, 1, 120), hour(8, 1, 120), hour(9, 1, 80)],
        }
    }

    #[test]
    fn test_from_raw_builds_tables_and_summary() -> Result<()> {
        let dataset = Dataset::from_raw(&raw_tables(), "%Y-%m-%d")?;

        assert_eq!(dataset.daily().len(), 3);
        assert_eq!(dataset.hourly().len(), 2);
        assert_eq!(dataset.hourly_report().exact_duplicates, 1);
        assert_eq!(dataset.summary().mean_daily_rentals, Some(200.0));
        assert_eq!(dataset.total_rentals(), 600);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_load_clears_progress() {
        let config = AnalyticsConfig::default()
            .with_daily_source(Some("/nonexistent/day.csv".into()))
            .with_hourly_source(Some("/nonexistent/hour.csv".into()));
        let progress = ProgressReporter::new_spinner("Loading...", true);

        let result = Dataset::load(&config, Some(&progress)).await;

        assert!(matches!(result, Err(AnalyticsError::SourceNotFound { .. })));
    }

    #[test]
    fn test_clones_share_tables() -> Result<()> {
        let dataset = Dataset::from_raw(&raw_tables(), "%Y-%m-%d")?;
        let other = dataset.clone();
        assert!(std::ptr::eq(dataset.daily().as_ptr(), other.daily().as_ptr()));
        Ok(())
    }
}
