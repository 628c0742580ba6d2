use crate::error::Result;
use crate::readers::{DailyReader, HourlyReader, RawDailyRow, RawHourlyRow};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::info;

/// Both sources as read from disk, prior to preprocessing.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub daily: Vec<RawDailyRow>,
    pub hourly: Vec<RawHourlyRow>,
}

pub struct ConcurrentReader;

impl ConcurrentReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the daily and hourly sources concurrently; either failure aborts the load.
    pub async fn read_all(&self, daily_path: &Path, hourly_path: &Path) -> Result<RawTables> {
        let daily_path: PathBuf = daily_path.to_path_buf();
        let hourly_path: PathBuf = hourly_path.to_path_buf();

        let daily_handle: JoinHandle<Result<Vec<RawDailyRow>>> =
            tokio::task::spawn_blocking(move || DailyReader::new().read_daily(&daily_path));

        let hourly_handle: JoinHandle<Result<Vec<RawHourlyRow>>> =
            tokio::task::spawn_blocking(move || HourlyReader::new().read_hourly(&hourly_path));

        let (daily, hourly) = tokio::try_join!(daily_handle, hourly_handle)?;
        let tables = RawTables {
            daily: daily?,
            hourly: hourly?,
        };

        info!(
            daily_rows = tables.daily.len(),
            hourly_rows = tables.hourly.len(),
            "Sources read"
        );
        Ok(tables)
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new()
    }
}
