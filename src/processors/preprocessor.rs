use crate::error::{AnalyticsError, Result};
use crate::models::{DailyRecord, HourlyRecord, WeatherSituation};
use crate::readers::source::row_number;
use crate::readers::{RawDailyRow, RawHourlyRow};
use crate::utils::constants::{DAILY_SOURCE_NAME, HOURLY_SOURCE_NAME, MAX_HOUR};
use chrono::NaiveDate;

/// Records that survived preprocessing plus the number of incomplete rows dropped.
#[derive(Debug, Clone)]
pub struct Preprocessed<T> {
    pub records: Vec<T>,
    pub rows_read: usize,
    pub incomplete_rows: usize,
}

/// Parses dates, derives categorical fields and drops incomplete rows.
///
/// Present-but-malformed values are fatal; absent values only drop the row.
pub struct Preprocessor {
    date_format: String,
}

impl Preprocessor {
    pub fn new(date_format: &str) -> Self {
        Self {
            date_format: date_format.to_string(),
        }
    }

    pub fn preprocess_daily(&self, rows: &[RawDailyRow]) -> Result<Preprocessed<DailyRecord>> {
        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if let Some(record) = self.daily_record(row, index)? {
                records.push(record);
            }
        }

        Ok(Preprocessed {
            incomplete_rows: rows.len() - records.len(),
            rows_read: rows.len(),
            records,
        })
    }

    pub fn preprocess_hourly(&self, rows: &[RawHourlyRow]) -> Result<Preprocessed<HourlyRecord>> {
        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if let Some(record) = self.hourly_record(row, index)? {
                records.push(record);
            }
        }

        Ok(Preprocessed {
            incomplete_rows: rows.len() - records.len(),
            rows_read: rows.len(),
            records,
        })
    }

    /// Convert one daily row; `Ok(None)` when any cell of the source row is missing.
    pub fn daily_record(&self, row: &RawDailyRow, index: usize) -> Result<Option<DailyRecord>> {
        let date = self.parse_date(DAILY_SOURCE_NAME, row.date.as_deref(), index)?;

        let weather_situation = row
            .weather_situation
            .map(WeatherSituation::from_code)
            .transpose()
            .map_err(|e| {
                AnalyticsError::preprocessing(DAILY_SOURCE_NAME, row_number(index), e.to_string())
            })?;

        if row.incomplete {
            return Ok(None);
        }

        let (
            Some(date),
            Some(temperature_norm),
            Some(feels_like_norm),
            Some(humidity_norm),
            Some(windspeed_norm),
            Some(weather_situation),
            Some(rental_count),
        ) = (
            date,
            present(row.temperature_norm),
            present(row.feels_like_norm),
            present(row.humidity_norm),
            present(row.windspeed_norm),
            weather_situation,
            row.rental_count,
        )
        else {
            return Ok(None);
        };

        Ok(Some(DailyRecord::new(
            date,
            temperature_norm,
            feels_like_norm,
            humidity_norm,
            windspeed_norm,
            weather_situation,
            rental_count,
        )))
    }

    /// Convert one hourly row; `Ok(None)` when any cell of the source row is missing.
    pub fn hourly_record(&self, row: &RawHourlyRow, index: usize) -> Result<Option<HourlyRecord>> {
        let date = self.parse_date(HOURLY_SOURCE_NAME, row.date.as_deref(), index)?;

        if let Some(hour) = row.hour {
            if hour > MAX_HOUR {
                return Err(AnalyticsError::preprocessing(
                    HOURLY_SOURCE_NAME,
                    row_number(index),
                    format!("hour {} is outside 0-{}", hour, MAX_HOUR),
                ));
            }
        }

        let is_working_day = match row.working_day {
            Some(0) => Some(false),
            Some(1) => Some(true),
            Some(other) => {
                return Err(AnalyticsError::preprocessing(
                    HOURLY_SOURCE_NAME,
                    row_number(index),
                    format!("working-day flag must be 0 or 1, found {}", other),
                ))
            }
            None => None,
        };

        if row.incomplete {
            return Ok(None);
        }

        let (Some(date), Some(hour), Some(is_working_day), Some(rental_count)) =
            (date, row.hour, is_working_day, row.rental_count)
        else {
            return Ok(None);
        };

        Ok(Some(HourlyRecord::new(date, hour, is_working_day, rental_count)))
    }

    fn parse_date(
        &self,
        source_name: &str,
        value: Option<&str>,
        index: usize,
    ) -> Result<Option<NaiveDate>> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(v) => NaiveDate::parse_from_str(v, &self.date_format)
                .map(Some)
                .map_err(|e| {
                    AnalyticsError::preprocessing(
                        source_name,
                        row_number(index),
                        format!("invalid date '{}': {}", v, e),
                    )
                }),
        }
    }
}

/// NaN counts as missing, the way a spreadsheet export leaves it.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayType;

    fn raw_daily(date: Option<&str>, weather: Option<u8>, cnt: Option<u32>) -> RawDailyRow {
        RawDailyRow {
            incomplete: false,
            date: date.map(str::to_string),
            temperature_norm: Some(0.34),
            feels_like_norm: Some(0.36),
            humidity_norm: Some(0.80),
            windspeed_norm: Some(0.16),
            weather_situation: weather,
            rental_count: cnt,
        }
    }

    fn raw_hourly(hour: Option<u8>, working_day: Option<u8>) -> RawHourlyRow {
        RawHourlyRow {
            incomplete: false,
            date: Some("2011-01-03".to_string()),
            hour,
            working_day,
            rental_count: Some(120),
        }
    }

    #[test]
    fn test_daily_conversion() {
        let pre = Preprocessor::new("%Y-%m-%d");
        let record = pre
            .daily_record(&raw_daily(Some("2011-01-01"), Some(3), Some(985)), 0)
            .unwrap()
            .unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(record.weather_situation, WeatherSituation::LightPrecipitation);
        assert_eq!(record.rental_count, 985);
    }

    #[test]
    fn test_incomplete_rows_are_dropped_not_rejected() {
        let pre = Preprocessor::new("%Y-%m-%d");
        let rows = vec![
            raw_daily(Some("2011-01-01"), Some(1), Some(985)),
            raw_daily(None, Some(1), Some(801)),
            raw_daily(Some("2011-01-03"), None, Some(1349)),
            raw_daily(Some("2011-01-04"), Some(1), None),
        ];

        let result = pre.preprocess_daily(&rows).unwrap();
        assert_eq!(result.rows_read, 4);
        assert_eq!(result.incomplete_rows, 3);
        assert_eq!(result.records.len(), 1);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let pre = Preprocessor::new("%Y-%m-%d");
        let mut row = raw_daily(Some("2011-01-01"), Some(1), Some(985));
        row.humidity_norm = Some(f64::NAN);
        assert!(pre.daily_record(&row, 0).unwrap().is_none());
    }

    #[test]
    fn test_row_with_missing_unanalyzed_cell_is_dropped() {
        let pre = Preprocessor::new("%Y-%m-%d");
        let mut daily = raw_daily(Some("2011-01-02"), Some(1), Some(801));
        daily.incomplete = true;
        let mut hourly = raw_hourly(Some(8), Some(1));
        hourly.incomplete = true;

        let result = pre.preprocess_daily(&[daily]).unwrap();
        assert_eq!(result.incomplete_rows, 1);
        assert!(result.records.is_empty());
        assert!(pre.hourly_record(&hourly, 0).unwrap().is_none());
    }

    #[test]
    fn test_incomplete_row_still_rejects_malformed_values() {
        let pre = Preprocessor::new("%Y-%m-%d");
        let mut row = raw_hourly(Some(30), Some(1));
        row.incomplete = true;
        assert!(pre.hourly_record(&row, 0).is_err());
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let pre = Preprocessor::new("%Y-%m-%d");
        let err = pre
            .daily_record(&raw_daily(Some("01/02/2011"), Some(1), Some(985)), 4)
            .unwrap_err();

        match err {
            AnalyticsError::Preprocessing { source_name, row, cause } => {
                assert_eq!(source_name, "daily");
                assert_eq!(row, 6);
                assert!(cause.contains("01/02/2011"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_date_is_fatal_even_when_row_incomplete() {
        let pre = Preprocessor::new("%Y-%m-%d");
        let row = raw_daily(Some("yesterday"), Some(1), None);
        assert!(pre.daily_record(&row, 0).is_err());
    }

    #[test]
    fn test_unknown_weather_code_is_fatal() {
        let pre = Preprocessor::new("%Y-%m-%d");
        let row = raw_daily(Some("2011-01-01"), Some(7), Some(985));
        assert!(matches!(
            pre.daily_record(&row, 0),
            Err(AnalyticsError::Preprocessing { .. })
        ));
    }

    #[test]
    fn test_configurable_date_format() {
        let pre = Preprocessor::new("%d/%m/%Y");
        let record = pre
            .daily_record(&raw_daily(Some("02/01/2011"), Some(1), Some(801)), 0)
            .unwrap()
            .unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2011, 1, 2).unwrap());
    }

    #[test]
    fn test_hourly_conversion_derives_day_type() {
        let pre = Preprocessor::new("%Y-%m-%d");
        let working = pre.hourly_record(&raw_hourly(Some(8), Some(1)), 0).unwrap().unwrap();
        let off = pre.hourly_record(&raw_hourly(Some(8), Some(0)), 1).unwrap().unwrap();

        assert_eq!(working.hour, 8);
        assert_eq!(working.day_type(), DayType::Working);
        assert_eq!(off.day_type(), DayType::Off);
    }

    #[test]
    fn test_hourly_range_checks() {
        let pre = Preprocessor::new("%Y-%m-%d");
        assert!(pre.hourly_record(&raw_hourly(Some(24), Some(1)), 0).is_err());
        assert!(pre.hourly_record(&raw_hourly(Some(23), Some(2)), 0).is_err());
        assert!(pre.hourly_record(&raw_hourly(None, Some(1)), 0).unwrap().is_none());
    }
}
