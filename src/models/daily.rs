use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::AnalyticsError;
use crate::models::{TableRecord, WeatherSituation};

/// One row of the daily table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DailyRecord {
    pub date: NaiveDate,

    #[validate(range(min = 0.0, max = 1.0))]
    pub temperature_norm: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    pub feels_like_norm: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    pub humidity_norm: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    pub windspeed_norm: f64,

    pub weather_situation: WeatherSituation,
    pub rental_count: u32,
}

impl DailyRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        temperature_norm: f64,
        feels_like_norm: f64,
        humidity_norm: f64,
        windspeed_norm: f64,
        weather_situation: WeatherSituation,
        rental_count: u32,
    ) -> Self {
        Self {
            date,
            temperature_norm,
            feels_like_norm,
            humidity_norm,
            windspeed_norm,
            weather_situation,
            rental_count,
        }
    }

    pub fn value(&self, field: DailyField) -> f64 {
        match field {
            DailyField::Temperature => self.temperature_norm,
            DailyField::FeelsLike => self.feels_like_norm,
            DailyField::Humidity => self.humidity_norm,
            DailyField::Windspeed => self.windspeed_norm,
            DailyField::RentalCount => self.rental_count as f64,
        }
    }

    /// True when every normalized field lies in [0, 1].
    pub fn is_within_normalized_range(&self) -> bool {
        self.validate().is_ok()
    }
}

impl TableRecord for DailyRecord {
    type Key = NaiveDate;
    type Fingerprint = (NaiveDate, [u64; 4], u8, u32);

    fn key(&self) -> Self::Key {
        self.date
    }

    fn fingerprint(&self) -> Self::Fingerprint {
        (
            self.date,
            [
                self.temperature_norm.to_bits(),
                self.feels_like_norm.to_bits(),
                self.humidity_norm.to_bits(),
                self.windspeed_norm.to_bits(),
            ],
            self.weather_situation.code(),
            self.rental_count,
        )
    }
}

/// Numeric columns of the daily table usable in correlations and trend lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyField {
    Temperature,
    FeelsLike,
    Humidity,
    Windspeed,
    RentalCount,
}

impl DailyField {
    pub const WEATHER_FACTORS: [DailyField; 3] = [
        DailyField::Temperature,
        DailyField::Humidity,
        DailyField::Windspeed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DailyField::Temperature => "temperature",
            DailyField::FeelsLike => "feels_like",
            DailyField::Humidity => "humidity",
            DailyField::Windspeed => "windspeed",
            DailyField::RentalCount => "rental_count",
        }
    }
}

impl fmt::Display for DailyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DailyField {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "temperature" | "temp" => Ok(DailyField::Temperature),
            "feels_like" | "atemp" => Ok(DailyField::FeelsLike),
            "humidity" | "hum" => Ok(DailyField::Humidity),
            "windspeed" => Ok(DailyField::Windspeed),
            "rental_count" | "cnt" => Ok(DailyField::RentalCount),
            _ => Err(AnalyticsError::InvalidSelection {
                kind: "field",
                value: s.to_string(),
                expected: "temperature, feels_like, humidity, windspeed, rental_count".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(temp: f64) -> DailyRecord {
        DailyRecord::new(
            NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            temp,
            0.36,
            0.81,
            0.16,
            WeatherSituation::Misty,
            985,
        )
    }

    #[test]
    fn test_field_values() {
        let r = record(0.34);
        assert_eq!(r.value(DailyField::Temperature), 0.34);
        assert_eq!(r.value(DailyField::Humidity), 0.81);
        assert_eq!(r.value(DailyField::RentalCount), 985.0);
    }

    #[test]
    fn test_normalized_range_validation() {
        assert!(record(0.34).is_within_normalized_range());
        assert!(!record(1.2).is_within_normalized_range());
    }

    #[test]
    fn test_fingerprint_distinguishes_values() {
        assert_eq!(record(0.34).fingerprint(), record(0.34).fingerprint());
        assert_ne!(record(0.34).fingerprint(), record(0.35).fingerprint());
        assert_eq!(record(0.34).key(), record(0.35).key());
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("temp".parse::<DailyField>().unwrap(), DailyField::Temperature);
        assert_eq!("Feels-Like".parse::<DailyField>().unwrap(), DailyField::FeelsLike);
        assert!("pressure".parse::<DailyField>().is_err());
    }
}
