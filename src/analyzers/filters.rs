use crate::error::AnalyticsError;
use crate::models::{DailyRecord, DayType, HourlyRecord, WeatherSituation};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Day-type selector offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayTypeFilter {
    #[default]
    All,
    Only(DayType),
}

impl DayTypeFilter {
    pub const CHOICES: [&'static str; 3] = ["all", "working", "off"];

    pub fn matches(&self, record: &HourlyRecord) -> bool {
        match self {
            DayTypeFilter::All => true,
            DayTypeFilter::Only(day_type) => record.day_type() == *day_type,
        }
    }
}

impl FromStr for DayTypeFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "all" => Ok(DayTypeFilter::All),
            "working" => Ok(DayTypeFilter::Only(DayType::Working)),
            "off" => Ok(DayTypeFilter::Only(DayType::Off)),
            _ => Err(AnalyticsError::InvalidSelection {
                kind: "day type",
                value: s.to_string(),
                expected: Self::CHOICES.join(", "),
            }),
        }
    }
}

impl fmt::Display for DayTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayTypeFilter::All => f.write_str("all"),
            DayTypeFilter::Only(day_type) => write!(f, "{}", day_type),
        }
    }
}

/// Weather selector offered to the user. Heavy precipitation exists in the
/// data but is deliberately not a choice here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherFilter {
    #[default]
    All,
    Clear,
    Misty,
    LightPrecipitation,
}

impl WeatherFilter {
    pub const CHOICES: [&'static str; 4] = ["all", "clear", "misty", "light-precipitation"];

    pub fn situation(&self) -> Option<WeatherSituation> {
        match self {
            WeatherFilter::All => None,
            WeatherFilter::Clear => Some(WeatherSituation::Clear),
            WeatherFilter::Misty => Some(WeatherSituation::Misty),
            WeatherFilter::LightPrecipitation => Some(WeatherSituation::LightPrecipitation),
        }
    }

    pub fn matches(&self, record: &DailyRecord) -> bool {
        match self.situation() {
            None => true,
            Some(situation) => record.weather_situation == situation,
        }
    }
}

impl FromStr for WeatherFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "all" => Ok(WeatherFilter::All),
            "clear" | "1" => Ok(WeatherFilter::Clear),
            "misty" | "2" => Ok(WeatherFilter::Misty),
            "light-precipitation" | "3" => Ok(WeatherFilter::LightPrecipitation),
            _ => Err(AnalyticsError::InvalidSelection {
                kind: "weather",
                value: s.to_string(),
                expected: Self::CHOICES.join(", "),
            }),
        }
    }
}

impl fmt::Display for WeatherFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.situation() {
            None => f.write_str("all"),
            Some(situation) => write!(f, "{}", situation),
        }
    }
}

impl Serialize for DayTypeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for WeatherFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace('_', "-")
}

/// Hourly rows matching the day-type selection, in table order.
pub fn filter_by_day_type(hourly: &[HourlyRecord], selection: DayTypeFilter) -> Vec<&HourlyRecord> {
    hourly.iter().filter(|r| selection.matches(r)).collect()
}

/// Daily rows matching the weather selection, in table order.
pub fn filter_by_weather(daily: &[DailyRecord], selection: WeatherFilter) -> Vec<&DailyRecord> {
    daily.iter().filter(|r| selection.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, day).unwrap()
    }

    fn daily(day: u32, weather: WeatherSituation) -> DailyRecord {
        DailyRecord::new(date(day), 0.3, 0.3, 0.6, 0.2, weather, 100 * day)
    }

    fn hourly_table() -> Vec<HourlyRecord> {
        vec![
            HourlyRecord::new(date(3), 8, true, 120),
            HourlyRecord::new(date(1), 8, false, 40),
            HourlyRecord::new(date(3), 17, true, 150),
        ]
    }

    #[test]
    fn test_all_day_types_returns_full_table() {
        let table = hourly_table();
        let subset = filter_by_day_type(&table, DayTypeFilter::All);
        assert_eq!(subset.len(), table.len());
        assert!(table.iter().all(|r| subset.contains(&r)));
    }

    #[test]
    fn test_day_type_filter_is_sound_and_complete() {
        let table = hourly_table();
        for day_type in DayType::ALL {
            let subset = filter_by_day_type(&table, DayTypeFilter::Only(day_type));
            assert!(subset.iter().all(|r| r.day_type() == day_type));
            let expected = table.iter().filter(|r| r.day_type() == day_type).count();
            assert_eq!(subset.len(), expected);
        }
    }

    #[test]
    fn test_weather_filter_clear() {
        let table = vec![
            daily(1, WeatherSituation::Clear),
            daily(2, WeatherSituation::Clear),
            daily(3, WeatherSituation::Misty),
        ];

        let subset = filter_by_weather(&table, WeatherFilter::Clear);
        assert_eq!(subset, vec![&table[0], &table[1]]);
    }

    #[test]
    fn test_weather_filter_is_sound_and_complete() {
        let table = vec![
            daily(1, WeatherSituation::Clear),
            daily(2, WeatherSituation::Misty),
            daily(3, WeatherSituation::LightPrecipitation),
            daily(4, WeatherSituation::Misty),
            daily(5, WeatherSituation::HeavyPrecipitation),
            daily(6, WeatherSituation::Clear),
        ];

        for selection in [
            WeatherFilter::Clear,
            WeatherFilter::Misty,
            WeatherFilter::LightPrecipitation,
        ] {
            let situation = selection.situation().unwrap();
            let subset = filter_by_weather(&table, selection);
            assert!(subset.iter().all(|r| r.weather_situation == situation));
            let expected: Vec<&DailyRecord> = table
                .iter()
                .filter(|r| r.weather_situation == situation)
                .collect();
            assert_eq!(subset, expected);
        }
    }

    #[test]
    fn test_empty_selection_is_valid() {
        let table = vec![daily(1, WeatherSituation::Clear)];
        assert!(filter_by_weather(&table, WeatherFilter::LightPrecipitation).is_empty());
        assert!(filter_by_day_type(&[], DayTypeFilter::Only(DayType::Off)).is_empty());
    }

    #[test]
    fn test_heavy_precipitation_rows_only_reachable_through_all() {
        let table = vec![daily(1, WeatherSituation::HeavyPrecipitation)];
        assert_eq!(filter_by_weather(&table, WeatherFilter::All).len(), 1);
        for choice in &WeatherFilter::CHOICES[1..] {
            let selection: WeatherFilter = choice.parse().unwrap();
            assert!(filter_by_weather(&table, selection).is_empty());
        }
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!(
            "Working".parse::<DayTypeFilter>().unwrap(),
            DayTypeFilter::Only(DayType::Working)
        );
        assert_eq!("all".parse::<DayTypeFilter>().unwrap(), DayTypeFilter::All);
        assert!("weekend".parse::<DayTypeFilter>().is_err());

        assert_eq!(
            "light_precipitation".parse::<WeatherFilter>().unwrap(),
            WeatherFilter::LightPrecipitation
        );
        assert_eq!("2".parse::<WeatherFilter>().unwrap(), WeatherFilter::Misty);
        assert!("heavy-precipitation".parse::<WeatherFilter>().is_err());
        assert!("4".parse::<WeatherFilter>().is_err());
    }
}
