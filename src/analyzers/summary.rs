use crate::models::{DailyRecord, DayType, HourlyRecord, WeatherSituation};
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline figures shown next to the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub days: usize,
    /// `None` for an empty daily table.
    pub mean_daily_rentals: Option<f64>,
    pub total_rentals: u64,
    pub mean_hourly_rentals_by_day_type: BTreeMap<DayType, f64>,
}

/// Box-plot figures of daily rentals for one weather situation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRentalStats {
    pub weather_situation: WeatherSituation,
    pub days: usize,
    pub min: f64,
    pub first_quartile: f64,
    pub median: f64,
    pub third_quartile: f64,
    pub max: f64,
    pub mean: f64,
}

/// Mean and total daily rentals, plus mean hourly rentals per day type
/// over the unfiltered hourly table.
pub fn summary_statistics(daily: &[DailyRecord], hourly: &[HourlyRecord]) -> SummaryStatistics {
    let total_rentals = total_rentals(daily);
    let mean_daily_rentals = if daily.is_empty() {
        None
    } else {
        Some(total_rentals as f64 / daily.len() as f64)
    };

    let mut by_day_type: BTreeMap<DayType, (u64, usize)> = BTreeMap::new();
    for record in hourly {
        let entry = by_day_type.entry(record.day_type()).or_insert((0, 0));
        entry.0 += u64::from(record.rental_count);
        entry.1 += 1;
    }

    SummaryStatistics {
        days: daily.len(),
        mean_daily_rentals,
        total_rentals,
        mean_hourly_rentals_by_day_type: by_day_type
            .into_iter()
            .map(|(day_type, (sum, count))| (day_type, sum as f64 / count as f64))
            .collect(),
    }
}

pub fn total_rentals(daily: &[DailyRecord]) -> u64 {
    daily.iter().map(|r| u64::from(r.rental_count)).sum()
}

/// Distribution of daily rentals per weather situation present in the subset,
/// ordered by weather code.
pub fn rentals_by_weather(daily: &[&DailyRecord]) -> Vec<WeatherRentalStats> {
    let mut groups: BTreeMap<WeatherSituation, Vec<f64>> = BTreeMap::new();
    for record in daily {
        groups
            .entry(record.weather_situation)
            .or_default()
            .push(record.rental_count as f64);
    }

    groups
        .into_iter()
        .map(|(weather_situation, mut values)| {
            values.sort_by(|a, b| a.total_cmp(b));
            let n = values.len();
            WeatherRentalStats {
                weather_situation,
                days: n,
                min: values[0],
                first_quartile: percentile(&values, 25.0),
                median: percentile(&values, 50.0),
                third_quartile: percentile(&values, 75.0),
                max: values[n - 1],
                mean: values.iter().sum::<f64>() / n as f64,
            }
        })
        .collect()
}

/// Linear-interpolated percentile of already sorted, non-empty values.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, day).unwrap()
    }

    fn daily(day: u32, weather: WeatherSituation, cnt: u32) -> DailyRecord {
        DailyRecord::new(date(day), 0.3, 0.3, 0.6, 0.2, weather, cnt)
    }

    #[test]
    fn test_summary_scenario() {
        let table = vec![
            daily(1, WeatherSituation::Clear, 100),
            daily(2, WeatherSituation::Clear, 200),
            daily(3, WeatherSituation::Misty, 300),
        ];

        let summary = summary_statistics(&table, &[]);

        assert_eq!(summary.mean_daily_rentals, Some(200.0));
        assert_eq!(summary.total_rentals, 600);
        assert_eq!(summary.days, 3);
        assert!(summary.mean_hourly_rentals_by_day_type.is_empty());
    }

    #[test]
    fn test_summary_by_day_type() {
        let hourly = vec![
            HourlyRecord::new(date(3), 8, true, 120),
            HourlyRecord::new(date(3), 17, true, 150),
            HourlyRecord::new(date(1), 8, false, 40),
        ];

        let summary = summary_statistics(&[], &hourly);

        assert_eq!(summary.mean_daily_rentals, None);
        assert_eq!(summary.total_rentals, 0);
        assert_eq!(
            summary.mean_hourly_rentals_by_day_type,
            BTreeMap::from([(DayType::Working, 135.0), (DayType::Off, 40.0)])
        );
    }

    #[test]
    fn test_rentals_by_weather() {
        let table = vec![
            daily(1, WeatherSituation::Misty, 400),
            daily(2, WeatherSituation::Clear, 100),
            daily(3, WeatherSituation::Clear, 300),
            daily(4, WeatherSituation::Clear, 200),
            daily(5, WeatherSituation::Clear, 500),
        ];
        let subset: Vec<&DailyRecord> = table.iter().collect();

        let stats = rentals_by_weather(&subset);

        assert_eq!(stats.len(), 2);
        let clear = &stats[0];
        assert_eq!(clear.weather_situation, WeatherSituation::Clear);
        assert_eq!(clear.days, 4);
        assert_eq!(clear.min, 100.0);
        assert_eq!(clear.first_quartile, 175.0);
        assert_eq!(clear.median, 250.0);
        assert_eq!(clear.third_quartile, 350.0);
        assert_eq!(clear.max, 500.0);
        assert_eq!(clear.mean, 275.0);

        let misty = &stats[1];
        assert_eq!(misty.days, 1);
        assert_eq!(misty.median, 400.0);
    }

    #[test]
    fn test_rentals_by_weather_empty() {
        assert!(rentals_by_weather(&[]).is_empty());
    }
}
