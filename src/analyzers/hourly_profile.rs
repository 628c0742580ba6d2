use crate::models::{DayType, HourlyRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean rentals for one hour of one day type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilePoint {
    pub hour: u8,
    pub mean_rentals: f64,
    pub observations: usize,
}

/// Average rentals per hour, split by day type. Hours with no rows are
/// absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlyProfile {
    pub series: BTreeMap<DayType, Vec<ProfilePoint>>,
}

impl HourlyProfile {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn points(&self, day_type: DayType) -> &[ProfilePoint] {
        self.series
            .get(&day_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn mean_at(&self, day_type: DayType, hour: u8) -> Option<f64> {
        self.points(day_type)
            .iter()
            .find(|p| p.hour == hour)
            .map(|p| p.mean_rentals)
    }
}

/// Hours with the highest mean rentals for a day type; ties are all kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakHours {
    pub day_type: DayType,
    pub hours: Vec<u8>,
    pub mean_rentals: f64,
}

/// Group the subset by (hour, day type) and average `rental_count`.
pub fn hourly_rental_profile(hourly: &[&HourlyRecord]) -> HourlyProfile {
    let mut sums: BTreeMap<(DayType, u8), (u64, usize)> = BTreeMap::new();
    for record in hourly {
        let entry = sums.entry((record.day_type(), record.hour)).or_insert((0, 0));
        entry.0 += u64::from(record.rental_count);
        entry.1 += 1;
    }

    let mut series: BTreeMap<DayType, Vec<ProfilePoint>> = BTreeMap::new();
    for ((day_type, hour), (sum, count)) in sums {
        series.entry(day_type).or_default().push(ProfilePoint {
            hour,
            mean_rentals: sum as f64 / count as f64,
            observations: count,
        });
    }

    HourlyProfile { series }
}

/// Peak hour(s) per day type present in the profile.
pub fn peak_hours(profile: &HourlyProfile) -> Vec<PeakHours> {
    profile
        .series
        .iter()
        .filter_map(|(day_type, points)| {
            let max = points
                .iter()
                .map(|p| p.mean_rentals)
                .fold(f64::NEG_INFINITY, f64::max);
            if !max.is_finite() {
                return None;
            }

            Some(PeakHours {
                day_type: *day_type,
                hours: points
                    .iter()
                    .filter(|p| p.mean_rentals == max)
                    .map(|p| p.hour)
                    .collect(),
                mean_rentals: max,
            })
        })
        .collect()
}
