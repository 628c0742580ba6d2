pub mod daily;
pub mod day_type;
pub mod hourly;
pub mod weather;

pub use daily::{DailyField, DailyRecord};
pub use day_type::DayType;
pub use hourly::HourlyRecord;
pub use weather::WeatherSituation;

use std::fmt::Debug;
use std::hash::Hash;

/// Rows of a base table: a uniqueness key plus an exact-match fingerprint.
pub trait TableRecord: Clone {
    type Key: Hash + Eq + Clone + Debug;
    type Fingerprint: Hash + Eq;

    fn key(&self) -> Self::Key;

    fn fingerprint(&self) -> Self::Fingerprint;
}
