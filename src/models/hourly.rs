use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DayType, TableRecord};

/// One row of the hourly table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub is_working_day: bool,
    pub rental_count: u32,
}

impl HourlyRecord {
    pub fn new(date: NaiveDate, hour: u8, is_working_day: bool, rental_count: u32) -> Self {
        Self {
            date,
            hour,
            is_working_day,
            rental_count,
        }
    }

    pub fn day_type(&self) -> DayType {
        DayType::from_working_day(self.is_working_day)
    }
}

impl TableRecord for HourlyRecord {
    type Key = (NaiveDate, u8);
    type Fingerprint = HourlyRecord;

    fn key(&self) -> Self::Key {
        (self.date, self.hour)
    }

    fn fingerprint(&self) -> Self::Fingerprint {
        self.clone()
    }
}
