use serde::{Deserialize, Serialize};
use std::fmt;

/// Working day vs weekend/holiday, derived from the source's working-day flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Working,
    Off,
}

impl DayType {
    pub const ALL: [DayType; 2] = [DayType::Working, DayType::Off];

    pub fn from_working_day(is_working_day: bool) -> Self {
        if is_working_day {
            DayType::Working
        } else {
            DayType::Off
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Working => "working",
            DayType::Off => "off",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayType::Working => "Working day",
            DayType::Off => "Weekend/holiday",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation() {
        assert_eq!(DayType::from_working_day(true), DayType::Working);
        assert_eq!(DayType::from_working_day(false), DayType::Off);
        assert_eq!(DayType::Off.to_string(), "off");
    }
}
