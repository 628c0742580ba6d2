pub mod concurrent_reader;
pub mod daily_reader;
pub mod hourly_reader;
pub mod source;

pub use concurrent_reader::{ConcurrentReader, RawTables};
pub use daily_reader::{DailyReader, RawDailyRow};
pub use hourly_reader::{HourlyReader, RawHourlyRow};
