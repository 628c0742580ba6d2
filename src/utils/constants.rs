/// Source names used in logs and error messages
pub const DAILY_SOURCE_NAME: &str = "daily";
pub const HOURLY_SOURCE_NAME: &str = "hourly";

/// Default file names
pub const DEFAULT_DAILY_FILE: &str = "day.csv";
pub const DEFAULT_HOURLY_FILE: &str = "hour.csv";
pub const DAILY_PARQUET_FILE: &str = "daily.parquet";
pub const HOURLY_PARQUET_FILE: &str = "hourly.parquet";
pub const CLEANING_REPORT_FILE: &str = "cleaning_report.json";

/// Date format of the `dteday` column
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "BIKESHARE";

/// Cell values read as missing, compared case-insensitively
pub const MISSING_VALUE_TOKENS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

/// Hour-of-day bounds
pub const MAX_HOUR: u8 = 23;

/// Minimum rows for pairwise statistics
pub const MIN_ROWS_FOR_CORRELATION: usize = 2;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
