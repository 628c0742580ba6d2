use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default export directory with format: output/bikeshare-{YYMMDD}
pub fn generate_default_export_dir() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let dirname = format!("bikeshare-{:02}{:02}{:02}", year, month, day);
    PathBuf::from("output").join(dirname)
}
