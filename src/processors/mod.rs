pub mod cleaner;
pub mod integrity_checker;
pub mod preprocessor;

pub use cleaner::{CleanedTable, Cleaner};
pub use integrity_checker::{CleaningReport, Deduplicated, IntegrityChecker};
pub use preprocessor::{Preprocessed, Preprocessor};
