use crate::models::{DailyRecord, TableRecord};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Outcome of cleaning one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub source_name: String,
    pub rows_read: usize,
    pub incomplete_rows: usize,
    pub exact_duplicates: usize,
    pub key_conflicts: usize,
    pub out_of_range_rows: usize,
    pub rows_retained: usize,
}

impl CleaningReport {
    pub fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            ..Self::default()
        }
    }

    pub fn rows_dropped(&self) -> usize {
        self.incomplete_rows + self.exact_duplicates + self.key_conflicts
    }

    pub fn retained_percentage(&self) -> f64 {
        if self.rows_read == 0 {
            return 100.0;
        }
        (self.rows_retained as f64 / self.rows_read as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "Source '{}': {} rows read, {} retained ({:.1}%)\n\
            - Incomplete rows dropped: {}\n\
            - Exact duplicates dropped: {}\n\
            - Key conflicts dropped: {}\n\
            - Rows with values outside [0, 1]: {}",
            self.source_name,
            self.rows_read,
            self.rows_retained,
            self.retained_percentage(),
            self.incomplete_rows,
            self.exact_duplicates,
            self.key_conflicts,
            self.out_of_range_rows
        )
    }
}

/// Result of removing duplicate rows from a table.
#[derive(Debug, Clone)]
pub struct Deduplicated<T> {
    pub records: Vec<T>,
    pub exact_duplicates: usize,
    pub key_conflicts: usize,
}

pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Drop exact duplicates, then rows whose key is already taken by a
    /// different row. The first occurrence always wins and order is kept.
    pub fn deduplicate<T: TableRecord>(
        &self,
        source_name: &str,
        records: Vec<T>,
    ) -> Deduplicated<T> {
        let mut seen_rows = HashSet::with_capacity(records.len());
        let mut seen_keys: HashMap<T::Key, usize> = HashMap::with_capacity(records.len());
        let mut kept = Vec::with_capacity(records.len());
        let mut exact_duplicates = 0;
        let mut key_conflicts = 0;

        for record in records {
            if !seen_rows.insert(record.fingerprint()) {
                exact_duplicates += 1;
                continue;
            }

            let key = record.key();
            if let Some(&first) = seen_keys.get(&key) {
                warn!(
                    source = source_name,
                    key = ?key,
                    kept_position = first,
                    "Conflicting rows share a key; keeping the first"
                );
                key_conflicts += 1;
                continue;
            }

            seen_keys.insert(key, kept.len());
            kept.push(record);
        }

        Deduplicated {
            records: kept,
            exact_duplicates,
            key_conflicts,
        }
    }

    /// Count daily rows whose normalized fields fall outside [0, 1].
    pub fn count_out_of_range(&self, records: &[DailyRecord]) -> usize {
        records
            .iter()
            .filter(|r| !r.is_within_normalized_range())
            .count()
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
