//! Type definitions for fingerprint comparison.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Fingerprint of a single row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowFingerprint {
    /// Composite key used to locate the row on either side.
    pub key: String,
    /// 64-bit digest of the projected column values.
    pub hash: u64,
}

/// Result of comparing source and sink fingerprints for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintDiff {
    /// Keys that exist in the source but not the sink.
    pub missing_in_sink: Vec<String>,
    /// Keys that exist in the sink but not the source.
    pub missing_in_source: Vec<String>,
    /// Keys present on both sides with different digests.
    pub mismatched: Vec<String>,
}

impl FingerprintDiff {
    /// Compare two fingerprint sets by composite key.
    ///
    /// Rows sharing a key are compared as multisets of digests, so duplicate
    /// rows (common in tables without a primary key) are counted rather than
    /// collapsed. Per key, equal digests pair off first; remaining digests
    /// present on both sides count as mismatches and any surplus on one side
    /// is reported as missing on the other, once per extra row.
    ///
    /// Output lists are sorted so the result does not depend on row order.
    pub fn compare(source: &[RowFingerprint], sink: &[RowFingerprint]) -> Self {
        let mut by_key: HashMap<&str, (Vec<u64>, Vec<u64>)> = HashMap::new();
        for f in source {
            by_key.entry(f.key.as_str()).or_default().0.push(f.hash);
        }
        for f in sink {
            by_key.entry(f.key.as_str()).or_default().1.push(f.hash);
        }

        let mut diff = FingerprintDiff::default();

        for (key, (mut source_hashes, mut sink_hashes)) in by_key {
            source_hashes.sort_unstable();
            sink_hashes.sort_unstable();
            let (source_left, sink_left) = unmatched_counts(&source_hashes, &sink_hashes);

            let mismatched = source_left.min(sink_left);
            let push = |list: &mut Vec<String>, n: usize| {
                list.extend(std::iter::repeat(key.to_string()).take(n));
            };
            push(&mut diff.mismatched, mismatched);
            push(&mut diff.missing_in_sink, source_left - mismatched);
            push(&mut diff.missing_in_source, sink_left - mismatched);
        }

        diff.missing_in_sink.sort();
        diff.missing_in_source.sort();
        diff.mismatched.sort();
        diff
    }

    /// Total number of differences.
    pub fn total_differences(&self) -> usize {
        self.missing_in_sink.len() + self.missing_in_source.len() + self.mismatched.len()
    }

    /// Check if there are any differences.
    pub fn has_differences(&self) -> bool {
        self.total_differences() > 0
    }
}

/// Count digests left unpaired on each side of two sorted lists.
fn unmatched_counts(source: &[u64], sink: &[u64]) -> (usize, usize) {
    let (mut i, mut j, mut paired) = (0, 0, 0);
    while i < source.len() && j < sink.len() {
        match source[i].cmp(&sink[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                paired += 1;
                i += 1;
                j += 1;
            }
        }
    }
    (source.len() - paired, sink.len() - paired)
}

/// Verification result for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCheckResult {
    /// Table name.
    pub table_name: String,
    /// Rows fingerprinted on the source side.
    pub source_row_count: usize,
    /// Rows fingerprinted on the sink side.
    pub sink_row_count: usize,
    /// Differences found.
    pub diff: FingerprintDiff,
}

impl TableCheckResult {
    /// Check if the table is consistent.
    pub fn is_consistent(&self) -> bool {
        !self.diff.has_differences()
    }
}

/// Verification result for a whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResult {
    /// Run identifier.
    pub run_id: Option<String>,
    /// Results for each table.
    pub tables: Vec<TableCheckResult>,
    /// Tables whose fingerprints all matched.
    pub tables_consistent: usize,
    /// Tables with at least one difference.
    pub tables_with_differences: usize,
    /// Whether every tracked table reached full completion.
    pub run_complete: bool,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl CheckResult {
    /// Add a table result.
    pub fn add_table(&mut self, result: TableCheckResult) {
        if result.is_consistent() {
            self.tables_consistent += 1;
        } else {
            self.tables_with_differences += 1;
        }
        self.tables.push(result);
    }

    /// Total differences across all tables.
    pub fn total_differences(&self) -> usize {
        self.tables.iter().map(|t| t.diff.total_differences()).sum()
    }
}
