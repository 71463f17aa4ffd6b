//! Deterministic row fingerprints.
//!
//! Two extraction processes, one per database, fingerprint their rows
//! independently and only the digests travel to the check side. For that to
//! work the digest must be a pure function of the projected column values:
//!
//! - Values are taken in the caller-supplied column order (the canonical
//!   ordinal order from [`crate::core::projection`]), never map order.
//! - Columns absent from the row are skipped, not padded.
//! - The hash is xxHash3-64 with the default seed, whose output is fixed by
//!   the xxHash reference and identical on every platform.
//!
//! Formatting heterogeneous source types into strings happens before this
//! point and must agree between the two sides.

use std::collections::HashMap;

use xxhash_rust::xxh3::xxh3_64;

use crate::core::projection::TableProjection;

use super::types::RowFingerprint;

/// One row, keyed by column name, with values already rendered as text.
pub type RowValues = HashMap<String, String>;

/// Separator used between key values in a composite key.
///
/// ASCII unit separator: a control character that does not occur in
/// ordinary column text.
pub const KEY_DELIMITER: char = '\u{1F}';

/// Fingerprint of an empty projection.
pub const EMPTY_FINGERPRINT: u64 = 0;

/// Compute the 64-bit fingerprint of a row over `columns`.
///
/// Returns [`EMPTY_FINGERPRINT`] when `columns` is empty.
pub fn fingerprint(values: &RowValues, columns: &[String]) -> u64 {
    if columns.is_empty() {
        return EMPTY_FINGERPRINT;
    }

    let mut buf = String::with_capacity(columns.len() * 16);
    for value in columns.iter().filter_map(|c| values.get(c)) {
        buf.push_str(value);
    }
    xxh3_64(buf.as_bytes())
}

/// Build the composite key identifying a row.
///
/// Uses the same column selection as [`fingerprint`], joined with
/// [`KEY_DELIMITER`]. Returns an empty string when `columns` is empty.
pub fn composite_key(values: &RowValues, columns: &[String]) -> String {
    let mut key = String::new();
    for (i, value) in columns.iter().filter_map(|c| values.get(c)).enumerate() {
        if i > 0 {
            key.push(KEY_DELIMITER);
        }
        key.push_str(value);
    }
    key
}

/// Fingerprint one row under a table projection.
pub fn fingerprint_row(values: &RowValues, projection: &TableProjection) -> RowFingerprint {
    RowFingerprint {
        key: composite_key(values, projection.key_columns()),
        hash: fingerprint(values, &projection.columns),
    }
}

/// Fingerprint a slice of rows under a table projection.
pub fn fingerprint_rows(rows: &[RowValues], projection: &TableProjection) -> Vec<RowFingerprint> {
    rows.iter().map(|row| fingerprint_row(row, projection)).collect()
}
