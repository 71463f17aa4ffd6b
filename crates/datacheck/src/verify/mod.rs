//! Row fingerprinting and digest comparison.
//!
//! Each extraction process reduces its rows to `(composite key, 64-bit
//! digest)` pairs with [`fingerprint`]. The check side compares the two sets
//! with [`FingerprintDiff::compare`] without ever seeing raw row data.

pub mod fingerprint;
pub mod types;

pub use fingerprint::{
    composite_key, fingerprint, fingerprint_row, fingerprint_rows, RowValues, EMPTY_FINGERPRINT,
    KEY_DELIMITER,
};
pub use types::{CheckResult, FingerprintDiff, RowFingerprint, TableCheckResult};
