//! Identifier validation for table names arriving from other processes.
//!
//! Table names reach the check service from independent extraction
//! processes. They are opaque keys to the status registry, but they also end
//! up quoted into SQL by the dialects, so the same suspicious patterns are
//! rejected at every entry point.

use crate::error::{CheckError, Result};

/// Maximum identifier length (conservative limit across databases).
/// - PostgreSQL/openGauss: 63 bytes
/// - SQL Server: 128 characters
/// - MySQL: 64 characters
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes (injection vector)
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `CheckError::Validation` with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CheckError::validation("Identifier cannot be empty"));
    }

    if name.contains('\0') {
        return Err(CheckError::Validation(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(CheckError::Validation(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Validate a list of table names, rejecting an empty list.
pub fn validate_table_names<S: AsRef<str>>(names: &[S]) -> Result<()> {
    if names.is_empty() {
        return Err(CheckError::validation("Table name list cannot be empty"));
    }
    names.iter().try_for_each(|n| validate_identifier(n.as_ref()))
}
