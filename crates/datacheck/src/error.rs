//! Error types for the verification core.

use thiserror::Error;

/// Exit code for configuration and parse errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for rejected requests (empty table lists, bad names).
pub const EXIT_VALIDATION_ERROR: u8 = 2;
/// Exit code when a run is already in progress.
pub const EXIT_CONFLICT_ERROR: u8 = 4;
/// Exit code when change logs could not be handed to the check side.
pub const EXIT_DELIVERY_ERROR: u8 = 5;
/// Exit code when an extraction task failed.
pub const EXIT_EXTRACT_ERROR: u8 = 6;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for verification operations.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Configuration error (invalid YAML, unknown database type, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A run is tracked and not yet complete.
    #[error("Check run in progress: {0}")]
    Conflict(String),

    /// Request rejected before touching any state.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Increment log consumer is gone.
    #[error("Increment log delivery failed: {0}")]
    LogDelivery(String),

    /// Extraction failed for a specific table
    #[error("Extraction failed for table {table}: {message}")]
    Extract { table: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CheckError {
    /// Create a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CheckError::Validation(message.into())
    }

    /// Create an Extract error.
    pub fn extract(table: impl Into<String>, message: impl Into<String>) -> Self {
        CheckError::Extract {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckError::Config(_) | CheckError::Yaml(_) | CheckError::Json(_) => {
                EXIT_CONFIG_ERROR
            }
            CheckError::Validation(_) => EXIT_VALIDATION_ERROR,
            CheckError::Conflict(_) => EXIT_CONFLICT_ERROR,
            CheckError::LogDelivery(_) => EXIT_DELIVERY_ERROR,
            CheckError::Extract { .. } => EXIT_EXTRACT_ERROR,
            CheckError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for verification operations.
pub type Result<T> = std::result::Result<T, CheckError>;
