//! Configuration validation.

use super::{Config, EndpointConfig};
use crate::core::identifier::validate_identifier;
use crate::error::{CheckError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    validate_endpoint("source", &config.source)?;
    validate_endpoint("sink", &config.sink)?;

    if let Some(0) = config.check.workers {
        return Err(CheckError::Config("check.workers must be at least 1".into()));
    }

    Ok(())
}

fn validate_endpoint(section: &str, endpoint: &EndpointConfig) -> Result<()> {
    if endpoint.schema.is_empty() {
        return Err(CheckError::Config(format!("{}.schema is required", section)));
    }
    validate_identifier(&endpoint.schema)
        .map_err(|e| CheckError::Config(format!("{}.schema is invalid: {}", section, e)))
}
