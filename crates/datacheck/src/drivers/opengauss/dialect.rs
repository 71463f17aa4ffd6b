//! openGauss/PostgreSQL SQL dialect (Strategy pattern).

use crate::core::traits::{rewrite_backtick_quotes, Dialect};

/// openGauss dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct OpenGaussDialect;

impl OpenGaussDialect {
    /// Create a new openGauss dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for OpenGaussDialect {
    fn name(&self) -> &str {
        "opengauss"
    }

    fn quote_ident(&self, name: &str) -> String {
        // Handle names that contain double quotes by doubling them
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn convert_condition(&self, condition: &str) -> String {
        rewrite_backtick_quotes(condition, '"', '"')
    }
}
