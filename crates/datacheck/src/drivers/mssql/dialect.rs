//! MSSQL SQL dialect (Strategy pattern).

use crate::core::traits::{rewrite_backtick_quotes, Dialect};

/// Microsoft SQL Server dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Create a new MSSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MssqlDialect {
    fn name(&self) -> &str {
        "mssql"
    }

    fn quote_ident(&self, name: &str) -> String {
        // Handle names that contain closing brackets by doubling them
        format!("[{}]", name.replace(']', "]]"))
    }

    fn convert_condition(&self, condition: &str) -> String {
        rewrite_backtick_quotes(condition, '[', ']')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        let dialect = MssqlDialect::new();
        assert_eq!(dialect.quote_ident("users"), "[users]");
        assert_eq!(dialect.quote_ident("table]name"), "[table]]name]");
    }

    #[test]
    fn test_qualify() {
        assert_eq!(MssqlDialect::new().qualify("dbo", "Users"), "[dbo].[Users]");
    }

    #[test]
    fn test_convert_condition() {
        assert_eq!(
            MssqlDialect::new().convert_condition("`Id` > 100 AND `Status` = 'A'"),
            "[Id] > 100 AND [Status] = 'A'"
        );
    }
}
