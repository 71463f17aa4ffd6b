//! MySQL/MariaDB SQL dialect (Strategy pattern).

use crate::core::traits::Dialect;

/// MySQL/MariaDB dialect implementation.
///
/// Conditions are authored in MySQL syntax, so [`Dialect::convert_condition`]
/// is the identity here.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn quote_ident(&self, name: &str) -> String {
        // Handle names that contain backticks by doubling them
        format!("`{}`", name.replace('`', "``"))
    }

    fn convert_condition(&self, condition: &str) -> String {
        condition.to_string()
    }
}
