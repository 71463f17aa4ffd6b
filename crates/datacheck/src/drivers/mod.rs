//! Database dialect implementations.
//!
//! - [`mysql`]: MySQL/MariaDB (backtick quoting)
//! - [`opengauss`]: openGauss/PostgreSQL (double-quote quoting)
//! - [`mssql`]: Microsoft SQL Server (bracket quoting)
//!
//! # Adding New Databases
//!
//! 1. Create a new module under `drivers/` implementing [`Dialect`]
//! 2. Add a variant to [`DatabaseType`] and to [`DialectImpl`]
//! 3. Extend [`DialectImpl::for_database`]
//!
//! Calling code only ever sees `DialectImpl`, so no caller changes.

pub mod mssql;
pub mod mysql;
pub mod opengauss;

pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use opengauss::OpenGaussDialect;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::traits::Dialect;
use crate::error::CheckError;

/// Database engines a verification endpoint can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "postgres", alias = "postgresql", alias = "pg")]
    OpenGauss,
    #[serde(alias = "sqlserver", alias = "sql_server")]
    Mssql,
}

impl DatabaseType {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Mysql => "mysql",
            DatabaseType::OpenGauss => "opengauss",
            DatabaseType::Mssql => "mssql",
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DatabaseType::Mysql),
            "opengauss" | "postgres" | "postgresql" | "pg" => Ok(DatabaseType::OpenGauss),
            "mssql" | "sqlserver" | "sql_server" => Ok(DatabaseType::Mssql),
            other => Err(CheckError::Config(format!(
                "Unknown database type: '{}'. Supported types: mysql, opengauss, mssql",
                other
            ))),
        }
    }
}

/// Enum-based static dispatch for dialects.
///
/// The compiler generates a match statement instead of vtable dispatch.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Mysql(MysqlDialect),
    OpenGauss(OpenGaussDialect),
    Mssql(MssqlDialect),
}

impl Dialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Mysql(d) => d.name(),
            DialectImpl::OpenGauss(d) => d.name(),
            DialectImpl::Mssql(d) => d.name(),
        }
    }

    fn quote_ident(&self, name: &str) -> String {
        match self {
            DialectImpl::Mysql(d) => d.quote_ident(name),
            DialectImpl::OpenGauss(d) => d.quote_ident(name),
            DialectImpl::Mssql(d) => d.quote_ident(name),
        }
    }

    fn convert_condition(&self, condition: &str) -> String {
        match self {
            DialectImpl::Mysql(d) => d.convert_condition(condition),
            DialectImpl::OpenGauss(d) => d.convert_condition(condition),
            DialectImpl::Mssql(d) => d.convert_condition(condition),
        }
    }
}

impl DialectImpl {
    /// Select the dialect for a database type.
    pub fn for_database(db_type: DatabaseType) -> Self {
        match db_type {
            DatabaseType::Mysql => DialectImpl::Mysql(MysqlDialect::new()),
            DatabaseType::OpenGauss => DialectImpl::OpenGauss(OpenGaussDialect::new()),
            DatabaseType::Mssql => DialectImpl::Mssql(MssqlDialect::new()),
        }
    }

    /// Create a dialect implementation from a database type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database type is not recognized.
    pub fn from_db_type(db_type: &str) -> crate::error::Result<Self> {
        Ok(Self::for_database(db_type.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_impl_from_db_type() {
        assert_eq!(DialectImpl::from_db_type("mysql").unwrap().name(), "mysql");
        assert_eq!(
            DialectImpl::from_db_type("opengauss").unwrap().name(),
            "opengauss"
        );
        assert_eq!(DialectImpl::from_db_type("mssql").unwrap().name(), "mssql");

        // Alternative names
        assert!(DialectImpl::from_db_type("MariaDB").is_ok());
        assert!(DialectImpl::from_db_type("postgresql").is_ok());
        assert!(DialectImpl::from_db_type("pg").is_ok());
        assert!(DialectImpl::from_db_type("sqlserver").is_ok());

        let err = DialectImpl::from_db_type("oracle").unwrap_err();
        assert!(matches!(err, CheckError::Config(_)));
    }

    #[test]
    fn test_dialect_impl_dispatch() {
        let mysql = DialectImpl::for_database(DatabaseType::Mysql);
        let gauss = DialectImpl::for_database(DatabaseType::OpenGauss);
        let mssql = DialectImpl::for_database(DatabaseType::Mssql);

        assert_eq!(mysql.quote_ident("t"), "`t`");
        assert_eq!(gauss.quote_ident("t"), "\"t\"");
        assert_eq!(mssql.quote_ident("t"), "[t]");

        assert_eq!(gauss.convert_condition("`a` = 1"), "\"a\" = 1");
        assert_eq!(gauss.qualify("s", "t"), "\"s\".\"t\"");
    }

    #[test]
    fn test_database_type_serde_aliases() {
        let t: DatabaseType = serde_yaml::from_str("postgres").unwrap();
        assert_eq!(t, DatabaseType::OpenGauss);
        let t: DatabaseType = serde_yaml::from_str("mysql").unwrap();
        assert_eq!(t, DatabaseType::Mysql);
        assert!(serde_yaml::from_str::<DatabaseType>("oracle").is_err());
        assert_eq!(DatabaseType::OpenGauss.to_string(), "opengauss");
    }
}
