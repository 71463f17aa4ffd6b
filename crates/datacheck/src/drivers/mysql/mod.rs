//! MySQL/MariaDB driver.
//!
//! Provides [`MysqlDialect`], the backtick-quoting strategy used when MySQL
//! is one side of a verification run.
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

mod dialect;

pub use dialect::MysqlDialect;
