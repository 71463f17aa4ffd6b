//! Microsoft SQL Server driver.

mod dialect;

pub use dialect::MssqlDialect;
