//! openGauss driver.
//!
//! openGauss follows PostgreSQL's identifier rules, so the same dialect
//! serves plain PostgreSQL sinks as well.

mod dialect;

pub use dialect::OpenGaussDialect;
