//! Core abstractions shared by the extraction and check sides.
//!
//! - [`schema`]: Table and column metadata types
//! - [`projection`]: Canonical, ordinal-ordered column lists
//! - [`identifier`]: Identifier validation for names arriving over the wire
//! - [`traits`]: The [`Dialect`] capability implemented by each driver
//!
//! Everything here is pure and stateless, so it can be used from any number
//! of extraction workers without synchronization.

pub mod identifier;
pub mod projection;
pub mod schema;
pub mod traits;

pub use projection::{ordered_columns, ordered_primary_key_columns, TableProjection};
pub use schema::{ColumnMetadata, TableMetadata};
pub use traits::Dialect;
