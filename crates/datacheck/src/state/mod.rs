//! In-memory run state for the check service.
//!
//! - [`Endpoint`]: the roles that report completion, each owning one bit
//! - [`TableStatusRegistry`]: per-table completion masks for the current run
//!
//! State lives only as long as the owning service. A restart loses the
//! progress of an in-flight run; the operator starts a new one.

mod endpoint;
mod registry;

pub use endpoint::{Endpoint, TableStatus};
pub use registry::{TableStatusRegistry, UntrackedTablePolicy};
