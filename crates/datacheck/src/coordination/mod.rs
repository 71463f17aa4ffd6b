//! Coordination between extraction processes and the check service.
//!
//! Extraction processes report per-table completion (`refresh`), the check
//! side starts runs (`init`), and change-capture feeds submit increment logs
//! (`notify_increment_data_logs`). [`CheckService`] implements the contract;
//! [`CoordinationClient`] is the seam extraction code calls through.

mod client;
mod increment;
mod service;
mod types;

pub use client::{CoordinationClient, LocalCoordinationClient};
pub use increment::{IncrementLogReceiver, IncrementScope};
pub use service::CheckService;
pub use types::{
    ChangeOperation, InitRequest, RefreshRequest, RunInfo, RunStatus, SourceDataLog,
};
