//! # datacheck
//!
//! Verification core for heterogeneous database migrations.
//!
//! This library tracks and compares data extracted from a source and a sink
//! database of different engines:
//!
//! - **Progress tracking**: a per-table bitmask of which endpoints
//!   (source, sink, check) have finished, with atomic concurrent updates
//! - **Row fingerprints**: 64-bit xxHash digests over ordinal-ordered
//!   columns plus a composite key for row identity
//! - **Dialects**: identifier quoting and predicate rewriting for MySQL,
//!   openGauss and SQL Server
//! - **Coordination**: `refresh`, `init` and increment-log notification
//!   between extraction processes and the check service
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use datacheck::{CheckService, Config, DataSet, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> datacheck::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let (service, _logs) = CheckService::new(config.check.untracked_tables);
//!     let orchestrator = Orchestrator::new(config, Arc::new(service));
//!     let result = orchestrator
//!         .run(DataSet::load("source.json")?, DataSet::load("sink.json")?)
//!         .await?;
//!     println!("{} differences", result.total_differences());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod coordination;
pub mod core;
pub mod drivers;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod state;
pub mod verify;

// Re-exports for convenient access
pub use config::{CheckSettings, Config, EndpointConfig};
pub use coordination::{
    ChangeOperation, CheckService, CoordinationClient, IncrementLogReceiver, IncrementScope,
    LocalCoordinationClient, RunInfo, RunStatus, SourceDataLog,
};
pub use crate::core::{ColumnMetadata, Dialect, TableMetadata};
pub use drivers::{DatabaseType, DialectImpl};
pub use error::{CheckError, Result};
pub use extract::{DataSet, ExtractContext, TableData};
pub use orchestrator::Orchestrator;
pub use state::{Endpoint, TableStatus, TableStatusRegistry, UntrackedTablePolicy};
pub use verify::{CheckResult, FingerprintDiff, RowFingerprint};
