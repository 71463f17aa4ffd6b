//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::drivers::DatabaseType;
use crate::state::UntrackedTablePolicy;

/// Default number of concurrent per-table extraction tasks.
pub const DEFAULT_WORKERS: usize = 4;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Source endpoint (the system being migrated from).
    pub source: EndpointConfig,

    /// Sink endpoint (the system being migrated to).
    pub sink: EndpointConfig,

    /// Check service behavior.
    #[serde(default)]
    pub check: CheckSettings,
}

/// One side of a verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Database engine, which selects the dialect.
    pub r#type: DatabaseType,

    /// Schema the verified tables live in.
    pub schema: String,
}

/// Check service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSettings {
    /// What to do when an endpoint reports a table the run does not track.
    #[serde(default)]
    pub untracked_tables: UntrackedTablePolicy,

    /// Concurrent per-table extraction tasks (default: 4).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl CheckSettings {
    pub fn get_workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKERS)
    }
}
