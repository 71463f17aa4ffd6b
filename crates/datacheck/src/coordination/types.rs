//! Message shapes exchanged between extraction processes and the check
//! service.
//!
//! Field names serialize in camelCase and enums in upper case, matching the
//! payloads the extraction tier sends. How the messages travel is up to the
//! surrounding service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::identifier::{validate_identifier, validate_table_names};
use crate::error::{CheckError, Result};
use crate::state::Endpoint;

/// Kind of change captured for a batch of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOperation {
    Insert,
    Update,
    Delete,
}

/// A change-capture batch for one table.
///
/// The primary-key set of one entry is always delivered as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDataLog {
    /// Table the changes belong to.
    pub table_name: String,
    /// Composite keys of the changed rows.
    #[serde(default)]
    pub primary_keys: Vec<String>,
    /// Change kind.
    pub operation: ChangeOperation,
}

impl SourceDataLog {
    /// Create a change log entry.
    pub fn new(
        table_name: impl Into<String>,
        primary_keys: Vec<String>,
        operation: ChangeOperation,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            primary_keys,
            operation,
        }
    }

    /// Validate the entry's table name.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.table_name)
    }
}

/// Completion report from one endpoint for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub table_name: String,
    #[serde(default)]
    pub endpoint: Option<Endpoint>,
}

impl RefreshRequest {
    /// Validate and return the reporting endpoint.
    pub fn validate(&self) -> Result<Endpoint> {
        validate_identifier(&self.table_name)?;
        self.endpoint.ok_or_else(|| {
            CheckError::Validation(format!(
                "Refresh for table {} is missing its endpoint",
                self.table_name
            ))
        })
    }
}

/// Request to start a new run over a set of tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRequest {
    #[serde(default)]
    pub table_names: Option<Vec<String>>,
}

impl InitRequest {
    /// Validate and return the table names.
    pub fn into_table_names(self) -> Result<Vec<String>> {
        let names = self
            .table_names
            .ok_or_else(|| CheckError::validation("Table name list is missing"))?;
        validate_table_names(&names)?;
        Ok(names)
    }
}

/// Lifecycle of the check service's current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No table is tracked.
    Idle,
    /// Tables are tracked and at least one is incomplete.
    Running,
    /// Every tracked table is complete.
    Complete,
}

/// Identity of a run started through `init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// When the run was initialized.
    pub started_at: DateTime<Utc>,
    /// Number of distinct tables tracked at start.
    pub table_count: usize,
}
