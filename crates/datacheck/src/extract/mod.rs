//! Extraction-side context.
//!
//! An [`ExtractContext`] represents one endpoint (source or sink) of a
//! verification run. It selects its dialect once from the database type,
//! fingerprints the rows it is handed, and reports completion to the check
//! service through a [`CoordinationClient`].

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::coordination::CoordinationClient;
use crate::core::traits::Dialect;
use crate::core::{TableMetadata, TableProjection};
use crate::drivers::{DatabaseType, DialectImpl};
use crate::error::Result;
use crate::state::Endpoint;
use crate::verify::{fingerprint_rows, RowFingerprint, RowValues};

/// Rows of one table as handed to an extraction context.
///
/// Values are already rendered to text by whatever read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub metadata: TableMetadata,
    #[serde(default)]
    pub rows: Vec<RowValues>,
}

impl TableData {
    pub fn table_name(&self) -> &str {
        &self.metadata.table_name
    }
}

/// Tables read from one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSet {
    #[serde(default)]
    pub tables: Vec<TableData>,
}

impl DataSet {
    /// Load a data set from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Fingerprints produced for one table by one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableExtract {
    pub table_name: String,
    pub fingerprints: Vec<RowFingerprint>,
}

/// One extraction endpoint bound to a database type and a check service.
pub struct ExtractContext<C: CoordinationClient> {
    endpoint: Endpoint,
    dialect: DialectImpl,
    schema: String,
    client: Arc<C>,
}

impl<C: CoordinationClient> ExtractContext<C> {
    pub fn new(
        endpoint: Endpoint,
        db_type: DatabaseType,
        schema: impl Into<String>,
        client: Arc<C>,
    ) -> Self {
        Self {
            endpoint,
            dialect: DialectImpl::for_database(db_type),
            schema: schema.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Schema-qualified, dialect-quoted name of `table_name`.
    pub fn qualified_name(&self, table_name: &str) -> String {
        self.dialect.qualify(&self.schema, table_name)
    }

    /// Fingerprint rows using the table's ordinal column order.
    pub fn fingerprint_table(
        &self,
        metadata: &TableMetadata,
        rows: &[RowValues],
    ) -> Vec<RowFingerprint> {
        let projection = TableProjection::from_metadata(metadata);
        fingerprint_rows(rows, &projection)
    }

    /// Fingerprint one table and report this endpoint's completion for it.
    ///
    /// The report is only sent once every row has been fingerprinted.
    pub async fn extract_table(
        &self,
        metadata: &TableMetadata,
        rows: &[RowValues],
    ) -> Result<TableExtract> {
        debug!(
            "{} extracting {} ({} rows, {} dialect)",
            self.endpoint,
            self.qualified_name(&metadata.table_name),
            rows.len(),
            self.dialect.name()
        );

        if !metadata.has_pk() {
            debug!(
                "{} has no primary key, keying rows by every column",
                metadata.table_name
            );
        }

        let fingerprints = self.fingerprint_table(metadata, rows);
        self.client
            .refresh(&metadata.table_name, self.endpoint)
            .await?;

        info!(
            "{} finished {}: {} rows",
            self.endpoint, metadata.table_name, fingerprints.len()
        );
        Ok(TableExtract {
            table_name: metadata.table_name.clone(),
            fingerprints,
        })
    }
}
