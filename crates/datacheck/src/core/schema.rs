//! Schema metadata types for the tables under verification.
//!
//! Only the shape the verification core needs is modelled here: column
//! names, their ordinal positions and primary-key membership. Discovering
//! this metadata from a live database is the extraction layer's job.

use serde::{Deserialize, Serialize};

/// Table metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name, case as reported by the database.
    pub table_name: String,

    /// Column definitions, in whatever order the metadata source produced them.
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    /// Create table metadata from a name and a column list.
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnMetadata>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
        }
    }

    /// Check if the table has a primary key.
    pub fn has_pk(&self) -> bool {
        self.columns.iter().any(|c| c.is_primary_key)
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,

    /// Ordinal position (1-based).
    pub ordinal_pos: i32,

    /// Whether the column is part of the primary key.
    #[serde(default)]
    pub is_primary_key: bool,

    /// Data type as reported by the source (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl ColumnMetadata {
    /// Create a non-key column.
    pub fn new(name: impl Into<String>, ordinal_pos: i32) -> Self {
        Self {
            name: name.into(),
            ordinal_pos,
            is_primary_key: false,
            data_type: None,
        }
    }

    /// Create a primary-key column.
    pub fn primary_key(name: impl Into<String>, ordinal_pos: i32) -> Self {
        Self {
            is_primary_key: true,
            ..Self::new(name, ordinal_pos)
        }
    }
}
