//! Canonical column ordering.
//!
//! Both extraction processes must feed the fingerprint engine the same
//! columns in the same order, whatever order their metadata source happened
//! to list them in. The canonical order is ascending ordinal position.

use super::schema::{ColumnMetadata, TableMetadata};

/// All column names of a table, ordered by ordinal position.
///
/// Returns an empty list when no metadata is available.
pub fn ordered_columns(metadata: Option<&TableMetadata>) -> Vec<String> {
    project(metadata, |_| true)
}

/// Primary-key column names of a table, ordered by ordinal position.
pub fn ordered_primary_key_columns(metadata: Option<&TableMetadata>) -> Vec<String> {
    project(metadata, |c| c.is_primary_key)
}

fn project(
    metadata: Option<&TableMetadata>,
    keep: impl Fn(&ColumnMetadata) -> bool,
) -> Vec<String> {
    let Some(metadata) = metadata else {
        return Vec::new();
    };

    let mut columns: Vec<&ColumnMetadata> = metadata.columns.iter().filter(|c| keep(c)).collect();
    // Ties on ordinal position fall back to the name so the result never
    // depends on input order.
    columns.sort_by(|a, b| {
        a.ordinal_pos
            .cmp(&b.ordinal_pos)
            .then_with(|| a.name.cmp(&b.name))
    });
    columns.into_iter().map(|c| c.name.clone()).collect()
}

/// Column projection for one table, computed once and reused for every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableProjection {
    /// Table name.
    pub table_name: String,
    /// All columns in canonical order.
    pub columns: Vec<String>,
    /// Primary-key columns in canonical order.
    pub primary_key: Vec<String>,
}

impl TableProjection {
    /// Build the projection for a table.
    pub fn from_metadata(metadata: &TableMetadata) -> Self {
        Self {
            table_name: metadata.table_name.clone(),
            columns: ordered_columns(Some(metadata)),
            primary_key: ordered_primary_key_columns(Some(metadata)),
        }
    }

    /// Columns that identify a row: the primary key, or every column when
    /// the table has none.
    pub fn key_columns(&self) -> &[String] {
        if self.primary_key.is_empty() {
            &self.columns
        } else {
            &self.primary_key
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shuffled_table() -> TableMetadata {
        TableMetadata::new(
            "accounts",
            vec![
                ColumnMetadata::new("balance", 3),
                ColumnMetadata::primary_key("region", 2),
                ColumnMetadata::new("note", 5),
                ColumnMetadata::primary_key("id", 1),
                ColumnMetadata::new("opened_at", 4),
            ],
        )
    }

    #[test]
    fn test_ordered_columns_by_ordinal() {
        let cols = ordered_columns(Some(&shuffled_table()));
        assert_eq!(cols, vec!["id", "region", "balance", "opened_at", "note"]);
    }

    #[test]
    fn test_ordered_columns_independent_of_input_order() {
        let table = shuffled_table();
        let mut reversed = table.clone();
        reversed.columns.reverse();

        assert_eq!(
            ordered_columns(Some(&table)),
            ordered_columns(Some(&reversed))
        );
        assert_eq!(
            ordered_primary_key_columns(Some(&table)),
            ordered_primary_key_columns(Some(&reversed))
        );
    }

    #[test]
    fn test_ordinals_strictly_increasing() {
        let table = shuffled_table();
        let cols = ordered_columns(Some(&table));
        let ordinals: Vec<i32> = cols
            .iter()
            .map(|name| {
                table
                    .columns
                    .iter()
                    .find(|c| &c.name == name)
                    .unwrap()
                    .ordinal_pos
            })
            .collect();
        assert!(ordinals.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ordered_primary_key_columns() {
        let cols = ordered_primary_key_columns(Some(&shuffled_table()));
        assert_eq!(cols, vec!["id", "region"]);
    }

    #[test]
    fn test_absent_metadata() {
        assert!(ordered_columns(None).is_empty());
        assert!(ordered_primary_key_columns(None).is_empty());
    }

    #[test]
    fn test_projection_key_columns() {
        let projection = TableProjection::from_metadata(&shuffled_table());
        assert_eq!(projection.table_name, "accounts");
        assert_eq!(projection.key_columns(), ["id", "region"]);

        let no_pk = TableMetadata::new(
            "log",
            vec![ColumnMetadata::new("b", 2), ColumnMetadata::new("a", 1)],
        );
        let projection = TableProjection::from_metadata(&no_pk);
        assert_eq!(projection.key_columns(), ["a", "b"]);
    }
}
