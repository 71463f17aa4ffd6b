//! Concurrent per-table completion registry.
//!
//! Each tracked table maps to an atomic bitmask. Endpoint reports OR their
//! bit into the mask with a single `fetch_or`, so concurrent reports for the
//! same table never lose a bit and reports for different tables never
//! contend beyond a shared read lock on the map.
//!
//! The map itself is only write-locked to add an untracked table or for the
//! whole-registry transitions (`init`, `remove`, `remove_all`). Those critical
//! sections touch memory only and are bounded by the number of tables.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::endpoint::{Endpoint, TableStatus};
use crate::error::{CheckError, Result};

/// What to do when an endpoint reports for a table the current run does not
/// track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UntrackedTablePolicy {
    /// Start tracking the table with the reported bit.
    #[default]
    Create,
    /// Reject the report as a protocol error.
    Reject,
}

/// Per-table completion bitmasks for one verification run.
#[derive(Debug, Default)]
pub struct TableStatusRegistry {
    tables: RwLock<HashMap<String, AtomicU64>>,
    untracked: UntrackedTablePolicy,
}

impl TableStatusRegistry {
    /// Create an empty registry with the default (lenient) policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with an explicit untracked-table policy.
    pub fn with_policy(untracked: UntrackedTablePolicy) -> Self {
        Self {
            tables: RwLock::default(),
            untracked,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, AtomicU64>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, AtomicU64>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start tracking `table_names`, each with an empty mask.
    ///
    /// Any previous entries are discarded first.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Conflict` if a previous run is still tracked and
    /// incomplete. The registry is left untouched in that case.
    pub fn init<I, S>(&self, table_names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tables = self.write();

        if !tables.is_empty() && !all_complete(&tables) {
            let pending = tables
                .values()
                .filter(|m| m.load(Ordering::Acquire) != Endpoint::full_mask())
                .count();
            return Err(CheckError::Conflict(format!(
                "{} of {} tables have not completed; clean up or wait for the run to finish",
                pending,
                tables.len()
            )));
        }

        tables.clear();
        for name in table_names {
            tables.insert(name.into(), AtomicU64::new(0));
        }

        info!("Initialized status registry with {} tables", tables.len());
        Ok(())
    }

    /// OR `endpoint`'s bit into the table's mask and return the new mask.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Validation` when the table is untracked and the
    /// policy is [`UntrackedTablePolicy::Reject`].
    pub fn update(&self, table_name: &str, endpoint: Endpoint) -> Result<u64> {
        let bit = endpoint.code();

        {
            let tables = self.read();
            if let Some(mask) = tables.get(table_name) {
                let updated = mask.fetch_or(bit, Ordering::AcqRel) | bit;
                debug!(
                    "{} reported by {}: {:?}",
                    table_name,
                    endpoint,
                    Endpoint::reported(updated)
                );
                return Ok(updated);
            }
        }

        if self.untracked == UntrackedTablePolicy::Reject {
            return Err(CheckError::Validation(format!(
                "{} reported for untracked table {}",
                endpoint, table_name
            )));
        }

        // Another caller may have inserted the entry between the two locks;
        // the entry API handles both cases.
        let mut tables = self.write();
        let mask = tables.entry(table_name.to_string()).or_insert_with(|| {
            warn!(
                "{} reported for untracked table {}, tracking it from now on",
                endpoint, table_name
            );
            AtomicU64::new(0)
        });
        let updated = mask.fetch_or(bit, Ordering::AcqRel) | bit;
        debug!(
            "{} reported by {}: {:?}",
            table_name,
            endpoint,
            Endpoint::reported(updated)
        );
        Ok(updated)
    }

    /// Current mask for a table, 0 if untracked.
    pub fn get(&self, table_name: &str) -> u64 {
        self.read()
            .get(table_name)
            .map_or(0, |m| m.load(Ordering::Acquire))
    }

    /// Status of a table in the current run.
    pub fn status(&self, table_name: &str) -> TableStatus {
        self.read()
            .get(table_name)
            .map_or(TableStatus::Uninitialized, |m| {
                TableStatus::from_mask(m.load(Ordering::Acquire))
            })
    }

    /// Check if no table is tracked.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Number of tracked tables.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True iff at least one table is tracked and every tracked table has
    /// the full completion mask.
    pub fn is_check_complete(&self) -> bool {
        let tables = self.read();
        !tables.is_empty() && all_complete(&tables)
    }

    /// Stop tracking one table.
    pub fn remove(&self, table_name: &str) {
        if self.write().remove(table_name).is_some() {
            debug!("Removed {} from status registry", table_name);
        }
    }

    /// Stop tracking every table.
    pub fn remove_all(&self) {
        let mut tables = self.write();
        let count = tables.len();
        tables.clear();
        info!("Cleared status registry ({} tables)", count);
    }

    /// Point-in-time copy of every mask, ordered by table name.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.read()
            .iter()
            .map(|(name, m)| (name.clone(), m.load(Ordering::Acquire)))
            .collect()
    }
}

fn all_complete(tables: &HashMap<String, AtomicU64>) -> bool {
    tables
        .values()
        .all(|m| m.load(Ordering::Acquire) == Endpoint::full_mask())
}
