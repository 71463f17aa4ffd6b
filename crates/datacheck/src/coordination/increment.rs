//! Increment log delivery.
//!
//! Change-capture batches travel from the check service's intake to the
//! re-verification consumer over an unbounded channel, one
//! [`SourceDataLog`] per message, so an entry's key set is never split and
//! the sender never waits.

use std::collections::{BTreeMap, BTreeSet};

use tokio::sync::mpsc;

use super::types::SourceDataLog;

/// Consumer side of the increment log channel.
#[derive(Debug)]
pub struct IncrementLogReceiver {
    rx: mpsc::UnboundedReceiver<SourceDataLog>,
}

impl IncrementLogReceiver {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<SourceDataLog>) -> Self {
        Self { rx }
    }

    /// Wait for the next log entry. Returns `None` once the service is gone
    /// and the channel is empty.
    pub async fn recv(&mut self) -> Option<SourceDataLog> {
        self.rx.recv().await
    }

    /// Take every entry currently queued without waiting and merge them
    /// into a re-verification scope.
    pub fn drain(&mut self) -> IncrementScope {
        let mut scope = IncrementScope::default();
        while let Ok(log) = self.rx.try_recv() {
            scope.add(log);
        }
        scope
    }
}

/// Rows to re-verify, grouped by table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncrementScope {
    tables: BTreeMap<String, BTreeSet<String>>,
}

impl IncrementScope {
    /// Merge one log entry into the scope.
    pub fn add(&mut self, log: SourceDataLog) {
        self.tables
            .entry(log.table_name)
            .or_default()
            .extend(log.primary_keys);
    }

    /// Tables with pending changes, in name order.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Keys to re-verify for one table.
    pub fn keys(&self, table_name: &str) -> Option<&BTreeSet<String>> {
        self.tables.get(table_name)
    }

    /// Check if nothing needs re-verification.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total distinct keys across all tables.
    pub fn key_count(&self) -> usize {
        self.tables.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::types::ChangeOperation;

    fn log(table: &str, keys: &[&str], op: ChangeOperation) -> SourceDataLog {
        SourceDataLog::new(table, keys.iter().map(|k| k.to_string()).collect(), op)
    }

    #[test]
    fn test_scope_merges_per_table() {
        let mut scope = IncrementScope::default();
        scope.add(log("t1", &["1", "2"], ChangeOperation::Insert));
        scope.add(log("t2", &["9"], ChangeOperation::Delete));
        scope.add(log("t1", &["2", "3"], ChangeOperation::Update));

        assert_eq!(scope.tables().collect::<Vec<_>>(), vec!["t1", "t2"]);
        assert_eq!(
            scope.keys("t1").unwrap().iter().collect::<Vec<_>>(),
            vec!["1", "2", "3"]
        );
        assert_eq!(scope.key_count(), 4);
        assert!(scope.keys("t3").is_none());
    }

    #[tokio::test]
    async fn test_drain_takes_queued_entries() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut receiver = IncrementLogReceiver::new(rx);

        assert!(receiver.drain().is_empty());

        tx.send(log("t1", &["a"], ChangeOperation::Insert)).unwrap();
        tx.send(log("t1", &["b"], ChangeOperation::Delete)).unwrap();

        let scope = receiver.drain();
        assert_eq!(scope.key_count(), 2);
        assert!(receiver.drain().is_empty());

        drop(tx);
        assert!(receiver.recv().await.is_none());
    }
}
