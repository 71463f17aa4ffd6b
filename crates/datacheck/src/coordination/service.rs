//! The check service: owner of the run state.
//!
//! One `CheckService` is constructed at startup and shared (behind an `Arc`)
//! by whatever transport exposes it. It guards run initialization with the
//! registry's completion state, routes endpoint reports into the registry,
//! and forwards change-capture batches to the re-verification consumer.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::increment::IncrementLogReceiver;
use super::types::{InitRequest, RefreshRequest, RunInfo, RunStatus, SourceDataLog};
use crate::core::identifier::{validate_identifier, validate_table_names};
use crate::error::{CheckError, Result};
use crate::state::{Endpoint, TableStatus, TableStatusRegistry, UntrackedTablePolicy};

/// Check-side run state and coordination entry points.
#[derive(Debug)]
pub struct CheckService {
    registry: TableStatusRegistry,
    run: Mutex<Option<RunInfo>>,
    log_tx: mpsc::UnboundedSender<SourceDataLog>,
}

impl CheckService {
    /// Create a service and the receiver for its increment logs.
    pub fn new(untracked: UntrackedTablePolicy) -> (Self, IncrementLogReceiver) {
        let (log_tx, log_rx) = mpsc::unbounded_channel();
        let service = Self {
            registry: TableStatusRegistry::with_policy(untracked),
            run: Mutex::new(None),
            log_tx,
        };
        (service, IncrementLogReceiver::new(log_rx))
    }

    /// The underlying status registry.
    pub fn registry(&self) -> &TableStatusRegistry {
        &self.registry
    }

    /// Record that `endpoint` finished its work for `table_name`.
    pub fn refresh_table_extract_status(&self, table_name: &str, endpoint: Endpoint) -> Result<()> {
        validate_identifier(table_name)?;
        let mask = self.registry.update(table_name, endpoint)?;
        if mask == Endpoint::full_mask() {
            debug!("Table {} complete", table_name);
        }
        Ok(())
    }

    /// Handle a decoded refresh message.
    pub fn handle_refresh(&self, request: RefreshRequest) -> Result<()> {
        let endpoint = request.validate()?;
        self.refresh_table_extract_status(&request.table_name, endpoint)
    }

    /// Start a new run over `table_names`.
    ///
    /// # Errors
    ///
    /// - `CheckError::Validation` if the list is empty or a name is invalid
    /// - `CheckError::Conflict` if the previous run is still incomplete
    pub fn init_table_extract_status(&self, table_names: Vec<String>) -> Result<RunInfo> {
        validate_table_names(&table_names)?;

        let mut run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        self.registry.init(table_names)?;

        let info = RunInfo {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            table_count: self.registry.len(),
        };
        info!(
            "Started check run {} over {} tables",
            info.run_id, info.table_count
        );
        *run = Some(info.clone());
        Ok(info)
    }

    /// Handle a decoded init message.
    pub fn handle_init(&self, request: InitRequest) -> Result<RunInfo> {
        self.init_table_extract_status(request.into_table_names()?)
    }

    /// Forward change-capture batches for incremental re-verification.
    ///
    /// Every entry is validated before any is delivered. Entries without
    /// keys carry nothing to re-verify and are dropped.
    ///
    /// # Errors
    ///
    /// - `CheckError::Validation` if any entry names an invalid table
    /// - `CheckError::LogDelivery` if the consumer has been dropped
    pub fn notify_increment_data_logs(&self, logs: Vec<SourceDataLog>) -> Result<()> {
        logs.iter().try_for_each(SourceDataLog::validate)?;

        let mut delivered = 0usize;
        for log in logs {
            if log.primary_keys.is_empty() {
                warn!(
                    "Dropping {:?} log for {} with no primary keys",
                    log.operation, log.table_name
                );
                continue;
            }
            let table = log.table_name.clone();
            self.log_tx.send(log).map_err(|_| {
                CheckError::LogDelivery(format!(
                    "consumer closed while delivering changes for {}",
                    table
                ))
            })?;
            delivered += 1;
        }

        debug!("Delivered {} increment log entries", delivered);
        Ok(())
    }

    /// Discard all run state unconditionally.
    pub fn clean_task_status(&self) {
        let mut run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        self.registry.remove_all();
        if let Some(previous) = run.take() {
            info!("Cleaned check run {}", previous.run_id);
        }
    }

    /// True iff every tracked table is complete.
    pub fn is_check_complete(&self) -> bool {
        self.registry.is_check_complete()
    }

    /// Lifecycle of the current run.
    pub fn run_status(&self) -> RunStatus {
        if self.registry.is_empty() {
            RunStatus::Idle
        } else if self.registry.is_check_complete() {
            RunStatus::Complete
        } else {
            RunStatus::Running
        }
    }

    /// The run started by the last successful `init`, if not cleaned since.
    pub fn current_run(&self) -> Option<RunInfo> {
        self.run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Status of one table.
    pub fn table_status(&self, table_name: &str) -> TableStatus {
        self.registry.status(table_name)
    }
}
