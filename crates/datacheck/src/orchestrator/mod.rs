//! Verification orchestrator - drives one full in-process check run.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::{Config, EndpointConfig};
use crate::coordination::{CheckService, CoordinationClient, LocalCoordinationClient, RunInfo};
use crate::error::{CheckError, Result};
use crate::extract::{DataSet, ExtractContext, TableData, TableExtract};
use crate::state::Endpoint;
use crate::verify::{CheckResult, FingerprintDiff, RowFingerprint, TableCheckResult};

/// Verification orchestrator.
pub struct Orchestrator<C: CoordinationClient = LocalCoordinationClient> {
    config: Config,
    service: Arc<CheckService>,
    client: Arc<C>,
}

type ExtractHandle = (Endpoint, String, JoinHandle<Result<TableExtract>>);

impl Orchestrator {
    /// Create an orchestrator around an existing check service.
    pub fn new(config: Config, service: Arc<CheckService>) -> Self {
        let client = Arc::new(LocalCoordinationClient::new(Arc::clone(&service)));
        Self::with_client(config, service, client)
    }
}

impl<C: CoordinationClient + 'static> Orchestrator<C> {
    /// Create an orchestrator whose extraction contexts report through
    /// `client`. `service` is the check service `client` talks to.
    pub fn with_client(config: Config, service: Arc<CheckService>, client: Arc<C>) -> Self {
        Self {
            config,
            service,
            client,
        }
    }

    pub fn service(&self) -> &Arc<CheckService> {
        &self.service
    }

    /// Run a full verification over two data sets.
    ///
    /// Initializes a run over every table either side holds, extracts both
    /// sides concurrently, then compares fingerprints and records the check
    /// endpoint for each table.
    ///
    /// If any phase after initialization fails, the run's state is cleaned
    /// up before the error is returned so a later run can start.
    pub async fn run(&self, source: DataSet, sink: DataSet) -> Result<CheckResult> {
        let started = Instant::now();

        let (source_tables, sink_tables) = align_tables(source, sink);
        let table_names: Vec<String> = source_tables.keys().cloned().collect();

        let run = self.client.init(table_names.clone()).await?;

        match self
            .verify(&run, &table_names, source_tables, sink_tables, started)
            .await
        {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Check run {} failed, cleaning up: {}", run.run_id, e);
                self.service.clean_task_status();
                Err(e)
            }
        }
    }

    async fn verify(
        &self,
        run: &RunInfo,
        table_names: &[String],
        source_tables: BTreeMap<String, TableData>,
        sink_tables: BTreeMap<String, TableData>,
        started: Instant,
    ) -> Result<CheckResult> {
        info!(
            "Phase 1: Extracting {} tables on both endpoints",
            table_names.len()
        );

        let extracts = self
            .extract_all(vec![
                (Endpoint::Source, &self.config.source, source_tables),
                (Endpoint::Sink, &self.config.sink, sink_tables),
            ])
            .await?;

        info!("Phase 2: Comparing fingerprints");
        let mut result = CheckResult {
            run_id: Some(run.run_id.to_string()),
            ..Default::default()
        };
        let empty: Vec<RowFingerprint> = Vec::new();
        for table_name in table_names {
            let source_fps = extracts
                .get(&(Endpoint::Source, table_name.clone()))
                .unwrap_or(&empty);
            let sink_fps = extracts
                .get(&(Endpoint::Sink, table_name.clone()))
                .unwrap_or(&empty);

            let diff = FingerprintDiff::compare(source_fps, sink_fps);
            if diff.has_differences() {
                info!(
                    "{}: {} differences ({} missing in sink, {} missing in source, {} mismatched)",
                    table_name,
                    diff.total_differences(),
                    diff.missing_in_sink.len(),
                    diff.missing_in_source.len(),
                    diff.mismatched.len()
                );
            } else {
                info!("{}: {} rows (match)", table_name, source_fps.len());
            }

            self.client.refresh(table_name, Endpoint::Check).await?;
            result.add_table(TableCheckResult {
                table_name: table_name.clone(),
                source_row_count: source_fps.len(),
                sink_row_count: sink_fps.len(),
                diff,
            });
        }

        result.run_complete = self.service.is_check_complete();
        result.duration_ms = started.elapsed().as_millis() as u64;

        info!(
            "Check {}: {} tables, {} consistent, {} with differences in {}ms",
            run.run_id,
            result.tables.len(),
            result.tables_consistent,
            result.tables_with_differences,
            result.duration_ms
        );
        Ok(result)
    }

    /// Extract every table of every endpoint with bounded concurrency.
    async fn extract_all(
        &self,
        endpoints: Vec<(Endpoint, &EndpointConfig, BTreeMap<String, TableData>)>,
    ) -> Result<HashMap<(Endpoint, String), Vec<RowFingerprint>>> {
        let workers = self.config.check.get_workers();
        let semaphore = Arc::new(Semaphore::new(workers));
        info!("Extracting with {} workers", workers);

        let mut handles: Vec<ExtractHandle> = Vec::new();
        for (endpoint, endpoint_config, tables) in endpoints {
            let ctx = Arc::new(ExtractContext::new(
                endpoint,
                endpoint_config.r#type,
                endpoint_config.schema.clone(),
                Arc::clone(&self.client),
            ));

            for (table_name, table) in tables {
                let permit = Arc::clone(&semaphore)
                    .acquire_owned()
                    .await
                    .map_err(|e| CheckError::extract(&table_name, e.to_string()))?;
                let ctx = Arc::clone(&ctx);
                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    ctx.extract_table(&table.metadata, &table.rows).await
                });
                handles.push((endpoint, table_name, handle));
            }
        }

        let mut extracts = HashMap::new();
        let mut first_error = None;
        for (endpoint, table_name, handle) in handles {
            match handle.await {
                Ok(Ok(extract)) => {
                    extracts.insert((endpoint, table_name), extract.fingerprints);
                }
                Ok(Err(e)) => {
                    error!("{} {}: failed - {}", endpoint, table_name, e);
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    error!("{} {}: task panicked - {}", endpoint, table_name, e);
                    first_error.get_or_insert(CheckError::extract(
                        &table_name,
                        format!("Task panicked: {}", e),
                    ));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(extracts),
        }
    }
}

/// Key both sides by table name so each holds every table. A table present
/// on only one side is extracted on the other with no rows.
fn align_tables(
    source: DataSet,
    sink: DataSet,
) -> (BTreeMap<String, TableData>, BTreeMap<String, TableData>) {
    let by_name = |data: DataSet| -> BTreeMap<String, TableData> {
        data.tables
            .into_iter()
            .map(|t| (t.table_name().to_string(), t))
            .collect()
    };
    let mut source = by_name(source);
    let mut sink = by_name(sink);

    let names: BTreeSet<String> = source.keys().chain(sink.keys()).cloned().collect();
    for name in names {
        if !source.contains_key(&name) {
            if let Some(other) = sink.get(&name) {
                source.insert(name.clone(), empty_like(other));
            }
        } else if !sink.contains_key(&name) {
            if let Some(other) = source.get(&name) {
                sink.insert(name.clone(), empty_like(other));
            }
        }
    }
    (source, sink)
}

fn empty_like(table: &TableData) -> TableData {
    TableData {
        metadata: table.metadata.clone(),
        rows: Vec::new(),
    }
}
