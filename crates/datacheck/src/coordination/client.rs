//! Client side of the coordination contract.

use std::sync::Arc;

use async_trait::async_trait;

use super::service::CheckService;
use super::types::{RunInfo, SourceDataLog};
use crate::error::Result;
use crate::state::Endpoint;

/// Operations extraction processes invoke on the check service.
///
/// Implementations decide how calls travel; the in-process client below
/// calls the service directly.
#[async_trait]
pub trait CoordinationClient: Send + Sync {
    /// Report that `endpoint` finished extracting `table_name`.
    async fn refresh(&self, table_name: &str, endpoint: Endpoint) -> Result<()>;

    /// Start a new run over `table_names`.
    async fn init(&self, table_names: Vec<String>) -> Result<RunInfo>;

    /// Submit change-capture batches for re-verification.
    async fn notify_increment_data_logs(&self, logs: Vec<SourceDataLog>) -> Result<()>;
}

/// Client bound to a service in the same process.
#[derive(Debug, Clone)]
pub struct LocalCoordinationClient {
    service: Arc<CheckService>,
}

impl LocalCoordinationClient {
    pub fn new(service: Arc<CheckService>) -> Self {
        Self { service }
    }

    /// The service this client talks to.
    pub fn service(&self) -> &Arc<CheckService> {
        &self.service
    }
}

#[async_trait]
impl CoordinationClient for LocalCoordinationClient {
    async fn refresh(&self, table_name: &str, endpoint: Endpoint) -> Result<()> {
        self.service.refresh_table_extract_status(table_name, endpoint)
    }

    async fn init(&self, table_names: Vec<String>) -> Result<RunInfo> {
        self.service.init_table_extract_status(table_names)
    }

    async fn notify_increment_data_logs(&self, logs: Vec<SourceDataLog>) -> Result<()> {
        self.service.notify_increment_data_logs(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::types::ChangeOperation;
    use crate::error::CheckError;
    use crate::state::UntrackedTablePolicy;

    #[tokio::test]
    async fn test_local_client_round_trip() {
        let (service, mut logs) = CheckService::new(UntrackedTablePolicy::Create);
        let client = LocalCoordinationClient::new(Arc::new(service));

        let run = client.init(vec!["t1".into()]).await.unwrap();
        assert_eq!(run.table_count, 1);

        client.refresh("t1", Endpoint::Source).await.unwrap();
        client.refresh("t1", Endpoint::Sink).await.unwrap();
        assert!(!client.service().is_check_complete());

        let err = client.init(vec!["t2".into()]).await.unwrap_err();
        assert!(matches!(err, CheckError::Conflict(_)));

        client.refresh("t1", Endpoint::Check).await.unwrap();
        assert!(client.service().is_check_complete());

        client
            .notify_increment_data_logs(vec![SourceDataLog::new(
                "t1",
                vec!["42".into()],
                ChangeOperation::Update,
            )])
            .await
            .unwrap();
        let scope = logs.drain();
        assert_eq!(scope.key_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_clients_complete_run() {
        let (service, _logs) = CheckService::new(UntrackedTablePolicy::Create);
        let service = Arc::new(service);
        let tables: Vec<String> = (0..16).map(|i| format!("t{}", i)).collect();
        service.init_table_extract_status(tables.clone()).unwrap();

        let mut handles = Vec::new();
        for endpoint in Endpoint::ALL {
            let client = LocalCoordinationClient::new(Arc::clone(&service));
            let tables = tables.clone();
            handles.push(tokio::spawn(async move {
                for table in &tables {
                    client.refresh(table, endpoint).await?;
                }
                Ok::<_, CheckError>(())
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(service.is_check_complete());
        assert!(service
            .registry()
            .snapshot()
            .values()
            .all(|m| *m == Endpoint::full_mask()));
    }
}
