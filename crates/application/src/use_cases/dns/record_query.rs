use crate::ports::EventStore;
use dnsleak_domain::{DnsRequest, IndexError, QueryRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Per-request tally of store writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    pub persisted: usize,
    pub failed: usize,
}

impl RecordOutcome {
    pub fn total(&self) -> usize {
        self.persisted + self.failed
    }
}

/// Turns the questions of a standard query into one stored record each.
///
/// Store failures never leave this type: they are logged and counted in the
/// returned [`RecordOutcome`].
pub struct RecordQueryUseCase {
    event_store: Arc<dyn EventStore>,
    persist_timeout: Option<Duration>,
}

impl RecordQueryUseCase {
    pub fn new(event_store: Arc<dyn EventStore>) -> Self {
        Self {
            event_store,
            persist_timeout: None,
        }
    }

    /// Bounds each `persist` call. A zero duration leaves it unbounded.
    pub fn with_persist_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// One record per question, in question order, all attributed to the request's sender.
    pub fn build_records(request: &DnsRequest) -> Vec<QueryRecord> {
        request
            .questions
            .iter()
            .map(|question| QueryRecord::new(Arc::clone(&question.name), request.source))
            .collect()
    }

    pub async fn execute(&self, request: &DnsRequest) -> RecordOutcome {
        let mut outcome = RecordOutcome::default();
        let source_ip = request.source.ip().to_canonical();

        let records = Self::build_records(request);

        for (question, record) in request.questions.iter().zip(&records) {
            info!(
                source_ip = %source_ip,
                source_port = request.source.port(),
                query = %question.name,
                qclass = question.query_class,
                qtype = question.query_type,
                "Query received"
            );

            match self.persist(record).await {
                Ok(()) => outcome.persisted += 1,
                Err(e) => {
                    outcome.failed += 1;
                    warn!(
                        error = %e,
                        kind = e.kind(),
                        query = %record.query,
                        source_ip = %record.source_ip,
                        source_port = record.source_port,
                        "Failed to persist query record"
                    );
                }
            }
        }

        outcome
    }

    /// Fire-and-forget variant used by the listener so replies never wait on the store.
    pub fn spawn(self: &Arc<Self>, request: DnsRequest) -> JoinHandle<RecordOutcome> {
        let recorder = Arc::clone(self);
        tokio::spawn(async move { recorder.execute(&request).await })
    }

    async fn persist(&self, record: &QueryRecord) -> Result<(), IndexError> {
        match self.persist_timeout {
            Some(limit) => tokio::time::timeout(limit, self.event_store.persist(record))
                .await
                .map_err(|_| IndexError::Timeout(limit.as_millis() as u64))?,
            None => self.event_store.persist(record).await,
        }
    }
}
