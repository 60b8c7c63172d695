//! Elasticsearch event store.
//!
//! Each record is indexed as one JSON document:
//!
//! ```text
//! POST /{index}/{document_type} HTTP/1.1
//! Content-Type: application/json
//! Authorization: Basic ...            (when a username is configured)
//!
//! {"date":"...","query":"...","source-ip":"...","source-port":53211}
//! ```

use async_trait::async_trait;
use dnsleak_application::ports::EventStore;
use dnsleak_domain::config::EventStoreConfig;
use dnsleak_domain::{IndexError, QueryRecord};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REASON_LEN: usize = 256;

/// Writes query records to an Elasticsearch index over HTTP(S).
///
/// `reqwest::Client` is internally reference counted and pools connections,
/// so one instance is shared by every concurrent `persist` call.
pub struct ElasticsearchEventStore {
    client: reqwest::Client,
    base_url: String,
    document_url: String,
    index: String,
    credentials: Option<(String, Option<String>)>,
    timeout_ms: u64,
}

impl ElasticsearchEventStore {
    pub fn new(cfg: &EventStoreConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(CONNECT_TIMEOUT)
            .danger_accept_invalid_certs(!cfg.verify_certs);

        if cfg.persist_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(cfg.persist_timeout_ms));
        }

        let credentials = cfg
            .username
            .as_ref()
            .filter(|user| !user.is_empty())
            .map(|user| (user.clone(), cfg.password.clone()));

        Ok(Self {
            client: builder.build()?,
            base_url: cfg.base_url(),
            document_url: cfg.document_url(),
            index: cfg.index.clone(),
            credentials,
            timeout_ms: cfg.persist_timeout_ms,
        })
    }

    pub fn document_url(&self) -> &str {
        &self.document_url
    }

    /// Checks that the cluster answers and accepts our credentials.
    pub async fn ping(&self) -> Result<(), IndexError> {
        let request = self.authorize(self.client.get(&self.base_url));
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.check_status(response).await
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, password.as_deref()),
            None => request,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> IndexError {
        if e.is_timeout() {
            IndexError::Timeout(self.timeout_ms)
        } else if e.is_builder() {
            IndexError::Serialization(e.to_string())
        } else {
            IndexError::Connection(e.to_string())
        }
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<(), IndexError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(IndexError::Unauthorized(status.as_u16()))
            }
            StatusCode::NOT_FOUND => Err(IndexError::IndexMissing(self.index.clone())),
            _ => {
                let mut reason = response.text().await.unwrap_or_default();
                if reason.len() > MAX_REASON_LEN {
                    let cut = (0..=MAX_REASON_LEN)
                        .rev()
                        .find(|&i| reason.is_char_boundary(i))
                        .unwrap_or(0);
                    reason.truncate(cut);
                }
                Err(IndexError::Rejected {
                    status: status.as_u16(),
                    reason,
                })
            }
        }
    }
}

#[async_trait]
impl EventStore for ElasticsearchEventStore {
    async fn persist(&self, record: &QueryRecord) -> Result<(), IndexError> {
        debug!(
            url = %self.document_url,
            query = %record.query,
            "Indexing query record"
        );

        let request = self.authorize(self.client.post(&self.document_url).json(record));
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.check_status(response).await
    }
}
