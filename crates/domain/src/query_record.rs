use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

/// One captured observation: a single question asked by a single sender.
///
/// The serialized field names (`date`, `query`, `source-ip`, `source-port`)
/// are read by whatever queries the event store afterwards, so they must not
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub date: DateTime<Utc>,
    pub query: Arc<str>,
    #[serde(rename = "source-ip")]
    pub source_ip: String,
    #[serde(rename = "source-port")]
    pub source_port: u16,
}

impl QueryRecord {
    pub fn new(query: impl Into<Arc<str>>, source: SocketAddr) -> Self {
        Self::captured_at(Utc::now(), query, source)
    }

    /// IPv4-mapped IPv6 senders (dual-stack sockets) are stored in dotted-quad form.
    pub fn captured_at(
        date: DateTime<Utc>,
        query: impl Into<Arc<str>>,
        source: SocketAddr,
    ) -> Self {
        Self {
            date,
            query: query.into(),
            source_ip: source.ip().to_canonical().to_string(),
            source_port: source.port(),
        }
    }
}
