use async_trait::async_trait;
use dnsleak_domain::{IndexError, QueryRecord};

/// Write side of the event store that holds captured queries.
///
/// Implementations are shared across every in-flight datagram, so `persist`
/// may be called concurrently. Each call carries one complete record and is
/// independent of all others; no ordering between calls is implied.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn persist(&self, record: &QueryRecord) -> Result<(), IndexError>;
}
