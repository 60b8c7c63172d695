use anyhow::Context;
use dnsleak_application::ports::EventStore;
use dnsleak_domain::config::EventStoreConfig;
use dnsleak_infrastructure::event_store::ElasticsearchEventStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the event store client. An unreachable store is not fatal; writes
/// fail per record until it comes back.
pub async fn init_event_store(cfg: &EventStoreConfig) -> anyhow::Result<Arc<dyn EventStore>> {
    let store =
        ElasticsearchEventStore::new(cfg).context("Failed to build event store client")?;

    info!(
        url = store.document_url(),
        authenticated = cfg.username.is_some(),
        verify_certs = cfg.verify_certs,
        "Event store configured"
    );

    match store.ping().await {
        Ok(()) => info!("Event store reachable"),
        Err(e) => warn!(error = %e, kind = e.kind(), "Event store not reachable at startup"),
    }

    Ok(Arc::new(store))
}
