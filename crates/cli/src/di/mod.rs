use dnsleak_application::ports::EventStore;
use dnsleak_application::use_cases::RecordQueryUseCase;
use dnsleak_domain::Config;
use dnsleak_infrastructure::dns::{ProbeHandler, StaticZone};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct ProbeServices {
    pub handler: Arc<ProbeHandler>,
}

impl ProbeServices {
    pub fn new(config: &Config, event_store: Arc<dyn EventStore>) -> Self {
        let recorder = Arc::new(
            RecordQueryUseCase::new(event_store).with_persist_timeout(Duration::from_millis(
                config.event_store.persist_timeout_ms,
            )),
        );

        let zone = StaticZone::from_records(&config.static_records);
        if !zone.is_empty() {
            info!(names = zone.len(), "Static zone loaded");
        }

        let handler = ProbeHandler::new(recorder).with_static_zone(Arc::new(zone));
        Self {
            handler: Arc::new(handler),
        }
    }
}
