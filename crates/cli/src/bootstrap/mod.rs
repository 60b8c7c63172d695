mod config;
mod event_store;
mod logging;

pub use config::load_config;
pub use event_store::init_event_store;
pub use logging::init_logging;
