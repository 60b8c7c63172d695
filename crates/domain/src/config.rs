pub mod errors;
pub mod event_store;
pub mod logging;
pub mod root;
pub mod server;
pub mod static_records;

pub use errors::ConfigError;
pub use event_store::EventStoreConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use static_records::StaticRecord;
