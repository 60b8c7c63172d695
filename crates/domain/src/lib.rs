//! dnsleak domain layer
pub mod config;
pub mod dns_question;
pub mod dns_request;
pub mod errors;
pub mod query_record;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_question::DnsQuestion;
pub use dns_request::DnsRequest;
pub use errors::IndexError;
pub use query_record::QueryRecord;
