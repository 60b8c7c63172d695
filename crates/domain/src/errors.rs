use thiserror::Error;

/// Failure reported by the event store for a single write.
///
/// Every variant is recoverable: callers log it and move on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Event store unreachable: {0}")]
    Connection(String),

    #[error("Event store rejected credentials (HTTP {0})")]
    Unauthorized(u16),

    #[error("Index not found: {0}")]
    IndexMissing(String),

    #[error("Event store rejected write (HTTP {status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("Failed to serialize record: {0}")]
    Serialization(String),

    #[error("Event store write timed out after {0}ms")]
    Timeout(u64),
}

impl IndexError {
    pub fn kind(&self) -> &'static str {
        match self {
            IndexError::Connection(_) => "connection",
            IndexError::Unauthorized(_) => "unauthorized",
            IndexError::IndexMissing(_) => "index_missing",
            IndexError::Rejected { .. } => "rejected",
            IndexError::Serialization(_) => "serialization",
            IndexError::Timeout(_) => "timeout",
        }
    }
}
