use std::sync::Arc;

/// One entry of a message's question section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    /// Name as received, including the trailing root label when present.
    pub name: Arc<str>,
    pub query_type: u16,
    pub query_class: u16,
}

impl DnsQuestion {
    pub fn new(name: impl Into<Arc<str>>, query_type: u16, query_class: u16) -> Self {
        Self {
            name: name.into(),
            query_type,
            query_class,
        }
    }
}
