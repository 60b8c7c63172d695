use serde::{Deserialize, Serialize};

/// Connection settings for the Elasticsearch cluster that receives query records.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventStoreConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Disabling this accepts self-signed and otherwise invalid certificates.
    #[serde(default = "default_true")]
    pub verify_certs: bool,

    #[serde(default = "default_index")]
    pub index: String,

    /// Path segment after the index. `_doc` on Elasticsearch 7+; older
    /// clusters that still use mapping types can set e.g. `event`.
    #[serde(default = "default_document_type")]
    pub document_type: String,

    /// Upper bound on a single write. 0 disables the bound.
    #[serde(default = "default_persist_timeout_ms")]
    pub persist_timeout_ms: u64,
}

impl EventStoreConfig {
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }

    pub fn document_url(&self) -> String {
        format!("{}/{}/{}", self.base_url(), self.index, self.document_type)
    }
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            verify_certs: true,
            index: default_index(),
            document_type: default_document_type(),
            persist_timeout_ms: default_persist_timeout_ms(),
        }
    }
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9200
}

fn default_true() -> bool {
    true
}

fn default_index() -> String {
    "dnsleak".to_string()
}

fn default_document_type() -> String {
    "_doc".to_string()
}

fn default_persist_timeout_ms() -> u64 {
    5000
}
