use super::wire::{encode_name, StaticAnswer};
use dnsleak_domain::config::StaticRecord;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, warn};

const TYPE_A: u16 = 1;
const TYPE_AAAA: u16 = 28;
const TYPE_ANY: u16 = 255;
const CLASS_IN: u16 = 1;
const CLASS_ANY: u16 = 255;

/// Read-only name → address table consulted before the empty leak-test reply.
///
/// Keys are lower-cased rooted names; lookups are case-insensitive.
#[derive(Debug, Default)]
pub struct StaticZone {
    entries: HashMap<String, Vec<StaticAnswer>>,
}

impl StaticZone {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Entries whose name cannot be encoded or whose IP does not parse are skipped with a warning.
    pub fn from_records(records: &[StaticRecord]) -> Self {
        let mut entries: HashMap<String, Vec<StaticAnswer>> = HashMap::new();

        for record in records {
            let fqdn = record.fqdn();
            let Some(address) = record.address() else {
                warn!(name = %record.name, ip = %record.ip, "Skipping static record with invalid IP");
                continue;
            };
            let Some(wire_name) = record
                .has_valid_name()
                .then(|| encode_name(&fqdn))
                .flatten()
            else {
                warn!(name = %record.name, "Skipping static record with invalid name");
                continue;
            };

            debug!(name = %fqdn, address = %address, "Static record loaded");
            entries.entry(fqdn).or_default().push(StaticAnswer {
                wire_name: Arc::from(wire_name),
                address,
                ttl: record.ttl_or_default(),
            });
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, name: &str, query_type: u16, query_class: u16) -> Vec<StaticAnswer> {
        if self.entries.is_empty() || (query_class != CLASS_IN && query_class != CLASS_ANY) {
            return Vec::new();
        }

        let key = if name.ends_with('.') {
            name.to_ascii_lowercase()
        } else {
            format!("{}.", name.to_ascii_lowercase())
        };

        let Some(answers) = self.entries.get(&key) else {
            return Vec::new();
        };

        answers
            .iter()
            .filter(|answer| match (query_type, answer.address) {
                (TYPE_ANY, _) => true,
                (TYPE_A, IpAddr::V4(_)) => true,
                (TYPE_AAAA, IpAddr::V6(_)) => true,
                _ => false,
            })
            .cloned()
            .collect()
    }
}
