use serde::{Deserialize, Serialize};
use std::net::IpAddr;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;

/// A fixed name → address entry answered instead of the empty leak-test reply.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticRecord {
    pub name: String,

    pub ip: String,

    #[serde(default)]
    pub ttl: Option<u32>,
}

impl StaticRecord {
    /// Lower-cased and rooted, so `Printer.LAN` and `printer.lan.` compare equal.
    pub fn fqdn(&self) -> String {
        let name = self.name.trim().to_ascii_lowercase();
        if name.ends_with('.') {
            name
        } else {
            format!("{}.", name)
        }
    }

    /// True when the name encodes as DNS labels: no empty label, none over
    /// 63 bytes, at most 255 bytes on the wire.
    pub fn has_valid_name(&self) -> bool {
        let fqdn = self.fqdn();
        let body = fqdn.strip_suffix('.').unwrap_or(&fqdn);
        if body.is_empty() {
            return false;
        }

        // one length byte per label plus the root byte
        body.len() + 2 <= MAX_NAME_LEN
            && body
                .split('.')
                .all(|label| !label.is_empty() && label.len() <= MAX_LABEL_LEN)
    }

    pub fn address(&self) -> Option<IpAddr> {
        self.ip.trim().parse().ok()
    }

    pub fn ttl_or_default(&self) -> u32 {
        self.ttl.unwrap_or(60)
    }
}
