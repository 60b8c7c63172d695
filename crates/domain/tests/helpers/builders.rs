#![allow(dead_code)]
use chrono::{DateTime, TimeZone, Utc};
use dnsleak_domain::{DnsQuestion, DnsRequest, QueryRecord};
use std::net::SocketAddr;

pub struct DnsRequestBuilder {
    id: u16,
    questions: Vec<DnsQuestion>,
    source: SocketAddr,
}

impl DnsRequestBuilder {
    pub fn new() -> Self {
        Self {
            id: 0x1234,
            questions: Vec::new(),
            source: "10.0.0.5:53211".parse().unwrap(),
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn question(mut self, name: &str, query_type: u16) -> Self {
        self.questions.push(DnsQuestion::new(name, query_type, 1));
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = source.parse().unwrap();
        self
    }

    pub fn build(self) -> DnsRequest {
        DnsRequest::new(self.id, self.questions, self.source)
    }
}

impl Default for DnsRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
}

pub fn record_at(query: &str, source: &str) -> QueryRecord {
    QueryRecord::captured_at(fixed_time(), query, source.parse().unwrap())
}
