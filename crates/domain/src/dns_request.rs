use super::DnsQuestion;
use std::net::SocketAddr;

/// The recordable part of a received standard query: its questions and who sent them.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub id: u16,
    pub questions: Vec<DnsQuestion>,
    pub source: SocketAddr,
}

impl DnsRequest {
    pub fn new(id: u16, questions: Vec<DnsQuestion>, source: SocketAddr) -> Self {
        Self {
            id,
            questions,
            source,
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
