use super::static_zone::StaticZone;
use super::wire;
use dnsleak_application::use_cases::{RecordOutcome, RecordQueryUseCase};
use dnsleak_domain::{DnsQuestion, DnsRequest};
use hickory_proto::op::{Message, MessageType, OpCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// A request that decoded cleanly and is worth answering.
#[derive(Debug, Clone)]
pub struct DecodedQuery {
    pub id: u16,
    pub op_code: OpCode,
    pub questions: Vec<DnsQuestion>,
    /// Offset in the raw datagram where the question section ends.
    pub question_end: usize,
}

impl DecodedQuery {
    pub fn is_standard_query(&self) -> bool {
        self.op_code == OpCode::Query
    }
}

/// Decodes a raw datagram, returning `None` for anything that should be
/// dropped without a reply: undecodable bytes and messages that are
/// themselves responses.
pub fn decode_query(buf: &[u8]) -> Option<DecodedQuery> {
    let message = match Message::from_vec(buf) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, len = buf.len(), "Dropping undecodable datagram");
            return None;
        }
    };

    if message.message_type() != MessageType::Query {
        debug!(id = message.id(), "Dropping datagram with QR set");
        return None;
    }

    let question_end = wire::question_section_end(buf)?;

    let questions = message
        .queries()
        .iter()
        .map(|query| {
            DnsQuestion::new(
                query.name().to_ascii(),
                u16::from(query.query_type()),
                u16::from(query.query_class()),
            )
        })
        .collect();

    Some(DecodedQuery {
        id: message.id(),
        op_code: message.op_code(),
        questions,
        question_end,
    })
}

/// Reply bytes plus the detached recording task, if one was started.
pub struct HandledDatagram {
    pub reply: Vec<u8>,
    pub recording: Option<JoinHandle<RecordOutcome>>,
}

/// Per-datagram logic of the probe: decode, hand standard queries to the
/// recorder, and build the reply.
///
/// Recording is spawned onto its own task before the reply is built, so the
/// reply never waits on the event store.
pub struct ProbeHandler {
    recorder: Arc<RecordQueryUseCase>,
    zone: Arc<StaticZone>,
}

impl ProbeHandler {
    pub fn new(recorder: Arc<RecordQueryUseCase>) -> Self {
        Self {
            recorder,
            zone: Arc::new(StaticZone::empty()),
        }
    }

    pub fn with_static_zone(mut self, zone: Arc<StaticZone>) -> Self {
        self.zone = zone;
        self
    }

    /// Must run inside a tokio runtime.
    pub fn handle_datagram(&self, buf: &[u8], source: SocketAddr) -> Option<HandledDatagram> {
        let query = decode_query(buf)?;

        if !query.is_standard_query() {
            debug!(
                id = query.id,
                op_code = ?query.op_code,
                source = %source,
                "Non-query opcode, replying without recording"
            );
            return Some(HandledDatagram {
                reply: wire::build_reply(buf, query.question_end, &[]),
                recording: None,
            });
        }

        let answers: Vec<wire::StaticAnswer> = query
            .questions
            .iter()
            .flat_map(|q| self.zone.lookup(&q.name, q.query_type, q.query_class))
            .collect();

        let recording = self
            .recorder
            .spawn(DnsRequest::new(query.id, query.questions, source));

        Some(HandledDatagram {
            reply: wire::build_reply(buf, query.question_end, &answers),
            recording: Some(recording),
        })
    }
}
