//! Raw wire-format helpers for the reply path.
//!
//! Replies are assembled by hand rather than re-serialized so the question
//! section goes back byte-for-byte as it arrived (including any 0x20 case
//! randomization) and no name compression is introduced.

use std::net::IpAddr;
use std::sync::Arc;

pub const HEADER_LEN: usize = 12;

/// Classic UDP payload limit; static answers that would exceed it are left out.
pub const MAX_UDP_REPLY: usize = 512;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;

const TYPE_A: u16 = 1;
const TYPE_AAAA: u16 = 28;
const CLASS_IN: u16 = 1;

/// A fixed address answer for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAnswer {
    /// Owner name, already encoded as uncompressed labels.
    pub wire_name: Arc<[u8]>,
    pub address: IpAddr,
    pub ttl: u32,
}

impl StaticAnswer {
    fn encoded_len(&self) -> usize {
        let rdata_len = match self.address {
            IpAddr::V4(_) => 4,
            IpAddr::V6(_) => 16,
        };
        self.wire_name.len() + 10 + rdata_len
    }
}

/// Byte offset where the question section of `buf` ends.
///
/// Returns `None` when the header is short or any question runs past the
/// end of the buffer.
pub fn question_section_end(buf: &[u8]) -> Option<usize> {
    if buf.len() < HEADER_LEN {
        return None;
    }

    let qdcount = u16::from_be_bytes([buf[4], buf[5]]);
    let mut pos = HEADER_LEN;

    for _ in 0..qdcount {
        pos = skip_name(buf, pos)?;
        if pos + 4 > buf.len() {
            return None;
        }
        pos += 4;
    }

    Some(pos)
}

fn skip_name(buf: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let label_len = *buf.get(pos)? as usize;
        match label_len & 0xC0 {
            0x00 => {
                pos += 1;
                if label_len == 0 {
                    return Some(pos);
                }
                if pos + label_len > buf.len() {
                    return None;
                }
                pos += label_len;
            }
            // a pointer terminates the name
            0xC0 => {
                if pos + 2 > buf.len() {
                    return None;
                }
                return Some(pos + 2);
            }
            _ => return None,
        }
    }
}

/// Encodes a presentation-format name as uncompressed wire labels.
pub fn encode_name(name: &str) -> Option<Vec<u8>> {
    let body = name.strip_suffix('.').unwrap_or(name);
    let mut out = Vec::with_capacity(body.len() + 2);

    if !body.is_empty() {
        for label in body.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return None;
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
    }
    out.push(0);

    (out.len() <= MAX_NAME_LEN).then_some(out)
}

/// Builds the reply for a decoded request.
///
/// The header keeps the transaction id and opcode, sets QR, copies RD/CD for
/// standard queries, and clears every other flag and the rcode. The question
/// section is copied verbatim from `query_buf[12..question_end]`. Authority
/// and additional sections are always empty.
pub fn build_reply(query_buf: &[u8], question_end: usize, answers: &[StaticAnswer]) -> Vec<u8> {
    debug_assert!(question_end >= HEADER_LEN && question_end <= query_buf.len());

    let opcode = (query_buf[2] >> 3) & 0x0F;
    let answers_len: usize = answers.iter().map(StaticAnswer::encoded_len).sum();
    let answers = if question_end + answers_len <= MAX_UDP_REPLY {
        answers
    } else {
        &[]
    };

    let mut buf = Vec::with_capacity(question_end + answers_len);

    buf.extend_from_slice(&query_buf[0..2]);

    let mut flags_hi = 0x80 | (query_buf[2] & 0x78);
    let mut flags_lo = 0x00;
    if opcode == 0 {
        flags_hi |= query_buf[2] & 0x01;
        flags_lo |= query_buf[3] & 0x10;
    }
    buf.push(flags_hi);
    buf.push(flags_lo);

    buf.extend_from_slice(&query_buf[4..6]);
    buf.extend_from_slice(&(answers.len() as u16).to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    buf.extend_from_slice(&query_buf[HEADER_LEN..question_end]);

    for answer in answers {
        buf.extend_from_slice(&answer.wire_name);
        match answer.address {
            IpAddr::V4(ipv4) => {
                buf.extend_from_slice(&TYPE_A.to_be_bytes());
                buf.extend_from_slice(&CLASS_IN.to_be_bytes());
                buf.extend_from_slice(&answer.ttl.to_be_bytes());
                buf.extend_from_slice(&4u16.to_be_bytes());
                buf.extend_from_slice(&ipv4.octets());
            }
            IpAddr::V6(ipv6) => {
                buf.extend_from_slice(&TYPE_AAAA.to_be_bytes());
                buf.extend_from_slice(&CLASS_IN.to_be_bytes());
                buf.extend_from_slice(&answer.ttl.to_be_bytes());
                buf.extend_from_slice(&16u16.to_be_bytes());
                buf.extend_from_slice(&ipv6.octets());
            }
        }
    }

    buf
}
