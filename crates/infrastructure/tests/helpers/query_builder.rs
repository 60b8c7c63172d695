#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::BinEncodable;
use std::str::FromStr;

/// Builds wire-format requests the way a stub resolver would send them.
pub struct QueryBuilder {
    id: u16,
    op_code: OpCode,
    message_type: MessageType,
    questions: Vec<(String, RecordType)>,
}

impl QueryBuilder {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            op_code: OpCode::Query,
            message_type: MessageType::Query,
            questions: Vec::new(),
        }
    }

    pub fn question(mut self, name: &str, record_type: RecordType) -> Self {
        self.questions.push((name.to_string(), record_type));
        self
    }

    pub fn op_code(mut self, op_code: OpCode) -> Self {
        self.op_code = op_code;
        self
    }

    pub fn as_response(mut self) -> Self {
        self.message_type = MessageType::Response;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut message = Message::new(self.id, self.message_type, self.op_code);
        message.set_recursion_desired(true);

        for (name, record_type) in self.questions {
            let mut query = Query::new();
            query.set_name(Name::from_str(&name).unwrap());
            query.set_query_type(record_type);
            query.set_query_class(DNSClass::IN);
            message.add_query(query);
        }

        message.to_vec().unwrap()
    }
}

pub fn a_query(id: u16, name: &str) -> Vec<u8> {
    QueryBuilder::new(id).question(name, RecordType::A).build()
}
