//! dnsleak infrastructure: DNS wire handling, UDP listener and the Elasticsearch event store
pub mod dns;
pub mod event_store;
