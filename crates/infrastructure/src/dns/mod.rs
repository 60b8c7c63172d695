pub mod listener;
pub mod server;
pub mod static_zone;
pub mod wire;

pub use listener::DnsListener;
pub use server::{decode_query, DecodedQuery, HandledDatagram, ProbeHandler};
pub use static_zone::StaticZone;
