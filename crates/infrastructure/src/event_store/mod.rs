pub mod elasticsearch;

pub use elasticsearch::ElasticsearchEventStore;
