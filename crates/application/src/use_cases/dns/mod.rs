mod record_query;

pub use record_query::{RecordOutcome, RecordQueryUseCase};
