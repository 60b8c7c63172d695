pub mod dns;

pub use dns::{RecordOutcome, RecordQueryUseCase};
