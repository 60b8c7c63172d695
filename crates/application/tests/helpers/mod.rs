
pub use mock_event_store::*;
