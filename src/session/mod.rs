pub mod drill;
pub mod ingest;
pub mod result;

pub use drill::{DrillEvent, DrillState, Effect, reduce};
pub use ingest::{IngestOutcome, SessionIngester};
pub use result::SessionRecord;
