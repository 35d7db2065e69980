pub mod json_store;
pub mod schema;

pub use json_store::{DocumentStore, JsonStore, MemoryStore, default_data_dir};
pub use schema::{FILE_PROGRESS_FILE, FileProgress, SESSIONS_LOG_FILE, STATS_FILE};
