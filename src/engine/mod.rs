pub mod scoring;
pub mod trigram_stats;
pub mod window;

pub use trigram_stats::{
    Bigram, Trigram, TrigramModel, TrigramScore, TrigramStat, ingest_session, rank_trigrams,
};
pub use window::RunningWindow;

/// Fewer observed trigrams than this and generated drills would be degenerate.
pub const MIN_TRIGRAMS: usize = 10;

/// Sessions shorter than this carry too little signal to be recorded.
pub const MIN_SESSION_LENGTH: usize = 5;
