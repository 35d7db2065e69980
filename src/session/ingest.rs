use tracing::{info, warn};

use crate::engine::{MIN_SESSION_LENGTH, TrigramModel};
use crate::error::TrainerError;
use crate::session::result::SessionRecord;
use crate::store::{DocumentStore, SESSIONS_LOG_FILE, STATS_FILE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Too short to learn from; nothing was written.
    Skipped,
    Recorded,
}

/// Persists finished sessions: appends them to the log and folds them into
/// the stored trigram model.
pub struct SessionIngester<S> {
    store: S,
}

impl<S: DocumentStore> SessionIngester<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored model, or an empty one if nothing has been saved yet.
    pub fn load_model(&self) -> Result<TrigramModel, TrainerError> {
        Ok(self.store.load(STATS_FILE)?.unwrap_or_default())
    }

    pub fn record(
        &self,
        session: &SessionRecord,
        is_training: bool,
    ) -> Result<IngestOutcome, TrainerError> {
        let text = session.chars();
        if text.len() != session.timeline.len() {
            return Err(TrainerError::Validation {
                text_len: text.len(),
                timeline_len: session.timeline.len(),
            });
        }
        if text.len() < MIN_SESSION_LENGTH {
            warn!(
                chars = text.len(),
                min = MIN_SESSION_LENGTH,
                "session too short, not saved"
            );
            return Ok(IngestOutcome::Skipped);
        }

        self.store.append_line(SESSIONS_LOG_FILE, session)?;

        let mut model = self.load_model()?;
        model.ingest(&text, &session.timeline, is_training)?;
        self.store.save(STATS_FILE, &model)?;

        info!(
            chars = text.len(),
            elapsed = session.elapsed_secs(),
            is_training,
            sessions = model.sessions_count,
            "session saved"
        );
        Ok(IngestOutcome::Recorded)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::engine::Trigram;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    fn session(text: &str, step: f64) -> SessionRecord {
        let timeline = (0..text.chars().count()).map(|i| i as f64 * step).collect();
        SessionRecord::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            text,
            timeline,
        )
    }

    #[test]
    fn records_session_into_log_and_model() {
        let ingester = SessionIngester::new(MemoryStore::new());
        let outcome = ingester.record(&session("hello world", 0.1), false).unwrap();
        assert_eq!(outcome, IngestOutcome::Recorded);

        let model = ingester.load_model().unwrap();
        assert_eq!(model.sessions_count, 1);
        assert_eq!(model.total_chars_typed, 11);
        assert_eq!(model.get(&Trigram(['h', 'e', 'l'])).unwrap().count, 1);

        let log = ingester.store().raw(SESSIONS_LOG_FILE).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains(r#""text":"hello world""#));
    }

    #[test]
    fn short_session_is_skipped_without_writing() {
        let ingester = SessionIngester::new(MemoryStore::new());
        let outcome = ingester.record(&session("abcd", 0.1), false).unwrap();
        assert_eq!(outcome, IngestOutcome::Skipped);
        assert!(ingester.store().raw(SESSIONS_LOG_FILE).is_none());
        assert!(ingester.store().raw(STATS_FILE).is_none());
    }

    #[test]
    fn mismatched_lengths_are_rejected_before_writing() {
        let ingester = SessionIngester::new(MemoryStore::new());
        let mut bad = session("abcdefg", 0.1);
        bad.timeline.pop();
        let err = ingester.record(&bad, false).unwrap_err();
        assert!(matches!(
            err,
            TrainerError::Validation {
                text_len: 7,
                timeline_len: 6
            }
        ));
        assert!(ingester.store().raw(SESSIONS_LOG_FILE).is_none());
    }

    #[test]
    fn training_sessions_do_not_count_occurrences() {
        let ingester = SessionIngester::new(MemoryStore::new());
        ingester.record(&session("abcdef", 0.1), false).unwrap();
        ingester.record(&session("abcdef", 0.2), true).unwrap();
        let model = ingester.load_model().unwrap();
        let stat = model.get(&Trigram(['a', 'b', 'c'])).unwrap();
        assert_eq!(stat.count, 1);
        assert_eq!(stat.duration.len(), 2);
        assert_eq!(model.sessions_count, 2);
    }

    #[test]
    fn missing_model_loads_empty() {
        let ingester = SessionIngester::new(MemoryStore::new());
        assert_eq!(ingester.load_model().unwrap(), TrigramModel::new());
    }

    #[test]
    fn corrupt_model_is_a_storage_error() {
        let store = MemoryStore::new();
        store.insert_raw(STATS_FILE, "{\"trigrams\": 5");
        let ingester = SessionIngester::new(store);
        let err = ingester.record(&session("abcdef", 0.1), false).unwrap_err();
        assert!(matches!(
            err,
            TrainerError::Storage(StoreError::Corrupt { .. })
        ));
    }
}
