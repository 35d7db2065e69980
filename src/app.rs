use std::fs;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::config::Config;
use crate::engine::TrigramModel;
use crate::engine::scoring::wpm;
use crate::error::TrainerError;
use crate::generator::text_file::{self, STDIN};
use crate::generator::words::WordSource;
use crate::generator::{generate_markov_text, generate_weakest_loop_text};
use crate::session::drill::DrillState;
use crate::session::ingest::{IngestOutcome, SessionIngester};
use crate::session::result::SessionRecord;
use crate::store::{DocumentStore, FILE_PROGRESS_FILE, FileProgress};
use crate::ui::theme::Theme;

/// Trigrams listed by the stats report unless asked otherwise.
pub const DEFAULT_STATS_TOP: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrillMode {
    /// Lines of a file or stdin; `offset` of `None` resumes where the last
    /// session stopped.
    Text {
        source: String,
        offset: Option<usize>,
        min_length: usize,
    },
    Words {
        source: String,
        count: usize,
    },
    Markov {
        length: usize,
    },
    Weakest {
        length: usize,
    },
}

impl DrillMode {
    /// Generated drills only refine timings of trigrams already known.
    pub fn is_training(&self) -> bool {
        matches!(self, DrillMode::Markov { .. } | DrillMode::Weakest { .. })
    }

    pub fn title(&self) -> &'static str {
        match self {
            DrillMode::Text { .. } => "text",
            DrillMode::Words { .. } => "words",
            DrillMode::Markov { .. } => "random",
            DrillMode::Weakest { .. } => "weakest",
        }
    }
}

/// Where a text drill came from, so progress can be stored afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextPosition {
    pub key: String,
    pub offset: usize,
}

#[derive(Clone, Debug)]
pub struct PreparedDrill {
    pub mode: DrillMode,
    pub text: String,
    pub position: Option<TextPosition>,
}

#[derive(Clone, Debug)]
pub struct DrillReport {
    pub record: SessionRecord,
    pub outcome: IngestOutcome,
    pub lines_typed: Option<usize>,
}

pub struct App<S: DocumentStore> {
    pub config: Config,
    pub theme: Theme,
    ingester: SessionIngester<S>,
    rng: SmallRng,
}

impl<S: DocumentStore> App<S> {
    /// `seed` makes generated drills reproducible.
    pub fn new(config: Config, store: S, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            theme: Theme::load_or_default(&config.theme),
            config,
            ingester: SessionIngester::new(store),
            rng,
        }
    }

    pub fn store(&self) -> &S {
        self.ingester.store()
    }

    pub fn load_model(&self) -> Result<TrigramModel, TrainerError> {
        self.ingester.load_model()
    }

    /// Words per minute over every recorded session, if any.
    pub fn average_wpm(&self) -> Result<Option<f64>, TrainerError> {
        Ok(self
            .load_model()?
            .average_char_duration()
            .map(|secs| wpm(1, secs)))
    }

    pub fn prepare(&mut self, mode: DrillMode) -> Result<PreparedDrill, TrainerError> {
        let (text, position) = match &mode {
            DrillMode::Text {
                source,
                offset,
                min_length,
            } => {
                let lines = text_file::read_lines(source)?;
                let key = progress_key(source);
                let start = match (offset, &key) {
                    (Some(offset), _) => *offset,
                    (None, Some(key)) => self.file_progress()?.offset(key),
                    (None, None) => 0,
                };
                let excerpt = text_file::excerpt(&lines, start, *min_length, source)?;
                debug!(
                    source = %source,
                    offset = excerpt.offset,
                    lines = excerpt.line_count,
                    "text excerpt"
                );
                let position = key.map(|key| TextPosition {
                    key,
                    offset: excerpt.offset,
                });
                (excerpt.text, position)
            }
            DrillMode::Words { source, count } => {
                let words = WordSource::load(
                    source,
                    &self.config.words_pattern,
                    self.config.words_max_length,
                )?;
                (words.phrase(*count, &mut self.rng), None)
            }
            DrillMode::Markov { length } => {
                let model = self.load_model()?;
                (generate_markov_text(&model, *length, &mut self.rng)?, None)
            }
            DrillMode::Weakest { length } => {
                let model = self.load_model()?;
                (generate_weakest_loop_text(&model, *length)?, None)
            }
        };
        if text.is_empty() {
            return Err(TrainerError::InvalidSource {
                source_name: mode.title().to_string(),
            });
        }
        info!(mode = mode.title(), chars = text.chars().count(), "drill prepared");
        Ok(PreparedDrill {
            mode,
            text,
            position,
        })
    }

    /// Record whatever was typed and advance text progress.
    pub fn finish(
        &self,
        prepared: &PreparedDrill,
        drill: &DrillState,
        now: DateTime<Utc>,
    ) -> Result<DrillReport, TrainerError> {
        let record = SessionRecord::from_drill(drill, now);
        let outcome = self.ingester.record(&record, prepared.mode.is_training())?;

        let mut lines_typed = None;
        if let Some(position) = &prepared.position {
            let lines = text_file::lines_completed(&prepared.text, drill.cursor);
            let mut progress = self.file_progress()?;
            let next = progress.advance(&position.key, position.offset, lines);
            self.store().save(FILE_PROGRESS_FILE, &progress)?;
            debug!(source = %position.key, next, "text progress saved");
            lines_typed = Some(lines);
        }

        Ok(DrillReport {
            record,
            outcome,
            lines_typed,
        })
    }

    fn file_progress(&self) -> Result<FileProgress, TrainerError> {
        Ok(self.store().load(FILE_PROGRESS_FILE)?.unwrap_or_default())
    }

    /// Totals and the hardest trigrams, for the `stats` command.
    pub fn stats_report(&self, top: usize) -> Result<String, TrainerError> {
        let model = self.load_model()?;
        Ok(format_stats(&model, top))
    }
}

/// Progress is keyed by canonical path; stdin has none.
fn progress_key(source: &str) -> Option<String> {
    if source == STDIN {
        return None;
    }
    let key = fs::canonicalize(source)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| source.to_string());
    Some(key)
}

pub fn format_stats(model: &TrigramModel, top: usize) -> String {
    let mut out = String::new();
    if model.sessions_count == 0 {
        out.push_str("No sessions recorded yet.\n");
        return out;
    }
    let avg_wpm = model
        .average_char_duration()
        .map(|secs| wpm(1, secs))
        .unwrap_or(0.0);
    out.push_str(&format!(
        "Sessions: {}  Characters: {}  Time: {:.1} s  Average: {:.1} wpm\n",
        model.sessions_count, model.total_chars_typed, model.total_sessions_duration, avg_wpm
    ));
    out.push_str(&format!("Trigrams seen: {}\n\n", model.trigram_count()));
    out.push_str(&format!(
        "{:>4}  {:<7}  {:>6}  {:>8}  {:>8}\n",
        "#", "trigram", "count", "avg ms", "score"
    ));
    for (i, ts) in model.ranked_trigrams().iter().take(top).enumerate() {
        let Some(stat) = model.get(&ts.trigram) else {
            continue;
        };
        let avg_ms = stat.duration.average(0.0) * 1000.0;
        out.push_str(&format!(
            "{:>4}  {:<7}  {:>6}  {:>8.0}  {:>8.3}\n",
            i + 1,
            format!("{:?}", ts.trigram.to_string()),
            stat.count,
            avg_ms,
            ts.score
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::{Duration, TimeZone};
    use tempfile::NamedTempFile;

    use super::*;
    use crate::session::drill::{DrillEvent, reduce};
    use crate::store::{MemoryStore, SESSIONS_LOG_FILE};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn type_all(text: &str, upto: usize) -> DrillState {
        let mut drill = DrillState::new(text);
        for (i, ch) in text.chars().take(upto).enumerate() {
            let event = if ch == '\n' {
                DrillEvent::Enter
            } else {
                DrillEvent::Char(ch)
            };
            drill = reduce(drill, event, t0() + Duration::milliseconds(i as i64 * 150)).0;
        }
        drill
    }

    fn test_app() -> App<MemoryStore> {
        App::new(Config::default(), MemoryStore::new(), Some(7))
    }

    fn source_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn generated_modes_are_training() {
        assert!(DrillMode::Markov { length: 10 }.is_training());
        assert!(DrillMode::Weakest { length: 10 }.is_training());
        assert!(
            !DrillMode::Words {
                source: "-".into(),
                count: 3
            }
            .is_training()
        );
    }

    #[test]
    fn markov_on_fresh_store_is_insufficient_data() {
        let mut app = test_app();
        let err = app.prepare(DrillMode::Markov { length: 50 }).unwrap_err();
        assert!(matches!(err, TrainerError::InsufficientData { .. }));
    }

    #[test]
    fn text_drill_resumes_from_stored_offset() {
        let file = source_file("first line\nsecond line\nthird line\nfourth line\n");
        let source = file.path().to_str().unwrap().to_string();
        let mut app = test_app();
        let mode = DrillMode::Text {
            source: source.clone(),
            offset: None,
            min_length: 15,
        };

        let prepared = app.prepare(mode.clone()).unwrap();
        assert_eq!(prepared.text, "first line\nsecond line");
        let typed = prepared.text.chars().count();
        let report = app
            .finish(&prepared, &type_all(&prepared.text, typed), t0())
            .unwrap();
        assert_eq!(report.outcome, IngestOutcome::Recorded);
        assert_eq!(report.lines_typed, Some(2));

        let next = app.prepare(mode).unwrap();
        assert_eq!(next.text, "third line\nfourth line");
        assert_eq!(next.position.unwrap().offset, 2);
    }

    #[test]
    fn text_drill_after_trailing_blank_lines_starts_over() {
        let file = source_file("hello world\n\n");
        let mut app = test_app();
        let mode = DrillMode::Text {
            source: file.path().to_str().unwrap().to_string(),
            offset: None,
            min_length: 5,
        };

        let prepared = app.prepare(mode.clone()).unwrap();
        assert_eq!(prepared.text, "hello world");
        let typed = prepared.text.chars().count();
        app.finish(&prepared, &type_all(&prepared.text, typed), t0())
            .unwrap();

        for _ in 0..3 {
            let next = app.prepare(mode.clone()).unwrap();
            assert_eq!(next.text, "hello world");
            assert_eq!(next.position.unwrap().offset, 0);
        }
    }

    #[test]
    fn partial_text_drill_counts_finished_lines_only() {
        let file = source_file("alpha beta\ngamma delta\n");
        let mut app = test_app();
        let prepared = app
            .prepare(DrillMode::Text {
                source: file.path().to_str().unwrap().to_string(),
                offset: Some(0),
                min_length: 0,
            })
            .unwrap();
        // stop halfway through the second line
        let report = app
            .finish(&prepared, &type_all(&prepared.text, 14), t0())
            .unwrap();
        assert_eq!(report.lines_typed, Some(1));
        let progress: FileProgress = app.store().load(FILE_PROGRESS_FILE).unwrap().unwrap();
        assert_eq!(progress.files.values().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn short_session_is_not_logged() {
        let file = source_file("abc\n");
        let mut app = test_app();
        let prepared = app
            .prepare(DrillMode::Text {
                source: file.path().to_str().unwrap().to_string(),
                offset: Some(0),
                min_length: 0,
            })
            .unwrap();
        let report = app
            .finish(&prepared, &type_all(&prepared.text, 3), t0())
            .unwrap();
        assert_eq!(report.outcome, IngestOutcome::Skipped);
        assert!(app.store().raw(SESSIONS_LOG_FILE).is_none());
    }

    #[test]
    fn words_drill_uses_configured_filter() {
        let file = source_file("cat\nDog\nelephants\nowl\n");
        let mut app = test_app();
        let prepared = app
            .prepare(DrillMode::Words {
                source: file.path().to_str().unwrap().to_string(),
                count: 6,
            })
            .unwrap();
        assert!(prepared.text.split(' ').all(|w| w == "cat" || w == "owl"));
        assert_eq!(prepared.text.split(' ').count(), 6);
    }

    #[test]
    fn stats_report_lists_hardest_first() {
        let model = crate::generator::tests::sample_model();
        let report = format_stats(&model, 3);
        let weakest = model.weakest().unwrap().trigram.to_string();
        assert!(report.starts_with("Sessions: 3"));
        assert_eq!(report.lines().nth(2), Some(""));
        assert!(report.lines().nth(3).unwrap().contains("trigram"));
        assert!(report.ends_with('\n'));
        let first_row = report.lines().nth(4).unwrap();
        assert!(first_row.contains(&format!("{weakest:?}")), "{report}");
        assert_eq!(report.lines().count(), 6);
    }

    #[test]
    fn stats_report_for_empty_model() {
        assert_eq!(format_stats(&TrigramModel::new(), 5), "No sessions recorded yet.\n");
    }
}
