pub mod markov;
pub mod text_file;
pub mod transition_table;
pub mod weakest_loop;
pub mod words;

pub use markov::{DEFAULT_MARKOV_LENGTH, MarkovSynthesizer, generate_markov_text};
pub use weakest_loop::{DEFAULT_WEAKEST_LENGTH, WeakestLoopBuilder, generate_weakest_loop_text};

use crate::engine::MIN_TRIGRAMS;
use crate::engine::trigram_stats::{TrigramModel, TrigramScore};
use crate::error::TrainerError;

/// Ranked trigrams with a positive score, once the model has seen enough
/// typing to generate from.
pub(crate) fn training_scores(model: &TrigramModel) -> Result<Vec<TrigramScore>, TrainerError> {
    if model.total_chars_typed == 0 {
        return Err(TrainerError::insufficient("nothing typed yet"));
    }
    if model.trigram_count() < MIN_TRIGRAMS {
        return Err(TrainerError::insufficient(format!(
            "{} of {} trigrams seen",
            model.trigram_count(),
            MIN_TRIGRAMS
        )));
    }
    let ranked: Vec<TrigramScore> = model
        .ranked_trigrams()
        .into_iter()
        .filter(|ts| ts.score > 0.0)
        .collect();
    if ranked.is_empty() {
        return Err(TrainerError::insufficient("no trigram has a positive score"));
    }
    Ok(ranked)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A few ordinary sessions with uneven rhythm: "th" and "qu" are slow.
    pub(crate) fn sample_model() -> TrigramModel {
        let mut model = TrigramModel::new();
        let sentences = [
            "the quick brown fox jumps over the lazy dog",
            "then the quiet queen thought that the theme was thin",
            "a quaint quill writes the other thing",
        ];
        for sentence in sentences {
            let text: Vec<char> = sentence.chars().collect();
            let mut t = 0.0;
            let mut timeline = Vec::with_capacity(text.len());
            for (i, &ch) in text.iter().enumerate() {
                let prev = if i > 0 { text[i - 1] } else { ' ' };
                t += match (prev, ch) {
                    ('t', 'h') | ('q', 'u') => 0.35,
                    (_, ' ') => 0.08,
                    _ => 0.12 + (i % 3) as f64 * 0.01,
                };
                timeline.push(t);
            }
            model.ingest(&text, &timeline, false).unwrap();
        }
        model
    }

    #[test]
    fn sample_model_has_enough_trigrams() {
        let model = sample_model();
        assert!(model.trigram_count() >= MIN_TRIGRAMS);
        assert!(training_scores(&model).is_ok());
    }

    #[test]
    fn empty_model_is_rejected() {
        let err = training_scores(&TrigramModel::new()).unwrap_err();
        assert!(err.to_string().contains("nothing typed yet"));
    }

    #[test]
    fn too_few_trigrams_is_rejected() {
        let mut model = TrigramModel::new();
        let text: Vec<char> = "abcdefg".chars().collect();
        let timeline: Vec<f64> = (0..text.len()).map(|i| i as f64 * 0.1).collect();
        model.ingest(&text, &timeline, false).unwrap();
        let err = training_scores(&model).unwrap_err();
        assert!(err.to_string().contains("4 of 10 trigrams"));
    }

    #[test]
    fn training_only_model_has_no_positive_scores() {
        let mut model = TrigramModel::new();
        let text: Vec<char> = "abcdefghijklmnop".chars().collect();
        let timeline: Vec<f64> = (0..text.len()).map(|i| i as f64 * 0.1).collect();
        model.ingest(&text, &timeline, true).unwrap();
        let err = training_scores(&model).unwrap_err();
        assert!(matches!(err, TrainerError::InsufficientData { .. }));
    }
}
