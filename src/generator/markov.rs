use rand::Rng;
use tracing::{debug, info};

use crate::engine::trigram_stats::{Bigram, Trigram, TrigramModel, TrigramScore};
use crate::error::TrainerError;
use crate::generator::training_scores;
use crate::generator::transition_table::TransitionTable;

pub const DEFAULT_MARKOV_LENGTH: usize = 100;

/// The opening trigram is drawn from this many of the hardest trigrams,
/// so drills start on difficult material without always starting the same way.
const SEED_HEAD: usize = 10;

pub struct MarkovSynthesizer {
    table: TransitionTable,
    seeds: Vec<Trigram>,
}

impl MarkovSynthesizer {
    /// `ranked` must be sorted hardest first, as `TrigramModel::ranked_trigrams` returns it.
    pub fn new(ranked: &[TrigramScore]) -> Result<Self, TrainerError> {
        let seeds: Vec<Trigram> = ranked
            .iter()
            .filter(|ts| ts.score > 0.0)
            .take(SEED_HEAD)
            .map(|ts| ts.trigram)
            .collect();
        if seeds.is_empty() {
            return Err(TrainerError::insufficient("no trigram has a positive score"));
        }

        let mut table = TransitionTable::from_scores(ranked);
        table.normalize();
        Ok(Self { table, seeds })
    }

    /// Sample exactly `length` characters (`0` means `DEFAULT_MARKOV_LENGTH`).
    pub fn generate<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> String {
        let length = if length == 0 {
            DEFAULT_MARKOV_LENGTH
        } else {
            length
        };

        let seed = self.seeds[rng.gen_range(0..self.seeds.len())];
        let mut text: Vec<char> = seed.chars().to_vec();
        let mut dead_ends = 0usize;

        while text.len() < length {
            let n = text.len();
            let prev = Bigram([text[n - 2], text[n - 1]]);
            let next = match self
                .table
                .next_probs(prev)
                .and_then(|probs| pick_weighted(rng, probs))
            {
                Some(ch) => ch,
                None => {
                    // Dead end: replay the character three back, which
                    // re-enters a bigram that was reachable before.
                    dead_ends += 1;
                    text[n - 3]
                }
            };
            text.push(next);
        }
        text.truncate(length);

        if dead_ends > 0 {
            debug!(dead_ends, "markov chain hit bigrams without successors");
        }
        text.into_iter().collect()
    }
}

/// Cumulative-sum selection over a normalized distribution.
fn pick_weighted<R: Rng + ?Sized>(rng: &mut R, probs: &[(char, f64)]) -> Option<char> {
    let &(last, _) = probs.last()?;
    let roll = rng.gen_range(0.0..1.0);
    let mut cumulative = 0.0;
    for &(ch, p) in probs {
        cumulative += p;
        if roll < cumulative {
            return Some(ch);
        }
    }
    // Rounding left the total just under 1.0
    Some(last)
}

pub fn generate_markov_text<R: Rng + ?Sized>(
    model: &TrigramModel,
    length: usize,
    rng: &mut R,
) -> Result<String, TrainerError> {
    let ranked = training_scores(model)?;
    let text = MarkovSynthesizer::new(&ranked)?.generate(length, rng);
    info!(
        length = text.chars().count(),
        trigrams = ranked.len(),
        "generated markov drill"
    );
    Ok(text)
}
