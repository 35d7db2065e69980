use std::collections::HashMap;

use crate::engine::trigram_stats::{Bigram, TrigramScore};

/// Order-2 Markov chain: for each bigram, the candidate next characters
/// with their weights. Candidates keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    pub transitions: HashMap<Bigram, Vec<(char, f64)>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, prev: Bigram, next: char, weight: f64) {
        self.transitions.entry(prev).or_default().push((next, weight));
    }

    /// Chain weighted by trigram score. Non-positive scores carry no
    /// information and are left out.
    pub fn from_scores(scores: &[TrigramScore]) -> Self {
        let mut table = Self::new();
        for ts in scores.iter().filter(|ts| ts.score > 0.0) {
            let [a, b, c] = ts.trigram.chars();
            table.add(Bigram([a, b]), c, ts.score);
        }
        table
    }

    /// Scale each bigram's weights into a probability distribution.
    pub fn normalize(&mut self) {
        self.transitions.retain(|_, links| {
            let total: f64 = links.iter().map(|(_, w)| w).sum();
            if total <= 0.0 || !total.is_finite() {
                return false;
            }
            for (_, w) in links.iter_mut() {
                *w /= total;
            }
            true
        });
    }

    pub fn next_probs(&self, prev: Bigram) -> Option<&[(char, f64)]> {
        self.transitions.get(&prev).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
