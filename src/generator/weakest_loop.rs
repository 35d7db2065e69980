use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::engine::trigram_stats::{Bigram, Trigram, TrigramModel, TrigramScore};
use crate::error::TrainerError;
use crate::generator::training_scores;

pub const DEFAULT_WEAKEST_LENGTH: usize = 50;

// ---------------------------------------------------------------------------
// Bigram graph
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
struct Edge {
    from: usize,
    to: usize,
    weight: f64,
}

/// Vertices are bigrams; trigram `abc` is an edge `ab -> bc` weighted by
/// the inverse of its score, so hard trigrams are cheap to traverse.
#[derive(Debug, Default)]
pub struct BigramGraph {
    vertices: Vec<Bigram>,
    index: HashMap<Bigram, usize>,
    edges: Vec<Edge>,
}

impl BigramGraph {
    pub fn from_scores(scores: &[TrigramScore]) -> Self {
        let mut graph = Self::default();
        for ts in scores.iter().filter(|ts| ts.score > 0.0) {
            let from = graph.vertex(ts.trigram.head());
            let to = graph.vertex(ts.trigram.tail());
            graph.edges.push(Edge {
                from,
                to,
                weight: 1.0 / ts.score,
            });
        }
        graph
    }

    fn vertex(&mut self, bigram: Bigram) -> usize {
        if let Some(&i) = self.index.get(&bigram) {
            return i;
        }
        self.vertices.push(bigram);
        self.index.insert(bigram, self.vertices.len() - 1);
        self.vertices.len() - 1
    }

    pub fn index_of(&self, bigram: Bigram) -> Option<usize> {
        self.index.get(&bigram).copied()
    }

    pub fn bigram(&self, index: usize) -> Bigram {
        self.vertices[index]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

// ---------------------------------------------------------------------------
// Bellman-Ford
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ShortestPaths {
    source: usize,
    dist: Vec<f64>,
    predecessor: Vec<Option<usize>>,
}

impl ShortestPaths {
    pub fn distance(&self, target: usize) -> Option<f64> {
        self.dist.get(target).copied().filter(|d| d.is_finite())
    }

    /// Vertex indices from the source to `target`, both included.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        self.distance(target)?;
        let mut path = vec![target];
        let mut current = target;
        while current != self.source {
            current = self.predecessor[current]?;
            path.push(current);
            if path.len() > self.dist.len() {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }
}

/// Single-source shortest paths. Returns `None` if a negative cycle is
/// reachable from `source`.
pub fn bellman_ford(graph: &BigramGraph, source: usize) -> Option<ShortestPaths> {
    let n = graph.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut predecessor = vec![None; n];
    dist[source] = 0.0;

    for _ in 1..n {
        let mut changed = false;
        for edge in &graph.edges {
            let candidate = dist[edge.from] + edge.weight;
            if dist[edge.from].is_finite() && candidate < dist[edge.to] {
                dist[edge.to] = candidate;
                predecessor[edge.to] = Some(edge.from);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for edge in &graph.edges {
        if dist[edge.from].is_finite() && dist[edge.from] + edge.weight < dist[edge.to] {
            warn!(
                from = %graph.bigram(edge.from),
                to = %graph.bigram(edge.to),
                "negative cycle in bigram graph"
            );
            return None;
        }
    }

    Some(ShortestPaths {
        source,
        dist,
        predecessor,
    })
}

// ---------------------------------------------------------------------------
// Loop builder
// ---------------------------------------------------------------------------

pub struct WeakestLoopBuilder {
    graph: BigramGraph,
    weakest: Trigram,
}

impl WeakestLoopBuilder {
    /// `ranked` must be sorted hardest first; its first entry is the trigram to drill.
    pub fn new(ranked: &[TrigramScore]) -> Result<Self, TrainerError> {
        let weakest = ranked
            .first()
            .filter(|ts| ts.score > 0.0)
            .ok_or_else(|| TrainerError::insufficient("no trigram has a positive score"))?
            .trigram;
        Ok(Self {
            graph: BigramGraph::from_scores(ranked),
            weakest,
        })
    }

    pub fn weakest(&self) -> Trigram {
        self.weakest
    }

    /// Shortest cycle through the weakest trigram `abc`: type `abc`, then
    /// follow the cheapest chain of trigrams from `bc` back to `ab`.
    ///
    /// Falls back to the bare trigram when `ab` can't be reached from `bc`.
    pub fn drill_unit(&self) -> Vec<char> {
        let head = self.weakest.head();
        let tail = self.weakest.tail();
        let fallback = self.weakest.chars().to_vec();

        let (Some(source), Some(target)) = (self.graph.index_of(tail), self.graph.index_of(head))
        else {
            return fallback;
        };
        let Some(path) = bellman_ford(&self.graph, source).and_then(|sp| sp.path_to(target)) else {
            debug!(weakest = %self.weakest, "no path back to the weakest trigram");
            return fallback;
        };

        // The cycle is head, tail, ..., (back to) head. Each bigram on it
        // contributes its first character; the final head closes the loop.
        let mut unit = vec![head.0[0]];
        unit.extend(
            path[..path.len() - 1]
                .iter()
                .map(|&i| self.graph.bigram(i).0[0]),
        );
        unit
    }

    /// Repeat the drill unit to exactly `length` characters (`0` means
    /// `DEFAULT_WEAKEST_LENGTH`).
    pub fn generate(&self, length: usize) -> String {
        let length = if length == 0 {
            DEFAULT_WEAKEST_LENGTH
        } else {
            length
        };
        let unit = self.drill_unit();
        unit.iter().cycle().take(length).collect()
    }
}

pub fn generate_weakest_loop_text(
    model: &TrigramModel,
    length: usize,
) -> Result<String, TrainerError> {
    let ranked = training_scores(model)?;
    let builder = WeakestLoopBuilder::new(&ranked)?;
    let text = builder.generate(length);
    info!(
        weakest = %builder.weakest(),
        vertices = builder.graph.vertex_count(),
        edges = builder.graph.edge_count(),
        "generated weakest-trigram drill"
    );
    Ok(text)
}
