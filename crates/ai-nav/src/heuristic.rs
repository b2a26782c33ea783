//! A* cost-to-go estimates.

use ai_core::{DeterministicRng, SplitMix64};

use crate::NavGraph;

/// Estimated remaining cost between two nodes. Takes `&mut self` so stateful heuristics (the
/// noisy one) can draw from their own RNG stream.
pub trait Heuristic: core::fmt::Debug {
    fn estimate(&mut self, graph: &NavGraph, from: usize, to: usize) -> f32;
}

/// Straight-line distance between node positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Heuristic for Euclidean {
    fn estimate(&mut self, graph: &NavGraph, from: usize, to: usize) -> f32 {
        match (graph.position(from), graph.position(to)) {
            (Some(a), Some(b)) => a.distance(b),
            _ => 0.0,
        }
    }
}

/// Always zero; A* with this heuristic behaves like Dijkstra.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zero;

impl Heuristic for Zero {
    fn estimate(&mut self, _graph: &NavGraph, _from: usize, _to: usize) -> f32 {
        0.0
    }
}

/// Euclidean distance scaled by a uniform jitter in `[0.9, 1.1]`.
///
/// Gives agents slightly different routes through open areas. Seeded, so replays match.
#[derive(Debug, Clone)]
pub struct Noisy {
    rng: SplitMix64,
}

impl Noisy {
    pub const MIN_SCALE: f32 = 0.9;
    pub const MAX_SCALE: f32 = 1.1;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: SplitMix64::new(seed),
        }
    }
}

impl Heuristic for Noisy {
    fn estimate(&mut self, graph: &NavGraph, from: usize, to: usize) -> f32 {
        let base = Euclidean.estimate(graph, from, to);
        base * self.rng.next_f32_range(Self::MIN_SCALE, Self::MAX_SCALE)
    }
}

/// Heuristic selection for planners, so the choice can be made from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeuristicKind {
    #[default]
    Euclidean,
    Zero,
    Noisy,
}
