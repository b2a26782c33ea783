use crate::{rng, AgentId, SplitMix64};

/// Per-frame context handed to every brain, goal and scheduler call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, seed: u64) -> Self {
        Self {
            tick,
            dt_seconds,
            seed,
        }
    }

    /// Simulated clock in seconds at the start of this tick.
    ///
    /// Goals use this for "expected arrival time" bookkeeping instead of a wall clock.
    pub fn time_seconds(&self) -> f64 {
        self.tick as f64 * f64::from(self.dt_seconds.max(0.0))
    }

    pub fn next(&self) -> Self {
        Self {
            tick: self.tick + 1,
            ..*self
        }
    }

    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed ^ self.tick, agent.stable_id(), stream);
        SplitMix64::new(seed)
    }
}
