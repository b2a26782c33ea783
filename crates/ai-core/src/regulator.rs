use crate::AgentId;

/// Throttles a periodic per-agent activity (goal arbitration, perception refresh) to every
/// `every_ticks` ticks.
///
/// Agents get a deterministic phase offset derived from their id, so a crowd of agents created
/// on the same tick does not arbitrate on the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regulator {
    pub every_ticks: u32,
    pub offset_ticks: u32,
}

impl Default for Regulator {
    fn default() -> Self {
        Self {
            every_ticks: 1,
            offset_ticks: 0,
        }
    }
}

impl Regulator {
    pub fn every(every_ticks: u32) -> Self {
        Self {
            every_ticks: every_ticks.max(1),
            offset_ticks: 0,
        }
    }

    pub fn deterministic(agent: impl AgentId, every_ticks: u32) -> Self {
        let every = every_ticks.max(1);
        let offset = (agent.stable_id() % u64::from(every)) as u32;
        Self {
            every_ticks: every,
            offset_ticks: offset,
        }
    }

    pub fn is_ready(&self, tick: u64) -> bool {
        let every = u64::from(self.every_ticks.max(1));
        ((tick + u64::from(self.offset_ticks)) % every) == 0
    }
}
