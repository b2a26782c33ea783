use core::fmt::Debug;
use core::hash::Hash;

/// Stable identifier for an agent.
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`) so per-tick iteration never depends on hash order
/// - a stable numeric ID (`stable_id`) for seeding, regulator offsets and logs
///
/// Ids are also used as message sender/receiver addresses, hence `Hash`.
pub trait AgentId: Copy + Ord + Eq + Hash + Debug + 'static {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        u64::from(self)
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}
