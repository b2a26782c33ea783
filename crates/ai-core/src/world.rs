use crate::AgentId;

/// The simulation as seen by evaluators and feature queries.
///
/// Only the agent id type is fixed here. Navigation and goal crates layer their own query
/// traits (map lookups, perception, steering switches) on top.
pub trait WorldView {
    type Agent: AgentId;
}

/// A world goals may act on: steering toggles, path requests, messages.
pub trait WorldMut: WorldView {}
