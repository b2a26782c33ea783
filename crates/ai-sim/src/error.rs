use thiserror::Error;

use ai_nav::{DoorId, GraphError};

/// Problems found while turning a scenario description into an arena.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid grid: {0}")]
    Grid(#[from] GraphError),

    #[error("unknown item kind `{0}`")]
    UnknownItem(String),

    #[error("duplicate bot id {0}")]
    DuplicateBot(u32),

    #[error("duplicate door id {}", .0 .0)]
    DuplicateDoor(DoorId),

    #[error("{what} at ({x}, {y}) has no visible graph node")]
    Unreachable { what: String, x: f32, y: f32 },

    #[error("scenario has no bots")]
    NoBots,

    #[error("`{field}` must be positive")]
    NonPositive { field: &'static str },
}
