use thiserror::Error;

/// Graph construction errors. These indicate programming or content errors (bad node indices,
/// duplicate slots), never an expected runtime outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("node index {0} is out of range or refers to a removed node")]
    InvalidNode(usize),

    #[error("node slot {0} is already occupied")]
    DuplicateNode(usize),

    #[error("edge {from} -> {to} has invalid cost {cost}")]
    InvalidCost { from: usize, to: usize, cost: f32 },

    #[error("grid must have non-zero size and a positive cell size")]
    InvalidGrid,

    #[error("edge {from} -> {to} does not exist")]
    MissingEdge { from: usize, to: usize },
}
