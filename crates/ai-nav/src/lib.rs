//! Navigation graph, resumable searches, and the time-sliced path planning built on them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod cell_space;
pub mod error;
mod geometry;
pub mod graph;
pub mod grid;
pub mod heuristic;
pub mod map;
pub mod math;
pub mod path;
pub mod planner;
pub mod priority_queue;
pub mod scheduler;
pub mod search;

pub use cell_space::CellSpace;
pub use error::GraphError;
pub use graph::{DoorId, EdgeFlags, GraphEdge, GraphNode, NavGraph, NodeExtra, TriggerId};
pub use grid::NavGrid;
pub use heuristic::{Heuristic, HeuristicKind};
pub use map::{Door, MapQuery, NavMap, Wall};
pub use math::Vec2;
pub use path::{smooth_precise, smooth_quick, Path, PathEdge, Smoothing};
pub use planner::{PathNotice, PathPlanner, Ticket};
pub use priority_queue::IndexedMinHeap;
pub use scheduler::{AdvanceReport, PathScheduler, SearchEvent, SearchOutcome};
pub use search::{
    ActiveTrigger, AStarSearch, DijkstraSearch, ReachNode, SearchKind, SearchResult, SearchStatus,
    TerminationCondition, TimeSlicedSearch,
};
