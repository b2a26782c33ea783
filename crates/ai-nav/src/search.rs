//! Resumable graph searches.
//!
//! Each call to [`TimeSlicedSearch::step`] expands exactly one node, so the scheduler can spread
//! a long search over many ticks. All per-node storage is an arena sized to the graph's slot
//! count, owned by the search and dropped with it.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{GraphEdge, GraphError, Heuristic, IndexedMinHeap, NavGraph, TriggerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchStatus {
    Found,
    NotFound,
    Incomplete,
}

impl SearchStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, SearchStatus::Incomplete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchKind {
    AStar,
    Dijkstra,
}

/// Outcome of a successful search, detached from the search's arena.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    pub kind: SearchKind,
    pub source: usize,
    /// Node the search terminated on (for item searches, the node holding the trigger).
    pub target: usize,
    /// Edges from source to target, in travel order. Empty when source == target.
    pub edges: Vec<GraphEdge>,
    pub cost: f32,
    pub trigger: Option<TriggerId>,
}

impl SearchResult {
    /// Node indices along the path, source first.
    pub fn nodes(&self) -> Vec<usize> {
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        nodes.push(self.source);
        nodes.extend(self.edges.iter().map(|e| e.to));
        nodes
    }
}

/// A search that can be advanced one expansion at a time.
pub trait TimeSlicedSearch: core::fmt::Debug {
    fn kind(&self) -> SearchKind;

    fn source(&self) -> usize;

    /// Expand one node. Once finished, keeps returning the final status without doing work.
    fn step(&mut self, graph: &NavGraph) -> SearchStatus;

    fn status(&self) -> SearchStatus;

    /// Populated once `step` has returned [`SearchStatus::Found`].
    fn result(&self) -> Option<SearchResult>;

    /// Cheapest known cost from the source to `node`, if the node has been settled.
    fn settled_cost(&self, node: usize) -> Option<f32>;

    fn run_to_completion(&mut self, graph: &NavGraph) -> SearchStatus {
        loop {
            let status = self.step(graph);
            if status.is_finished() {
                return status;
            }
        }
    }
}

/// Decides whether a settled node ends a Dijkstra search.
pub trait TerminationCondition: core::fmt::Debug {
    fn is_satisfied(&self, graph: &NavGraph, node: usize) -> bool;
}

/// Terminate on a specific node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachNode(pub usize);

impl TerminationCondition for ReachNode {
    fn is_satisfied(&self, _graph: &NavGraph, node: usize) -> bool {
        node == self.0
    }
}

/// Terminate on the first node carrying one of the given triggers whose item is active in
/// the graph at the moment the node is settled.
///
/// The set names the candidates (every trigger giving the wanted item type). Activity is read
/// live, so an item taken mid-search is skipped and one that respawns mid-search can still be
/// found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveTrigger {
    pub triggers: BTreeSet<TriggerId>,
}

impl ActiveTrigger {
    pub fn new(triggers: impl IntoIterator<Item = TriggerId>) -> Self {
        Self {
            triggers: triggers.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Whether any candidate is active right now.
    pub fn any_active(&self, graph: &NavGraph) -> bool {
        self.triggers.iter().any(|&t| graph.is_trigger_active(t))
    }
}

impl TerminationCondition for ActiveTrigger {
    fn is_satisfied(&self, graph: &NavGraph, node: usize) -> bool {
        graph
            .node(node)
            .and_then(|n| n.trigger())
            .is_some_and(|t| self.triggers.contains(&t) && graph.is_trigger_active(t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Undiscovered,
    Frontier,
    Settled,
}

#[derive(Debug)]
struct SearchArena {
    source: usize,
    cost: Vec<f32>,
    priority: Vec<f32>,
    state: Vec<NodeState>,
    frontier: Vec<Option<GraphEdge>>,
    tree: Vec<Option<GraphEdge>>,
    queue: IndexedMinHeap,
    status: SearchStatus,
    found: Option<(usize, Option<TriggerId>)>,
}

impl SearchArena {
    fn new(graph: &NavGraph, source: usize, source_priority: f32) -> Self {
        let slots = graph.slot_count();
        let mut arena = Self {
            source,
            cost: vec![f32::INFINITY; slots],
            priority: vec![f32::INFINITY; slots],
            state: vec![NodeState::Undiscovered; slots],
            frontier: vec![None; slots],
            tree: vec![None; slots],
            queue: IndexedMinHeap::with_capacity(slots),
            status: SearchStatus::Incomplete,
            found: None,
        };
        arena.cost[source] = 0.0;
        arena.priority[source] = source_priority;
        arena.state[source] = NodeState::Frontier;
        arena.queue.insert(source, &arena.priority);
        arena
    }

    /// One expansion. `done` tests the settled node; `h` estimates the remaining cost of a
    /// newly reached node.
    fn step(
        &mut self,
        graph: &NavGraph,
        done: impl FnOnce(usize) -> bool,
        mut h: impl FnMut(usize) -> f32,
    ) -> SearchStatus {
        if self.status.is_finished() {
            return self.status;
        }

        let Some(node) = self.queue.pop(&self.priority) else {
            self.status = SearchStatus::NotFound;
            return self.status;
        };
        self.tree[node] = self.frontier[node];
        self.state[node] = NodeState::Settled;

        if done(node) {
            let trigger = graph.node(node).and_then(|n| n.trigger());
            self.found = Some((node, trigger));
            self.status = SearchStatus::Found;
            return self.status;
        }

        for edge in graph.edges_from(node) {
            let to = edge.to;
            debug_assert!(to < self.state.len(), "edge to node outside the search arena");
            let candidate = self.cost[node] + edge.cost;
            match self.state[to] {
                NodeState::Undiscovered => {
                    self.cost[to] = candidate;
                    self.priority[to] = candidate + h(to);
                    self.frontier[to] = Some(*edge);
                    self.state[to] = NodeState::Frontier;
                    self.queue.insert(to, &self.priority);
                }
                NodeState::Frontier if candidate < self.cost[to] => {
                    let estimate = self.priority[to] - self.cost[to];
                    self.cost[to] = candidate;
                    self.priority[to] = candidate + estimate;
                    self.frontier[to] = Some(*edge);
                    self.queue.change_priority(to, &self.priority);
                }
                _ => {}
            }
        }

        SearchStatus::Incomplete
    }

    fn path_edges(&self, target: usize) -> Vec<GraphEdge> {
        let mut edges = Vec::new();
        let mut node = target;
        while node != self.source {
            let Some(edge) = self.tree[node] else {
                break;
            };
            edges.push(edge);
            node = edge.from;
        }
        edges.reverse();
        edges
    }

    fn result(&self, kind: SearchKind) -> Option<SearchResult> {
        let (target, trigger) = self.found?;
        Some(SearchResult {
            kind,
            source: self.source,
            target,
            edges: self.path_edges(target),
            cost: self.cost[target],
            trigger,
        })
    }

    fn settled_cost(&self, node: usize) -> Option<f32> {
        (self.state.get(node) == Some(&NodeState::Settled)).then(|| self.cost[node])
    }
}

fn validate(graph: &NavGraph, node: usize) -> Result<(), GraphError> {
    if graph.is_node_present(node) {
        Ok(())
    } else {
        Err(GraphError::InvalidNode(node))
    }
}

/// Point-to-point A* search.
#[derive(Debug)]
pub struct AStarSearch<H> {
    arena: SearchArena,
    target: usize,
    heuristic: H,
}

impl<H: Heuristic> AStarSearch<H> {
    pub fn new(
        graph: &NavGraph,
        source: usize,
        target: usize,
        mut heuristic: H,
    ) -> Result<Self, GraphError> {
        validate(graph, source)?;
        validate(graph, target)?;
        let h0 = heuristic.estimate(graph, source, target);
        Ok(Self {
            arena: SearchArena::new(graph, source, h0),
            target,
            heuristic,
        })
    }

    pub fn target(&self) -> usize {
        self.target
    }
}

impl<H: Heuristic> TimeSlicedSearch for AStarSearch<H> {
    fn kind(&self) -> SearchKind {
        SearchKind::AStar
    }

    fn source(&self) -> usize {
        self.arena.source
    }

    fn step(&mut self, graph: &NavGraph) -> SearchStatus {
        let target = self.target;
        let heuristic = &mut self.heuristic;
        self.arena.step(
            graph,
            |node| node == target,
            |node| heuristic.estimate(graph, node, target),
        )
    }

    fn status(&self) -> SearchStatus {
        self.arena.status
    }

    fn result(&self) -> Option<SearchResult> {
        self.arena.result(SearchKind::AStar)
    }

    fn settled_cost(&self, node: usize) -> Option<f32> {
        self.arena.settled_cost(node)
    }
}

/// Dijkstra search that stops on the first settled node satisfying a [`TerminationCondition`].
#[derive(Debug)]
pub struct DijkstraSearch<T> {
    arena: SearchArena,
    condition: T,
}

impl<T: TerminationCondition> DijkstraSearch<T> {
    pub fn new(graph: &NavGraph, source: usize, condition: T) -> Result<Self, GraphError> {
        validate(graph, source)?;
        Ok(Self {
            arena: SearchArena::new(graph, source, 0.0),
            condition,
        })
    }

    pub fn condition(&self) -> &T {
        &self.condition
    }
}

impl<T: TerminationCondition> TimeSlicedSearch for DijkstraSearch<T> {
    fn kind(&self) -> SearchKind {
        SearchKind::Dijkstra
    }

    fn source(&self) -> usize {
        self.arena.source
    }

    fn step(&mut self, graph: &NavGraph) -> SearchStatus {
        let condition = &self.condition;
        self.arena
            .step(graph, |node| condition.is_satisfied(graph, node), |_| 0.0)
    }

    fn status(&self) -> SearchStatus {
        self.arena.status
    }

    fn result(&self) -> Option<SearchResult> {
        self.arena.result(SearchKind::Dijkstra)
    }

    fn settled_cost(&self, node: usize) -> Option<f32> {
        self.arena.settled_cost(node)
    }
}
