//! Sparse navigation graph: positioned nodes and weighted, flag-tagged edges.

use std::collections::BTreeSet;

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{GraphError, Vec2};

/// Identifier of a pickup trigger (item giver) placed on a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriggerId(pub u32);

/// Identifier of a door an edge passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DoorId(pub u32);

/// Semantic payload of a node, fixed when the graph is built.
///
/// Item searches terminate on this payload rather than on node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeExtra {
    #[default]
    None,
    Trigger(TriggerId),
}

bitflags! {
    /// Traversal behaviour required to follow an edge. The empty set is a plain walk.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct EdgeFlags: u32 {
        const SWIM = 1 << 0;
        const CRAWL = 1 << 1;
        const CREEP = 1 << 2;
        const JUMP = 1 << 3;
        const FLY = 1 << 4;
        const GRAPPLE = 1 << 5;
        const GOES_THROUGH_DOOR = 1 << 6;
    }
}

impl EdgeFlags {
    pub const NORMAL: EdgeFlags = EdgeFlags::empty();

    pub fn is_normal(self) -> bool {
        self.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphNode {
    /// `None` once the node has been removed; the slot is kept so indices never shift.
    index: Option<usize>,
    pub position: Vec2,
    pub extra: NodeExtra,
}

impl GraphNode {
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_active(&self) -> bool {
        self.index.is_some()
    }

    pub fn trigger(&self) -> Option<TriggerId> {
        match self.extra {
            NodeExtra::Trigger(id) => Some(id),
            NodeExtra::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
    pub cost: f32,
    pub flags: EdgeFlags,
    pub door: Option<DoorId>,
}

impl GraphEdge {
    pub fn new(from: usize, to: usize, cost: f32) -> Self {
        Self {
            from,
            to,
            cost,
            flags: EdgeFlags::NORMAL,
            door: None,
        }
    }

    pub fn with_flags(mut self, flags: EdgeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn through_door(mut self, door: DoorId) -> Self {
        self.flags |= EdgeFlags::GOES_THROUGH_DOOR;
        self.door = Some(door);
        self
    }

    fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            ..self
        }
    }
}

/// Adjacency-list graph. Undirected graphs mirror every edge.
///
/// The graph is read-mostly: it is built on map load and only queried while agents plan.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavGraph {
    directed: bool,
    nodes: Vec<GraphNode>,
    edges: Vec<Vec<GraphEdge>>,
    /// Triggers whose item is currently taken.
    #[cfg_attr(feature = "serde", serde(default))]
    inactive_triggers: BTreeSet<TriggerId>,
}

impl NavGraph {
    pub fn new_undirected() -> Self {
        Self {
            directed: false,
            nodes: Vec::new(),
            edges: Vec::new(),
            inactive_triggers: BTreeSet::new(),
        }
    }

    pub fn new_directed() -> Self {
        Self {
            directed: true,
            ..Self::new_undirected()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Append a node and return its index.
    pub fn add_node(&mut self, position: Vec2, extra: NodeExtra) -> usize {
        let index = self.nodes.len();
        self.nodes.push(GraphNode {
            index: Some(index),
            position,
            extra,
        });
        self.edges.push(Vec::new());
        index
    }

    /// Re-activate a previously removed slot.
    pub fn restore_node(
        &mut self,
        index: usize,
        position: Vec2,
        extra: NodeExtra,
    ) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(GraphError::InvalidNode(index))?;
        if node.is_active() {
            return Err(GraphError::DuplicateNode(index));
        }
        *node = GraphNode {
            index: Some(index),
            position,
            extra,
        };
        Ok(())
    }

    /// Logically delete a node and every edge touching it. The slot keeps its index.
    pub fn remove_node(&mut self, index: usize) -> Result<(), GraphError> {
        if !self.is_node_present(index) {
            return Err(GraphError::InvalidNode(index));
        }
        self.nodes[index].index = None;
        self.edges[index].clear();
        for list in self.edges.iter_mut() {
            list.retain(|e| e.to != index);
        }
        Ok(())
    }

    pub fn set_extra(&mut self, index: usize, extra: NodeExtra) -> Result<(), GraphError> {
        if !self.is_node_present(index) {
            return Err(GraphError::InvalidNode(index));
        }
        self.nodes[index].extra = extra;
        Ok(())
    }

    /// Add an edge (and its mirror for undirected graphs). Adding an edge that already exists is
    /// a no-op.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<(), GraphError> {
        for idx in [edge.from, edge.to] {
            if !self.is_node_present(idx) {
                return Err(GraphError::InvalidNode(idx));
            }
        }
        if !edge.cost.is_finite() || edge.cost < 0.0 {
            return Err(GraphError::InvalidCost {
                from: edge.from,
                to: edge.to,
                cost: edge.cost,
            });
        }

        if !self.is_edge_present(edge.from, edge.to) {
            self.edges[edge.from].push(edge);
        }
        if !self.directed && !self.is_edge_present(edge.to, edge.from) {
            self.edges[edge.to].push(edge.reversed());
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, from: usize, to: usize) -> Result<(), GraphError> {
        if !self.is_edge_present(from, to) {
            return Err(GraphError::MissingEdge { from, to });
        }
        self.edges[from].retain(|e| e.to != to);
        if !self.directed {
            if let Some(list) = self.edges.get_mut(to) {
                list.retain(|e| e.to != from);
            }
        }
        Ok(())
    }

    /// Mutate an edge in place (and its mirror for undirected graphs).
    pub fn update_edge(
        &mut self,
        from: usize,
        to: usize,
        f: impl Fn(&mut GraphEdge),
    ) -> Result<(), GraphError> {
        let edge = self
            .edges
            .get_mut(from)
            .and_then(|list| list.iter_mut().find(|e| e.to == to))
            .ok_or(GraphError::MissingEdge { from, to })?;
        f(edge);
        if !self.directed {
            if let Some(mirror) = self
                .edges
                .get_mut(to)
                .and_then(|list| list.iter_mut().find(|e| e.to == from))
            {
                f(mirror);
                mirror.from = to;
                mirror.to = from;
            }
        }
        Ok(())
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index).filter(|n| n.is_active())
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.node(index).map(|n| n.position)
    }

    pub fn is_node_present(&self, index: usize) -> bool {
        self.node(index).is_some()
    }

    pub fn is_edge_present(&self, from: usize, to: usize) -> bool {
        self.edge(from, to).is_some()
    }

    pub fn edge(&self, from: usize, to: usize) -> Option<&GraphEdge> {
        self.edges.get(from)?.iter().find(|e| e.to == to)
    }

    /// Outgoing edges of `index`, in insertion order (deterministic expansion order).
    pub fn edges_from(&self, index: usize) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges.get(index).into_iter().flatten()
    }

    /// Every edge of the graph, grouped by source node.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges.iter().flatten()
    }

    /// Active nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes.iter().filter(|n| n.is_active())
    }

    /// Number of slots, including removed nodes. Per-node search storage is sized by this.
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn active_node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.active_node_count() == 0
    }

    /// `n`-th active node (wrapping), used for uniform random node selection.
    pub fn nth_active_node(&self, n: usize) -> Option<&GraphNode> {
        let count = self.active_node_count();
        if count == 0 {
            return None;
        }
        self.nodes().nth(n % count)
    }

    /// Node carrying `trigger` in its payload, if any.
    pub fn node_with_trigger(&self, trigger: TriggerId) -> Option<&GraphNode> {
        self.nodes().find(|n| n.trigger() == Some(trigger))
    }

    /// Mark the item on `trigger` as taken (`false`) or back in play (`true`). Searches in
    /// flight see the change the next time they settle a node.
    pub fn set_trigger_active(&mut self, trigger: TriggerId, active: bool) {
        if active {
            self.inactive_triggers.remove(&trigger);
        } else {
            self.inactive_triggers.insert(trigger);
        }
    }

    pub fn is_trigger_active(&self, trigger: TriggerId) -> bool {
        !self.inactive_triggers.contains(&trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> NavGraph {
        let mut g = NavGraph::new_undirected();
        let a = g.add_node(Vec2::new(0.0, 0.0), NodeExtra::None);
        let b = g.add_node(Vec2::new(10.0, 0.0), NodeExtra::None);
        let c = g.add_node(Vec2::new(10.0, 10.0), NodeExtra::None);
        g.add_edge(GraphEdge::new(a, b, 10.0)).unwrap();
        g.add_edge(GraphEdge::new(b, c, 10.0)).unwrap();
        g.add_edge(GraphEdge::new(a, c, 25.0)).unwrap();
        g
    }

    #[test]
    fn undirected_edges_are_mirrored_once() {
        let mut g = triangle();
        assert_eq!(g.edge_count(), 6);
        g.add_edge(GraphEdge::new(1, 0, 10.0)).unwrap();
        assert_eq!(g.edge_count(), 6);
        assert!(g.is_edge_present(2, 0));
    }

    #[test]
    fn removed_nodes_keep_their_slot() {
        let mut g = triangle();
        g.remove_node(1).unwrap();
        assert_eq!(g.slot_count(), 3);
        assert_eq!(g.active_node_count(), 2);
        assert!(g.node(1).is_none());
        assert!(!g.is_edge_present(0, 1));
        assert_eq!(g.edges_from(0).count(), 1);

        assert_eq!(g.remove_node(1), Err(GraphError::InvalidNode(1)));
        g.restore_node(1, Vec2::new(5.0, 5.0), NodeExtra::None)
            .unwrap();
        assert_eq!(
            g.restore_node(1, Vec2::ZERO, NodeExtra::None),
            Err(GraphError::DuplicateNode(1))
        );
    }

    #[test]
    fn edges_to_missing_nodes_are_rejected() {
        let mut g = triangle();
        assert_eq!(
            g.add_edge(GraphEdge::new(0, 9, 1.0)),
            Err(GraphError::InvalidNode(9))
        );
        assert!(matches!(
            g.add_edge(GraphEdge::new(0, 1, f32::NAN)),
            Err(GraphError::InvalidCost { .. })
        ));
    }

    #[test]
    fn update_edge_keeps_mirror_in_sync() {
        let mut g = triangle();
        g.update_edge(0, 1, |e| *e = e.through_door(DoorId(3)))
            .unwrap();
        let mirror = g.edge(1, 0).unwrap();
        assert_eq!(mirror.door, Some(DoorId(3)));
        assert_eq!((mirror.from, mirror.to), (1, 0));
        assert!(!mirror.flags.is_normal());
    }
}
