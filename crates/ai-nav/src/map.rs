//! Static map geometry: navigation graph, its spatial index, walls and doors.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ai_core::DeterministicRng;

use crate::geometry::{segment_distance, segments_intersect};
use crate::{CellSpace, DoorId, EdgeFlags, NavGraph, TriggerId, Vec2};

/// Query surface the planner needs from the map. Pure queries; nothing here mutates.
pub trait MapQuery {
    fn graph(&self) -> &NavGraph;

    /// `true` if a body of `radius` moving along the segment would touch solid geometry.
    fn is_path_obstructed(&self, from: Vec2, to: Vec2, radius: f32) -> bool;

    /// Active graph nodes within `range` of `position`, in a stable order.
    fn nodes_near(&self, position: Vec2, range: f32) -> Vec<usize>;

    /// Range used for [`MapQuery::closest_visible_node`] lookups.
    fn node_search_range(&self) -> f32;

    /// Nearest node inside the search range reachable in a straight unobstructed line.
    fn closest_visible_node(&self, position: Vec2, radius: f32) -> Option<usize> {
        let graph = self.graph();
        let mut best: Option<(usize, f32)> = None;
        for node in self.nodes_near(position, self.node_search_range()) {
            let Some(node_pos) = graph.position(node) else {
                continue;
            };
            let d2 = node_pos.distance_squared(position);
            if best.is_some_and(|(_, best_d2)| d2 >= best_d2) {
                continue;
            }
            if !self.is_path_obstructed(position, node_pos, radius) {
                best = Some((node, d2));
            }
        }
        best.map(|(node, _)| node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wall {
    pub from: Vec2,
    pub to: Vec2,
}

impl Wall {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.from + self.to) * 0.5
    }
}

/// A sliding door. Closed doors obstruct movement; switches open them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Door {
    pub id: DoorId,
    pub segment: Wall,
    pub switches: Vec<Vec2>,
    pub open: bool,
}

#[derive(Debug, Clone)]
pub struct NavMap {
    graph: NavGraph,
    cells: CellSpace<usize>,
    walls: Vec<Wall>,
    doors: BTreeMap<DoorId, Door>,
    search_range: f32,
}

impl NavMap {
    /// Wrap `graph` and index its active nodes into cells of `cell_size`.
    pub fn new(graph: NavGraph, cell_size: f32, search_range: f32) -> Self {
        let mut cells = CellSpace::new(cell_size);
        for node in graph.nodes() {
            if let Some(index) = node.index() {
                cells.insert(node.position, index);
            }
        }
        Self {
            graph,
            cells,
            walls: Vec::new(),
            doors: BTreeMap::new(),
            search_range: search_range.max(0.0),
        }
    }

    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Wall>) -> Self {
        self.walls.extend(walls);
        self
    }

    /// Register `door` and tag every graph edge crossing its segment as a door edge.
    pub fn add_door(&mut self, door: Door) {
        let crossing: Vec<(usize, usize)> = self
            .graph
            .edges()
            .filter(|e| e.door.is_none())
            .filter_map(|e| {
                let from = self.graph.position(e.from)?;
                let to = self.graph.position(e.to)?;
                segments_intersect(from, to, door.segment.from, door.segment.to)
                    .then_some((e.from, e.to))
            })
            .collect();

        let id = door.id;
        for &(from, to) in &crossing {
            let tagged = self.graph.update_edge(from, to, |edge| {
                edge.flags |= EdgeFlags::GOES_THROUGH_DOOR;
                edge.door = Some(id);
            });
            // `crossing` was collected from live edges and nothing removes edges in between.
            debug_assert!(tagged.is_ok(), "door edge {from}->{to} vanished: {tagged:?}");
        }
        if !crossing.is_empty() {
            tracing::debug!(door = id.0, edges = crossing.len(), "tagged door edges");
        }
        self.doors.insert(id, door);
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn doors(&self) -> impl Iterator<Item = &Door> + '_ {
        self.doors.values()
    }

    pub fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(&id)
    }

    /// Returns `false` for unknown doors.
    pub fn set_door_open(&mut self, id: DoorId, open: bool) -> bool {
        match self.doors.get_mut(&id) {
            Some(door) => {
                if door.open != open {
                    tracing::debug!(door = id.0, open, "door state changed");
                }
                door.open = open;
                true
            }
            None => false,
        }
    }

    /// See [`NavGraph::set_trigger_active`].
    pub fn set_trigger_active(&mut self, trigger: TriggerId, active: bool) {
        self.graph.set_trigger_active(trigger, active);
    }

    /// Remove every normal edge that passes through a wall. Door edges are kept; closed doors
    /// are handled at traversal time. Returns how many edges were removed.
    pub fn prune_blocked_edges(&mut self, radius: f32) -> usize {
        let blocked: Vec<(usize, usize)> = self
            .graph
            .edges()
            .filter(|e| e.door.is_none())
            .filter_map(|e| {
                let from = self.graph.position(e.from)?;
                let to = self.graph.position(e.to)?;
                self.walls
                    .iter()
                    .any(|w| segment_distance(from, to, w.from, w.to) < radius)
                    .then_some((e.from, e.to))
            })
            .collect();

        let mut removed = 0;
        for (from, to) in blocked {
            if self.graph.remove_edge(from, to).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "pruned graph edges crossing walls");
        }
        removed
    }

    /// Position of a uniformly chosen active node.
    pub fn random_node_position(&self, rng: &mut impl DeterministicRng) -> Option<Vec2> {
        let count = self.graph.active_node_count();
        if count == 0 {
            return None;
        }
        self.graph
            .nth_active_node(rng.next_index(count))
            .map(|n| n.position)
    }
}

impl MapQuery for NavMap {
    fn graph(&self) -> &NavGraph {
        &self.graph
    }

    fn is_path_obstructed(&self, from: Vec2, to: Vec2, radius: f32) -> bool {
        let touches = |w: &Wall| segment_distance(from, to, w.from, w.to) < radius;
        self.walls.iter().any(touches)
            || self
                .doors
                .values()
                .filter(|d| !d.open)
                .any(|d| touches(&d.segment))
    }

    fn nodes_near(&self, position: Vec2, range: f32) -> Vec<usize> {
        self.cells
            .neighbors(position, range)
            .into_iter()
            .map(|(_, node)| node)
            .filter(|&node| self.graph.is_node_present(node))
            .collect()
    }

    fn node_search_range(&self) -> f32 {
        self.search_range
    }
}
