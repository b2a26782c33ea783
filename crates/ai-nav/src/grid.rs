//! Occupancy grid that bakes into a [`NavGraph`].

use crate::{GraphEdge, GraphError, NavGraph, NodeExtra, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Cell {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone)]
pub struct NavGrid {
    width: i32,
    height: i32,
    cell_size: f32,
    blocked: Vec<bool>,
}

impl NavGrid {
    pub fn new(width: u32, height: u32, cell_size: f32) -> Result<Self, GraphError> {
        if width == 0 || height == 0 || cell_size <= 0.0 || !cell_size.is_finite() {
            return Err(GraphError::InvalidGrid);
        }
        let width = width as i32;
        let height = height as i32;
        Ok(Self {
            width,
            height,
            cell_size,
            blocked: vec![false; (width * height) as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn set_blocked(&mut self, x: i32, y: i32, blocked: bool) {
        if let Some(idx) = self.idx(Cell { x, y }) {
            self.blocked[idx] = blocked;
        }
    }

    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.idx(Cell { x, y })
            .map(|idx| self.blocked[idx])
            .unwrap_or(true)
    }

    /// Cell containing `p`, if inside the grid.
    pub fn world_to_cell(&self, p: Vec2) -> Option<(i32, i32)> {
        let cell = Cell {
            x: (p.x / self.cell_size).floor() as i32,
            y: (p.y / self.cell_size).floor() as i32,
        };
        self.in_bounds(cell).then_some((cell.x, cell.y))
    }

    pub fn cell_center(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) * self.cell_size,
            (y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Graph node baked for cell `(x, y)` by [`NavGrid::build_graph`].
    pub fn node_index(&self, x: i32, y: i32) -> Option<usize> {
        let idx = self.idx(Cell { x, y })?;
        if self.blocked[idx] {
            return None;
        }
        Some(self.blocked[..idx].iter().filter(|b| !**b).count())
    }

    /// One node per open cell centre (row-major), linked to its eight neighbours by
    /// straight-line cost. Diagonals that would clip a blocked corner are skipped.
    pub fn build_graph(&self) -> NavGraph {
        let mut graph = NavGraph::new_undirected();
        let mut nodes = vec![None; self.blocked.len()];

        for y in 0..self.height {
            for x in 0..self.width {
                let cell = Cell { x, y };
                let Some(idx) = self.idx(cell) else { continue };
                if !self.blocked[idx] {
                    nodes[idx] = Some(graph.add_node(self.cell_center(x, y), NodeExtra::None));
                }
            }
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let cell = Cell { x, y };
                let Some(from) = self.idx(cell).and_then(|i| nodes[i]) else {
                    continue;
                };
                // Fixed order for determinism: E, SE, S, SW. The mirrored half comes from
                // the undirected graph.
                for (dx, dy) in [(1, 0), (1, 1), (0, 1), (-1, 1)] {
                    let n = Cell {
                        x: x + dx,
                        y: y + dy,
                    };
                    let Some(to) = self.idx(n).and_then(|i| nodes[i]) else {
                        continue;
                    };
                    if dx != 0 && dy != 0 && (self.is_blocked(x + dx, y) || self.is_blocked(x, y + dy))
                    {
                        continue;
                    }
                    let cost = self.cell_size * ((dx * dx + dy * dy) as f32).sqrt();
                    // Both endpoints were just added, so this cannot fail.
                    let _ = graph.add_edge(GraphEdge::new(from, to, cost));
                }
            }
        }

        graph
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some((cell.y * self.width + cell.x) as usize)
    }
}
