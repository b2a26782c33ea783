//! Uniform-cell spatial index used to find graph nodes near a position.

use std::collections::BTreeMap;

use crate::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Cell(i32, i32);

/// Buckets of `(position, value)` keyed by cell. `BTreeMap` keeps iteration order stable.
#[derive(Debug, Clone)]
pub struct CellSpace<T> {
    cell_size: f32,
    buckets: BTreeMap<Cell, Vec<(Vec2, T)>>,
}

impl<T: Copy> CellSpace<T> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1e-3),
            buckets: BTreeMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn insert(&mut self, position: Vec2, value: T) {
        let cell = self.cell_for(position);
        self.buckets.entry(cell).or_default().push((position, value));
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every entry within `radius` of `position`, ordered by cell then insertion.
    pub fn neighbors(&self, position: Vec2, radius: f32) -> Vec<(Vec2, T)> {
        let radius = radius.max(0.0);
        let r2 = radius * radius;
        let min = self.cell_for(Vec2::new(position.x - radius, position.y - radius));
        let max = self.cell_for(Vec2::new(position.x + radius, position.y + radius));

        let mut out = Vec::new();
        for y in min.1..=max.1 {
            for x in min.0..=max.0 {
                let Some(bucket) = self.buckets.get(&Cell(x, y)) else {
                    continue;
                };
                out.extend(
                    bucket
                        .iter()
                        .filter(|(p, _)| p.distance_squared(position) <= r2)
                        .copied(),
                );
            }
        }
        out
    }

    fn cell_for(&self, p: Vec2) -> Cell {
        Cell(
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_respect_radius() {
        let mut space = CellSpace::new(10.0);
        space.insert(Vec2::new(1.0, 1.0), 0usize);
        space.insert(Vec2::new(14.0, 1.0), 1);
        space.insert(Vec2::new(40.0, 40.0), 2);

        let found: Vec<usize> = space
            .neighbors(Vec2::new(5.0, 1.0), 10.0)
            .into_iter()
            .map(|(_, v)| v)
            .collect();
        assert_eq!(found, vec![0, 1]);
        assert_eq!(space.len(), 3);
    }
}
