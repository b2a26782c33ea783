//! Path edges handed to movement goals, and the two smoothing passes.

use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DoorId, EdgeFlags, MapQuery, Vec2};

/// One leg of a path in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathEdge {
    pub source: Vec2,
    pub destination: Vec2,
    pub flags: EdgeFlags,
    pub door: Option<DoorId>,
}

impl PathEdge {
    pub fn new(source: Vec2, destination: Vec2) -> Self {
        Self {
            source,
            destination,
            flags: EdgeFlags::NORMAL,
            door: None,
        }
    }

    pub fn is_normal(&self) -> bool {
        self.flags.is_normal()
    }

    pub fn length(&self) -> f32 {
        self.source.distance(self.destination)
    }
}

/// Consumed front-first by the follow-path goal.
pub type Path = VecDeque<PathEdge>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Smoothing {
    None,
    #[default]
    Quick,
    Precise,
}

pub fn smooth(path: &mut Path, map: &(impl MapQuery + ?Sized), radius: f32, smoothing: Smoothing) {
    match smoothing {
        Smoothing::None => {}
        Smoothing::Quick => smooth_quick(path, map, radius),
        Smoothing::Precise => smooth_precise(path, map, radius),
    }
}

/// Single pass over neighbouring edges: an edge absorbs its successor when both are normal and
/// the shortcut is clear.
pub fn smooth_quick(path: &mut Path, map: &(impl MapQuery + ?Sized), radius: f32) {
    let mut i = 0;
    while i + 1 < path.len() {
        let (first, next) = (path[i], path[i + 1]);
        if first.is_normal()
            && next.is_normal()
            && !map.is_path_obstructed(first.source, next.destination, radius)
        {
            path[i].destination = next.destination;
            path.remove(i + 1);
        } else {
            i += 1;
        }
    }
}

/// For every edge, tries every later edge of the same normal run as a shortcut target and
/// collapses the skipped edges. Running it twice yields the same path.
pub fn smooth_precise(path: &mut Path, map: &(impl MapQuery + ?Sized), radius: f32) {
    let mut i = 0;
    while i < path.len() {
        if !path[i].is_normal() {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < path.len() && path[j].is_normal() {
            if map.is_path_obstructed(path[i].source, path[j].destination, radius) {
                j += 1;
                continue;
            }
            path[i].destination = path[j].destination;
            path.drain(i + 1..=j);
            j = i + 1;
        }
        i += 1;
    }
}
