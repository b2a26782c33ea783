#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use ai_core::{TickContext, WorldMut, WorldView};
use ai_goals::{BotWorld, ItemKind};
use ai_nav::{DoorId, Path, PathEdge, TriggerId, Vec2};

pub const BOT: u32 = 1;

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1, 42)
}

/// Single-bot world whose collaborators are plain fields tests poke directly.
#[derive(Debug)]
pub struct StubWorld {
    pub position: Vec2,
    pub max_speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub weapons: BTreeMap<ItemKind, f32>,

    pub steering_target: Option<Vec2>,
    pub seek: bool,
    pub arrive: bool,
    pub wander: bool,
    pub speed_factor: f32,
    pub steering_log: Vec<&'static str>,

    pub target_present: bool,
    pub target_shootable: bool,
    pub target_in_fov: bool,
    pub target_position: Option<Vec2>,
    pub last_seen: Option<Vec2>,
    pub step_left: Option<Vec2>,
    pub step_right: Option<Vec2>,
    pub line_of_sight: bool,

    pub accept_requests: bool,
    pub position_requests: Vec<Vec2>,
    pub item_requests: Vec<ItemKind>,
    pub next_path: Option<Path>,
    pub item_costs: BTreeMap<ItemKind, f32>,
    pub active_items: BTreeSet<TriggerId>,
    pub item_positions: BTreeMap<TriggerId, Vec2>,
    pub picked_up: BTreeSet<TriggerId>,

    pub random_node: Option<Vec2>,
    pub door_switch: Option<Vec2>,
    pub cover: Option<Vec2>,
}

impl Default for StubWorld {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            max_speed: 100.0,
            health: 100.0,
            max_health: 100.0,
            weapons: BTreeMap::new(),
            steering_target: None,
            seek: false,
            arrive: false,
            wander: false,
            speed_factor: 1.0,
            steering_log: Vec::new(),
            target_present: false,
            target_shootable: false,
            target_in_fov: false,
            target_position: None,
            last_seen: None,
            step_left: None,
            step_right: None,
            line_of_sight: true,
            accept_requests: true,
            position_requests: Vec::new(),
            item_requests: Vec::new(),
            next_path: None,
            item_costs: BTreeMap::new(),
            active_items: BTreeSet::new(),
            item_positions: BTreeMap::new(),
            picked_up: BTreeSet::new(),
            random_node: Some(Vec2::new(300.0, 0.0)),
            door_switch: None,
            cover: None,
        }
    }
}

pub fn straight_path(points: &[Vec2]) -> Path {
    points
        .windows(2)
        .map(|w| PathEdge::new(w[0], w[1]))
        .collect()
}

impl WorldView for StubWorld {
    type Agent = u32;
}

impl WorldMut for StubWorld {}

impl BotWorld for StubWorld {
    fn position(&self, _agent: u32) -> Vec2 {
        self.position
    }

    fn max_speed(&self, _agent: u32) -> f32 {
        self.max_speed
    }

    fn health(&self, _agent: u32) -> f32 {
        self.health
    }

    fn max_health(&self, _agent: u32) -> f32 {
        self.max_health
    }

    fn bounding_radius(&self, _agent: u32) -> f32 {
        5.0
    }

    fn weapon_strength(&self, _agent: u32, weapon: ItemKind) -> f32 {
        self.weapons.get(&weapon).copied().unwrap_or(0.0)
    }

    fn set_steering_target(&mut self, _agent: u32, target: Vec2) {
        self.steering_target = Some(target);
    }

    fn seek_on(&mut self, _agent: u32) {
        self.seek = true;
        self.steering_log.push("seek_on");
    }

    fn seek_off(&mut self, _agent: u32) {
        self.seek = false;
        self.steering_log.push("seek_off");
    }

    fn arrive_on(&mut self, _agent: u32) {
        self.arrive = true;
        self.steering_log.push("arrive_on");
    }

    fn arrive_off(&mut self, _agent: u32) {
        self.arrive = false;
        self.steering_log.push("arrive_off");
    }

    fn wander_on(&mut self, _agent: u32) {
        self.wander = true;
        self.steering_log.push("wander_on");
    }

    fn wander_off(&mut self, _agent: u32) {
        self.wander = false;
        self.steering_log.push("wander_off");
    }

    fn set_speed_factor(&mut self, _agent: u32, factor: f32) {
        self.speed_factor = factor;
    }

    fn is_target_present(&self, _agent: u32) -> bool {
        self.target_present
    }

    fn is_target_shootable(&self, _agent: u32) -> bool {
        self.target_shootable
    }

    fn is_target_within_fov(&self, _agent: u32) -> bool {
        self.target_in_fov
    }

    fn target_position(&self, _agent: u32) -> Option<Vec2> {
        self.target_position
    }

    fn last_recorded_target_position(&self, _agent: u32) -> Option<Vec2> {
        self.last_seen
    }

    fn can_step_left(&self, _agent: u32) -> Option<Vec2> {
        self.step_left
    }

    fn can_step_right(&self, _agent: u32) -> Option<Vec2> {
        self.step_right
    }

    fn has_line_of_sight(&self, _agent: u32, _to: Vec2) -> bool {
        self.line_of_sight
    }

    fn request_path_to_position(&mut self, _agent: u32, target: Vec2) -> bool {
        self.position_requests.push(target);
        self.accept_requests
    }

    fn request_path_to_item(&mut self, _agent: u32, item: ItemKind) -> bool {
        self.item_requests.push(item);
        self.accept_requests
    }

    fn take_path(&mut self, _agent: u32) -> Option<Path> {
        self.next_path.take()
    }

    fn cost_to_closest_item(&self, _agent: u32, item: ItemKind) -> Option<f32> {
        self.item_costs.get(&item).copied()
    }

    fn is_item_active(&self, trigger: TriggerId) -> bool {
        self.active_items.contains(&trigger)
    }

    fn has_picked_up(&self, _agent: u32, trigger: TriggerId) -> bool {
        self.picked_up.contains(&trigger)
    }

    fn item_position(&self, trigger: TriggerId) -> Option<Vec2> {
        self.item_positions.get(&trigger).copied()
    }

    fn can_walk_to(&self, _agent: u32, _target: Vec2) -> bool {
        true
    }

    fn can_walk_between(&self, _agent: u32, _from: Vec2, _to: Vec2) -> bool {
        true
    }

    fn random_node_position(&mut self, _agent: u32) -> Option<Vec2> {
        self.random_node
    }

    fn door_switch_position(&self, _agent: u32, _door: DoorId) -> Option<Vec2> {
        self.door_switch
    }

    fn cover_position(&self, _agent: u32) -> Option<Vec2> {
        self.cover
    }
}
