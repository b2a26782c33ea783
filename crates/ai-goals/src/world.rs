use ai_core::WorldMut;
use ai_nav::{DoorId, Path, TriggerId, Vec2};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Pickup categories an agent can path to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ItemKind {
    Health,
    Shotgun,
    RocketLauncher,
    Railgun,
}

impl ItemKind {
    pub const WEAPONS: [ItemKind; 3] = [
        ItemKind::Shotgun,
        ItemKind::RocketLauncher,
        ItemKind::Railgun,
    ];

    pub fn is_weapon(self) -> bool {
        !matches!(self, ItemKind::Health)
    }
}

/// Everything the goal tree needs from the simulation, keyed by agent.
///
/// Steering, perception and the path planner are collaborators behind this trait; goals only
/// switch behaviours on and off and read results.
pub trait BotWorld: WorldMut {
    // Agent state.
    fn position(&self, agent: Self::Agent) -> Vec2;
    fn max_speed(&self, agent: Self::Agent) -> f32;
    fn health(&self, agent: Self::Agent) -> f32;
    fn max_health(&self, agent: Self::Agent) -> f32;
    fn bounding_radius(&self, agent: Self::Agent) -> f32;
    /// Ammo held for `weapon`, normalised to `[0, 1]`.
    fn weapon_strength(&self, agent: Self::Agent, weapon: ItemKind) -> f32;

    // Steering.
    fn set_steering_target(&mut self, agent: Self::Agent, target: Vec2);
    fn seek_on(&mut self, agent: Self::Agent);
    fn seek_off(&mut self, agent: Self::Agent);
    fn arrive_on(&mut self, agent: Self::Agent);
    fn arrive_off(&mut self, agent: Self::Agent);
    fn wander_on(&mut self, agent: Self::Agent);
    fn wander_off(&mut self, agent: Self::Agent);
    /// Scale applied to max speed (slow edges such as swimming).
    fn set_speed_factor(&mut self, agent: Self::Agent, factor: f32);

    // Perception.
    fn is_target_present(&self, agent: Self::Agent) -> bool;
    fn is_target_shootable(&self, agent: Self::Agent) -> bool;
    fn is_target_within_fov(&self, agent: Self::Agent) -> bool;
    fn target_position(&self, agent: Self::Agent) -> Option<Vec2>;
    fn last_recorded_target_position(&self, agent: Self::Agent) -> Option<Vec2>;
    /// Strafe destination to the left, if there is room.
    fn can_step_left(&self, agent: Self::Agent) -> Option<Vec2>;
    fn can_step_right(&self, agent: Self::Agent) -> Option<Vec2>;
    fn has_line_of_sight(&self, agent: Self::Agent, to: Vec2) -> bool;

    // Path planner. Outcomes of accepted requests arrive later as messages.
    fn request_path_to_position(&mut self, agent: Self::Agent, target: Vec2) -> bool;
    fn request_path_to_item(&mut self, agent: Self::Agent, item: ItemKind) -> bool;
    fn take_path(&mut self, agent: Self::Agent) -> Option<Path>;
    fn cost_to_closest_item(&self, agent: Self::Agent, item: ItemKind) -> Option<f32>;
    fn is_item_active(&self, trigger: TriggerId) -> bool;
    /// `agent` took the item on `trigger` and it has not respawned since.
    fn has_picked_up(&self, agent: Self::Agent, trigger: TriggerId) -> bool;
    fn item_position(&self, trigger: TriggerId) -> Option<Vec2>;

    // Map.
    fn can_walk_to(&self, agent: Self::Agent, target: Vec2) -> bool;
    fn can_walk_between(&self, agent: Self::Agent, from: Vec2, to: Vec2) -> bool;
    fn random_node_position(&mut self, agent: Self::Agent) -> Option<Vec2>;
    /// Closest switch that opens `door`.
    fn door_switch_position(&self, agent: Self::Agent, door: DoorId) -> Option<Vec2>;
    /// A spot out of the current target's line of sight.
    fn cover_position(&self, agent: Self::Agent) -> Option<Vec2>;

    /// Within the agent's bounding radius of `position`, so the next leg starts close to the
    /// node it was planned from.
    fn is_at_position(&self, agent: Self::Agent, position: Vec2) -> bool {
        const MIN_TOLERANCE: f32 = 1.0;
        let tolerance = self.bounding_radius(agent).max(MIN_TOLERANCE);
        self.position(agent).distance_squared(position) < tolerance * tolerance
    }
}
