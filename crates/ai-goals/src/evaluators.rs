//! Desirability scoring for the goals the think goal can install.

use ai_utility::{clamp01, Evaluator};

use crate::features::{distance_to_item, health, total_weapon_strength, weapon_strength};
use crate::goals::{AttackTarget, Explore, GetItem, Hide};
use crate::{BotWorld, Goal, GoalKind, ItemKind};

/// An evaluator that can also build the goal it scores.
pub trait GoalEvaluator<W>: Evaluator<W>
where
    W: BotWorld + 'static,
{
    fn goal_kind(&self) -> GoalKind;

    fn make_goal(&self) -> Box<dyn Goal<W>>;
}

/// Per-agent personality multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biases {
    pub get_health: f32,
    pub explore: f32,
    pub attack_target: f32,
    pub hide: f32,
    pub shotgun: f32,
    pub rocket_launcher: f32,
    pub railgun: f32,
}

impl Default for Biases {
    fn default() -> Self {
        Self {
            get_health: 1.0,
            explore: 1.0,
            attack_target: 1.0,
            hide: 1.0,
            shotgun: 1.0,
            rocket_launcher: 1.0,
            railgun: 1.0,
        }
    }
}

impl Biases {
    pub fn weapon(&self, kind: ItemKind) -> f32 {
        match kind {
            ItemKind::Shotgun => self.shotgun,
            ItemKind::RocketLauncher => self.rocket_launcher,
            ItemKind::Railgun => self.railgun,
            ItemKind::Health => self.get_health,
        }
    }
}

/// The standard evaluator set, in arbitration (tie-break) order.
pub fn default_evaluators<W>(biases: Biases) -> Vec<Box<dyn GoalEvaluator<W>>>
where
    W: BotWorld + 'static,
{
    vec![
        Box::new(GetHealthEvaluator::new(biases.get_health)),
        Box::new(ExploreEvaluator::new(biases.explore)),
        Box::new(AttackTargetEvaluator::new(biases.attack_target)),
        Box::new(HideEvaluator::new(biases.hide)),
        Box::new(GetWeaponEvaluator::new(ItemKind::Shotgun, biases.shotgun)),
        Box::new(GetWeaponEvaluator::new(
            ItemKind::RocketLauncher,
            biases.rocket_launcher,
        )),
        Box::new(GetWeaponEvaluator::new(ItemKind::Railgun, biases.railgun)),
    ]
}

fn item_goal_kind(kind: ItemKind) -> GoalKind {
    match kind {
        ItemKind::Health => GoalKind::GetHealth,
        ItemKind::Shotgun => GoalKind::GetShotgun,
        ItemKind::RocketLauncher => GoalKind::GetRocketLauncher,
        ItemKind::Railgun => GoalKind::GetRailgun,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetHealthEvaluator {
    bias: f32,
}

impl GetHealthEvaluator {
    const TWEAKER: f32 = 0.2;

    pub fn new(bias: f32) -> Self {
        Self { bias }
    }
}

impl<W: BotWorld> Evaluator<W> for GetHealthEvaluator {
    fn bias(&self) -> f32 {
        self.bias
    }

    fn desirability(&self, agent: W::Agent, world: &W) -> f32 {
        let Some(distance) = distance_to_item(world, agent, ItemKind::Health) else {
            return 0.0;
        };
        // Wanted more the lower health is, never zero at full health.
        let need = 1.0 - 0.9 * health(world, agent);
        clamp01(Self::TWEAKER * need / distance.max(f32::EPSILON)) * self.bias
    }
}

impl<W: BotWorld + 'static> GoalEvaluator<W> for GetHealthEvaluator {
    fn goal_kind(&self) -> GoalKind {
        GoalKind::GetHealth
    }

    fn make_goal(&self) -> Box<dyn Goal<W>> {
        Box::new(GetItem::new(ItemKind::Health))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetWeaponEvaluator {
    weapon: ItemKind,
    bias: f32,
}

impl GetWeaponEvaluator {
    const TWEAKER: f32 = 0.15;

    pub fn new(weapon: ItemKind, bias: f32) -> Self {
        Self { weapon, bias }
    }

    pub fn weapon(&self) -> ItemKind {
        self.weapon
    }
}

impl<W: BotWorld> Evaluator<W> for GetWeaponEvaluator {
    fn bias(&self) -> f32 {
        self.bias
    }

    fn desirability(&self, agent: W::Agent, world: &W) -> f32 {
        let Some(distance) = distance_to_item(world, agent, self.weapon) else {
            return 0.0;
        };
        let health = health(world, agent);
        let strength = weapon_strength(world, agent, self.weapon);
        clamp01(Self::TWEAKER * health * (1.0 - strength) / distance.max(f32::EPSILON)) * self.bias
    }
}

impl<W: BotWorld + 'static> GoalEvaluator<W> for GetWeaponEvaluator {
    fn goal_kind(&self) -> GoalKind {
        item_goal_kind(self.weapon)
    }

    fn make_goal(&self) -> Box<dyn Goal<W>> {
        Box::new(GetItem::new(self.weapon))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AttackTargetEvaluator {
    bias: f32,
}

impl AttackTargetEvaluator {
    pub fn new(bias: f32) -> Self {
        Self { bias }
    }
}

impl<W: BotWorld> Evaluator<W> for AttackTargetEvaluator {
    fn bias(&self) -> f32 {
        self.bias
    }

    fn desirability(&self, agent: W::Agent, world: &W) -> f32 {
        if !world.is_target_present(agent) {
            return 0.0;
        }
        let score = health(world, agent) * (0.5 + 0.5 * total_weapon_strength(world, agent));
        clamp01(score) * self.bias
    }
}

impl<W: BotWorld + 'static> GoalEvaluator<W> for AttackTargetEvaluator {
    fn goal_kind(&self) -> GoalKind {
        GoalKind::AttackTarget
    }

    fn make_goal(&self) -> Box<dyn Goal<W>> {
        Box::new(AttackTarget::new())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExploreEvaluator {
    bias: f32,
}

impl ExploreEvaluator {
    const BASE: f32 = 0.05;

    pub fn new(bias: f32) -> Self {
        Self { bias }
    }
}

impl<W: BotWorld> Evaluator<W> for ExploreEvaluator {
    fn bias(&self) -> f32 {
        self.bias
    }

    fn desirability(&self, _agent: W::Agent, _world: &W) -> f32 {
        Self::BASE * self.bias
    }
}

impl<W: BotWorld + 'static> GoalEvaluator<W> for ExploreEvaluator {
    fn goal_kind(&self) -> GoalKind {
        GoalKind::Explore
    }

    fn make_goal(&self) -> Box<dyn Goal<W>> {
        Box::new(Explore::new())
    }
}

/// Break contact when hurt and out-gunned.
#[derive(Debug, Clone, Copy)]
pub struct HideEvaluator {
    bias: f32,
}

impl HideEvaluator {
    const TWEAKER: f32 = 0.6;

    pub fn new(bias: f32) -> Self {
        Self { bias }
    }
}

impl<W: BotWorld> Evaluator<W> for HideEvaluator {
    fn bias(&self) -> f32 {
        self.bias
    }

    fn desirability(&self, agent: W::Agent, world: &W) -> f32 {
        if !world.is_target_present(agent) {
            return 0.0;
        }
        let score = Self::TWEAKER
            * (1.0 - health(world, agent))
            * (1.0 - total_weapon_strength(world, agent));
        clamp01(score) * self.bias
    }
}

impl<W: BotWorld + 'static> GoalEvaluator<W> for HideEvaluator {
    fn goal_kind(&self) -> GoalKind {
        GoalKind::Hide
    }

    fn make_goal(&self) -> Box<dyn Goal<W>> {
        Box::new(Hide::new())
    }
}
