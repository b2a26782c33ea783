//! Normalised inputs for the evaluators. Every feature lies in `[0, 1]`.

use ai_utility::clamp01;

use crate::{BotWorld, ItemKind};

/// Path cost treated as "as far away as it gets".
pub const MAX_DISTANCE: f32 = 500.0;

pub fn health<W: BotWorld>(world: &W, agent: W::Agent) -> f32 {
    let max = world.max_health(agent);
    if max <= 0.0 {
        return 0.0;
    }
    clamp01(world.health(agent) / max)
}

/// Path cost to the nearest active item of `kind` over [`MAX_DISTANCE`]. `None` when no such
/// item is active or reachable.
pub fn distance_to_item<W: BotWorld>(world: &W, agent: W::Agent, kind: ItemKind) -> Option<f32> {
    world
        .cost_to_closest_item(agent, kind)
        .map(|cost| clamp01(cost / MAX_DISTANCE))
}

pub fn weapon_strength<W: BotWorld>(world: &W, agent: W::Agent, kind: ItemKind) -> f32 {
    clamp01(world.weapon_strength(agent, kind))
}

/// Mean strength over every carried weapon type.
pub fn total_weapon_strength<W: BotWorld>(world: &W, agent: W::Agent) -> f32 {
    let sum: f32 = ItemKind::WEAPONS
        .iter()
        .map(|&kind| weapon_strength(world, agent, kind))
        .sum();
    clamp01(sum / ItemKind::WEAPONS.len() as f32)
}
