//! Stand-in for sensory memory and target selection: the closest visible bot is the target,
//! and an unseen target is remembered for a while at its last sighting.

use ai_nav::{MapQuery, Vec2};

use crate::CombatConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Senses {
    pub target: Option<u32>,
    /// Target is in line of sight this tick.
    pub visible: bool,
    pub within_fov: bool,
    pub shootable: bool,
    pub target_position: Option<Vec2>,
    pub last_seen: Option<Vec2>,
    pub last_seen_tick: u64,
}

impl Senses {
    pub fn forget(&mut self) {
        *self = Senses::default();
    }
}

/// What one observer sees this tick.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub id: u32,
    pub position: Vec2,
    pub heading: Vec2,
}

pub fn has_line_of_sight(map: &(impl MapQuery + ?Sized), from: Vec2, to: Vec2) -> bool {
    !map.is_path_obstructed(from, to, f32::EPSILON)
}

/// `true` if `offset` lies within the cone of `fov_degrees` around `heading`. Bots with no
/// heading yet see all around.
pub fn within_fov(heading: Vec2, offset: Vec2, fov_degrees: f32) -> bool {
    let heading = heading.normalize_or_zero();
    let offset = offset.normalize_or_zero();
    if heading.is_zero() || offset.is_zero() {
        return true;
    }
    let half = (fov_degrees.clamp(0.0, 360.0) * 0.5).to_radians();
    heading.dot(offset) >= half.cos()
}

/// Update `senses` for `observer` given everyone's positions.
pub fn refresh(
    map: &(impl MapQuery + ?Sized),
    observer: Observer,
    others: &[(u32, Vec2)],
    senses: &mut Senses,
    tick: u64,
    memory_ticks: u64,
    combat: &CombatConfig,
) {
    let closest = others
        .iter()
        .filter(|(id, _)| *id != observer.id)
        .filter(|(_, pos)| pos.distance(observer.position) <= combat.view_distance)
        .filter(|(_, pos)| has_line_of_sight(map, observer.position, *pos))
        .min_by(|a, b| {
            a.1.distance_squared(observer.position)
                .total_cmp(&b.1.distance_squared(observer.position))
        });

    match closest {
        Some(&(id, pos)) => {
            let offset = pos - observer.position;
            let within_fov = within_fov(observer.heading, offset, combat.fov_degrees);
            if senses.target != Some(id) {
                tracing::trace!(observer = observer.id, target = id, "new target");
            }
            *senses = Senses {
                target: Some(id),
                visible: true,
                within_fov,
                shootable: within_fov && offset.length() <= combat.shooting_range,
                target_position: Some(pos),
                last_seen: Some(pos),
                last_seen_tick: tick,
            };
        }
        None => {
            senses.visible = false;
            senses.within_fov = false;
            senses.shootable = false;
            senses.target_position = None;
            if tick.saturating_sub(senses.last_seen_tick) > memory_ticks {
                senses.forget();
            }
        }
    }
}
