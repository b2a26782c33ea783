//! Concrete goals.

mod attack_target;
mod dodge_side_to_side;
mod explore;
mod follow_path;
mod get_item;
mod hide;
mod hunt_target;
mod move_to_position;
mod negotiate_door;
mod seek_to_position;
mod think;
mod traverse_edge;
mod wander;

pub use attack_target::AttackTarget;
pub use dodge_side_to_side::DodgeSideToSide;
pub use explore::Explore;
pub use follow_path::FollowPath;
pub use get_item::GetItem;
pub use hide::Hide;
pub use hunt_target::HuntTarget;
pub use move_to_position::MoveToPosition;
pub use negotiate_door::NegotiateDoor;
pub use seek_to_position::SeekToPosition;
pub use think::Think;
pub use traverse_edge::TraverseEdge;
pub use wander::Wander;

use ai_core::TickContext;

/// Deadline bookkeeping for movement goals: fail once travel takes longer than expected plus a
/// fixed margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct TravelTimer {
    started_at: f64,
    expected: f64,
}

impl TravelTimer {
    pub(crate) fn start(ctx: &TickContext, distance: f32, speed: f32, margin: f64) -> Self {
        let travel = if speed > 0.0 {
            f64::from(distance / speed)
        } else {
            f64::INFINITY
        };
        Self {
            started_at: ctx.time_seconds(),
            expected: travel + margin,
        }
    }

    pub(crate) fn is_stuck(&self, ctx: &TickContext) -> bool {
        ctx.time_seconds() - self.started_at > self.expected
    }
}
