use ai_core::{DeterministicRng, TickContext};
use ai_nav::Vec2;

use crate::{BotWorld, Goal, GoalKind, GoalStatus};

/// Strafe left and right while the target stays in view.
#[derive(Debug, Clone, Default)]
pub struct DodgeSideToSide {
    status: GoalStatus,
    clockwise: Option<bool>,
    strafe_target: Option<Vec2>,
}

impl DodgeSideToSide {
    const RNG_STREAM: u64 = 0x0d0d6e;

    pub fn new() -> Self {
        Self::default()
    }
}

impl<W> Goal<W> for DodgeSideToSide
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::DodgeSideToSide
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        let clockwise = *self
            .clockwise
            .get_or_insert_with(|| ctx.rng_for_agent(agent, Self::RNG_STREAM).next_bool());

        let step = if clockwise {
            world.can_step_right(agent)
        } else {
            world.can_step_left(agent)
        };

        match step {
            Some(target) => {
                self.strafe_target = Some(target);
                world.set_steering_target(agent, target);
                world.seek_on(agent);
            }
            None => {
                // Blocked on this side: try the other one on the next process.
                self.clockwise = Some(!clockwise);
                self.strafe_target = None;
                self.status = GoalStatus::Inactive;
            }
        }
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
        }

        if !world.is_target_within_fov(agent) {
            self.status = GoalStatus::Completed;
        } else if self
            .strafe_target
            .is_some_and(|target| world.is_at_position(agent, target))
        {
            self.clockwise = self.clockwise.map(|c| !c);
            self.status = GoalStatus::Inactive;
        }
        self.status
    }

    fn terminate(&mut self, agent: W::Agent, world: &mut W) {
        world.seek_off(agent);
    }
}
