use ai_core::TickContext;
use ai_nav::Vec2;

use super::TravelTimer;
use crate::{BotWorld, Goal, GoalKind, GoalStatus};

/// Head straight for a position with the seek behaviour.
#[derive(Debug, Clone)]
pub struct SeekToPosition {
    position: Vec2,
    status: GoalStatus,
    timer: TravelTimer,
}

impl SeekToPosition {
    const MARGIN_SECONDS: f64 = 1.0;

    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            status: GoalStatus::Inactive,
            timer: TravelTimer::default(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}

impl<W> Goal<W> for SeekToPosition
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::SeekToPosition
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        let distance = world.position(agent).distance(self.position);
        self.timer = TravelTimer::start(ctx, distance, world.max_speed(agent), Self::MARGIN_SECONDS);
        world.set_steering_target(agent, self.position);
        world.seek_on(agent);
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
        }
        if self.status == GoalStatus::Active {
            if self.timer.is_stuck(ctx) {
                tracing::debug!(?agent, target = ?self.position, "stuck while seeking");
                self.status = GoalStatus::Failed;
            } else if world.is_at_position(agent, self.position) {
                self.status = GoalStatus::Completed;
            }
        }
        self.status
    }

    fn terminate(&mut self, agent: W::Agent, world: &mut W) {
        world.seek_off(agent);
        world.arrive_off(agent);
    }
}
