use ai_core::TickContext;

use crate::{BotWorld, Goal, GoalKind, GoalStatus};

/// Wander until terminated. Never completes on its own.
#[derive(Debug, Clone, Default)]
pub struct Wander {
    status: GoalStatus,
}

impl Wander {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W> Goal<W> for Wander
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::Wander
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        world.wander_on(agent);
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
        }
        self.status
    }

    fn terminate(&mut self, agent: W::Agent, world: &mut W) {
        world.wander_off(agent);
    }
}
