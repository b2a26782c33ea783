use ai_core::TickContext;

use super::MoveToPosition;
use crate::{BotWorld, Goal, GoalKind, GoalStatus, Message, Subgoals};

/// Move somewhere the target cannot see.
pub struct Hide<W>
where
    W: BotWorld + 'static,
{
    status: GoalStatus,
    subgoals: Subgoals<W>,
}

impl<W> Hide<W>
where
    W: BotWorld + 'static,
{
    pub fn new() -> Self {
        Self {
            status: GoalStatus::Inactive,
            subgoals: Subgoals::new(),
        }
    }
}

impl<W> Default for Hide<W>
where
    W: BotWorld + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Goal<W> for Hide<W>
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::Hide
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        self.subgoals.clear(agent, world);

        match world.cover_position(agent) {
            Some(cover) => self.subgoals.push_front(Box::new(MoveToPosition::new(cover))),
            None => self.status = GoalStatus::Failed,
        }
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
        }
        if self.status.is_finished() {
            return self.status;
        }
        self.status = self.subgoals.process(ctx, agent, world);
        self.status
    }

    fn terminate(&mut self, agent: W::Agent, world: &mut W) {
        self.subgoals.clear(agent, world);
    }

    fn handle_message(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        message: &Message,
    ) -> bool {
        self.subgoals.forward_message(ctx, agent, world, message)
    }

    fn subgoals(&self) -> Option<&Subgoals<W>> {
        Some(&self.subgoals)
    }
}
