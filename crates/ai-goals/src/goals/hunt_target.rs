use ai_core::TickContext;

use super::{Explore, MoveToPosition};
use crate::{BotWorld, Goal, GoalKind, GoalStatus, Message, Subgoals};

/// Go to where the target was last seen; explore if that spot has already been checked.
/// Completes as soon as the target is back in view.
pub struct HuntTarget<W>
where
    W: BotWorld + 'static,
{
    status: GoalStatus,
    subgoals: Subgoals<W>,
    visited_last_position: bool,
}

impl<W> HuntTarget<W>
where
    W: BotWorld + 'static,
{
    pub fn new() -> Self {
        Self {
            status: GoalStatus::Inactive,
            subgoals: Subgoals::new(),
            visited_last_position: false,
        }
    }
}

impl<W> Default for HuntTarget<W>
where
    W: BotWorld + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Goal<W> for HuntTarget<W>
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::HuntTarget
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        self.subgoals.clear(agent, world);

        if !world.is_target_present(agent) {
            self.status = GoalStatus::Completed;
            return;
        }

        let last_seen = world
            .last_recorded_target_position(agent)
            .filter(|&pos| !self.visited_last_position && !world.is_at_position(agent, pos));
        match last_seen {
            Some(pos) => {
                self.visited_last_position = true;
                self.subgoals.push_front(Box::new(MoveToPosition::new(pos)));
            }
            None => self.subgoals.push_front(Box::new(Explore::new())),
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
        if world.is_target_within_fov(agent) {
            self.status = GoalStatus::Completed;
        } else if self.status == GoalStatus::Completed {
            // Reached the last sighting without spotting the target: keep looking.
            self.status = GoalStatus::Inactive;
        }
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
