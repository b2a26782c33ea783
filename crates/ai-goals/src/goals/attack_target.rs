use ai_core::TickContext;

use super::{DodgeSideToSide, HuntTarget, SeekToPosition};
use crate::{BotWorld, Goal, GoalKind, GoalStatus, Message, RetryPolicy, Subgoals};

/// Engage the current target: strafe if it is shootable and there is room, close in if not,
/// hunt it down when it is out of sight.
pub struct AttackTarget<W>
where
    W: BotWorld + 'static,
{
    status: GoalStatus,
    subgoals: Subgoals<W>,
}

impl<W> AttackTarget<W>
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

impl<W> Default for AttackTarget<W>
where
    W: BotWorld + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Goal<W> for AttackTarget<W>
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::AttackTarget
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

        if world.is_target_shootable(agent) {
            let can_dodge =
                world.can_step_left(agent).is_some() || world.can_step_right(agent).is_some();
            if can_dodge {
                self.subgoals.push_front(Box::new(DodgeSideToSide::new()));
            } else if let Some(target) = world.target_position(agent) {
                self.subgoals.push_front(Box::new(SeekToPosition::new(target)));
            }
        } else {
            self.subgoals.push_front(Box::new(HuntTarget::new()));
        }
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
        }
        if self.status.is_finished() {
            return self.status;
        }
        let status = self.subgoals.process(ctx, agent, world);
        self.status = self.retry_policy().apply(status, false);
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

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::Reactivate
    }
}
