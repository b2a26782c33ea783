use ai_core::TickContext;
use ai_nav::Vec2;

use super::FollowPath;
use crate::{BotWorld, Goal, GoalKind, GoalStatus, Message, RetryPolicy, Subgoals};

/// Plan a path to a position and follow it. Re-plans after getting stuck; gives up only when
/// no path exists.
pub struct MoveToPosition<W>
where
    W: BotWorld + 'static,
{
    destination: Vec2,
    status: GoalStatus,
    subgoals: Subgoals<W>,
    awaiting_path: bool,
    unreachable: bool,
}

impl<W> MoveToPosition<W>
where
    W: BotWorld + 'static,
{
    pub fn new(destination: Vec2) -> Self {
        Self {
            destination,
            status: GoalStatus::Inactive,
            subgoals: Subgoals::new(),
            awaiting_path: false,
            unreachable: false,
        }
    }

    pub fn destination(&self) -> Vec2 {
        self.destination
    }

    fn settle(&mut self, status: GoalStatus) -> GoalStatus {
        self.status = self.retry_policy().apply(status, self.unreachable);
        self.status
    }
}

impl<W> Goal<W> for MoveToPosition<W>
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::MoveToPosition
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        self.unreachable = false;
        self.subgoals.clear(agent, world);

        self.awaiting_path = world.request_path_to_position(agent, self.destination);
        if !self.awaiting_path {
            self.unreachable = true;
            self.status = GoalStatus::Failed;
        }
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
        }
        if self.status.is_finished() {
            return self.status;
        }
        if self.awaiting_path && self.subgoals.is_empty() {
            return self.status;
        }
        let status = self.subgoals.process(ctx, agent, world);
        self.settle(status)
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
        if self.subgoals.forward_message(ctx, agent, world, message) {
            return true;
        }
        match message {
            Message::PathReady { .. } if self.awaiting_path => {
                self.awaiting_path = false;
                self.subgoals.clear(agent, world);
                match world.take_path(agent) {
                    Some(path) => self.subgoals.push_front(Box::new(FollowPath::new(path))),
                    None => self.status = GoalStatus::Failed,
                }
                true
            }
            Message::NoPathAvailable { .. } if self.awaiting_path => {
                tracing::debug!(?agent, destination = ?self.destination, "destination unreachable");
                self.awaiting_path = false;
                self.unreachable = true;
                self.status = GoalStatus::Failed;
                true
            }
            _ => false,
        }
    }

    fn subgoals(&self) -> Option<&Subgoals<W>> {
        Some(&self.subgoals)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::Reactivate
    }
}
