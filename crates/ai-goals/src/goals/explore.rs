use ai_core::TickContext;
use ai_nav::Vec2;

use super::FollowPath;
use crate::{BotWorld, Goal, GoalKind, GoalStatus, Message, Subgoals};

/// Walk to a random graph node.
pub struct Explore<W>
where
    W: BotWorld + 'static,
{
    status: GoalStatus,
    subgoals: Subgoals<W>,
    destination: Option<Vec2>,
    awaiting_path: bool,
}

impl<W> Explore<W>
where
    W: BotWorld + 'static,
{
    pub fn new() -> Self {
        Self {
            status: GoalStatus::Inactive,
            subgoals: Subgoals::new(),
            destination: None,
            awaiting_path: false,
        }
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }
}

impl<W> Default for Explore<W>
where
    W: BotWorld + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Goal<W> for Explore<W>
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::Explore
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        self.subgoals.clear(agent, world);

        if self.destination.is_none() {
            self.destination = world.random_node_position(agent);
        }
        let Some(destination) = self.destination else {
            self.status = GoalStatus::Failed;
            return;
        };

        self.awaiting_path = world.request_path_to_position(agent, destination);
        if !self.awaiting_path {
            self.status = GoalStatus::Failed;
        }
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
        }
        if self.status.is_finished() || (self.awaiting_path && self.subgoals.is_empty()) {
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
                self.awaiting_path = false;
                self.status = GoalStatus::Failed;
                true
            }
            _ => false,
        }
    }

    fn subgoals(&self) -> Option<&Subgoals<W>> {
        Some(&self.subgoals)
    }
}
