use ai_core::TickContext;
use ai_nav::{EdgeFlags, Path};

use super::{NegotiateDoor, TraverseEdge};
use crate::{BotWorld, Goal, GoalKind, GoalStatus, Message, Subgoals};

/// Consume a path front-first, one edge goal at a time.
pub struct FollowPath<W>
where
    W: BotWorld + 'static,
{
    path: Path,
    status: GoalStatus,
    subgoals: Subgoals<W>,
}

impl<W> FollowPath<W>
where
    W: BotWorld + 'static,
{
    pub fn new(path: Path) -> Self {
        Self {
            path,
            status: GoalStatus::Inactive,
            subgoals: Subgoals::new(),
        }
    }

    /// Edges not yet handed to a child goal.
    pub fn remaining(&self) -> &Path {
        &self.path
    }
}

impl<W> Goal<W> for FollowPath<W>
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::FollowPath
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        self.subgoals.clear(agent, world);

        let Some(edge) = self.path.pop_front() else {
            self.status = GoalStatus::Completed;
            return;
        };
        let last_edge = self.path.is_empty();

        if edge.flags.contains(EdgeFlags::GOES_THROUGH_DOOR) {
            self.subgoals
                .push_front(Box::new(NegotiateDoor::new(edge, last_edge)));
        } else {
            self.subgoals
                .push_front(Box::new(TraverseEdge::new(edge, last_edge)));
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
        if self.status == GoalStatus::Completed && !self.path.is_empty() {
            self.activate(ctx, agent, world);
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
