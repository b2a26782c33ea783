use ai_core::TickContext;
use ai_nav::PathEdge;

use super::{MoveToPosition, TraverseEdge};
use crate::{BotWorld, Goal, GoalKind, GoalStatus, Message, Subgoals};

/// Open a door via its switch, come back to the edge, then go through.
pub struct NegotiateDoor<W>
where
    W: BotWorld + 'static,
{
    edge: PathEdge,
    last_edge: bool,
    status: GoalStatus,
    subgoals: Subgoals<W>,
}

impl<W> NegotiateDoor<W>
where
    W: BotWorld + 'static,
{
    pub fn new(edge: PathEdge, last_edge: bool) -> Self {
        Self {
            edge,
            last_edge,
            status: GoalStatus::Inactive,
            subgoals: Subgoals::new(),
        }
    }
}

impl<W> Goal<W> for NegotiateDoor<W>
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::NegotiateDoor
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        self.subgoals.clear(agent, world);

        // Pushed in reverse: switch first, then the edge source, then the edge itself.
        self.subgoals
            .push_front(Box::new(TraverseEdge::new(self.edge, self.last_edge)));

        let switch = self
            .edge
            .door
            .and_then(|door| world.door_switch_position(agent, door));
        if let Some(switch) = switch {
            self.subgoals
                .push_front(Box::new(MoveToPosition::new(self.edge.source)));
            self.subgoals.push_front(Box::new(MoveToPosition::new(switch)));
        }
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
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
