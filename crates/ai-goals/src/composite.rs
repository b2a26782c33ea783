use std::collections::VecDeque;

use ai_core::{TickContext, WorldMut};

use crate::{Goal, GoalKind, GoalStatus, Message};

/// Child stack of a composite goal. The front child is the one executing.
///
/// Children are pushed to the front, so a plan is added in reverse order.
pub struct Subgoals<W>
where
    W: WorldMut + 'static,
{
    goals: VecDeque<Box<dyn Goal<W>>>,
}

impl<W> Default for Subgoals<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            goals: VecDeque::new(),
        }
    }
}

impl<W> core::fmt::Debug for Subgoals<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

impl<W> Subgoals<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_front(&mut self, goal: Box<dyn Goal<W>>) {
        self.goals.push_front(goal);
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn front(&self) -> Option<&dyn Goal<W>> {
        self.goals.front().map(|g| g.as_ref())
    }

    pub fn front_kind(&self) -> Option<GoalKind> {
        self.goals.front().map(|g| g.kind())
    }

    pub fn kinds(&self) -> Vec<GoalKind> {
        self.goals.iter().map(|g| g.kind()).collect()
    }

    /// Terminate and drop finished children from the front, then process the new front child.
    ///
    /// A completed front child with siblings still queued reports `Active`; an empty stack
    /// reports `Completed`.
    pub fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        while self
            .goals
            .front()
            .is_some_and(|g| g.status().is_finished())
        {
            if let Some(mut finished) = self.goals.pop_front() {
                finished.terminate(agent, world);
            }
        }

        let Some(front) = self.goals.front_mut() else {
            return GoalStatus::Completed;
        };

        let status = front.process(ctx, agent, world);
        if status == GoalStatus::Completed && self.goals.len() > 1 {
            return GoalStatus::Active;
        }
        status
    }

    /// Offer `message` to the front child only.
    pub fn forward_message(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        message: &Message,
    ) -> bool {
        match self.goals.front_mut() {
            Some(front) => front.handle_message(ctx, agent, world, message),
            None => false,
        }
    }

    /// Terminate every child, front first, and empty the stack.
    pub fn clear(&mut self, agent: W::Agent, world: &mut W) {
        while let Some(mut goal) = self.goals.pop_front() {
            goal.terminate(agent, world);
        }
    }
}
