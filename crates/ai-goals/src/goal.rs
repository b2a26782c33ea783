use ai_core::{TickContext, WorldMut};
use strum::{Display, IntoStaticStr};

use crate::{Message, Subgoals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GoalStatus {
    #[default]
    Inactive,
    Active,
    Completed,
    Failed,
}

impl GoalStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, GoalStatus::Completed | GoalStatus::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum GoalKind {
    Think,
    Explore,
    GetHealth,
    GetShotgun,
    GetRocketLauncher,
    GetRailgun,
    AttackTarget,
    HuntTarget,
    Hide,
    MoveToPosition,
    SeekToPosition,
    FollowPath,
    TraverseEdge,
    NegotiateDoor,
    Wander,
    DodgeSideToSide,
}

/// What a goal does with a failure it did not cause by being unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Report `Failed` to the parent.
    #[default]
    Propagate,
    /// Drop back to `Inactive` so the next `process` re-plans from scratch.
    Reactivate,
}

impl RetryPolicy {
    /// `unreachable` failures (no path exists) always propagate; retrying cannot fix them.
    pub fn apply(self, status: GoalStatus, unreachable: bool) -> GoalStatus {
        match (self, status) {
            (RetryPolicy::Reactivate, GoalStatus::Failed) if !unreachable => GoalStatus::Inactive,
            _ => status,
        }
    }
}

/// One intention in an agent's goal tree.
///
/// Status starts `Inactive`; `process` activates lazily. `terminate` must undo anything the goal
/// switched on (steering behaviours, speed changes) and is called whenever the goal is dropped,
/// finished or not.
pub trait Goal<W>: 'static
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> GoalKind;

    fn status(&self) -> GoalStatus;

    fn activate(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W);

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus;

    fn terminate(&mut self, agent: W::Agent, world: &mut W);

    /// Returns `true` if the message was consumed.
    fn handle_message(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _message: &Message,
    ) -> bool {
        false
    }

    /// Children of composite goals, for inspection.
    fn subgoals(&self) -> Option<&Subgoals<W>> {
        None
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::Propagate
    }
}

/// Kinds along the chain of front goals, starting at `goal`.
pub fn active_chain<W>(goal: &dyn Goal<W>) -> Vec<GoalKind>
where
    W: WorldMut + 'static,
{
    let mut chain = vec![goal.kind()];
    let mut current = goal.subgoals().and_then(Subgoals::front);
    while let Some(goal) = current {
        chain.push(goal.kind());
        current = goal.subgoals().and_then(Subgoals::front);
    }
    chain
}
