use ai_core::TickContext;
use ai_nav::TriggerId;

use super::FollowPath;
use crate::{BotWorld, Goal, GoalKind, GoalStatus, ItemKind, Message, Subgoals};

/// Path to and pick up the nearest active item of one kind.
pub struct GetItem<W>
where
    W: BotWorld + 'static,
{
    item: ItemKind,
    status: GoalStatus,
    subgoals: Subgoals<W>,
    trigger: Option<TriggerId>,
    awaiting_path: bool,
}

impl<W> GetItem<W>
where
    W: BotWorld + 'static,
{
    pub fn new(item: ItemKind) -> Self {
        Self {
            item,
            status: GoalStatus::Inactive,
            subgoals: Subgoals::new(),
            trigger: None,
            awaiting_path: false,
        }
    }

    pub fn item(&self) -> ItemKind {
        self.item
    }

    /// Trigger the current path leads to, once known.
    pub fn trigger(&self) -> Option<TriggerId> {
        self.trigger
    }

    /// Someone else picked the item up, and we can see that it is gone.
    fn item_was_taken(&self, agent: W::Agent, world: &W) -> bool {
        let Some(trigger) = self.trigger else {
            return false;
        };
        if world.is_item_active(trigger) || world.has_picked_up(agent, trigger) {
            return false;
        }
        world
            .item_position(trigger)
            .is_some_and(|pos| world.has_line_of_sight(agent, pos))
    }
}

impl<W> Goal<W> for GetItem<W>
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        match self.item {
            ItemKind::Health => GoalKind::GetHealth,
            ItemKind::Shotgun => GoalKind::GetShotgun,
            ItemKind::RocketLauncher => GoalKind::GetRocketLauncher,
            ItemKind::Railgun => GoalKind::GetRailgun,
        }
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        self.trigger = None;
        self.subgoals.clear(agent, world);

        self.awaiting_path = world.request_path_to_item(agent, self.item);
        if !self.awaiting_path {
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
        if self.trigger.is_some_and(|t| world.has_picked_up(agent, t)) {
            tracing::debug!(?agent, item = %self.item, "item picked up");
            self.terminate(agent, world);
            self.status = GoalStatus::Completed;
            return self.status;
        }
        if self.item_was_taken(agent, world) {
            tracing::debug!(?agent, item = %self.item, "item taken by someone else");
            self.terminate(agent, world);
            self.status = GoalStatus::Failed;
            return self.status;
        }
        if self.awaiting_path && self.subgoals.is_empty() {
            return self.status;
        }
        self.status = self.subgoals.process(ctx, agent, world);
        // Arrived, but someone else took the item while it was out of sight.
        if self.status == GoalStatus::Completed
            && self.trigger.is_some_and(|t| !world.is_item_active(t))
        {
            tracing::debug!(?agent, item = %self.item, "arrived after the item was taken");
            self.status = GoalStatus::Failed;
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
        if self.subgoals.forward_message(ctx, agent, world, message) {
            return true;
        }
        match *message {
            Message::PathReady { item, .. } if self.awaiting_path => {
                self.awaiting_path = false;
                self.trigger = item;
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
