use ai_core::{AgentId, Regulator, TickContext};

use crate::goal::active_chain;
use crate::goals::Think;
use crate::{BotWorld, Goal, GoalEvaluator, GoalKind, Message};

/// An agent's goal tree plus its arbitration cadence.
pub struct Brain<W>
where
    W: BotWorld + 'static,
{
    pub agent: W::Agent,
    pub regulator: Regulator,
    pub think: Think<W>,
}

impl<W> Brain<W>
where
    W: BotWorld + 'static,
{
    pub fn new(agent: W::Agent, evaluators: Vec<Box<dyn GoalEvaluator<W>>>) -> Self {
        Self {
            agent,
            regulator: Regulator::default(),
            think: Think::new(evaluators),
        }
    }

    pub fn with_regulator(mut self, regulator: Regulator) -> Self {
        self.regulator = regulator;
        self
    }

    /// Re-arbitrate when the regulator allows it, then process the goal tree.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) {
        if self.regulator.is_ready(ctx.tick) {
            self.think.arbitrate(self.agent, world);
        }
        self.think.process(ctx, self.agent, world);
    }

    pub fn handle_message(&mut self, ctx: &TickContext, world: &mut W, message: &Message) -> bool {
        let handled = self.think.handle_message(ctx, self.agent, world, message);
        if !handled {
            tracing::trace!(agent = ?self.agent, ?message, "message not handled");
        }
        handled
    }

    /// Kinds from the root down the chain of executing goals.
    pub fn active_goals(&self) -> Vec<GoalKind> {
        active_chain(&self.think)
    }

    /// Terminate every goal (e.g. the agent is being removed).
    pub fn shutdown(&mut self, world: &mut W) {
        self.think.terminate(self.agent, world);
    }
}

/// Tick brains in stable agent order.
pub fn tick_brains<W>(ctx: &TickContext, world: &mut W, brains: &mut [Brain<W>])
where
    W: BotWorld + 'static,
{
    brains.sort_by_key(|b| b.agent.stable_id());
    for brain in brains.iter_mut() {
        brain.tick(ctx, world);
    }
}
