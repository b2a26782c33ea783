use ai_core::TickContext;
use ai_utility::{ArbiterConfig, UtilityArbiter};

use crate::{BotWorld, Goal, GoalEvaluator, GoalKind, GoalStatus, Message, Subgoals};

/// Root goal: arbitrates between evaluators and runs the winner's goal.
pub struct Think<W>
where
    W: BotWorld + 'static,
{
    status: GoalStatus,
    subgoals: Subgoals<W>,
    evaluators: Vec<Box<dyn GoalEvaluator<W>>>,
    arbiter: UtilityArbiter,
}

impl<W> Think<W>
where
    W: BotWorld + 'static,
{
    pub fn new(evaluators: Vec<Box<dyn GoalEvaluator<W>>>) -> Self {
        Self {
            status: GoalStatus::Inactive,
            subgoals: Subgoals::new(),
            evaluators,
            arbiter: UtilityArbiter::new(),
        }
    }

    pub fn with_arbiter_config(mut self, config: ArbiterConfig) -> Self {
        self.arbiter = self.arbiter.with_config(config);
        self
    }

    pub fn evaluators(&self) -> &[Box<dyn GoalEvaluator<W>>] {
        &self.evaluators
    }

    /// Scores from the latest arbitration, in evaluator order.
    pub fn last_scores(&self) -> &[f32] {
        self.arbiter.last_scores()
    }

    /// Score every evaluator and install the winner's goal unless a goal of that kind is
    /// already running.
    pub fn arbitrate(&mut self, agent: W::Agent, world: &mut W) -> Option<GoalKind> {
        let selection = self.arbiter.select(&self.evaluators, agent, &*world)?;
        let evaluator = &self.evaluators[selection.index];
        let kind = evaluator.goal_kind();

        if self.subgoals.front_kind() != Some(kind) {
            tracing::debug!(
                ?agent,
                goal = %kind,
                score = selection.score,
                previous = ?self.subgoals.front_kind(),
                "switching goal"
            );
            let goal = evaluator.make_goal();
            self.subgoals.clear(agent, world);
            self.subgoals.push_front(goal);
        }
        Some(kind)
    }

    /// Install `goal` directly, replacing whatever is running.
    pub fn install(&mut self, goal: Box<dyn Goal<W>>, agent: W::Agent, world: &mut W) {
        self.subgoals.clear(agent, world);
        self.subgoals.push_front(goal);
    }
}

impl<W> Goal<W> for Think<W>
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::Think
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;
        self.arbitrate(agent, world);
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
        }

        let status = self.subgoals.process(ctx, agent, world);
        // The brain never finishes; a finished strategy just triggers re-arbitration on the
        // next process.
        self.status = match status {
            GoalStatus::Completed | GoalStatus::Failed => {
                if status == GoalStatus::Failed {
                    tracing::debug!(?agent, goal = ?self.subgoals.front_kind(), "strategy failed");
                }
                self.subgoals.clear(agent, world);
                GoalStatus::Inactive
            }
            _ => GoalStatus::Active,
        };
        self.status
    }

    fn terminate(&mut self, agent: W::Agent, world: &mut W) {
        self.subgoals.clear(agent, world);
        self.status = GoalStatus::Inactive;
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
