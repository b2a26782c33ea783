//! Tick loop tying the arena, the search scheduler and the brains together.

use ai_core::{Regulator, TickContext};
use ai_goals::{default_evaluators, tick_brains, Brain, GoalKind};

use crate::{Arena, ArenaStats, ScenarioConfig, ScenarioError};

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub tick: u64,
    pub search_steps: usize,
    pub searches_finished: usize,
    pub messages_delivered: usize,
    pub searches_in_flight: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub stats: ArenaStats,
    /// Active goal chain per bot at the end of the run, in id order.
    pub goals: Vec<(u32, Vec<GoalKind>)>,
}

pub struct Simulation {
    arena: Arena,
    brains: Vec<Brain<Arena>>,
    ctx: TickContext,
}

impl Simulation {
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ScenarioError> {
        let arena = Arena::from_config(config)?;
        let brains = config
            .bots
            .iter()
            .map(|bot| {
                Brain::new(bot.id, default_evaluators(bot.biases.into())).with_regulator(
                    Regulator::deterministic(bot.id, config.think_interval_ticks),
                )
            })
            .collect();

        Ok(Self {
            arena,
            brains,
            ctx: TickContext::new(0, config.dt, config.seed),
        })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn brains(&self) -> &[Brain<Arena>] {
        &self.brains
    }

    pub fn brain(&self, agent: u32) -> Option<&Brain<Arena>> {
        self.brains.iter().find(|b| b.agent == agent)
    }

    /// Context of the next tick to run.
    pub fn context(&self) -> TickContext {
        self.ctx
    }

    /// One tick: due telegrams, search budget, same-tick delivery, brains, then the world.
    pub fn step(&mut self) -> TickReport {
        let ctx = self.ctx;

        self.arena.begin_tick(&ctx);
        let search = self.arena.advance_searches();
        let messages_delivered = self.deliver_messages(&ctx);

        tick_brains(&ctx, &mut self.arena, &mut self.brains);

        for agent in self.arena.update(&ctx) {
            if let Some(brain) = self.brains.iter_mut().find(|b| b.agent == agent) {
                brain.shutdown(&mut self.arena);
            }
            self.arena.respawn(agent);
        }

        self.ctx = ctx.next();
        TickReport {
            tick: ctx.tick,
            search_steps: search.steps,
            searches_finished: search.finished,
            messages_delivered,
            searches_in_flight: self.arena.searches_in_flight(),
        }
    }

    pub fn run(&mut self, ticks: u64) -> RunSummary {
        for _ in 0..ticks {
            let report = self.step();
            tracing::trace!(?report, "tick");
        }
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.ctx.tick,
            stats: self.arena.stats(),
            goals: self
                .brains
                .iter()
                .map(|b| (b.agent, b.active_goals()))
                .collect(),
        }
    }

    fn deliver_messages(&mut self, ctx: &TickContext) -> usize {
        let mut delivered = 0;
        while let Some(telegram) = self.arena.next_message() {
            let receiver = telegram.receiver;
            let brain = self.brains.iter_mut().find(|b| b.agent == receiver);
            debug_assert!(brain.is_some(), "message for unknown agent {receiver}");
            let Some(brain) = brain else {
                tracing::warn!(receiver, "dropping message for unknown agent");
                continue;
            };

            let message = telegram.message;
            if !self.arena.is_current_ticket(receiver, message.ticket()) {
                tracing::trace!(receiver, ?message, "dropping superseded path message");
                self.arena.record_stale();
                continue;
            }

            self.arena.record_delivery(&message);
            brain.handle_message(ctx, &mut self.arena, &message);
            delivered += 1;
        }
        delivered
    }
}
