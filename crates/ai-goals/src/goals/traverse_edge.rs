use ai_core::TickContext;
use ai_nav::{EdgeFlags, PathEdge};

use super::TravelTimer;
use crate::{BotWorld, Goal, GoalKind, GoalStatus};

/// Move along one path edge. Arrives (decelerates) on the last edge, seeks otherwise.
#[derive(Debug, Clone)]
pub struct TraverseEdge {
    edge: PathEdge,
    last_edge: bool,
    status: GoalStatus,
    timer: TravelTimer,
}

impl TraverseEdge {
    const MARGIN_SECONDS: f64 = 2.0;
    const SWIM_SPEED: f32 = 0.5;
    const CRAWL_SPEED: f32 = 0.25;

    pub fn new(edge: PathEdge, last_edge: bool) -> Self {
        Self {
            edge,
            last_edge,
            status: GoalStatus::Inactive,
            timer: TravelTimer::default(),
        }
    }

    pub fn edge(&self) -> &PathEdge {
        &self.edge
    }

    fn speed_factor(&self) -> f32 {
        if self.edge.flags.contains(EdgeFlags::CRAWL) {
            Self::CRAWL_SPEED
        } else if self.edge.flags.contains(EdgeFlags::SWIM) {
            Self::SWIM_SPEED
        } else {
            1.0
        }
    }
}

impl<W> Goal<W> for TraverseEdge
where
    W: BotWorld + 'static,
{
    fn kind(&self) -> GoalKind {
        GoalKind::TraverseEdge
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.status = GoalStatus::Active;

        let factor = self.speed_factor();
        world.set_speed_factor(agent, factor);

        let distance = world.position(agent).distance(self.edge.destination);
        let speed = world.max_speed(agent) * factor;
        self.timer = TravelTimer::start(ctx, distance, speed, Self::MARGIN_SECONDS);

        world.set_steering_target(agent, self.edge.destination);
        if self.last_edge {
            world.arrive_on(agent);
        } else {
            world.seek_on(agent);
        }
    }

    fn process(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> GoalStatus {
        if self.status == GoalStatus::Inactive {
            self.activate(ctx, agent, world);
        }
        if self.status == GoalStatus::Active {
            if self.timer.is_stuck(ctx) {
                tracing::debug!(?agent, edge = ?self.edge, "stuck traversing edge");
                self.status = GoalStatus::Failed;
            } else if world.is_at_position(agent, self.edge.destination) {
                self.status = GoalStatus::Completed;
            }
        }
        self.status
    }

    fn terminate(&mut self, agent: W::Agent, world: &mut W) {
        world.seek_off(agent);
        world.arrive_off(agent);
        world.set_speed_factor(agent, 1.0);
    }
}
