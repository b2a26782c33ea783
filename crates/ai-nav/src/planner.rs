//! Per-agent path planner.
//!
//! Turns "go to this position" / "go to the nearest active item" requests into searches on the
//! shared [`PathScheduler`], matches the scheduler's outcomes back to the request that is still
//! current, and converts a found search into a world-space [`Path`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ai_core::{rng::derive_seed, AgentId};

use crate::heuristic::{Euclidean, HeuristicKind, Noisy, Zero};
use crate::path::smooth;
use crate::{
    ActiveTrigger, AStarSearch, DijkstraSearch, MapQuery, Path, PathEdge, PathScheduler,
    SearchEvent, SearchOutcome, SearchResult, Smoothing, TimeSlicedSearch, TriggerId, Vec2,
};

/// Identifies one path request. Issued in increasing order per planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ticket(pub u64);

/// Notification for the owning agent's goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathNotice {
    PathReady {
        ticket: Ticket,
        /// Trigger the path ends on, for item requests.
        item: Option<TriggerId>,
    },
    NoPathAvailable {
        ticket: Ticket,
    },
}

impl PathNotice {
    pub fn ticket(&self) -> Ticket {
        match *self {
            PathNotice::PathReady { ticket, .. } | PathNotice::NoPathAvailable { ticket } => ticket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Destination {
    Position(Vec2),
    Item,
}

#[derive(Debug, Clone, PartialEq)]
enum Ready {
    /// Target was in plain sight; no search was run.
    Direct(Vec2),
    Search(SearchResult),
}

#[derive(Debug, Clone)]
pub struct PathPlanner<A> {
    owner: A,
    bounding_radius: f32,
    heuristic: HeuristicKind,
    seed: u64,
    last_ticket: u64,
    current: Option<(Ticket, Destination)>,
    ready: Option<Ready>,
}

impl<A: AgentId> PathPlanner<A> {
    pub fn new(owner: A, bounding_radius: f32) -> Self {
        Self {
            owner,
            bounding_radius,
            heuristic: HeuristicKind::Euclidean,
            seed: 0,
            last_ticket: 0,
            current: None,
            ready: None,
        }
    }

    /// Heuristic for position requests. `seed` feeds the noisy heuristic.
    pub fn with_heuristic(mut self, heuristic: HeuristicKind, seed: u64) -> Self {
        self.heuristic = heuristic;
        self.seed = seed;
        self
    }

    pub fn owner(&self) -> A {
        self.owner
    }

    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    /// Ticket of the latest request, whether or not it is still pending.
    pub fn current_ticket(&self) -> Option<Ticket> {
        self.current.map(|(ticket, _)| ticket)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current_ticket() == Some(ticket)
    }

    pub fn has_path_ready(&self) -> bool {
        self.ready.is_some()
    }

    /// Request a path to `target`. Cancels any in-flight search of this agent.
    ///
    /// Returns `true` if the request is under way or was satisfied on the spot (clear line of
    /// sight; `PathReady` is emitted immediately). Returns `false` and emits `NoPathAvailable`
    /// when the agent or the target has no visible graph node.
    pub fn request_path_to_position<M>(
        &mut self,
        map: &M,
        scheduler: &mut PathScheduler<A>,
        agent_pos: Vec2,
        target: Vec2,
        mut notify: impl FnMut(PathNotice),
    ) -> bool
    where
        M: MapQuery + ?Sized,
    {
        let ticket = self.begin(scheduler, Destination::Position(target));

        if !map.is_path_obstructed(agent_pos, target, self.bounding_radius) {
            self.ready = Some(Ready::Direct(target));
            notify(PathNotice::PathReady { ticket, item: None });
            return true;
        }

        let Some(source) = map.closest_visible_node(agent_pos, self.bounding_radius) else {
            tracing::debug!(owner = ?self.owner, ?agent_pos, "no visible node near agent");
            notify(PathNotice::NoPathAvailable { ticket });
            return false;
        };
        let Some(dest) = map.closest_visible_node(target, self.bounding_radius) else {
            tracing::debug!(owner = ?self.owner, ?target, "no visible node near target");
            notify(PathNotice::NoPathAvailable { ticket });
            return false;
        };

        let graph = map.graph();
        let search: Result<Box<dyn TimeSlicedSearch>, _> = match self.heuristic {
            HeuristicKind::Euclidean => {
                AStarSearch::new(graph, source, dest, Euclidean).map(|s| Box::new(s) as _)
            }
            HeuristicKind::Zero => {
                AStarSearch::new(graph, source, dest, Zero).map(|s| Box::new(s) as _)
            }
            HeuristicKind::Noisy => {
                let seed = derive_seed(self.seed, self.owner.stable_id(), ticket.0);
                AStarSearch::new(graph, source, dest, Noisy::new(seed)).map(|s| Box::new(s) as _)
            }
        };

        match search {
            Ok(search) => scheduler.register(self.owner, ticket, search),
            Err(err) => {
                tracing::warn!(owner = ?self.owner, %err, "could not start position search");
                notify(PathNotice::NoPathAvailable { ticket });
                false
            }
        }
    }

    /// Request a path to the nearest node whose trigger satisfies `condition`.
    pub fn request_path_to_item<M>(
        &mut self,
        map: &M,
        scheduler: &mut PathScheduler<A>,
        agent_pos: Vec2,
        condition: ActiveTrigger,
        mut notify: impl FnMut(PathNotice),
    ) -> bool
    where
        M: MapQuery + ?Sized,
    {
        let ticket = self.begin(scheduler, Destination::Item);

        let Some(source) = map.closest_visible_node(agent_pos, self.bounding_radius) else {
            tracing::debug!(owner = ?self.owner, ?agent_pos, "no visible node near agent");
            notify(PathNotice::NoPathAvailable { ticket });
            return false;
        };

        match DijkstraSearch::new(map.graph(), source, condition) {
            Ok(search) => scheduler.register(self.owner, ticket, Box::new(search)),
            Err(err) => {
                tracing::warn!(owner = ?self.owner, %err, "could not start item search");
                notify(PathNotice::NoPathAvailable { ticket });
                false
            }
        }
    }

    /// Match a scheduler outcome to the current request. Outcomes for superseded tickets (or
    /// other owners) are discarded.
    pub fn on_search_event(&mut self, event: SearchEvent<A>) -> Option<PathNotice> {
        if event.owner != self.owner || !self.is_current(event.ticket) {
            tracing::trace!(
                owner = ?self.owner,
                ticket = event.ticket.0,
                "discarding stale search outcome"
            );
            return None;
        }

        match event.outcome {
            SearchOutcome::Found(result) => {
                let item = result.trigger;
                self.ready = Some(Ready::Search(result));
                Some(PathNotice::PathReady {
                    ticket: event.ticket,
                    item,
                })
            }
            SearchOutcome::NotFound => Some(PathNotice::NoPathAvailable {
                ticket: event.ticket,
            }),
        }
    }

    /// Consume the ready result as a world-space path from `agent_pos`.
    pub fn take_path<M>(&mut self, map: &M, agent_pos: Vec2, smoothing: Smoothing) -> Option<Path>
    where
        M: MapQuery + ?Sized,
    {
        let ready = self.ready.take()?;
        let mut path = Path::new();

        match ready {
            Ready::Direct(target) => path.push_back(PathEdge::new(agent_pos, target)),
            Ready::Search(result) => {
                let graph = map.graph();
                let first = graph.position(result.source)?;
                path.push_back(PathEdge::new(agent_pos, first));
                for edge in &result.edges {
                    path.push_back(PathEdge {
                        source: graph.position(edge.from)?,
                        destination: graph.position(edge.to)?,
                        flags: edge.flags,
                        door: edge.door,
                    });
                }
                if let Some((_, Destination::Position(target))) = self.current {
                    let last = graph.position(result.target)?;
                    path.push_back(PathEdge::new(last, target));
                }
            }
        }

        smooth(&mut path, map, self.bounding_radius, smoothing);
        Some(path)
    }

    /// Forget the current request and cancel its search.
    pub fn cancel(&mut self, scheduler: &mut PathScheduler<A>) {
        scheduler.unregister(self.owner);
        self.current = None;
        self.ready = None;
    }

    /// Cost of the cheapest route from `agent_pos` to a node satisfying `condition`, including
    /// the straight leg onto the graph. Runs a full Dijkstra search synchronously.
    pub fn cost_to_closest_item<M>(
        &self,
        map: &M,
        agent_pos: Vec2,
        condition: ActiveTrigger,
    ) -> Option<f32>
    where
        M: MapQuery + ?Sized,
    {
        let graph = map.graph();
        if !condition.any_active(graph) {
            return None;
        }
        let source = map.closest_visible_node(agent_pos, self.bounding_radius)?;
        let mut search = DijkstraSearch::new(graph, source, condition).ok()?;
        search.run_to_completion(graph);
        let result = search.result()?;
        Some(result.cost + agent_pos.distance(graph.position(source)?))
    }

    /// Graph cost from `agent_pos` to `node`, including the straight leg onto the graph.
    pub fn cost_to_node<M>(&self, map: &M, agent_pos: Vec2, node: usize) -> Option<f32>
    where
        M: MapQuery + ?Sized,
    {
        let graph = map.graph();
        let source = map.closest_visible_node(agent_pos, self.bounding_radius)?;
        let mut search = AStarSearch::new(graph, source, node, Euclidean).ok()?;
        search.run_to_completion(graph);
        let result = search.result()?;
        Some(result.cost + agent_pos.distance(graph.position(source)?))
    }

    fn begin(&mut self, scheduler: &mut PathScheduler<A>, destination: Destination) -> Ticket {
        scheduler.unregister(self.owner);
        self.ready = None;
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        self.current = Some((ticket, destination));
        ticket
    }
}
