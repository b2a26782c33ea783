//! Round-robin scheduler that advances in-flight searches under a per-tick cycle budget.

use ai_core::AgentId;

use crate::{NavGraph, SearchResult, SearchStatus, TimeSlicedSearch, Ticket};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(SearchResult),
    NotFound,
}

/// Emitted once per finished search, in the same tick it finished.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEvent<A> {
    pub owner: A,
    pub ticket: Ticket,
    pub outcome: SearchOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceReport {
    /// Cycles spent (one per `step` call).
    pub steps: usize,
    /// Searches that reached `Found` or `NotFound` and were removed.
    pub finished: usize,
}

#[derive(Debug)]
struct InFlight<A> {
    owner: A,
    ticket: Ticket,
    search: Box<dyn TimeSlicedSearch>,
}

/// At most one search per owner. Every tick, [`PathScheduler::advance_all`] hands out up to
/// `cycles_per_tick` single-node expansions, visiting registrants in round-robin order from
/// where the previous tick stopped, and serving each registrant at most once per tick.
#[derive(Debug)]
pub struct PathScheduler<A> {
    searches: Vec<InFlight<A>>,
    cursor: usize,
    cycles_per_tick: usize,
}

impl<A: AgentId> PathScheduler<A> {
    pub fn new(cycles_per_tick: usize) -> Self {
        Self {
            searches: Vec::new(),
            cursor: 0,
            cycles_per_tick,
        }
    }

    pub fn cycles_per_tick(&self) -> usize {
        self.cycles_per_tick
    }

    pub fn set_cycles_per_tick(&mut self, cycles: usize) {
        self.cycles_per_tick = cycles;
    }

    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }

    pub fn is_registered(&self, owner: A) -> bool {
        self.searches.iter().any(|s| s.owner == owner)
    }

    /// Ticket of the owner's in-flight search, if any.
    pub fn ticket_for(&self, owner: A) -> Option<Ticket> {
        self.searches
            .iter()
            .find(|s| s.owner == owner)
            .map(|s| s.ticket)
    }

    /// Add a search for `owner`. No-op (returns `false`) if the owner already has one in flight;
    /// callers replace a search by unregistering first.
    pub fn register(&mut self, owner: A, ticket: Ticket, search: Box<dyn TimeSlicedSearch>) -> bool {
        if self.is_registered(owner) {
            tracing::trace!(?owner, ticket = ticket.0, "search already registered");
            return false;
        }
        tracing::debug!(
            ?owner,
            ticket = ticket.0,
            kind = ?search.kind(),
            source = search.source(),
            "search registered"
        );
        self.searches.push(InFlight {
            owner,
            ticket,
            search,
        });
        true
    }

    /// Drop the owner's in-flight search, if any. Its outcome will never be reported.
    pub fn unregister(&mut self, owner: A) -> bool {
        let Some(idx) = self.searches.iter().position(|s| s.owner == owner) else {
            return false;
        };
        self.remove_at(idx);
        tracing::trace!(?owner, "search unregistered");
        true
    }

    pub fn clear(&mut self) {
        self.searches.clear();
        self.cursor = 0;
    }

    /// Spend this tick's budget. `on_outcome` runs synchronously for each search that finishes,
    /// before the next registrant is stepped.
    pub fn advance_all(
        &mut self,
        graph: &NavGraph,
        mut on_outcome: impl FnMut(SearchEvent<A>),
    ) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        let mut budget = self.cycles_per_tick;
        let mut to_serve = self.searches.len();

        while budget > 0 && to_serve > 0 && !self.searches.is_empty() {
            if self.cursor >= self.searches.len() {
                self.cursor = 0;
            }

            let status = self.searches[self.cursor].search.step(graph);
            budget -= 1;
            to_serve -= 1;
            report.steps += 1;

            if !status.is_finished() {
                self.cursor += 1;
                continue;
            }

            // Removal leaves the cursor on the next registrant.
            let entry = self.searches.remove(self.cursor);
            report.finished += 1;
            let outcome = match (status, entry.search.result()) {
                (SearchStatus::Found, Some(result)) => SearchOutcome::Found(result),
                _ => SearchOutcome::NotFound,
            };
            tracing::debug!(
                owner = ?entry.owner,
                ticket = entry.ticket.0,
                found = matches!(outcome, SearchOutcome::Found(_)),
                "search finished"
            );
            on_outcome(SearchEvent {
                owner: entry.owner,
                ticket: entry.ticket,
                outcome,
            });
        }

        report
    }

    fn remove_at(&mut self, idx: usize) {
        self.searches.remove(idx);
        if idx < self.cursor {
            self.cursor -= 1;
        }
    }
}
