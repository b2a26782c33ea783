//! Point-to-point message bus.
//!
//! A [`MessageDispatcher`] is an owned value (one per simulation), not a global. Components
//! that need to notify an agent push a [`Telegram`] into it; the world's update loop drains the
//! immediate queue within the same tick and releases delayed telegrams once they fall due.

use std::collections::{BTreeMap, VecDeque};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::AgentId;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Telegram<A, M> {
    pub sender: A,
    pub receiver: A,
    /// Tick at which the telegram becomes deliverable.
    pub due_tick: u64,
    pub message: M,
}

/// Immediate + delayed telegram queues.
///
/// Ordering guarantees:
/// - immediate telegrams are delivered FIFO in dispatch order
/// - delayed telegrams are released by due tick, FIFO among equal due ticks
/// - a delayed telegram identical to one already pending for the same tick is dropped
#[derive(Debug)]
pub struct MessageDispatcher<A, M> {
    immediate: VecDeque<Telegram<A, M>>,
    delayed: BTreeMap<(u64, u64), Telegram<A, M>>,
    seq: u64,
}

impl<A, M> Default for MessageDispatcher<A, M> {
    fn default() -> Self {
        Self {
            immediate: VecDeque::new(),
            delayed: BTreeMap::new(),
            seq: 0,
        }
    }
}

impl<A, M> MessageDispatcher<A, M>
where
    A: AgentId,
    M: PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `message` for delivery `delay_ticks` after `now`. A zero delay goes straight to the
    /// immediate queue.
    pub fn dispatch(&mut self, now: u64, sender: A, receiver: A, message: M, delay_ticks: u64) {
        if delay_ticks == 0 {
            self.send_now(now, sender, receiver, message);
            return;
        }

        let due_tick = now.saturating_add(delay_ticks);
        let duplicate = self
            .delayed
            .range((due_tick, 0)..=(due_tick, u64::MAX))
            .any(|(_, t)| t.sender == sender && t.receiver == receiver && t.message == message);
        if duplicate {
            tracing::trace!(?sender, ?receiver, due_tick, "dropping duplicate delayed telegram");
            return;
        }

        let seq = self.next_seq();
        self.delayed.insert(
            (due_tick, seq),
            Telegram {
                sender,
                receiver,
                due_tick,
                message,
            },
        );
    }

    pub fn send_now(&mut self, now: u64, sender: A, receiver: A, message: M) {
        self.immediate.push_back(Telegram {
            sender,
            receiver,
            due_tick: now,
            message,
        });
    }

    /// Move every delayed telegram due at or before `now` onto the immediate queue.
    pub fn release_due(&mut self, now: u64) -> usize {
        let mut released = 0;
        while let Some(entry) = self.delayed.first_entry() {
            if entry.key().0 > now {
                break;
            }
            self.immediate.push_back(entry.remove());
            released += 1;
        }
        released
    }

    /// Next telegram ready for delivery, if any.
    pub fn pop(&mut self) -> Option<Telegram<A, M>> {
        self.immediate.pop_front()
    }

    pub fn pending_immediate(&self) -> usize {
        self.immediate.len()
    }

    pub fn pending_delayed(&self) -> usize {
        self.delayed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.delayed.is_empty()
    }

    /// Drop every pending telegram addressed to `receiver` (e.g. the agent was removed).
    pub fn discard_for(&mut self, receiver: A) {
        self.immediate.retain(|t| t.receiver != receiver);
        self.delayed.retain(|_, t| t.receiver != receiver);
    }

    pub fn clear(&mut self) {
        self.immediate.clear();
        self.delayed.clear();
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        seq
    }
}
