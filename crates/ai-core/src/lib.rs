//! Deterministic, engine-agnostic AI kernel primitives.
//!
//! Everything here is single-threaded and tick driven: a [`TickContext`] describes the current
//! frame, [`Regulator`] throttles expensive per-agent work to a coarser cadence, and
//! [`MessageDispatcher`] is the point-to-point event bus owned by one simulation instance.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod message;
pub mod regulator;
pub mod rng;
pub mod tick;
pub mod world;

pub use agent::AgentId;
pub use message::{MessageDispatcher, Telegram};
pub use regulator::Regulator;
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::{WorldMut, WorldView};
