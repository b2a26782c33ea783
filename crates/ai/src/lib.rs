//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! The layers build on each other: [`core`] holds ticks, ids and the message bus, [`nav`] the
//! graph, time-sliced searches and per-agent path planning, [`utility`] scoring, and [`goals`]
//! the hierarchical goal tree that ties them together.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "nav")]
#[cfg_attr(docsrs, doc(cfg(feature = "nav")))]
pub use ai_nav as nav;

#[cfg(feature = "utility")]
#[cfg_attr(docsrs, doc(cfg(feature = "utility")))]
pub use ai_utility as utility;

#[cfg(feature = "goals")]
#[cfg_attr(docsrs, doc(cfg(feature = "goals")))]
pub use ai_goals as goals;
