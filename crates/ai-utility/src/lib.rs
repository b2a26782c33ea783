//! Utility arbitration primitives.
//!
//! Each arbitration scores a fixed, ordered set of evaluators and picks the highest. Ties go to
//! the evaluator declared first, and NaN scores never win, so a given world state always yields
//! the same choice.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod arbiter;

pub use arbiter::{clamp01, score, ArbiterConfig, Evaluator, Selection, UtilityArbiter};
