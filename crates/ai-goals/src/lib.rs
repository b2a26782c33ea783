//! Hierarchical goals.
//!
//! An agent's behaviour is a tree of [`Goal`]s rooted at [`goals::Think`]. Composite goals keep
//! their children in a [`Subgoals`] stack and only ever run the front child. Path-dependent goals
//! request a path through the [`BotWorld`] and suspend until a [`Message`] reports the outcome.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod brain;
pub mod composite;
pub mod evaluators;
pub mod features;
pub mod goal;
pub mod goals;
pub mod message;
pub mod world;

pub use brain::{tick_brains, Brain};
pub use composite::Subgoals;
pub use evaluators::{
    default_evaluators, AttackTargetEvaluator, Biases, ExploreEvaluator, GetHealthEvaluator,
    GetWeaponEvaluator, GoalEvaluator, HideEvaluator,
};
pub use goal::{active_chain, Goal, GoalKind, GoalStatus, RetryPolicy};
pub use message::Message;
pub use world::{BotWorld, ItemKind};
