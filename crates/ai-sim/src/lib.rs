//! Reference arena for the goal-driven bots.
//!
//! The arena supplies deliberately simple stand-ins for everything the planners and goals treat
//! as collaborators: kinematic steering, closest-visible-bot perception, hitscan fire, item
//! triggers with respawn and switch-operated doors. [`Simulation`] runs the fixed tick order.

#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod perception;
pub mod simulation;
pub mod steering;

pub use arena::{Arena, ArenaStats, Bot, Item};
pub use config::{BiasConfig, BotConfig, CombatConfig, DoorConfig, GridConfig, ItemConfig, ScenarioConfig};
pub use error::ScenarioError;
pub use simulation::{RunSummary, Simulation, TickReport};
pub use steering::Steering;
