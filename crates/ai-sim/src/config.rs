//! Scenario configuration, loaded from YAML.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ai_goals::{Biases, ItemKind};
use ai_nav::{HeuristicKind, Smoothing, Vec2, Wall};

use crate::ScenarioError;

const DEMO_SCENARIO: &str = include_str!("../scenarios/arena.yaml");

/// Everything needed to build an arena and its bots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,

    /// Root seed for every random decision in the run.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Ticks to simulate when the CLI does not say otherwise.
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Seconds per tick.
    #[serde(default = "default_dt")]
    pub dt: f32,

    /// Search steps shared by all agents each tick.
    #[serde(default = "default_search_cycles")]
    pub search_cycles_per_tick: usize,

    /// Ticks between goal arbitrations for each bot.
    #[serde(default = "default_think_interval")]
    pub think_interval_ticks: u32,

    pub smoothing: Smoothing,

    pub heuristic: HeuristicKind,

    /// Radius searched around a position for its closest visible graph node.
    #[serde(default = "default_node_search_range")]
    pub node_search_range: f32,

    pub grid: GridConfig,

    pub walls: Vec<Wall>,

    pub doors: Vec<DoorConfig>,

    pub items: Vec<ItemConfig>,

    pub bots: Vec<BotConfig>,

    pub combat: CombatConfig,
}

fn default_seed() -> u64 {
    7
}
fn default_ticks() -> u64 {
    600
}
fn default_dt() -> f32 {
    0.1
}
fn default_search_cycles() -> usize {
    64
}
fn default_think_interval() -> u32 {
    4
}
fn default_node_search_range() -> f32 {
    60.0
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: "arena".to_string(),
            seed: default_seed(),
            ticks: default_ticks(),
            dt: default_dt(),
            search_cycles_per_tick: default_search_cycles(),
            think_interval_ticks: default_think_interval(),
            smoothing: Smoothing::default(),
            heuristic: HeuristicKind::default(),
            node_search_range: default_node_search_range(),
            grid: GridConfig::default(),
            walls: Vec::new(),
            doors: Vec::new(),
            items: Vec::new(),
            bots: Vec::new(),
            combat: CombatConfig::default(),
        }
    }
}

/// Open cells of a regular grid become graph nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    #[serde(default = "default_grid_width")]
    pub width: u32,

    #[serde(default = "default_grid_height")]
    pub height: u32,

    #[serde(default = "default_cell_size")]
    pub cell_size: f32,

    /// `[x, y]` cells with no node.
    pub blocked: Vec<[i32; 2]>,
}

fn default_grid_width() -> u32 {
    16
}
fn default_grid_height() -> u32 {
    12
}
fn default_cell_size() -> f32 {
    25.0
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_grid_width(),
            height: default_grid_height(),
            cell_size: default_cell_size(),
            blocked: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorConfig {
    pub id: u32,
    pub from: Vec2,
    pub to: Vec2,

    #[serde(default)]
    pub switches: Vec<Vec2>,

    /// Ticks a door stays open after a switch is used.
    #[serde(default = "default_door_open_ticks")]
    pub open_ticks: u64,
}

fn default_door_open_ticks() -> u64 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    /// `health`, `shotgun`, `rocket_launcher` or `railgun`.
    pub kind: String,

    /// Snapped to the nearest graph node.
    pub position: Vec2,

    #[serde(default = "default_respawn_ticks")]
    pub respawn_ticks: u64,
}

fn default_respawn_ticks() -> u64 {
    200
}

impl ItemConfig {
    pub fn item_kind(&self) -> Result<ItemKind, ScenarioError> {
        ItemKind::from_str(&self.kind).map_err(|_| ScenarioError::UnknownItem(self.kind.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub id: u32,
    pub position: Vec2,

    #[serde(default = "default_health")]
    pub health: f32,

    #[serde(default = "default_health")]
    pub max_health: f32,

    #[serde(default = "default_max_speed")]
    pub max_speed: f32,

    #[serde(default = "default_bot_radius")]
    pub radius: f32,

    #[serde(default)]
    pub biases: BiasConfig,
}

fn default_health() -> f32 {
    100.0
}
fn default_max_speed() -> f32 {
    60.0
}
fn default_bot_radius() -> f32 {
    5.0
}

/// Personality multipliers; see [`Biases`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasConfig {
    pub get_health: f32,
    pub explore: f32,
    pub attack_target: f32,
    pub hide: f32,
    pub shotgun: f32,
    pub rocket_launcher: f32,
    pub railgun: f32,
}

impl Default for BiasConfig {
    fn default() -> Self {
        let b = Biases::default();
        Self {
            get_health: b.get_health,
            explore: b.explore,
            attack_target: b.attack_target,
            hide: b.hide,
            shotgun: b.shotgun,
            rocket_launcher: b.rocket_launcher,
            railgun: b.railgun,
        }
    }
}

impl From<BiasConfig> for Biases {
    fn from(b: BiasConfig) -> Self {
        Biases {
            get_health: b.get_health,
            explore: b.explore,
            attack_target: b.attack_target,
            hide: b.hide,
            shotgun: b.shotgun,
            rocket_launcher: b.rocket_launcher,
            railgun: b.railgun,
        }
    }
}

/// Stand-in perception and hitscan numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub view_distance: f32,
    pub fov_degrees: f32,
    /// How long an unseen target is remembered.
    pub memory_seconds: f32,
    pub shooting_range: f32,
    pub damage_per_second: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            view_distance: 300.0,
            fov_degrees: 180.0,
            memory_seconds: 5.0,
            shooting_range: 200.0,
            damage_per_second: 15.0,
        }
    }
}

impl ScenarioConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse scenario: {}", path.display()))?;
        Ok(config)
    }

    /// The built-in arena used by `ai-sim demo`.
    pub fn demo() -> Result<Self> {
        serde_yaml::from_str(DEMO_SCENARIO).context("Failed to parse built-in demo scenario")
    }

    /// Checks that do not need the built map.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.dt <= 0.0 {
            return Err(ScenarioError::NonPositive { field: "dt" });
        }
        if self.search_cycles_per_tick == 0 {
            return Err(ScenarioError::NonPositive {
                field: "search_cycles_per_tick",
            });
        }
        if self.grid.cell_size <= 0.0 {
            return Err(ScenarioError::NonPositive {
                field: "grid.cell_size",
            });
        }
        if self.node_search_range <= 0.0 {
            return Err(ScenarioError::NonPositive {
                field: "node_search_range",
            });
        }
        if self.bots.is_empty() {
            return Err(ScenarioError::NoBots);
        }

        let mut bots = BTreeSet::new();
        for bot in &self.bots {
            if !bots.insert(bot.id) {
                return Err(ScenarioError::DuplicateBot(bot.id));
            }
            if bot.max_speed <= 0.0 {
                return Err(ScenarioError::NonPositive {
                    field: "bots.max_speed",
                });
            }
        }

        let mut doors = BTreeSet::new();
        for door in &self.doors {
            if !doors.insert(door.id) {
                return Err(ScenarioError::DuplicateDoor(ai_nav::DoorId(door.id)));
            }
        }

        for item in &self.items {
            item.item_kind()?;
        }
        Ok(())
    }
}
