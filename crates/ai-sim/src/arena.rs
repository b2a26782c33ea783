//! The reference world: map, bots, items and doors, plus the shared path scheduler and
//! message bus. Implements [`BotWorld`] so brains can drive it.

use std::collections::BTreeMap;

use ai_core::rng::derive_seed;
use ai_core::{MessageDispatcher, SplitMix64, Telegram, TickContext, WorldMut, WorldView};
use ai_goals::{BotWorld, ItemKind, Message};
use ai_nav::{
    ActiveTrigger, AdvanceReport, DoorId, MapQuery, NavGrid, NavMap, NodeExtra, Path, PathPlanner,
    PathScheduler, Smoothing, Ticket, TriggerId, Vec2, Wall,
};

use crate::perception::{self, Observer, Senses};
use crate::steering::Steering;
use crate::{CombatConfig, ScenarioConfig, ScenarioError};

const BOT_RNG_STREAM: u64 = 0xb07;
const HEALTH_PACK: f32 = 50.0;
const PICKUP_RADIUS: f32 = 12.0;
const SWITCH_RADIUS: f32 = 15.0;
const COVER_SEARCH_RANGE: f32 = 200.0;
/// Strafe distance as a multiple of the bot radius.
const STEP_RADII: f32 = 4.0;
/// Ammo spent per second of firing, as a fraction of a full weapon.
const AMMO_PER_SECOND: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct Bot {
    pub id: u32,
    pub spawn: Vec2,
    pub position: Vec2,
    pub heading: Vec2,
    pub max_speed: f32,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Per-weapon strength in `[0, 1]`.
    pub ammo: BTreeMap<ItemKind, f32>,
    pub planner: PathPlanner<u32>,
    pub steering: Steering,
    pub senses: Senses,
    rng: SplitMix64,
}

impl Bot {
    fn strongest_weapon(&self) -> Option<ItemKind> {
        self.ammo
            .iter()
            .filter(|(_, &strength)| strength > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&kind, _)| kind)
    }
}

/// A pickup sitting on a trigger node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub trigger: TriggerId,
    pub kind: ItemKind,
    pub position: Vec2,
    pub respawn_ticks: u64,
    /// Set while the item is taken.
    pub respawn_at: Option<u64>,
    /// Bot holding the item until it respawns.
    pub taken_by: Option<u32>,
}

impl Item {
    pub fn is_active(&self) -> bool {
        self.respawn_at.is_none()
    }
}

/// Running totals for a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaStats {
    pub search_steps: u64,
    pub searches_finished: u64,
    pub paths_ready: u64,
    pub paths_failed: u64,
    pub stale_messages: u64,
    pub pickups: u64,
    pub doors_opened: u64,
    pub frags: u64,
}

#[derive(Debug)]
pub struct Arena {
    map: NavMap,
    scheduler: PathScheduler<u32>,
    dispatcher: MessageDispatcher<u32, Message>,
    bots: BTreeMap<u32, Bot>,
    items: Vec<Item>,
    door_open_ticks: BTreeMap<DoorId, u64>,
    door_closes_at: BTreeMap<DoorId, u64>,
    smoothing: Smoothing,
    combat: CombatConfig,
    cell_size: f32,
    dt: f32,
    tick: u64,
    stats: ArenaStats,
}

impl WorldView for Arena {
    type Agent = u32;
}

impl WorldMut for Arena {}

impl Arena {
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ScenarioError> {
        config.validate()?;

        let mut grid = NavGrid::new(config.grid.width, config.grid.height, config.grid.cell_size)?;
        for &[x, y] in &config.grid.blocked {
            grid.set_blocked(x, y, true);
        }
        let mut graph = grid.build_graph();

        // Items sit on their nearest node.
        let mut items = Vec::with_capacity(config.items.len());
        for (i, item) in config.items.iter().enumerate() {
            let kind = item.item_kind()?;
            let trigger = TriggerId(i as u32 + 1);
            let nearest = graph
                .nodes()
                .filter(|n| n.trigger().is_none())
                .filter_map(|n| Some((n.index()?, n.position)))
                .min_by(|a, b| {
                    a.1.distance_squared(item.position)
                        .total_cmp(&b.1.distance_squared(item.position))
                });
            let Some((node, position)) = nearest else {
                return Err(ScenarioError::Unreachable {
                    what: format!("item `{}`", item.kind),
                    x: item.position.x,
                    y: item.position.y,
                });
            };
            graph.set_extra(node, NodeExtra::Trigger(trigger))?;
            items.push(Item {
                trigger,
                kind,
                position,
                respawn_ticks: item.respawn_ticks,
                respawn_at: None,
                taken_by: None,
            });
        }

        let mut map = NavMap::new(graph, config.node_search_range, config.node_search_range)
            .with_walls(config.walls.iter().copied());

        let mut door_open_ticks = BTreeMap::new();
        for door in &config.doors {
            let id = DoorId(door.id);
            map.add_door(ai_nav::Door {
                id,
                segment: Wall::new(door.from, door.to),
                switches: door.switches.clone(),
                open: false,
            });
            door_open_ticks.insert(id, door.open_ticks);
        }

        let radius = config
            .bots
            .iter()
            .map(|b| b.radius)
            .fold(0.0_f32, f32::max);
        map.prune_blocked_edges(radius);

        let mut bots = BTreeMap::new();
        for bot in &config.bots {
            if map.closest_visible_node(bot.position, bot.radius).is_none() {
                return Err(ScenarioError::Unreachable {
                    what: format!("bot {}", bot.id),
                    x: bot.position.x,
                    y: bot.position.y,
                });
            }
            let planner =
                PathPlanner::new(bot.id, bot.radius).with_heuristic(config.heuristic, config.seed);
            bots.insert(
                bot.id,
                Bot {
                    id: bot.id,
                    spawn: bot.position,
                    position: bot.position,
                    heading: Vec2::ZERO,
                    max_speed: bot.max_speed,
                    radius: bot.radius,
                    health: bot.health.min(bot.max_health),
                    max_health: bot.max_health,
                    ammo: BTreeMap::new(),
                    planner,
                    steering: Steering::default(),
                    senses: Senses::default(),
                    rng: SplitMix64::new(derive_seed(
                        config.seed,
                        u64::from(bot.id),
                        BOT_RNG_STREAM,
                    )),
                },
            );
        }

        tracing::debug!(
            nodes = map.graph().active_node_count(),
            edges = map.graph().edge_count(),
            bots = bots.len(),
            items = items.len(),
            "arena built"
        );

        Ok(Self {
            map,
            scheduler: PathScheduler::new(config.search_cycles_per_tick),
            dispatcher: MessageDispatcher::new(),
            bots,
            items,
            door_open_ticks,
            door_closes_at: BTreeMap::new(),
            smoothing: config.smoothing,
            combat: config.combat,
            cell_size: config.grid.cell_size,
            dt: config.dt,
            tick: 0,
            stats: ArenaStats::default(),
        })
    }

    pub fn map(&self) -> &NavMap {
        &self.map
    }

    pub fn bot(&self, id: u32) -> Option<&Bot> {
        self.bots.get(&id)
    }

    pub fn bot_mut(&mut self, id: u32) -> Option<&mut Bot> {
        self.bots.get_mut(&id)
    }

    /// Bots in id order.
    pub fn bots(&self) -> impl Iterator<Item = &Bot> + '_ {
        self.bots.values()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn stats(&self) -> ArenaStats {
        self.stats
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn searches_in_flight(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_door_open(&self, id: DoorId) -> bool {
        self.map.door(id).is_some_and(|d| d.open)
    }

    /// Start of a tick: set the clock and release delayed telegrams that fell due.
    pub fn begin_tick(&mut self, ctx: &TickContext) {
        self.tick = ctx.tick;
        self.dispatcher.release_due(ctx.tick);
    }

    /// Spend the search budget. Outcomes are routed through each owner's planner and queued as
    /// immediate messages.
    pub fn advance_searches(&mut self) -> AdvanceReport {
        let tick = self.tick;
        let bots = &mut self.bots;
        let dispatcher = &mut self.dispatcher;

        let report = self.scheduler.advance_all(self.map.graph(), |event| {
            let owner = event.owner;
            let Some(bot) = bots.get_mut(&owner) else {
                return;
            };
            if let Some(notice) = bot.planner.on_search_event(event) {
                dispatcher.send_now(tick, owner, owner, Message::from(notice));
            }
        });

        self.stats.search_steps += report.steps as u64;
        self.stats.searches_finished += report.finished as u64;
        report
    }

    pub fn next_message(&mut self) -> Option<Telegram<u32, Message>> {
        self.dispatcher.pop()
    }

    /// `false` once the agent has made a newer request than the one `ticket` answers.
    pub fn is_current_ticket(&self, agent: u32, ticket: Ticket) -> bool {
        self.bots
            .get(&agent)
            .is_some_and(|b| b.planner.is_current(ticket))
    }

    pub(crate) fn record_delivery(&mut self, message: &Message) {
        match message {
            Message::PathReady { .. } => self.stats.paths_ready += 1,
            Message::NoPathAvailable { .. } => self.stats.paths_failed += 1,
        }
    }

    pub(crate) fn record_stale(&mut self) {
        self.stats.stale_messages += 1;
    }

    /// Move bots, work doors and pickups, refresh perception, resolve hitscan fire.
    ///
    /// Returns the bots fragged this tick, in id order.
    pub fn update(&mut self, ctx: &TickContext) -> Vec<u32> {
        self.move_bots(ctx.dt_seconds);
        self.update_doors(ctx.tick);
        self.update_items(ctx.tick);
        self.refresh_senses(ctx.tick, ctx.dt_seconds);
        self.resolve_fire(ctx.dt_seconds)
    }

    /// Put a fragged bot back on its spawn point with nothing in flight.
    pub fn respawn(&mut self, id: u32) {
        let Some(bot) = self.bots.get_mut(&id) else {
            return;
        };
        bot.position = bot.spawn;
        bot.heading = Vec2::ZERO;
        bot.health = bot.max_health;
        bot.ammo.clear();
        bot.steering = Steering::default();
        bot.senses.forget();
        bot.planner.cancel(&mut self.scheduler);
        self.dispatcher.discard_for(id);
        tracing::debug!(bot = id, "respawned");
    }

    fn move_bots(&mut self, dt: f32) {
        for bot in self.bots.values_mut() {
            let step = bot
                .steering
                .displacement(bot.position, bot.max_speed, dt, &mut bot.rng);
            if step.is_zero() {
                continue;
            }
            let Some(next) = free_step(&self.map, bot.position, step, bot.radius) else {
                bot.steering.on_blocked();
                continue;
            };
            bot.position = next;
            if !bot.senses.visible {
                bot.heading = step.normalize_or_zero();
            }
        }
    }

    fn update_doors(&mut self, tick: u64) {
        let mut to_open = Vec::new();
        for door in self.map.doors().filter(|d| !d.open) {
            let used = door.switches.iter().any(|&switch| {
                self.bots
                    .values()
                    .any(|b| b.position.distance(switch) <= SWITCH_RADIUS)
            });
            if used {
                to_open.push(door.id);
            }
        }
        for id in to_open {
            self.map.set_door_open(id, true);
            let open_for = self.door_open_ticks.get(&id).copied().unwrap_or(0);
            self.door_closes_at.insert(id, tick + open_for);
            self.stats.doors_opened += 1;
        }

        // Close due doors unless someone is standing in the doorway.
        let due: Vec<DoorId> = self
            .door_closes_at
            .iter()
            .filter(|(_, &at)| at <= tick)
            .map(|(&id, _)| id)
            .collect();
        for id in due {
            let Some(midpoint) = self.map.door(id).map(|d| d.segment.midpoint()) else {
                continue;
            };
            let occupied = self
                .bots
                .values()
                .any(|b| b.position.distance(midpoint) < self.cell_size);
            if !occupied {
                self.map.set_door_open(id, false);
                self.door_closes_at.remove(&id);
            }
        }
    }

    fn update_items(&mut self, tick: u64) {
        for item in &mut self.items {
            if item.respawn_at.is_some_and(|at| at <= tick) {
                item.respawn_at = None;
                item.taken_by = None;
                self.map.set_trigger_active(item.trigger, true);
                tracing::trace!(trigger = item.trigger.0, kind = %item.kind, "item respawned");
            }
            if !item.is_active() {
                continue;
            }
            let Some(bot) = self
                .bots
                .values_mut()
                .find(|b| b.position.distance(item.position) <= PICKUP_RADIUS)
            else {
                continue;
            };
            match item.kind {
                ItemKind::Health => bot.health = (bot.health + HEALTH_PACK).min(bot.max_health),
                weapon => {
                    bot.ammo.insert(weapon, 1.0);
                }
            }
            item.respawn_at = Some(tick + item.respawn_ticks.max(1));
            item.taken_by = Some(bot.id);
            self.map.set_trigger_active(item.trigger, false);
            self.stats.pickups += 1;
            tracing::debug!(bot = bot.id, kind = %item.kind, "item picked up");
        }
    }

    fn refresh_senses(&mut self, tick: u64, dt: f32) {
        let positions: Vec<(u32, Vec2)> = self.bots.values().map(|b| (b.id, b.position)).collect();
        let memory_ticks = (self.combat.memory_seconds / dt.max(f32::EPSILON)).ceil() as u64;

        for bot in self.bots.values_mut() {
            let observer = Observer {
                id: bot.id,
                position: bot.position,
                heading: bot.heading,
            };
            perception::refresh(
                &self.map,
                observer,
                &positions,
                &mut bot.senses,
                tick,
                memory_ticks,
                &self.combat,
            );
            // Bots turn to face what they can see.
            if let Some(target) = bot.senses.target_position {
                let facing = (target - bot.position).normalize_or_zero();
                if !facing.is_zero() {
                    bot.heading = facing;
                }
            }
        }
    }

    fn resolve_fire(&mut self, dt: f32) -> Vec<u32> {
        let mut hits: Vec<(u32, u32, f32)> = Vec::new();
        for bot in self.bots.values_mut() {
            if !bot.senses.shootable {
                continue;
            }
            let Some(target) = bot.senses.target else {
                continue;
            };
            let mut damage = self.combat.damage_per_second * dt;
            if let Some(weapon) = bot.strongest_weapon() {
                damage *= 2.0;
                if let Some(ammo) = bot.ammo.get_mut(&weapon) {
                    *ammo = (*ammo - AMMO_PER_SECOND * dt).max(0.0);
                }
            }
            hits.push((bot.id, target, damage));
        }

        let mut fragged = Vec::new();
        for (shooter, target, damage) in hits {
            let Some(victim) = self.bots.get_mut(&target) else {
                continue;
            };
            if victim.health <= 0.0 {
                continue;
            }
            victim.health -= damage;
            if victim.health <= 0.0 {
                tracing::debug!(shooter, victim = target, "fragged");
                self.stats.frags += 1;
                fragged.push(target);
            }
        }
        fragged.sort_unstable();
        fragged
    }

    fn step_position(&self, agent: u32, side: f32) -> Option<Vec2> {
        let bot = self.bots.get(&agent)?;
        let forward = match bot.senses.target_position {
            Some(target) => (target - bot.position).normalize_or_zero(),
            None => bot.heading,
        };
        if forward.is_zero() {
            return None;
        }
        let destination = bot.position + forward.perp() * (side * bot.radius * STEP_RADII);
        (!self
            .map
            .is_path_obstructed(bot.position, destination, bot.radius))
        .then_some(destination)
    }

    /// Every trigger giving `kind`. Whether each is active is read from the map as searches
    /// settle nodes.
    fn item_triggers(&self, kind: ItemKind) -> ActiveTrigger {
        ActiveTrigger::new(
            self.items
                .iter()
                .filter(|i| i.kind == kind)
                .map(|i| i.trigger),
        )
    }
}

/// Where a body moving by `step` ends up this tick: the whole step, else its dominant axis,
/// else the other axis. Sliding keeps bots that graze a wall end or corner moving.
fn free_step(map: &NavMap, from: Vec2, step: Vec2, radius: f32) -> Option<Vec2> {
    let along_x = Vec2::new(step.x, 0.0);
    let along_y = Vec2::new(0.0, step.y);
    let (major, minor) = if step.x.abs() >= step.y.abs() {
        (along_x, along_y)
    } else {
        (along_y, along_x)
    };
    [step, major, minor]
        .into_iter()
        .filter(|s| !s.is_zero())
        .map(|s| from + s)
        .find(|&to| !map.is_path_obstructed(from, to, radius))
}

impl BotWorld for Arena {
    fn position(&self, agent: u32) -> Vec2 {
        self.bots.get(&agent).map_or(Vec2::ZERO, |b| b.position)
    }

    fn max_speed(&self, agent: u32) -> f32 {
        self.bots.get(&agent).map_or(0.0, |b| b.max_speed)
    }

    fn health(&self, agent: u32) -> f32 {
        self.bots.get(&agent).map_or(0.0, |b| b.health.max(0.0))
    }

    fn max_health(&self, agent: u32) -> f32 {
        self.bots.get(&agent).map_or(0.0, |b| b.max_health)
    }

    fn bounding_radius(&self, agent: u32) -> f32 {
        self.bots.get(&agent).map_or(0.0, |b| b.radius)
    }

    fn weapon_strength(&self, agent: u32, weapon: ItemKind) -> f32 {
        self.bots
            .get(&agent)
            .and_then(|b| b.ammo.get(&weapon).copied())
            .unwrap_or(0.0)
    }

    fn set_steering_target(&mut self, agent: u32, target: Vec2) {
        if let Some(bot) = self.bots.get_mut(&agent) {
            bot.steering.target = target;
        }
    }

    fn seek_on(&mut self, agent: u32) {
        if let Some(bot) = self.bots.get_mut(&agent) {
            bot.steering.seek = true;
        }
    }

    fn seek_off(&mut self, agent: u32) {
        if let Some(bot) = self.bots.get_mut(&agent) {
            bot.steering.seek = false;
        }
    }

    fn arrive_on(&mut self, agent: u32) {
        if let Some(bot) = self.bots.get_mut(&agent) {
            bot.steering.arrive = true;
        }
    }

    fn arrive_off(&mut self, agent: u32) {
        if let Some(bot) = self.bots.get_mut(&agent) {
            bot.steering.arrive = false;
        }
    }

    fn wander_on(&mut self, agent: u32) {
        if let Some(bot) = self.bots.get_mut(&agent) {
            bot.steering.wander = true;
        }
    }

    fn wander_off(&mut self, agent: u32) {
        if let Some(bot) = self.bots.get_mut(&agent) {
            bot.steering.wander = false;
        }
    }

    fn set_speed_factor(&mut self, agent: u32, factor: f32) {
        if let Some(bot) = self.bots.get_mut(&agent) {
            bot.steering.speed_factor = factor;
        }
    }

    fn is_target_present(&self, agent: u32) -> bool {
        self.bots
            .get(&agent)
            .is_some_and(|b| b.senses.target.is_some())
    }

    fn is_target_shootable(&self, agent: u32) -> bool {
        self.bots.get(&agent).is_some_and(|b| b.senses.shootable)
    }

    fn is_target_within_fov(&self, agent: u32) -> bool {
        self.bots.get(&agent).is_some_and(|b| b.senses.within_fov)
    }

    fn target_position(&self, agent: u32) -> Option<Vec2> {
        self.bots.get(&agent)?.senses.target_position
    }

    fn last_recorded_target_position(&self, agent: u32) -> Option<Vec2> {
        self.bots.get(&agent)?.senses.last_seen
    }

    fn can_step_left(&self, agent: u32) -> Option<Vec2> {
        self.step_position(agent, 1.0)
    }

    fn can_step_right(&self, agent: u32) -> Option<Vec2> {
        self.step_position(agent, -1.0)
    }

    fn has_line_of_sight(&self, agent: u32, to: Vec2) -> bool {
        self.bots
            .get(&agent)
            .is_some_and(|b| perception::has_line_of_sight(&self.map, b.position, to))
    }

    fn request_path_to_position(&mut self, agent: u32, target: Vec2) -> bool {
        let tick = self.tick;
        let Some(bot) = self.bots.get_mut(&agent) else {
            return false;
        };
        let dispatcher = &mut self.dispatcher;
        let position = bot.position;
        bot.planner.request_path_to_position(
            &self.map,
            &mut self.scheduler,
            position,
            target,
            |notice| dispatcher.send_now(tick, agent, agent, Message::from(notice)),
        )
    }

    fn request_path_to_item(&mut self, agent: u32, item: ItemKind) -> bool {
        let tick = self.tick;
        let condition = self.item_triggers(item);
        let Some(bot) = self.bots.get_mut(&agent) else {
            return false;
        };
        let dispatcher = &mut self.dispatcher;
        let position = bot.position;
        bot.planner.request_path_to_item(
            &self.map,
            &mut self.scheduler,
            position,
            condition,
            |notice| dispatcher.send_now(tick, agent, agent, Message::from(notice)),
        )
    }

    fn take_path(&mut self, agent: u32) -> Option<Path> {
        let bot = self.bots.get_mut(&agent)?;
        bot.planner.take_path(&self.map, bot.position, self.smoothing)
    }

    fn cost_to_closest_item(&self, agent: u32, item: ItemKind) -> Option<f32> {
        let bot = self.bots.get(&agent)?;
        bot.planner
            .cost_to_closest_item(&self.map, bot.position, self.item_triggers(item))
    }

    fn is_item_active(&self, trigger: TriggerId) -> bool {
        self.items
            .iter()
            .any(|i| i.trigger == trigger && i.is_active())
    }

    fn has_picked_up(&self, agent: u32, trigger: TriggerId) -> bool {
        self.items
            .iter()
            .any(|i| i.trigger == trigger && i.taken_by == Some(agent))
    }

    fn item_position(&self, trigger: TriggerId) -> Option<Vec2> {
        self.items
            .iter()
            .find(|i| i.trigger == trigger)
            .map(|i| i.position)
    }

    fn can_walk_to(&self, agent: u32, target: Vec2) -> bool {
        self.bots
            .get(&agent)
            .is_some_and(|b| !self.map.is_path_obstructed(b.position, target, b.radius))
    }

    fn can_walk_between(&self, agent: u32, from: Vec2, to: Vec2) -> bool {
        let radius = self.bounding_radius(agent);
        !self.map.is_path_obstructed(from, to, radius)
    }

    fn random_node_position(&mut self, agent: u32) -> Option<Vec2> {
        let bot = self.bots.get_mut(&agent)?;
        self.map.random_node_position(&mut bot.rng)
    }

    /// Open doors need no switch.
    fn door_switch_position(&self, agent: u32, door: DoorId) -> Option<Vec2> {
        let position = self.position(agent);
        let door = self.map.door(door).filter(|d| !d.open)?;
        door.switches.iter().copied().min_by(|a, b| {
            a.distance_squared(position)
                .total_cmp(&b.distance_squared(position))
        })
    }

    fn cover_position(&self, agent: u32) -> Option<Vec2> {
        let bot = self.bots.get(&agent)?;
        let threat = bot.senses.target_position.or(bot.senses.last_seen)?;
        let graph = self.map.graph();
        self.map
            .nodes_near(bot.position, COVER_SEARCH_RANGE)
            .into_iter()
            .filter_map(|node| graph.position(node))
            .filter(|&pos| !perception::has_line_of_sight(&self.map, pos, threat))
            .min_by(|a, b| {
                a.distance_squared(bot.position)
                    .total_cmp(&b.distance_squared(bot.position))
            })
    }
}
