use ai_goals::GoalKind;
use ai_nav::{DoorId, EdgeFlags, MapQuery, Vec2, Wall};
use ai_sim::{
    BiasConfig, BotConfig, DoorConfig, GridConfig, ItemConfig, ScenarioConfig, ScenarioError,
    Simulation,
};

fn bot(id: u32, x: f32, y: f32, health: f32) -> BotConfig {
    BotConfig {
        id,
        position: Vec2::new(x, y),
        health,
        max_health: 100.0,
        max_speed: 60.0,
        radius: 5.0,
        biases: BiasConfig::default(),
    }
}

fn item(kind: &str, x: f32, y: f32) -> ItemConfig {
    ItemConfig {
        kind: kind.to_string(),
        position: Vec2::new(x, y),
        respawn_ticks: 10_000,
    }
}

/// 10x10 cells of 20 units with a wall hanging down from the top edge at x = 100.
fn walled_room() -> ScenarioConfig {
    ScenarioConfig {
        name: "walled-room".to_string(),
        grid: GridConfig {
            width: 10,
            height: 10,
            cell_size: 20.0,
            blocked: Vec::new(),
        },
        walls: vec![Wall::new(Vec2::new(100.0, 0.0), Vec2::new(100.0, 150.0))],
        ..ScenarioConfig::default()
    }
}

#[test]
fn demo_scenario_builds() {
    let config = ScenarioConfig::demo().unwrap();
    config.validate().unwrap();
    assert_eq!(config.bots.len(), 3);

    let sim = Simulation::from_config(&config).unwrap();
    let arena = sim.arena();
    assert_eq!(arena.items().len(), 4);
    assert!(arena.items().iter().all(|i| i.is_active()));
    assert!(!arena.is_door_open(DoorId(1)));

    let door_edges = arena
        .map()
        .graph()
        .edges()
        .filter(|e| e.flags.contains(EdgeFlags::GOES_THROUGH_DOOR))
        .count();
    assert!(door_edges > 0);
    assert_eq!(sim.brains().len(), 3);
}

#[test]
fn minimal_yaml_falls_back_to_defaults() {
    let yaml = "bots:\n  - id: 4\n    position: { x: 30.0, y: 30.0 }\n";
    let config: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(config.seed, 7);
    assert_eq!(config.search_cycles_per_tick, 64);
    assert_eq!(config.grid.width, 16);
    assert_eq!(config.bots[0].max_speed, 60.0);
    assert_eq!(config.bots[0].health, 100.0);
    config.validate().unwrap();
}

#[test]
fn runs_are_deterministic() {
    let config = ScenarioConfig::demo().unwrap();
    let mut a = Simulation::from_config(&config).unwrap();
    let mut b = Simulation::from_config(&config).unwrap();

    let first = a.run(250);
    let second = b.run(250);
    assert_eq!(first, second);
    assert_eq!(first.ticks, 250);

    let positions = |sim: &Simulation| -> Vec<(u32, Vec2)> {
        sim.arena().bots().map(|b| (b.id, b.position)).collect()
    };
    assert_eq!(positions(&a), positions(&b));
}

#[test]
fn search_budget_is_never_exceeded() {
    let mut config = ScenarioConfig::demo().unwrap();
    config.search_cycles_per_tick = 2;
    let mut sim = Simulation::from_config(&config).unwrap();

    let mut finished = 0;
    for _ in 0..300 {
        let report = sim.step();
        assert!(report.search_steps <= 2);
        finished += report.searches_finished;
    }
    assert!(finished > 0);
    assert_eq!(sim.arena().stats().searches_finished, finished as u64);
}

#[test]
fn each_search_steps_once_per_tick() {
    let config = ScenarioConfig::demo().unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();

    for _ in 0..200 {
        let in_flight_before = sim.arena().searches_in_flight();
        let report = sim.step();
        assert!(report.search_steps <= in_flight_before);
    }
}

#[test]
fn hurt_bot_walks_around_the_wall_for_health() {
    let mut config = walled_room();
    config.items = vec![item("health", 150.0, 50.0)];
    config.bots = vec![bot(1, 50.0, 50.0, 30.0)];
    let mut sim = Simulation::from_config(&config).unwrap();

    sim.step();
    assert_eq!(
        sim.brain(1).unwrap().active_goals(),
        vec![GoalKind::Think, GoalKind::GetHealth]
    );

    let summary = sim.run(450);
    assert!(summary.stats.paths_ready >= 1);
    assert_eq!(summary.stats.pickups, 1);
    assert!(sim.arena().bot(1).unwrap().health > 30.0);
    assert!(!sim.arena().items()[0].is_active());
}

#[test]
fn bot_opens_a_door_on_the_way() {
    let mut config = ScenarioConfig {
        grid: GridConfig {
            width: 10,
            height: 6,
            cell_size: 20.0,
            blocked: Vec::new(),
        },
        walls: vec![
            Wall::new(Vec2::new(100.0, 0.0), Vec2::new(100.0, 40.0)),
            Wall::new(Vec2::new(100.0, 80.0), Vec2::new(100.0, 120.0)),
        ],
        doors: vec![DoorConfig {
            id: 1,
            from: Vec2::new(100.0, 40.0),
            to: Vec2::new(100.0, 80.0),
            switches: vec![Vec2::new(70.0, 20.0)],
            open_ticks: 150,
        }],
        ..ScenarioConfig::default()
    };
    config.items = vec![item("health", 170.0, 60.0)];
    config.bots = vec![bot(1, 30.0, 60.0, 30.0)];
    let mut sim = Simulation::from_config(&config).unwrap();

    let summary = sim.run(600);
    assert!(summary.stats.doors_opened >= 1);
    assert_eq!(summary.stats.pickups, 1);
}

#[test]
fn lone_healthy_bot_explores() {
    let mut config = walled_room();
    config.bots = vec![bot(1, 50.0, 50.0, 100.0)];
    let mut sim = Simulation::from_config(&config).unwrap();

    sim.step();
    assert_eq!(
        sim.brain(1).unwrap().active_goals().get(1),
        Some(&GoalKind::Explore)
    );

    let start = sim.arena().bot(1).unwrap().position;
    sim.run(200);
    assert!(sim.arena().stats().paths_ready >= 1);
    assert_ne!(sim.arena().bot(1).unwrap().position, start);
}

#[test]
fn unknown_item_kind_is_rejected() {
    let mut config = walled_room();
    config.items = vec![item("plasma_rifle", 50.0, 50.0)];
    config.bots = vec![bot(1, 50.0, 50.0, 100.0)];

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ScenarioError::UnknownItem(ref kind) if kind == "plasma_rifle"));
}

#[test]
fn scenario_without_bots_is_rejected() {
    let config = walled_room();
    assert!(matches!(config.validate(), Err(ScenarioError::NoBots)));
}

#[test]
fn duplicate_bot_ids_are_rejected() {
    let mut config = walled_room();
    config.bots = vec![bot(3, 50.0, 50.0, 100.0), bot(3, 150.0, 50.0, 100.0)];
    assert!(matches!(
        Simulation::from_config(&config),
        Err(ScenarioError::DuplicateBot(3))
    ));
}

#[test]
fn bot_off_the_map_is_unreachable() {
    let mut config = walled_room();
    config.bots = vec![bot(1, 1000.0, 1000.0, 100.0)];
    assert!(matches!(
        Simulation::from_config(&config),
        Err(ScenarioError::Unreachable { .. })
    ));
}

#[test]
fn zero_budget_is_rejected() {
    let mut config = walled_room();
    config.bots = vec![bot(1, 50.0, 50.0, 100.0)];
    config.search_cycles_per_tick = 0;
    assert!(matches!(
        config.validate(),
        Err(ScenarioError::NonPositive {
            field: "search_cycles_per_tick"
        })
    ));
}
