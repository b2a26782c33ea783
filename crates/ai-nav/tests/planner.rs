use ai_nav::{
    smooth_precise, ActiveTrigger, DoorId, GraphEdge, MapQuery, NavGraph, NavMap, NodeExtra, Path,
    PathNotice, PathPlanner, PathScheduler, SearchEvent, SearchOutcome, Smoothing, Ticket,
    TriggerId, Vec2, Wall,
};

const RADIUS: f32 = 5.0;
const AGENT: u32 = 1;

/// A U-shaped route around a wall at x = 50:
///
/// ```text
///  n1 (10,100) ---- n2 (90,100)  [trigger 5]
///   |                 |
///  n0 (10,0)   |     n3 (90,0)
/// ```
fn u_map(door_on_top: bool) -> NavMap {
    let mut g = NavGraph::new_undirected();
    let n0 = g.add_node(Vec2::new(10.0, 0.0), NodeExtra::None);
    let n1 = g.add_node(Vec2::new(10.0, 100.0), NodeExtra::None);
    let n2 = g.add_node(Vec2::new(90.0, 100.0), NodeExtra::Trigger(TriggerId(5)));
    let n3 = g.add_node(Vec2::new(90.0, 0.0), NodeExtra::None);
    g.add_edge(GraphEdge::new(n0, n1, 100.0)).unwrap();
    let mut top = GraphEdge::new(n1, n2, 80.0);
    if door_on_top {
        top = top.through_door(DoorId(1));
    }
    g.add_edge(top).unwrap();
    g.add_edge(GraphEdge::new(n2, n3, 100.0)).unwrap();

    NavMap::new(g, 50.0, 50.0).with_walls([Wall::new(
        Vec2::new(50.0, -100.0),
        Vec2::new(50.0, 80.0),
    )])
}

fn run_until_notice(
    map: &NavMap,
    planner: &mut PathPlanner<u32>,
    scheduler: &mut PathScheduler<u32>,
) -> Option<PathNotice> {
    for _ in 0..32 {
        let mut events: Vec<SearchEvent<u32>> = Vec::new();
        scheduler.advance_all(map.graph(), |e| events.push(e));
        if let Some(notice) = events.into_iter().find_map(|e| planner.on_search_event(e)) {
            return Some(notice);
        }
    }
    None
}

fn endpoints(path: &Path) -> Vec<(Vec2, Vec2)> {
    path.iter().map(|e| (e.source, e.destination)).collect()
}

#[test]
fn obstructed_target_goes_through_the_scheduler() {
    let map = u_map(false);
    let mut scheduler = PathScheduler::new(100);
    let mut planner = PathPlanner::new(AGENT, RADIUS);

    let mut notices = Vec::new();
    let agent = Vec2::new(0.0, 0.0);
    let target = Vec2::new(100.0, 0.0);
    assert!(planner.request_path_to_position(&map, &mut scheduler, agent, target, |n| notices.push(n)));
    assert!(notices.is_empty());
    assert!(scheduler.is_registered(AGENT));

    let notice = run_until_notice(&map, &mut planner, &mut scheduler).expect("search finishes");
    assert_eq!(
        notice,
        PathNotice::PathReady {
            ticket: Ticket(1),
            item: None
        }
    );
    assert!(scheduler.is_empty());

    let path = planner.take_path(&map, agent, Smoothing::None).expect("path");
    assert_eq!(path.len(), 5);
    assert_eq!(path.front().map(|e| e.source), Some(agent));
    assert_eq!(path.back().map(|e| e.destination), Some(target));
    assert!(planner.take_path(&map, agent, Smoothing::None).is_none());
}

#[test]
fn smoothing_cuts_clear_corners_only() {
    let map = u_map(false);
    let mut scheduler = PathScheduler::new(100);
    let agent = Vec2::new(0.0, 0.0);
    let target = Vec2::new(100.0, 0.0);

    let mut paths = Vec::new();
    for smoothing in [Smoothing::Quick, Smoothing::Precise] {
        let mut planner = PathPlanner::new(AGENT, RADIUS);
        planner.request_path_to_position(&map, &mut scheduler, agent, target, |_| {});
        run_until_notice(&map, &mut planner, &mut scheduler).expect("notice");
        paths.push(planner.take_path(&map, agent, smoothing).expect("path"));
    }

    let expected = vec![
        (Vec2::new(0.0, 0.0), Vec2::new(10.0, 100.0)),
        (Vec2::new(10.0, 100.0), Vec2::new(90.0, 100.0)),
        (Vec2::new(90.0, 100.0), Vec2::new(100.0, 0.0)),
    ];
    assert_eq!(endpoints(&paths[0]), expected);
    assert_eq!(endpoints(&paths[1]), expected);

    let mut again = paths[1].clone();
    smooth_precise(&mut again, &map, RADIUS);
    assert_eq!(again, paths[1]);
}

#[test]
fn door_edges_are_never_merged() {
    let map = u_map(true);
    let mut scheduler = PathScheduler::new(100);
    let mut planner = PathPlanner::new(AGENT, RADIUS);
    let agent = Vec2::new(0.0, 0.0);

    planner.request_path_to_position(&map, &mut scheduler, agent, Vec2::new(100.0, 0.0), |_| {});
    run_until_notice(&map, &mut planner, &mut scheduler).expect("notice");
    let path = planner.take_path(&map, agent, Smoothing::Precise).expect("path");

    let door = path.iter().find(|e| e.door.is_some()).expect("door edge");
    assert_eq!(door.door, Some(DoorId(1)));
    assert_eq!(door.source, Vec2::new(10.0, 100.0));
    assert_eq!(door.destination, Vec2::new(90.0, 100.0));
}

#[test]
fn visible_target_is_ready_without_a_search() {
    let map = u_map(false);
    let mut scheduler = PathScheduler::new(100);
    let mut planner = PathPlanner::new(AGENT, RADIUS);

    let mut notices = Vec::new();
    let agent = Vec2::new(0.0, 0.0);
    let target = Vec2::new(20.0, 30.0);
    assert!(planner.request_path_to_position(&map, &mut scheduler, agent, target, |n| notices.push(n)));
    assert!(scheduler.is_empty());
    assert_eq!(
        notices,
        vec![PathNotice::PathReady {
            ticket: Ticket(1),
            item: None
        }]
    );

    let path = planner.take_path(&map, agent, Smoothing::Quick).expect("path");
    assert_eq!(endpoints(&path), vec![(agent, target)]);
}

#[test]
fn boxed_in_agent_fails_synchronously() {
    let map = u_map(false);
    let mut scheduler = PathScheduler::new(100);
    let mut planner = PathPlanner::new(AGENT, RADIUS);

    let mut notices = Vec::new();
    let ok = planner.request_path_to_position(
        &map,
        &mut scheduler,
        Vec2::new(-300.0, 0.0),
        Vec2::new(100.0, 0.0),
        |n| notices.push(n),
    );
    assert!(!ok);
    assert!(scheduler.is_empty());
    assert_eq!(notices, vec![PathNotice::NoPathAvailable { ticket: Ticket(1) }]);
}

#[test]
fn new_request_supersedes_the_previous_one() {
    let map = u_map(false);
    let mut scheduler = PathScheduler::new(100);
    let mut planner = PathPlanner::new(AGENT, RADIUS);
    let agent = Vec2::new(0.0, 0.0);

    planner.request_path_to_position(&map, &mut scheduler, agent, Vec2::new(100.0, 0.0), |_| {});
    planner.request_path_to_position(&map, &mut scheduler, agent, Vec2::new(95.0, 5.0), |_| {});
    assert_eq!(scheduler.len(), 1);
    assert_eq!(scheduler.ticket_for(AGENT), Some(Ticket(2)));
    assert!(planner.is_current(Ticket(2)));

    let stale = SearchEvent {
        owner: AGENT,
        ticket: Ticket(1),
        outcome: SearchOutcome::NotFound,
    };
    assert_eq!(planner.on_search_event(stale), None);

    let notice = run_until_notice(&map, &mut planner, &mut scheduler).expect("notice");
    assert_eq!(notice.ticket(), Ticket(2));
}

#[test]
fn item_request_ends_on_the_trigger_node() {
    let mut map = u_map(false);
    let mut scheduler = PathScheduler::new(100);
    let mut planner = PathPlanner::new(AGENT, RADIUS);
    let agent = Vec2::new(0.0, 0.0);

    assert!(planner.request_path_to_item(
        &map,
        &mut scheduler,
        agent,
        ActiveTrigger::new([TriggerId(5)]),
        |_| {}
    ));
    let notice = run_until_notice(&map, &mut planner, &mut scheduler).expect("notice");
    assert_eq!(
        notice,
        PathNotice::PathReady {
            ticket: Ticket(1),
            item: Some(TriggerId(5))
        }
    );

    let path = planner.take_path(&map, agent, Smoothing::None).expect("path");
    assert_eq!(path.back().map(|e| e.destination), Some(Vec2::new(90.0, 100.0)));

    let cost = planner
        .cost_to_closest_item(&map, agent, ActiveTrigger::new([TriggerId(5)]))
        .expect("cost");
    assert!((cost - 190.0).abs() < 1e-3);
    assert_eq!(
        planner.cost_to_closest_item(&map, agent, ActiveTrigger::default()),
        None
    );

    map.set_trigger_active(TriggerId(5), false);
    assert_eq!(
        planner.cost_to_closest_item(&map, agent, ActiveTrigger::new([TriggerId(5)])),
        None
    );
}

#[test]
fn closed_doors_obstruct_straight_lines() {
    let mut map = u_map(false);
    map.add_door(ai_nav::Door {
        id: DoorId(2),
        segment: Wall::new(Vec2::new(0.0, 20.0), Vec2::new(30.0, 20.0)),
        switches: vec![Vec2::new(40.0, 10.0)],
        open: false,
    });

    let a = Vec2::new(10.0, 0.0);
    let b = Vec2::new(10.0, 40.0);
    assert!(map.is_path_obstructed(a, b, RADIUS));
    assert!(map.set_door_open(DoorId(2), true));
    assert!(!map.is_path_obstructed(a, b, RADIUS));
    assert!(!map.set_door_open(DoorId(9), true));
}
