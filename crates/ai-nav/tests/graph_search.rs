use ai_nav::heuristic::{Euclidean, Noisy, Zero};
use ai_nav::{
    ActiveTrigger, AStarSearch, DijkstraSearch, GraphEdge, NavGraph, NodeExtra, SearchKind,
    SearchStatus, TimeSlicedSearch, TriggerId, Vec2,
};

/// 0 -10- 1 -10- 2, plus a direct 0 -25- 2 shortcut that is more expensive.
fn detour_graph() -> NavGraph {
    let mut g = NavGraph::new_undirected();
    let n0 = g.add_node(Vec2::new(0.0, 0.0), NodeExtra::None);
    let n1 = g.add_node(Vec2::new(10.0, 0.0), NodeExtra::None);
    let n2 = g.add_node(Vec2::new(20.0, 0.0), NodeExtra::None);
    g.add_edge(GraphEdge::new(n0, n2, 25.0)).unwrap();
    g.add_edge(GraphEdge::new(n0, n1, 10.0)).unwrap();
    g.add_edge(GraphEdge::new(n1, n2, 10.0)).unwrap();
    g
}

#[test]
fn a_star_prefers_cheaper_two_hop_route() {
    let g = detour_graph();
    let mut search = AStarSearch::new(&g, 0, 2, Euclidean).unwrap();

    assert_eq!(search.run_to_completion(&g), SearchStatus::Found);
    let result = search.result().unwrap();
    assert_eq!(result.kind, SearchKind::AStar);
    assert_eq!(result.nodes(), vec![0, 1, 2]);
    assert_eq!(result.cost, 20.0);
    assert!(result.edges.iter().all(|e| e.flags.is_normal()));
}

#[test]
fn each_step_expands_one_node() {
    let g = detour_graph();
    let mut search = AStarSearch::new(&g, 0, 2, Zero).unwrap();

    assert_eq!(search.step(&g), SearchStatus::Incomplete);
    assert_eq!(search.settled_cost(0), Some(0.0));
    assert_eq!(search.settled_cost(1), None);
    assert_eq!(search.step(&g), SearchStatus::Incomplete);
    assert_eq!(search.settled_cost(1), Some(10.0));
    assert_eq!(search.step(&g), SearchStatus::Found);

    // Finished searches are sticky.
    assert_eq!(search.step(&g), SearchStatus::Found);
    assert_eq!(search.status(), SearchStatus::Found);
}

#[test]
fn disconnected_target_is_not_found() {
    let mut g = detour_graph();
    let island = g.add_node(Vec2::new(100.0, 100.0), NodeExtra::None);
    let mut search = AStarSearch::new(&g, 0, island, Euclidean).unwrap();

    assert_eq!(search.run_to_completion(&g), SearchStatus::NotFound);
    assert!(search.result().is_none());
    assert_eq!(search.step(&g), SearchStatus::NotFound);
}

#[test]
fn source_equal_to_target_is_an_empty_path() {
    let g = detour_graph();
    let mut search = AStarSearch::new(&g, 1, 1, Euclidean).unwrap();
    assert_eq!(search.step(&g), SearchStatus::Found);
    let result = search.result().unwrap();
    assert!(result.edges.is_empty());
    assert_eq!(result.cost, 0.0);
}

#[test]
fn removed_nodes_are_rejected_as_endpoints() {
    let mut g = detour_graph();
    g.remove_node(2).unwrap();
    assert!(AStarSearch::new(&g, 0, 2, Euclidean).is_err());
    assert!(DijkstraSearch::new(&g, 2, ActiveTrigger::default()).is_err());
}

#[test]
fn identical_inputs_produce_identical_paths() {
    let mut g = NavGraph::new_undirected();
    for y in 0..4 {
        for x in 0..4 {
            g.add_node(Vec2::new(x as f32, y as f32), NodeExtra::None);
        }
    }
    for y in 0..4 {
        for x in 0..4 {
            let i = y * 4 + x;
            if x + 1 < 4 {
                g.add_edge(GraphEdge::new(i, i + 1, 1.0)).unwrap();
            }
            if y + 1 < 4 {
                g.add_edge(GraphEdge::new(i, i + 4, 1.0)).unwrap();
            }
        }
    }

    let run = |seed| {
        let mut search = AStarSearch::new(&g, 0, 15, Noisy::new(seed)).unwrap();
        search.run_to_completion(&g);
        search.result().unwrap()
    };
    assert_eq!(run(7), run(7));
    assert_eq!(run(7).cost, 6.0);
}

#[test]
fn item_search_stops_at_nearest_active_trigger() {
    let mut g = NavGraph::new_undirected();
    let start = g.add_node(Vec2::new(0.0, 0.0), NodeExtra::None);
    let near = g.add_node(Vec2::new(50.0, 0.0), NodeExtra::Trigger(TriggerId(1)));
    let far = g.add_node(Vec2::new(0.0, 400.0), NodeExtra::Trigger(TriggerId(2)));
    g.add_edge(GraphEdge::new(start, near, 50.0)).unwrap();
    g.add_edge(GraphEdge::new(start, far, 400.0)).unwrap();

    let mut search = DijkstraSearch::new(&g, start, ActiveTrigger::new([TriggerId(1), TriggerId(2)])).unwrap();
    assert_eq!(search.run_to_completion(&g), SearchStatus::Found);
    let result = search.result().unwrap();
    assert_eq!(result.kind, SearchKind::Dijkstra);
    assert_eq!(result.target, near);
    assert_eq!(result.trigger, Some(TriggerId(1)));

    // Triggers outside the wanted set are ignored.
    let mut search = DijkstraSearch::new(&g, start, ActiveTrigger::new([TriggerId(2)])).unwrap();
    search.run_to_completion(&g);
    let result = search.result().unwrap();
    assert_eq!(result.target, far);
    assert_eq!(result.cost, 400.0);

    let mut search = DijkstraSearch::new(&g, start, ActiveTrigger::default()).unwrap();
    assert_eq!(search.run_to_completion(&g), SearchStatus::NotFound);
}

/// start -50- near (trigger 1), start -400- far (trigger 2).
fn two_item_graph() -> (NavGraph, usize, usize, usize) {
    let mut g = NavGraph::new_undirected();
    let start = g.add_node(Vec2::new(0.0, 0.0), NodeExtra::None);
    let near = g.add_node(Vec2::new(50.0, 0.0), NodeExtra::Trigger(TriggerId(1)));
    let far = g.add_node(Vec2::new(0.0, 400.0), NodeExtra::Trigger(TriggerId(2)));
    g.add_edge(GraphEdge::new(start, near, 50.0)).unwrap();
    g.add_edge(GraphEdge::new(start, far, 400.0)).unwrap();
    (g, start, near, far)
}

#[test]
fn item_taken_before_the_search_starts_is_skipped() {
    let (mut g, start, _, far) = two_item_graph();
    g.set_trigger_active(TriggerId(1), false);
    assert!(!g.is_trigger_active(TriggerId(1)));

    let condition = ActiveTrigger::new([TriggerId(1), TriggerId(2)]);
    assert!(condition.any_active(&g));
    let mut search = DijkstraSearch::new(&g, start, condition).unwrap();
    assert_eq!(search.run_to_completion(&g), SearchStatus::Found);
    assert_eq!(search.result().unwrap().target, far);
}

#[test]
fn item_taken_mid_search_is_skipped() {
    let (mut g, start, _, far) = two_item_graph();
    let mut search =
        DijkstraSearch::new(&g, start, ActiveTrigger::new([TriggerId(1), TriggerId(2)])).unwrap();

    // Settles the start and queues both items.
    assert_eq!(search.step(&g), SearchStatus::Incomplete);
    g.set_trigger_active(TriggerId(1), false);

    assert_eq!(search.run_to_completion(&g), SearchStatus::Found);
    let result = search.result().unwrap();
    assert_eq!(result.target, far);
    assert_eq!(result.trigger, Some(TriggerId(2)));
}

#[test]
fn item_respawned_mid_search_is_found() {
    let (mut g, start, near, _) = two_item_graph();
    g.set_trigger_active(TriggerId(1), false);
    let condition = ActiveTrigger::new([TriggerId(1)]);
    assert!(!condition.any_active(&g));
    let mut search = DijkstraSearch::new(&g, start, condition).unwrap();

    assert_eq!(search.step(&g), SearchStatus::Incomplete);
    g.set_trigger_active(TriggerId(1), true);

    assert_eq!(search.step(&g), SearchStatus::Found);
    let result = search.result().unwrap();
    assert_eq!(result.target, near);
    assert_eq!(result.cost, 50.0);
}

#[test]
fn directed_edges_are_one_way() {
    let mut g = NavGraph::new_directed();
    let a = g.add_node(Vec2::new(0.0, 0.0), NodeExtra::None);
    let b = g.add_node(Vec2::new(1.0, 0.0), NodeExtra::None);
    g.add_edge(GraphEdge::new(a, b, 1.0)).unwrap();

    let mut forward = AStarSearch::new(&g, a, b, Euclidean).unwrap();
    assert_eq!(forward.run_to_completion(&g), SearchStatus::Found);
    let mut backward = AStarSearch::new(&g, b, a, Euclidean).unwrap();
    assert_eq!(backward.run_to_completion(&g), SearchStatus::NotFound);
}
