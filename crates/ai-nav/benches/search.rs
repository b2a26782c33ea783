use std::hint::black_box;

use ai_nav::heuristic::Euclidean;
use ai_nav::{AStarSearch, NavGraph, NavGrid, PathScheduler, Ticket, TimeSlicedSearch};
use criterion::{criterion_group, criterion_main, Criterion};

fn maze(size: u32) -> (NavGrid, NavGraph) {
    let mut grid = NavGrid::new(size, size, 1.0).expect("grid");
    // Serpentine walls with alternating gaps.
    for x in (4..size as i32).step_by(4) {
        let gap = if (x / 4) % 2 == 0 { 0 } else { size as i32 - 1 };
        for y in 0..size as i32 {
            if y != gap {
                grid.set_blocked(x, y, true);
            }
        }
    }
    let graph = grid.build_graph();
    (grid, graph)
}

fn bench_a_star(c: &mut Criterion) {
    let (grid, graph) = maze(64);
    let start = grid.node_index(0, 0).expect("start");
    let goal = grid.node_index(63, 63).expect("goal");

    c.bench_function("a_star_maze_64", |b| {
        b.iter(|| {
            let mut search = AStarSearch::new(&graph, start, goal, Euclidean).expect("search");
            black_box(search.run_to_completion(&graph));
            black_box(search.result());
        })
    });
}

fn bench_scheduler(c: &mut Criterion) {
    let (grid, graph) = maze(64);
    let goal = grid.node_index(63, 63).expect("goal");

    c.bench_function("scheduler_32_agents_until_done", |b| {
        b.iter(|| {
            let mut scheduler = PathScheduler::<u32>::new(200);
            for agent in 0..32u32 {
                let start = grid.node_index(0, agent as i32).expect("start");
                let search = AStarSearch::new(&graph, start, goal, Euclidean).expect("search");
                scheduler.register(agent, Ticket(1), Box::new(search));
            }
            let mut finished = 0;
            while !scheduler.is_empty() {
                finished += scheduler.advance_all(&graph, |_| {}).finished;
            }
            black_box(finished);
        })
    });
}

criterion_group!(benches, bench_a_star, bench_scheduler);
criterion_main!(benches);
