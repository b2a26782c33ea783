use ai_core::{Regulator, TickContext};

#[test]
fn regulator_fires_every_n_ticks() {
    let reg = Regulator::every(4);
    let fired: Vec<u64> = (0..12).filter(|t| reg.is_ready(*t)).collect();
    assert_eq!(fired, vec![0, 4, 8]);
}

#[test]
fn deterministic_offsets_spread_agents() {
    let a = Regulator::deterministic(1u32, 4);
    let b = Regulator::deterministic(2u32, 4);
    let fired_a: Vec<u64> = (0..8).filter(|t| a.is_ready(*t)).collect();
    let fired_b: Vec<u64> = (0..8).filter(|t| b.is_ready(*t)).collect();
    assert_eq!(fired_a, vec![3, 7]);
    assert_eq!(fired_b, vec![2, 6]);
}

#[test]
fn zero_interval_is_treated_as_every_tick() {
    let reg = Regulator::deterministic(9u64, 0);
    assert!((0..5).all(|t| reg.is_ready(t)));
}

#[test]
fn tick_context_clock_advances_with_dt() {
    let ctx = TickContext::new(10, 0.5, 1);
    assert_eq!(ctx.time_seconds(), 5.0);
    assert_eq!(ctx.next().tick, 11);
}
