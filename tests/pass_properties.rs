use agerush::{run_pass, HeuristicProfile, Scenario};

fn default_pass() -> agerush::PassResult {
    run_pass(&Scenario::example(), &HeuristicProfile::default())
}

#[test]
fn allocations_never_exceed_the_working_population() {
    let result = default_pass();
    for step in &result.log {
        let allocation = &step.allocation;
        let working = step.population.saturating_sub(1);
        assert!(
            allocation.assigned() <= working,
            "allocation {:?} exceeds working population {} at {}",
            allocation,
            working,
            step.time_secs
        );
    }
}

#[test]
fn stockpiles_stay_non_negative_throughout() {
    let result = default_pass();
    for step in &result.log {
        for value in [
            step.stocks.food,
            step.stocks.wood,
            step.stocks.gold,
            step.stocks.stone,
        ] {
            assert!(value >= 0.0, "negative stock at {}", step.time_secs);
        }
    }
    for sample in &result.resource_curve {
        assert!(sample.stocks.food >= 0.0);
        assert!(sample.stocks.wood >= 0.0);
        assert!(sample.stocks.gold >= 0.0);
    }
}

#[test]
fn log_times_and_population_are_monotonic() {
    let result = default_pass();
    let mut last_time = 0.0_f64;
    let mut last_population = 0_u32;
    for step in &result.log {
        assert!(
            step.time_secs >= last_time,
            "log went backwards at {}",
            step.time_secs
        );
        assert!(
            step.population >= last_population,
            "population shrank at {}",
            step.time_secs
        );
        last_time = step.time_secs;
        last_population = step.population;
    }
}

#[test]
fn identical_configurations_replay_identically() {
    let a = default_pass();
    let b = default_pass();
    assert_eq!(a, b);
}

#[test]
fn isolated_passes_do_not_bleed_into_each_other() {
    // Interleave a second scenario between two identical runs; the replay
    // must not notice.
    let first = default_pass();
    let mut other = Scenario::example();
    other.name = "interloper".into();
    other.target_population = 25;
    let _ = run_pass(&other, &HeuristicProfile::default());
    let second = default_pass();
    assert_eq!(first, second);
}

#[test]
fn efficiency_samples_stay_in_bounds() {
    let result = default_pass();
    assert!(!result.efficiency_curve.is_empty());
    for sample in &result.efficiency_curve {
        assert!((0.0..=1.0).contains(&sample.utilization));
        assert!(sample.decayed_food >= 0.0);
    }
    // Spoilage only accumulates.
    for window in result.efficiency_curve.windows(2) {
        assert!(window[1].decayed_food >= window[0].decayed_food);
    }
}

#[test]
fn the_score_is_bounded() {
    let result = default_pass();
    assert!((0.0..=1.0).contains(&result.score));
}
