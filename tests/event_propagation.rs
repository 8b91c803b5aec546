use living_world_core::config::PropagationConfig;
use living_world_core::model::WorldGrid;
use living_world_core::sim::propagation::{propagate, DecayCurve};
use std::collections::BTreeMap;

#[test]
fn full_saturation_means_certain_probability_reaches_every_neighbor() {
    let grid = WorldGrid::new(1, 20, 20);
    let config = PropagationConfig {
        decay_k: 0.0,
        max_hops: 1,
        acceptance_threshold: 0.0,
    };
    let result = propagate(
        &grid,
        (10, 10),
        1.0,
        &config,
        DecayCurve::Exponential,
        &BTreeMap::new(),
        0,
        100,
        1,
        1,
        0,
    );
    // Origin plus its 4 grid neighbors, each reached with probability 1.
    assert_eq!(result.reached.len(), 5);
}

#[test]
fn a_tight_cap_suppresses_propagation_entirely() {
    let grid = WorldGrid::new(1, 20, 20);
    let config = PropagationConfig::default();
    let result = propagate(
        &grid,
        (10, 10),
        1.0,
        &config,
        DecayCurve::Exponential,
        &BTreeMap::new(),
        100,
        100,
        1,
        1,
        0,
    );
    // Saturation factor is zero at the cap, so nothing beyond the origin
    // tile is reached regardless of base probability.
    assert_eq!(result.reached, vec![((10, 10), 0)]);
}
