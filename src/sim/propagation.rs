//! Event propagation: BFS spread of a story/event across the tile grid
//! with exponential (or linear) decay, connection factors, and
//! per-region saturation damping.

use std::collections::{BTreeMap, HashSet, VecDeque};

use rand::Rng;

use super::saturation::saturation_factor;
use crate::config::PropagationConfig;
use crate::id::rng_for;
use crate::model::WorldGrid;

/// Decay curve applied to `base_probability` as a function of hop count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayCurve {
    Exponential,
    Linear,
}

/// Probability of propagation surviving to hop `h`: exponential decay by
/// default, with a linear alternative, each scaled by the edge's
/// connection factor and the destination region's saturation factor.
pub fn p_eff(
    base_probability: f64,
    h: u32,
    decay_k: f64,
    curve: DecayCurve,
    connection_factor: f64,
    saturation: f64,
) -> f64 {
    let decay = match curve {
        DecayCurve::Exponential => (-decay_k * h as f64).exp(),
        DecayCurve::Linear => (1.0 - decay_k * h as f64).max(0.0),
    };
    (base_probability * decay * connection_factor * saturation).max(0.0)
}

/// Result of one propagation run: every tile the event reached, with the
/// hop distance from `origin`.
#[derive(Debug, Clone, Default)]
pub struct PropagationResult {
    pub reached: Vec<((i64, i64), u32)>,
}

/// Propagate an event from `origin` across `grid`, stopping at
/// `config.max_hops` or when `p_eff` drops below
/// `config.acceptance_threshold`. `connection_factors` is a sparse
/// edge-factor map keyed by the destination tile; tiles absent from it
/// default to `1.0`. `active_counts`/`caps` feed the per-region
/// saturation factor via [`saturation_factor`].
#[allow(clippy::too_many_arguments)]
pub fn propagate(
    grid: &WorldGrid,
    origin: (i64, i64),
    base_probability: f64,
    config: &PropagationConfig,
    curve: DecayCurve,
    connection_factors: &BTreeMap<(i64, i64), f64>,
    region_active_count: u32,
    region_cap: u32,
    seed: u64,
    event_id: u64,
    current_tick: u64,
) -> PropagationResult {
    let saturation = saturation_factor(region_active_count, region_cap);
    let mut rng = rng_for(seed, (event_id, current_tick));
    let mut visited: HashSet<(i64, i64)> = HashSet::new();
    visited.insert(origin);
    let mut queue: VecDeque<((i64, i64), u32)> = VecDeque::new();
    queue.push_back((origin, 0));
    let mut reached = vec![(origin, 0)];

    while let Some((pos, hop)) = queue.pop_front() {
        if hop >= config.max_hops {
            continue;
        }
        let mut neighbors: Vec<(i64, i64)> = grid.neighbors4(pos.0, pos.1).collect();
        // Tie-break the traversal order deterministically per (event, tick).
        neighbors.sort_unstable();
        for next in neighbors {
            if visited.contains(&next) {
                continue;
            }
            let next_hop = hop + 1;
            let connection_factor = connection_factors.get(&next).copied().unwrap_or(1.0);
            let probability = p_eff(
                base_probability,
                next_hop,
                config.decay_k,
                curve,
                connection_factor,
                saturation,
            );
            if probability < config.acceptance_threshold {
                continue;
            }
            if !rng.random_bool(probability.clamp(0.0, 1.0)) {
                continue;
            }
            visited.insert(next);
            reached.push((next, next_hop));
            queue.push_back((next, next_hop));
        }
    }

    PropagationResult { reached }
}
