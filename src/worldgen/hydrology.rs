//! River and lake generation by priority-ordered downhill search.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use tracing::instrument;

use crate::id::{self, stage};
use crate::model::{Persisted, River};
use crate::world::World;

const MICRO_NOISE_AMPLITUDE: f64 = 5e-5;
const DOWNHILL_SLACK: f64 = 1e-3;
const SEA_LEVEL: f64 = 0.2;
const SOURCE_MIN_ELEVATION: f64 = 0.6;
const SOURCE_MAX_ELEVATION: f64 = 0.95;
const MIN_RIVER_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueEntry {
    priority_elevation: f64,
    x: i64,
    y: i64,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    // BinaryHeap is a max-heap; we want the lowest priority_elevation first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority_elevation
            .partial_cmp(&self.priority_elevation)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One downhill search from `source`, returning the traced path and whether
/// it terminated at the ocean (`true`) or became a lake (`false`), or
/// `None` if the search was abandoned (safety limit or too short).
fn trace_river(
    world: &World,
    river_seed: u64,
    source: (i64, i64),
    occupied: &HashSet<(i64, i64)>,
) -> Option<(Vec<(i64, i64)>, bool)> {
    let grid = &world.grid;
    let max_length = (grid.width.min(grid.height) as usize) * 2;
    let safety_limit = ((max_length * 4) as usize).min((grid.width as usize * grid.height as usize) / 4);

    let mut visited = HashSet::new();
    let mut path = vec![source];
    let mut current = source;
    visited.insert(current);

    loop {
        let elevation = grid.elevation_at(current.0, current.1).unwrap();
        if elevation < SEA_LEVEL {
            return if path.len() >= MIN_RIVER_LENGTH {
                Some((path, true))
            } else {
                None
            };
        }
        if path.len() >= max_length {
            return if path.len() >= MIN_RIVER_LENGTH {
                Some((path, false))
            } else {
                None
            };
        }
        if visited.len() > safety_limit {
            return None;
        }

        let mut candidates: BinaryHeap<QueueEntry> = BinaryHeap::new();
        for (nx, ny) in grid.neighbors4(current.0, current.1) {
            if visited.contains(&(nx, ny)) || occupied.contains(&(nx, ny)) {
                continue;
            }
            let ne = grid.elevation_at(nx, ny).unwrap();
            if ne > elevation + DOWNHILL_SLACK {
                continue;
            }
            let micro = (id::noise_unchecked(river_seed, nx, ny) - 0.5) * 2.0 * MICRO_NOISE_AMPLITUDE;
            candidates.push(QueueEntry {
                priority_elevation: ne + micro,
                x: nx,
                y: ny,
            });
        }

        let Some(next) = candidates.pop() else {
            // Dead end with no viable downhill/flat neighbor: treat as a lake.
            return if path.len() >= MIN_RIVER_LENGTH {
                Some((path, false))
            } else {
                None
            };
        };
        current = (next.x, next.y);
        visited.insert(current);
        path.push(current);
    }
}

/// Run the hydrology stage: find all river sources, trace each downhill,
/// and record rivers/lakes ≥5 tiles long, shortest discarded.
#[instrument(skip(world))]
pub fn generate_hydrology(world: &mut World) {
    let width = world.grid.width;
    let height = world.grid.height;
    let seed = world.seed as u64;
    let river_seed = id::sub_seed(seed, stage::HYDROLOGY);

    let mut sources = Vec::new();
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let e = world.grid.elevation_at(x, y).unwrap();
            if e >= SOURCE_MIN_ELEVATION && e < SOURCE_MAX_ELEVATION {
                sources.push((x, y));
            }
        }
    }
    sources.sort();

    let mut occupied: HashSet<(i64, i64)> = HashSet::new();
    let mut index = 0u64;
    for source in sources {
        if occupied.contains(&source) {
            continue;
        }
        let Some((path, reached_ocean)) = trace_river(world, river_seed, source, &occupied) else {
            continue;
        };
        let terminus = *path.last().unwrap();
        let id = world.id_gen().make_id("river", "world", index);
        index += 1;
        for &tile in &path {
            occupied.insert(tile);
        }
        let river = River {
            schema_version: River::SCHEMA_VERSION,
            id: id.clone(),
            path,
            source,
            terminus,
            is_lake: !reached_ocean,
        };
        world.rivers.insert(id, river);
    }

    world.log_event(
        "world",
        "hydrology",
        format!("traced {} rivers/lakes", world.rivers.len()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::worldgen::terrain::generate_terrain;

    fn terrained_world(seed: i64, w: u32, h: u32) -> World {
        let mut world = World::new(seed, w, h);
        generate_terrain(&mut world, &GeneratorConfig::default());
        world
    }

    #[test]
    fn rivers_never_flow_uphill() {
        let mut world = terrained_world(12345, 80, 80);
        generate_hydrology(&mut world);
        for river in world.rivers.values() {
            for pair in river.path.windows(2) {
                let a = world.grid.elevation_at(pair[0].0, pair[0].1).unwrap();
                let b = world.grid.elevation_at(pair[1].0, pair[1].1).unwrap();
                assert!(b <= a + 0.002, "river {} flows uphill", river.id);
            }
        }
    }

    #[test]
    fn rivers_meet_minimum_length() {
        let mut world = terrained_world(1, 60, 60);
        generate_hydrology(&mut world);
        for river in world.rivers.values() {
            assert!(river.len_tiles() >= MIN_RIVER_LENGTH);
        }
    }

    #[test]
    fn hydrology_is_deterministic() {
        let mut w1 = terrained_world(777, 64, 64);
        generate_hydrology(&mut w1);
        let mut w2 = terrained_world(777, 64, 64);
        generate_hydrology(&mut w2);
        let ids1: Vec<_> = w1.rivers.keys().collect();
        let ids2: Vec<_> = w2.rivers.keys().collect();
        assert_eq!(ids1, ids2);
    }
}
