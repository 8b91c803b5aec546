//! Road building: A* pathfinding between structure entrances, with
//! existing-road reuse and traffic-driven surface upgrades.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::instrument;

use crate::model::{RoadTile, StructureType, WorldGrid};
use crate::world::World;

const CONNECTION_RADIUS: i64 = 10;
const MOVE_COST_ELEVATION_WEIGHT: f64 = 2.0;

fn is_passable(grid: &WorldGrid, x: i64, y: i64, structure_type: StructureType) -> bool {
    let Some(e) = grid.elevation_at(x, y) else {
        return false;
    };
    if structure_type.allows_water() {
        return e <= 0.7;
    }
    (0.2..=0.7).contains(&e)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AStarNode {
    f_score: f64,
    x: i64,
    y: i64,
}

impl Eq for AStarNode {}
impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f_score.partial_cmp(&self.f_score).unwrap_or(Ordering::Equal)
    }
}
impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* path from `start` to `goal`, terminating early at the goal. Returns
/// `None` if no path is found within the node budget.
fn astar(
    world: &World,
    start: (i64, i64),
    goal: (i64, i64),
    structure_type: StructureType,
) -> Option<Vec<(i64, i64)>> {
    let grid = &world.grid;
    let node_budget = (grid.width as usize) * (grid.height as usize);

    let heuristic = |x: i64, y: i64| WorldGrid::manhattan_distance(x, y, goal.0, goal.1) as f64;

    let mut open = BinaryHeap::new();
    open.push(AStarNode {
        f_score: heuristic(start.0, start.1),
        x: start.0,
        y: start.1,
    });
    let mut came_from: HashMap<(i64, i64), (i64, i64)> = HashMap::new();
    let mut g_score: HashMap<(i64, i64), f64> = HashMap::new();
    g_score.insert(start, 0.0);
    let mut explored = 0usize;

    while let Some(current) = open.pop() {
        let pos = (current.x, current.y);
        if pos == goal {
            let mut path = vec![pos];
            let mut cursor = pos;
            while let Some(&prev) = came_from.get(&cursor) {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return Some(path);
        }
        explored += 1;
        if explored > node_budget {
            return None;
        }

        let current_elevation = grid.elevation_at(pos.0, pos.1).unwrap_or(1.0);
        for (nx, ny) in grid.neighbors4(pos.0, pos.1) {
            if !is_passable(grid, nx, ny, structure_type) && (nx, ny) != goal {
                continue;
            }
            let neighbor_elevation = grid.elevation_at(nx, ny).unwrap_or(1.0);
            let base_cost = 1.0 + MOVE_COST_ELEVATION_WEIGHT * (neighbor_elevation - current_elevation).abs();
            let cost = if world.tile_has_road(nx, ny) {
                base_cost * RoadTile::REUSE_MULTIPLIER
            } else {
                base_cost
            };
            let tentative_g = g_score.get(&pos).copied().unwrap_or(f64::INFINITY) + cost;
            if tentative_g < g_score.get(&(nx, ny)).copied().unwrap_or(f64::INFINITY) {
                came_from.insert((nx, ny), pos);
                g_score.insert((nx, ny), tentative_g);
                open.push(AStarNode {
                    f_score: tentative_g + heuristic(nx, ny),
                    x: nx,
                    y: ny,
                });
            }
        }
    }
    None
}

/// Pathfind and lay a road directly between two points, regardless of
/// Chebyshev range. Used for structure-to-structure connection and for
/// longer-range trade routes between settlements.
pub fn force_connect(
    world: &mut World,
    from: (i64, i64),
    to: (i64, i64),
    structure_type: StructureType,
    tick: u64,
) -> bool {
    match astar(world, from, to, structure_type) {
        Some(path) => {
            lay_road(world, &path, tick);
            true
        }
        None => false,
    }
}

fn lay_road(world: &mut World, path: &[(i64, i64)], tick: u64) {
    for &(x, y) in path {
        world
            .roads
            .entry((x, y))
            .or_insert_with(|| RoadTile::new((x, y), tick, true))
            .add_traffic(1);
    }
}

fn nearest_road_tile(world: &World, from: (i64, i64)) -> Option<(i64, i64)> {
    world
        .roads
        .keys()
        .copied()
        .min_by_key(|&(rx, ry)| WorldGrid::manhattan_distance(from.0, from.1, rx, ry))
}

/// Connect a freshly placed structure's entrance to every existing
/// structure within Chebyshev range 10; if the entrance still isn't road-
/// adjacent afterward, connect it to the nearest existing road tile.
#[instrument(skip(world))]
pub fn connect_structure(world: &mut World, new_structure_id: &str, tick: u64) {
    let Some(new_structure) = world.structures.get(new_structure_id).cloned() else {
        return;
    };
    let entrance = new_structure.entrance_front_tile();

    let nearby: Vec<(String, (i64, i64))> = world
        .structures
        .values()
        .filter(|s| s.id != new_structure_id)
        .filter(|s| {
            WorldGrid::chebyshev_distance(
                new_structure.location.0,
                new_structure.location.1,
                s.location.0,
                s.location.1,
            ) <= CONNECTION_RADIUS
        })
        .map(|s| (s.id.clone(), s.entrance_front_tile()))
        .collect();

    for (_, other_entrance) in &nearby {
        force_connect(world, entrance, *other_entrance, new_structure.structure_type, tick);
    }

    let entrance_has_road = world
        .grid
        .neighbors4(entrance.0, entrance.1)
        .any(|(x, y)| world.tile_has_road(x, y))
        || world.tile_has_road(entrance.0, entrance.1);
    if !entrance_has_road {
        if let Some(nearest) = nearest_road_tile(world, entrance) {
            force_connect(world, entrance, nearest, new_structure.structure_type, tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OwnerType, Side, Structure};

    fn flat_world() -> World {
        let mut world = World::new(1, 50, 50);
        for e in world.grid.elevation.iter_mut() {
            *e = 0.4;
        }
        world
    }

    fn place(world: &mut World, id: &str, pos: (i64, i64), side: Side) {
        let structure = Structure::new(
            id.to_string(),
            StructureType::House,
            pos,
            100.0,
            side,
            Some("c1".into()),
            Some(OwnerType::Clan),
            0,
        );
        world.structures.insert(id.to_string(), structure);
    }

    #[test]
    fn connects_two_nearby_structures() {
        let mut world = flat_world();
        place(&mut world, "a", (20, 20), Side::South);
        place(&mut world, "b", (24, 22), Side::North);
        connect_structure(&mut world, "b", 0);
        assert!(!world.roads.is_empty());
        assert!(world.check_roads_disjoint_from_structures().is_none());
    }

    #[test]
    fn reuses_existing_road_tiles() {
        let mut world = flat_world();
        place(&mut world, "a", (20, 20), Side::South);
        place(&mut world, "b", (28, 22), Side::North);
        connect_structure(&mut world, "b", 0);
        let road_count_before = world.roads.len();

        place(&mut world, "c", (24, 25), Side::North);
        connect_structure(&mut world, "c", 1);
        assert!(world.roads.len() >= road_count_before);
    }
}
