//! Structure placement validation: spacing, entrance clearance, terrain,
//! and road-occupancy rules shared by the settlement seeder, clan AI
//! expansion, and road building.

use crate::error::PlacementError;
use crate::model::{Side, StructureType, WorldGrid};
use crate::world::World;

const MIN_STRUCTURE_SPACING: f64 = 5.0;
const MOUNTAIN_ELEVATION: f64 = 0.7;
const WATER_ELEVATION: f64 = 0.2;

fn center_distance(ax: i64, ay: i64, bx: i64, by: i64) -> f64 {
    (((ax - bx).pow(2) + (ay - by).pow(2)) as f64).sqrt()
}

/// Validate placing a structure of `structure_type` at `(x, y)` with
/// entrance `side`. Returns `Ok(())` if the placement is legal.
pub fn validate_placement(
    world: &World,
    x: i64,
    y: i64,
    structure_type: StructureType,
    side: Side,
) -> Result<(), PlacementError> {
    if !world.grid.in_bounds(x, y) {
        return Err(PlacementError::OutOfBounds);
    }

    for other in world.structures.values() {
        let d = center_distance(x, y, other.location.0, other.location.1);
        if d < MIN_STRUCTURE_SPACING {
            return Err(PlacementError::TooClose);
        }
    }

    let (dx, dy) = side.offset();
    let front = (x + dx, y + dy);
    if world.structure_at(front.0, front.1).is_some() {
        return Err(PlacementError::BlockingEntrance);
    }

    if world.tile_has_road(x, y) {
        return Err(PlacementError::OnRoad);
    }

    let elevation = world
        .grid
        .elevation_at(x, y)
        .ok_or(PlacementError::OutOfBounds)?;
    if elevation > MOUNTAIN_ELEVATION {
        return Err(PlacementError::UnsuitableTerrain);
    }
    if elevation < WATER_ELEVATION && !structure_type.allows_water() {
        return Err(PlacementError::UnsuitableTerrain);
    }

    Ok(())
}

/// Pick an entrance side favoring the one that faces away from the
/// nearest water or toward flatter neighboring terrain; falls back to
/// south when every direction looks the same.
pub fn choose_entrance_side(grid: &WorldGrid, x: i64, y: i64) -> Side {
    Side::ALL
        .into_iter()
        .max_by(|a, b| {
            let score = |side: Side| {
                let (dx, dy) = side.offset();
                grid.elevation_at(x + dx, y + dy).unwrap_or(1.0)
            };
            // Prefer the lowest-elevation (but non-water) neighbor as the
            // entrance-facing direction.
            score(*b)
                .partial_cmp(&score(*a))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(Side::South)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::model::{OwnerType, Structure};
    use crate::worldgen::terrain::generate_terrain;

    fn flat_world() -> World {
        let mut world = World::new(1, 50, 50);
        generate_terrain(&mut world, &GeneratorConfig::default());
        for e in world.grid.elevation.iter_mut() {
            *e = 0.4;
        }
        world
    }

    #[test]
    fn rejects_out_of_bounds() {
        let world = flat_world();
        let result = validate_placement(&world, -1, 0, StructureType::House, Side::South);
        assert_eq!(result, Err(PlacementError::OutOfBounds));
    }

    #[test]
    fn rejects_mountain_terrain() {
        let mut world = flat_world();
        let idx = world.grid.index(10, 10).unwrap();
        world.grid.elevation[idx] = 0.9;
        let result = validate_placement(&world, 10, 10, StructureType::House, Side::South);
        assert_eq!(result, Err(PlacementError::UnsuitableTerrain));
    }

    #[test]
    fn dock_is_allowed_on_water() {
        let mut world = flat_world();
        let idx = world.grid.index(10, 10).unwrap();
        world.grid.elevation[idx] = 0.1;
        let result = validate_placement(&world, 10, 10, StructureType::Dock, Side::South);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_too_close_to_existing_structure() {
        let mut world = flat_world();
        world.structures.insert(
            "house_existing".into(),
            Structure::new(
                "house_existing".into(),
                StructureType::House,
                (20, 20),
                100.0,
                Side::South,
                None,
                Some(OwnerType::Clan),
                0,
            ),
        );
        let result = validate_placement(&world, 22, 21, StructureType::House, Side::South);
        assert_eq!(result, Err(PlacementError::TooClose));
    }
}
