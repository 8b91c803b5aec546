//! Region partitioning: carve the world grid into fixed-size scheduling
//! units for the tick-time region scheduler. Not itself one of the
//! generation stages' domain outputs, but run once at world creation so
//! the scheduler has something to dispatch over.

use tracing::instrument;

use crate::model::{Bounds, Region};
use crate::world::World;

/// Regions are square chunks of this many tiles on a side. Entities are
/// assigned to whichever region's bounds contain their location.
const REGION_TILE_SIZE: i64 = 64;

#[instrument(skip(world))]
pub fn partition_regions(world: &mut World) {
    let width = world.grid.width as i64;
    let height = world.grid.height as i64;
    let mut regions = std::collections::BTreeMap::new();

    let mut row = 0i64;
    let mut min_y = 0i64;
    while min_y < height {
        let max_y = (min_y + REGION_TILE_SIZE - 1).min(height - 1);
        let mut col = 0i64;
        let mut min_x = 0i64;
        while min_x < width {
            let max_x = (min_x + REGION_TILE_SIZE - 1).min(width - 1);
            let id = format!("region_{row:03}_{col:03}");
            let bounds = Bounds { min_x, min_y, max_x, max_y };
            regions.insert(id.clone(), Region::new(id, bounds));
            col += 1;
            min_x += REGION_TILE_SIZE;
        }
        row += 1;
        min_y += REGION_TILE_SIZE;
    }

    for structure in world.structures.values() {
        let (x, y) = structure.location;
        if let Some((_, region)) = regions.iter_mut().find(|(_, r)| r.bounds.contains(x, y)) {
            region.owned_entity_ids.insert(structure.id.clone());
        }
    }
    for clan in world.clans.values() {
        for member_id in &clan.member_ids {
            if let Some(npc) = world.npcs.get(member_id) {
                let home = world
                    .structures
                    .get(npc.home_structure_id.as_deref().unwrap_or(""))
                    .map(|s| s.location);
                if let Some((x, y)) = home {
                    if let Some((_, region)) = regions.iter_mut().find(|(_, r)| r.bounds.contains(x, y)) {
                        region.owned_entity_ids.insert(member_id.clone());
                    }
                }
            }
        }
    }

    world.regions = regions;
    world.log_event(
        "world",
        "regions",
        format!("partitioned world into {} regions", world.regions.len()),
    );
}
