//! Settlement and structure seeding: one settlement per clan, a core
//! structure at a flat-land center, residential and commercial buildings
//! around it.

use tracing::instrument;

use crate::id::{self, rng_for, stage};
use crate::model::{Persisted, Settlement, Structure, StructureType};
use crate::world::World;
use crate::worldgen::placement::{choose_entrance_side, validate_placement};
use rand::Rng;

const CORE_SEARCH_RADIUS: i64 = 40;
const MAX_PLACEMENT_ATTEMPTS: u32 = 200;

fn core_structure_type(seed_rng: &mut impl rand::RngCore) -> StructureType {
    if seed_rng.random_bool(0.5) {
        StructureType::GuildHall
    } else {
        StructureType::Temple
    }
}

/// Find a flat-land tile (elevation in the buildable range) near `origin`
/// by spiraling outward in a deterministic scan order.
fn find_flat_center(world: &World, origin: (i64, i64)) -> Option<(i64, i64)> {
    for radius in 0..CORE_SEARCH_RADIUS {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let (x, y) = (origin.0 + dx, origin.1 + dy);
                if !world.grid.in_bounds(x, y) {
                    continue;
                }
                let e = world.grid.elevation_at(x, y).unwrap();
                if (0.2..=0.7).contains(&e) {
                    return Some((x, y));
                }
            }
        }
    }
    None
}

/// Attempt to place `structure_type`, trying nearby offsets from `around`
/// until a valid placement is found or attempts are exhausted.
fn place_near(
    world: &mut World,
    around: (i64, i64),
    structure_type: StructureType,
    owner_id: String,
    index: u64,
    rng: &mut impl rand::RngCore,
    tick: u64,
) -> Option<String> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let dx = rng.random_range(-15..=15);
        let dy = rng.random_range(-15..=15);
        let (x, y) = (around.0 + dx, around.1 + dy);
        if !world.grid.in_bounds(x, y) {
            continue;
        }
        let side = choose_entrance_side(&world.grid, x, y);
        if validate_placement(world, x, y, structure_type, side).is_err() {
            continue;
        }
        let id = world
            .id_gen()
            .make_id("structure", &owner_id, index);
        let structure = Structure::new(
            id.clone(),
            structure_type,
            (x, y),
            100.0,
            side,
            Some(owner_id),
            Some(crate::model::OwnerType::Clan),
            tick,
        );
        world.structures.insert(id.clone(), structure);
        return Some(id);
    }
    None
}

/// Run the settlement seeding stage for every existing clan.
#[instrument(skip(world))]
pub fn generate_settlements(world: &mut World, current_tick: u64) {
    let width = world.grid.width;
    let height = world.grid.height;
    let seed = world.seed as u64;
    let settlement_seed = id::sub_seed(seed, stage::SETTLEMENTS);

    let clan_ids: Vec<String> = world.clans.keys().cloned().collect();
    for (clan_index, clan_id) in clan_ids.iter().enumerate() {
        let mut rng = rng_for(settlement_seed, ("settlement", clan_index as u64));
        let origin = (
            rng.random_range(0..width as i64),
            rng.random_range(0..height as i64),
        );
        let Some(center) = find_flat_center(world, origin) else {
            continue;
        };

        let mut structure_ids = Vec::new();
        let mut index = 0u64;

        let core_type = core_structure_type(&mut rng);
        let core_side = choose_entrance_side(&world.grid, center.0, center.1);
        if validate_placement(world, center.0, center.1, core_type, core_side).is_ok() {
            let id = world.id_gen().make_id("structure", clan_id, index);
            index += 1;
            let structure = Structure::new(
                id.clone(),
                core_type,
                center,
                100.0,
                core_side,
                Some(clan_id.clone()),
                Some(crate::model::OwnerType::Clan),
                current_tick,
            );
            world.structures.insert(id.clone(), structure);
            structure_ids.push(id);
        }

        let residential_count = rng.random_range(3..=5);
        for _ in 0..residential_count {
            if let Some(id) = place_near(
                world,
                center,
                StructureType::House,
                clan_id.clone(),
                index,
                &mut rng,
                current_tick,
            ) {
                structure_ids.push(id);
            }
            index += 1;
        }

        let commercial_count = rng.random_range(1..=2);
        for i in 0..commercial_count {
            let commercial_type = if i == 0 {
                StructureType::Market
            } else {
                StructureType::Workshop
            };
            if let Some(id) = place_near(
                world,
                center,
                commercial_type,
                clan_id.clone(),
                index,
                &mut rng,
                current_tick,
            ) {
                structure_ids.push(id);
            }
            index += 1;
        }

        let settlement_id = world.id_gen().make_id("settlement", clan_id, 0);
        let settlement = Settlement {
            schema_version: Settlement::SCHEMA_VERSION,
            id: settlement_id.clone(),
            name: format!("Settlement of {clan_id}"),
            clan_id: clan_id.clone(),
            center,
            structure_ids,
        };
        world.settlements.insert(settlement_id, settlement);
    }

    world.log_event(
        "world",
        "settlements",
        format!("seeded {} settlements", world.settlements.len()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::worldgen::clans::generate_clans;
    use crate::worldgen::terrain::generate_terrain;

    fn seeded_world(seed: i64) -> World {
        let mut world = World::new(seed, 128, 128);
        let config = GeneratorConfig::default();
        generate_terrain(&mut world, &config);
        generate_clans(&mut world, &config, 0);
        world
    }

    #[test]
    fn one_settlement_per_clan() {
        let mut world = seeded_world(12345);
        generate_settlements(&mut world, 0);
        assert!(world.settlements.len() <= world.clans.len());
    }

    #[test]
    fn settlement_structures_are_pairwise_spaced() {
        let mut world = seeded_world(12345);
        generate_settlements(&mut world, 0);
        assert!(world.check_roads_disjoint_from_structures().is_none());
    }
}
