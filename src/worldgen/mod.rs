//! The generation pipeline: terrain through road building, run once at
//! world creation in strict dependency order.

pub mod clans;
pub mod features;
pub mod hydrology;
pub mod npcs;
pub mod placement;
pub mod quests;
pub mod regions;
pub mod roads;
pub mod settlements;
pub mod terrain;
pub mod villages;

use tracing::instrument;

use crate::config::{GeneratorConfig, WorldRequest};
use crate::error::InvalidInputError;
use crate::world::World;

/// Generate a complete world from a validated request: terrain, hydrology,
/// features, clans, settlements, NPCs, prophecies/quests, villages, and
/// roads, run in that fixed order since each stage consumes the previous
/// stage's output.
#[instrument(skip(request))]
pub fn generate_world(request: &WorldRequest) -> Result<World, InvalidInputError> {
    request.validate()?;
    let config = GeneratorConfig::for_preset(&request.preset)
        .expect("validate() already confirmed the preset exists");

    let mut world = World::new(request.seed, request.width, request.height);

    terrain::generate_terrain(&mut world, &config);
    hydrology::generate_hydrology(&mut world);
    features::generate_features(&mut world, &config, request.density as f64);
    let clan_seeds = clans::generate_clans(&mut world, &config, 0);
    settlements::generate_settlements(&mut world, 0);
    npcs::generate_npcs(&mut world, &clan_seeds, 0);
    quests::generate_quests(&mut world, 0);
    villages::detect_villages(&mut world);

    let structure_ids: Vec<String> = world.structures.keys().cloned().collect();
    for structure_id in structure_ids {
        roads::connect_structure(&mut world, &structure_id, 0);
    }
    regions::partition_regions(&mut world);

    world.log_event(
        "world",
        "worldgen",
        format!(
            "generation complete: {} clans, {} structures, {} npcs, {} rivers, {} features",
            world.clans.len(),
            world.structures.len(),
            world.npcs.len(),
            world.rivers.len(),
            world.features.len()
        ),
    );

    Ok(world)
}
