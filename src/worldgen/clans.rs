//! Initial clan seeding: count, size tiers, and biome-driven type affinity.

use tracing::instrument;

use crate::config::GeneratorConfig;
use crate::id::{self, rng_for, stage};
use crate::model::{Biome, Clan, ClanType};
use crate::world::World;
use rand::Rng;

fn affinity_for_biome(biome: Biome) -> ClanType {
    match biome {
        Biome::Desert | Biome::Savanna | Biome::Tundra => ClanType::Nomadic,
        Biome::Forest | Biome::TropicalRainforest | Biome::Swamp => ClanType::Mercantile,
        _ => ClanType::Settled,
    }
}

fn clan_count(width: u32, height: u32, config: &GeneratorConfig) -> u32 {
    let tiles = width as u64 * height as u64;
    let raw = (tiles / config.clan_tile_ratio as u64) as u32;
    raw.clamp(config.min_clans, config.max_clans)
}

/// Target headcount for a newly seeded clan, consumed by the NPC seeder.
pub struct ClanSeed {
    pub clan_id: String,
    pub target_member_count: u32,
}

/// Run the clan seeding stage, creating `clan_count` clans: one large,
/// the rest small, each with a biome-affinity-derived type. Returns the
/// per-clan target headcount for the NPC seeder to fill.
#[instrument(skip(world, config))]
pub fn generate_clans(world: &mut World, config: &GeneratorConfig, current_tick: u64) -> Vec<ClanSeed> {
    let width = world.grid.width;
    let height = world.grid.height;
    let seed = world.seed as u64;
    let clan_seed = id::sub_seed(seed, stage::CLANS);
    let count = clan_count(width, height, config);

    let mut seeds = Vec::with_capacity(count as usize);
    for i in 0..count {
        let mut rng = rng_for(clan_seed, ("clan", i));
        let x = rng.random_range(0..width as i64);
        let y = rng.random_range(0..height as i64);
        let biome = world.grid.biome_at(x, y).unwrap();
        let clan_type = affinity_for_biome(biome);
        let member_count = if i == 0 {
            rng.random_range(config.large_clan_member_range.0..=config.large_clan_member_range.1)
        } else {
            rng.random_range(config.small_clan_member_range.0..=config.small_clan_member_range.1)
        };

        let id = world.id_gen().make_id("clan", "world", i as u64);
        let name = format!("Clan of the {clan_type:?} {i}");
        let clan = Clan::new(id.clone(), name, clan_type, current_tick);

        seeds.push(ClanSeed {
            clan_id: id.clone(),
            target_member_count: member_count,
        });
        world.clans.insert(id, clan);
    }

    world.log_event("world", "clans", format!("seeded {} clans", world.clans.len()));
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worldgen::terrain::generate_terrain;

    #[test]
    fn clan_count_respects_bounds() {
        let config = GeneratorConfig::default();
        assert_eq!(clan_count(128, 128, &config), 3);
        assert_eq!(clan_count(2000, 2000, &config), config.max_clans);
    }

    #[test]
    fn generates_expected_clan_count_for_canonical_seed() {
        let mut world = World::new(12345, 128, 128);
        let config = GeneratorConfig::default();
        generate_terrain(&mut world, &config);
        generate_clans(&mut world, &config, 0);
        assert_eq!(world.clans.len(), 3);
    }

    #[test]
    fn clans_are_deterministic() {
        let config = GeneratorConfig::default();
        let mut w1 = World::new(42, 128, 128);
        generate_terrain(&mut w1, &config);
        generate_clans(&mut w1, &config, 0);
        let mut w2 = World::new(42, 128, 128);
        generate_terrain(&mut w2, &config);
        generate_clans(&mut w2, &config, 0);
        let ids1: Vec<_> = w1.clans.keys().collect();
        let ids2: Vec<_> = w2.clans.keys().collect();
        assert_eq!(ids1, ids2);
    }
}
