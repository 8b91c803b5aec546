//! Weighted, compatibility-filtered landmark placement.

use tracing::instrument;

use crate::config::GeneratorConfig;
use crate::id::{self, rng_for, stage};
use crate::model::{FeatureKind, Persisted, RegionalFeature, WorldGrid};
use crate::world::World;
use rand::Rng;

/// Can `kind` be placed at a tile with this (elevation, biome)?
fn is_compatible(kind: FeatureKind, grid: &WorldGrid, x: i64, y: i64) -> bool {
    let elevation = grid.elevation_at(x, y).unwrap();
    let biome = grid.biome_at(x, y).unwrap();
    use crate::model::Biome::*;
    match kind {
        FeatureKind::SubmergedCity => matches!(biome, DeepWater | ShallowWater),
        FeatureKind::Volcano => elevation > 0.5 && !matches!(biome, DeepWater | ShallowWater),
        FeatureKind::CrystalCave => matches!(biome, Mountain | AlpineMountain),
        FeatureKind::MagicZone | FeatureKind::AncientRuin => {
            !matches!(biome, DeepWater | ShallowWater)
        }
    }
}

fn min_separation_ok(x: i64, y: i64, placed: &[(i64, i64)], min_separation: i64) -> bool {
    placed
        .iter()
        .all(|&(px, py)| WorldGrid::chebyshev_distance(x, y, px, py) >= min_separation)
}

/// Run the feature placement stage: random weighted selection of an
/// eligible kind, candidate tile chosen by hash-derived pick, subject to
/// compatibility and minimum separation, up to `attempt_multiplier` times
/// the target count.
#[instrument(skip(world, config))]
pub fn generate_features(world: &mut World, config: &GeneratorConfig, density: f64) {
    let width = world.grid.width;
    let height = world.grid.height;
    let seed = world.seed as u64;
    let feature_seed = id::sub_seed(seed, stage::FEATURES);

    let tiles = width as u64 * height as u64;
    let target = (((tiles / config.feature_tile_ratio as u64) as f64) * density)
        .round()
        .max(3.0) as u32;
    let max_attempts = target * config.feature_attempt_multiplier;

    let mut placed_positions: Vec<(i64, i64)> = Vec::new();
    let mut index = 0u64;

    for attempt in 0..max_attempts {
        if placed_positions.len() as u32 >= target {
            break;
        }
        let mut rng = rng_for(feature_seed, ("attempt", attempt));
        let x = rng.random_range(0..width as i64);
        let y = rng.random_range(0..height as i64);

        let eligible: Vec<FeatureKind> = FeatureKind::ALL
            .into_iter()
            .filter(|&k| is_compatible(k, &world.grid, x, y))
            .collect();
        if eligible.is_empty() {
            continue;
        }
        if !min_separation_ok(x, y, &placed_positions, config.feature_min_separation) {
            continue;
        }

        let total_weight: f64 = eligible.iter().map(|k| k.weight()).sum();
        let pick = rng.random_range(0.0..total_weight);
        let mut cumulative = 0.0;
        let mut chosen = eligible[0];
        for kind in eligible {
            cumulative += kind.weight();
            if pick < cumulative {
                chosen = kind;
                break;
            }
        }

        let intensity = id::noise_unchecked(feature_seed, x, y * 2 + 1);
        let id = world.id_gen().make_id("feature", "world", index);
        index += 1;
        placed_positions.push((x, y));
        let feature = RegionalFeature {
            schema_version: RegionalFeature::SCHEMA_VERSION,
            id: id.clone(),
            kind: chosen,
            position: (x, y),
            intensity,
        };
        world.features.insert(id, feature);
    }

    world.log_event(
        "world",
        "features",
        format!("placed {} features (target {target})", world.features.len()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worldgen::terrain::generate_terrain;

    fn terrained_world(seed: i64, w: u32, h: u32) -> World {
        let mut world = World::new(seed, w, h);
        generate_terrain(&mut world, &GeneratorConfig::default());
        world
    }

    #[test]
    fn features_respect_minimum_separation() {
        let mut world = terrained_world(99, 200, 200);
        generate_features(&mut world, &GeneratorConfig::default(), 1.0);
        let positions: Vec<_> = world.features.values().map(|f| f.position).collect();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let d = WorldGrid::chebyshev_distance(
                    positions[i].0,
                    positions[i].1,
                    positions[j].0,
                    positions[j].1,
                );
                assert!(d >= 10, "features {i} and {j} too close: {d}");
            }
        }
    }

    #[test]
    fn at_least_minimum_three_features_attempted() {
        let mut world = terrained_world(1, 30, 30);
        generate_features(&mut world, &GeneratorConfig::default(), 1.0);
        assert!(world.features.len() <= 3 + 1);
    }
}
