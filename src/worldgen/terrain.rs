//! Terrain generation: plates, elevation, temperature, moisture, and
//! biome assignment over the world grid.

use tracing::instrument;

use crate::config::GeneratorConfig;
use crate::id::{self, stage};
use crate::model::{Biome, Persisted, Plate, PlateType, WorldGrid};
use crate::world::World;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Smooth value noise at frequency `freq` (tiles per noise cell), built by
/// bilinear interpolation over the hash-derived corner samples from
/// `id::noise_unchecked`.
fn octave(seed: u64, x: i64, y: i64, freq: f64) -> f64 {
    let fx = x as f64 / freq;
    let fy = y as f64 / freq;
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;
    let tx = smoothstep(fx - x0 as f64);
    let ty = smoothstep(fy - y0 as f64);
    let v00 = id::noise_unchecked(seed, x0, y0);
    let v10 = id::noise_unchecked(seed, x0 + 1, y0);
    let v01 = id::noise_unchecked(seed, x0, y0 + 1);
    let v11 = id::noise_unchecked(seed, x0 + 1, y0 + 1);
    lerp(lerp(v00, v10, tx), lerp(v01, v11, tx), ty)
}

/// Number of plates: `max(4, w*h/plate_tile_ratio)`, ~70% continental.
pub fn generate_plates(
    seed: i64,
    width: u32,
    height: u32,
    config: &GeneratorConfig,
) -> Vec<Plate> {
    let plate_seed = id::sub_seed(seed as u64, stage::TERRAIN);
    let tiles = width as u64 * height as u64;
    let count = (tiles / config.plate_tile_ratio as u64).max(4) as u32;
    let continental_count =
        ((count as f64) * config.continental_plate_fraction).round() as u32;

    (0..count)
        .map(|i| {
            let cx = (id::noise_unchecked(plate_seed, i as i64, 0) * width as f64) as i64;
            let cy = (id::noise_unchecked(plate_seed, i as i64, 1) * height as f64) as i64;
            let dx = id::noise_unchecked(plate_seed, i as i64, 2) - 0.5;
            let dy = id::noise_unchecked(plate_seed, i as i64, 3) - 0.5;
            let plate_type = if i < continental_count {
                PlateType::Continental
            } else {
                PlateType::Oceanic
            };
            Plate {
                schema_version: Plate::SCHEMA_VERSION,
                id: i,
                center: (cx.clamp(0, width as i64 - 1), cy.clamp(0, height as i64 - 1)),
                drift: (dx.clamp(-0.5, 0.5), dy.clamp(-0.5, 0.5)),
                plate_type,
            }
        })
        .collect()
}

/// Voronoi-partition each tile to its nearest plate center by squared
/// Euclidean distance, filling `grid.plate_id`.
fn assign_plate_ids(grid: &mut WorldGrid, plates: &[Plate]) {
    for y in 0..grid.height as i64 {
        for x in 0..grid.width as i64 {
            let mut best = 0usize;
            let mut best_d2 = i64::MAX;
            for (i, plate) in plates.iter().enumerate() {
                let (cx, cy) = plate.center;
                let d2 = (x - cx) * (x - cx) + (y - cy) * (y - cy);
                if d2 < best_d2 {
                    best_d2 = d2;
                    best = i;
                }
            }
            let idx = grid.index(x, y).unwrap();
            grid.plate_id[idx] = plates[best].id;
        }
    }
}

fn elevation_at(seed: u64, x: i64, y: i64, plate: &Plate, plates: &[Plate]) -> f64 {
    let base_noise = 0.6 * octave(seed, x, y, 1.0)
        + 0.3 * octave(seed, x, y, 2.0)
        + 0.1 * octave(seed, x, y, 4.0);

    let plate_base = match plate.plate_type {
        PlateType::Continental => 0.5,
        PlateType::Oceanic => 0.15,
    };
    let mut elevation = 0.7 * plate_base + 0.3 * base_noise;

    // Convergent-boundary uplift: find the nearest *other* plate and check
    // whether the two plates are drifting toward each other.
    if let Some(neighbor) = plates
        .iter()
        .filter(|p| p.id != plate.id)
        .min_by_key(|p| {
            let (nx, ny) = p.center;
            (x - nx).pow(2) + (y - ny).pow(2)
        })
    {
        let center_delta = (
            (neighbor.center.0 - plate.center.0) as f64,
            (neighbor.center.1 - plate.center.1) as f64,
        );
        let drift_delta = (neighbor.drift.0 - plate.drift.0, neighbor.drift.1 - plate.drift.1);
        let dot = center_delta.0 * drift_delta.0 + center_delta.1 * drift_delta.1;
        if dot < 0.0 {
            let mag2 = drift_delta.0 * drift_delta.0 + drift_delta.1 * drift_delta.1;
            let uplift = 0.3 * (mag2 / 4.0).min(1.0);
            elevation += uplift;
        }
    }

    elevation.clamp(0.0, 1.0)
}

fn temperature_at(x: i64, y: i64, height: u32, elevation: f64) -> f64 {
    let lat = (2.0 * y as f64 / height as f64 - 1.0).abs();
    let base = 25.0 - 35.0 * lat;
    let lapse = -6.0 * elevation * 1.0;
    base + lapse
}

fn moisture_at(seed: u64, x: i64, y: i64, water_proximity: f64) -> f64 {
    let noise_component = octave(id::sub_seed(seed, stage::TERRAIN ^ 0x1), x, y, 3.0);
    (0.6 * water_proximity + 0.4 * noise_component).clamp(0.0, 1.0)
}

/// Priority-ordered pure function of (elevation, temperature, moisture) ->
/// biome.
pub fn classify_biome(elevation: f64, temperature: f64, moisture: f64) -> Biome {
    if elevation < 0.2 {
        return if elevation < 0.1 {
            Biome::DeepWater
        } else {
            Biome::ShallowWater
        };
    }
    if elevation > 0.75 {
        return if elevation > 0.9 {
            Biome::AlpineMountain
        } else {
            Biome::Mountain
        };
    }
    if temperature < 0.0 {
        return if moisture > 0.5 {
            Biome::Taiga
        } else {
            Biome::Tundra
        };
    }
    if temperature > 22.0 {
        return if moisture > 0.6 {
            Biome::TropicalRainforest
        } else if moisture > 0.3 {
            Biome::Savanna
        } else {
            Biome::Desert
        };
    }
    if moisture > 0.66 {
        Biome::Swamp
    } else if moisture > 0.33 {
        Biome::Forest
    } else {
        Biome::Grassland
    }
}

/// Rough water proximity: 1.0 right at sea level, decaying with elevation
/// above the water threshold. A cheap stand-in for a full flood-fill
/// distance transform, sufficient to bias moisture toward coasts.
fn water_proximity(elevation: f64) -> f64 {
    (1.0 - ((elevation - 0.2).max(0.0) / 0.8)).clamp(0.0, 1.0)
}

/// Run the full terrain stage: plates, elevation, temperature, moisture,
/// biome, in that order, writing into `world.grid`/`world.plates`.
#[instrument(skip(world, config))]
pub fn generate_terrain(world: &mut World, config: &GeneratorConfig) {
    let width = world.grid.width;
    let height = world.grid.height;
    let seed = world.seed as u64;

    let plates = generate_plates(world.seed, width, height, config);
    assign_plate_ids(&mut world.grid, &plates);

    let terrain_seed = id::sub_seed(seed, stage::TERRAIN);

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let idx = world.grid.index(x, y).unwrap();
            let plate = &plates[world.grid.plate_id[idx] as usize];
            let elevation = elevation_at(terrain_seed, x, y, plate, &plates);
            let temperature = temperature_at(x, y, height, elevation);
            let moisture = moisture_at(seed, x, y, water_proximity(elevation));
            world.grid.elevation[idx] = elevation;
            world.grid.temperature[idx] = temperature;
            world.grid.moisture[idx] = moisture;
            world.grid.biome[idx] = classify_biome(elevation, temperature, moisture);
        }
    }

    world.plates = plates;
    world.log_event(
        "world",
        "terrain",
        format!("generated {} plates over {width}x{height}", world.plates.len()),
    );
}
