//! World Grid: dense arrays over `width x height`, immutable after
//! generation.

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    DeepWater,
    ShallowWater,
    AlpineMountain,
    Mountain,
    Tundra,
    Taiga,
    TropicalRainforest,
    Savanna,
    Desert,
    Forest,
    Grassland,
    Swamp,
}

/// Dense tile-grid world state produced once by terrain generation and
/// never mutated afterward. All coordinate lookups are row-major
/// `y * width + x`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGrid {
    pub schema_version: u16,
    pub seed: i64,
    pub width: u32,
    pub height: u32,
    pub elevation: Vec<f64>,
    pub temperature: Vec<f64>,
    pub moisture: Vec<f64>,
    pub biome: Vec<Biome>,
    pub plate_id: Vec<u32>,
}

impl Persisted for WorldGrid {
    const TYPE: &'static str = "world/WorldGrid";
    const SCHEMA_VERSION: u16 = 1;
}

impl WorldGrid {
    pub fn new(seed: i64, width: u32, height: u32) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            schema_version: Self::SCHEMA_VERSION,
            seed,
            width,
            height,
            elevation: vec![0.0; n],
            temperature: vec![0.0; n],
            moisture: vec![0.0; n],
            biome: vec![Biome::Grassland; n],
            plate_id: vec![0; n],
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    #[inline]
    pub fn index(&self, x: i64, y: i64) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn elevation_at(&self, x: i64, y: i64) -> Option<f64> {
        self.index(x, y).map(|i| self.elevation[i])
    }

    pub fn biome_at(&self, x: i64, y: i64) -> Option<Biome> {
        self.index(x, y).map(|i| self.biome[i])
    }

    /// The 4-connected neighbors of `(x, y)` that lie within the grid.
    pub fn neighbors4(&self, x: i64, y: i64) -> impl Iterator<Item = (i64, i64)> + '_ {
        [(0i64, -1i64), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .map(move |(dx, dy)| (x + dx, y + dy))
            .filter(move |&(nx, ny)| self.in_bounds(nx, ny))
    }

    pub fn chebyshev_distance(ax: i64, ay: i64, bx: i64, by: i64) -> i64 {
        (ax - bx).abs().max((ay - by).abs())
    }

    pub fn manhattan_distance(ax: i64, ay: i64, bx: i64, by: i64) -> i64 {
        (ax - bx).abs() + (ay - by).abs()
    }
}
