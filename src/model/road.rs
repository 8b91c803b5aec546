//! Road Tile. Append-only: roads never remove themselves.

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Dirt,
    Stone,
    Paved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadTile {
    pub schema_version: u16,
    pub position: (i64, i64),
    pub road_type: RoadType,
    traffic_level: u32,
    pub created_tick: u64,
    pub auto_generated: bool,
}

impl Persisted for RoadTile {
    const TYPE: &'static str = "world/RoadTile";
    const SCHEMA_VERSION: u16 = 1;
}

impl RoadTile {
    pub fn new(position: (i64, i64), tick: u64, auto_generated: bool) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION,
            position,
            road_type: RoadType::Dirt,
            traffic_level: 0,
            created_tick: tick,
            auto_generated,
        }
    }

    pub fn traffic_level(&self) -> u32 {
        self.traffic_level
    }

    /// Increment traffic (capped at 100) and upgrade the road surface past
    /// its thresholds.
    pub fn add_traffic(&mut self, amount: u32) {
        self.traffic_level = (self.traffic_level + amount).min(100);
        self.road_type = if self.traffic_level >= 80 {
            RoadType::Paved
        } else if self.traffic_level >= 50 {
            RoadType::Stone
        } else {
            RoadType::Dirt
        };
    }

    /// Move cost multiplier when A* reuses this tile.
    pub const REUSE_MULTIPLIER: f64 = 0.5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_caps_at_100() {
        let mut r = RoadTile::new((0, 0), 0, true);
        r.add_traffic(1000);
        assert_eq!(r.traffic_level(), 100);
    }

    #[test]
    fn upgrades_at_thresholds() {
        let mut r = RoadTile::new((0, 0), 0, true);
        assert_eq!(r.road_type, RoadType::Dirt);
        r.add_traffic(50);
        assert_eq!(r.road_type, RoadType::Stone);
        r.add_traffic(30);
        assert_eq!(r.road_type, RoadType::Paved);
    }
}
