//! Region: the scheduling unit that owns a bounded slice of
//! the world and carries its own tick-processing state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionState {
    Active,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl Bounds {
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub schema_version: u16,
    pub id: String,
    pub bounds: Bounds,
    pub owned_entity_ids: BTreeSet<String>,
    pub last_processed_tick: u64,
    pub state: RegionState,
}

impl Persisted for Region {
    const TYPE: &'static str = "world/Region";
    const SCHEMA_VERSION: u16 = 1;
}

impl Region {
    pub fn new(id: String, bounds: Bounds) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION,
            id,
            bounds,
            owned_entity_ids: BTreeSet::new(),
            last_processed_tick: 0,
            state: RegionState::Active,
        }
    }
}
