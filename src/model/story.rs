//! Story / Event: the unit that propagates across the
//! tile grid by BFS.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryCategory {
    Ruin,
    Conflict,
    Disaster,
    Prophecy,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    Active,
    Dormant,
    Resolved,
    Discredited,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub schema_version: u16,
    pub id: String,
    pub category: StoryCategory,
    pub status: StoryStatus,
    pub origin: (i64, i64),
    pub origin_tick: u64,
    pub base_probability: f64,
    pub hop_count: u32,
    pub max_hops: u32,
    pub priority: i32,
    pub affected_tiles: Vec<(i64, i64)>,
    pub metadata: BTreeMap<String, String>,
}

impl Persisted for Story {
    const TYPE: &'static str = "world/Story";
    const SCHEMA_VERSION: u16 = 1;
}

impl Story {
    pub fn is_active(&self) -> bool {
        self.status == StoryStatus::Active
    }
}
