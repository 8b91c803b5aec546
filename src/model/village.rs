//! Village: a derived cluster, recomputed every active-region tick;
//! promotions (village -> town -> city) are monotonic and ids persist
//! across recomputations while the member set is unchanged.

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VillageTier {
    Village,
    Town,
    City,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Village {
    pub schema_version: u16,
    pub id: String,
    pub name: String,
    pub tier: VillageTier,
    pub center: (f64, f64),
    pub structure_ids: Vec<String>,
    pub population: u32,
    pub governing_clan_id: Option<String>,
}

impl Persisted for Village {
    const TYPE: &'static str = "world/Village";
    const SCHEMA_VERSION: u16 = 1;
}
