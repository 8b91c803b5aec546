//! Settlement: one per clan, holding that clan's
//! structures.

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub schema_version: u16,
    pub id: String,
    pub name: String,
    pub clan_id: String,
    pub center: (i64, i64),
    pub structure_ids: Vec<String>,
}

impl Persisted for Settlement {
    const TYPE: &'static str = "world/Settlement";
    const SCHEMA_VERSION: u16 = 1;
}
