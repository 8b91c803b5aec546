//! Tectonic plate.

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateType {
    Continental,
    Oceanic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plate {
    pub schema_version: u16,
    pub id: u32,
    pub center: (i64, i64),
    pub drift: (f64, f64),
    pub plate_type: PlateType,
}

impl Persisted for Plate {
    const TYPE: &'static str = "world/Plate";
    const SCHEMA_VERSION: u16 = 1;
}
