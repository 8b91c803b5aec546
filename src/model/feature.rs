//! Regional Feature: weighted landmarks placed with minimum
//! pairwise separation.

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Volcano,
    MagicZone,
    SubmergedCity,
    AncientRuin,
    CrystalCave,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 5] = [
        FeatureKind::Volcano,
        FeatureKind::MagicZone,
        FeatureKind::SubmergedCity,
        FeatureKind::AncientRuin,
        FeatureKind::CrystalCave,
    ];

    /// Relative selection weight (uniform across kinds; only compatibility
    /// gates which kinds are even eligible at a given tile).
    pub fn weight(self) -> f64 {
        1.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalFeature {
    pub schema_version: u16,
    pub id: String,
    pub kind: FeatureKind,
    pub position: (i64, i64),
    pub intensity: f64,
}

impl Persisted for RegionalFeature {
    const TYPE: &'static str = "world/RegionalFeature";
    const SCHEMA_VERSION: u16 = 1;
}
