//! Structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Persisted;
use crate::error::InvariantViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    GuildHall,
    Temple,
    House,
    Market,
    Workshop,
    Dock,
    FishingHut,
    AncientRuins,
}

impl StructureType {
    /// Dock/fishing-hut are the only types allowed on water tiles.
    pub fn allows_water(self) -> bool {
        matches!(self, StructureType::Dock | StructureType::FishingHut)
    }

    pub fn is_residential(self) -> bool {
        matches!(self, StructureType::House)
    }

    pub fn is_commercial(self) -> bool {
        matches!(self, StructureType::Market | StructureType::Workshop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// The tile directly in front of an entrance on this side.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Side::North => (0, -1),
            Side::East => (1, 0),
            Side::South => (0, 1),
            Side::West => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    None,
    Visitor,
    Resident,
    Owner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerType {
    Clan,
    Npc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub schema_version: u16,
    pub id: String,
    pub structure_type: StructureType,
    pub location: (i64, i64),
    health: f64,
    pub max_health: f64,
    pub entrance_side: Side,
    pub owner_id: Option<String>,
    pub owner_type: Option<OwnerType>,
    pub permissions: BTreeMap<String, AccessLevel>,
    pub rooms: Vec<String>,
    pub upgrades: Vec<String>,
    pub created_at_tick: u64,
    pub last_updated_tick: u64,
    /// Free-form metadata, used by ruin conversion to remember the
    /// pre-ruin owner/type for quest/feature tooling.
    pub metadata: BTreeMap<String, String>,
}

impl Persisted for Structure {
    const TYPE: &'static str = "world/Structure";
    const SCHEMA_VERSION: u16 = 1;
}

impl Structure {
    pub fn new(
        id: String,
        structure_type: StructureType,
        location: (i64, i64),
        max_health: f64,
        entrance_side: Side,
        owner_id: Option<String>,
        owner_type: Option<OwnerType>,
        tick: u64,
    ) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION,
            id,
            structure_type,
            location,
            health: max_health,
            max_health,
            entrance_side,
            owner_id,
            owner_type,
            permissions: BTreeMap::new(),
            rooms: Vec::new(),
            upgrades: Vec::new(),
            created_at_tick: tick,
            last_updated_tick: tick,
            metadata: BTreeMap::new(),
        }
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn is_ruin(&self) -> bool {
        self.structure_type == StructureType::AncientRuins
    }

    /// Apply damage, clamped to `[0, max_health]`.
    pub fn apply_damage(&mut self, amount: f64, tick: u64) -> Result<(), InvariantViolation> {
        if amount.is_nan() {
            return Err(InvariantViolation::RelationshipOutOfRange {
                field: "structure_health",
                value: amount,
            });
        }
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        self.last_updated_tick = tick;
        Ok(())
    }

    pub fn repair(&mut self, amount: f64, tick: u64) {
        self.health = (self.health + amount.max(0.0)).clamp(0.0, self.max_health);
        self.last_updated_tick = tick;
    }

    /// Footprint tile the entrance opens onto.
    pub fn entrance_front_tile(&self) -> (i64, i64) {
        let (dx, dy) = self.entrance_side.offset();
        (self.location.0 + dx, self.location.1 + dy)
    }

    /// Flip this structure's fields to ruin state in place: type, owner,
    /// health, and a metadata record of what it used to be. Does not
    /// touch `id` — the caller holding the owning map is responsible for
    /// moving the entry to its new `{orig}_ruin` key.
    pub fn convert_to_ruin(&mut self, tick: u64) {
        if let Some(owner) = &self.owner_id {
            self.metadata
                .insert("original_owner".to_string(), owner.clone());
        }
        self.metadata.insert(
            "original_type".to_string(),
            format!("{:?}", self.structure_type),
        );
        self.structure_type = StructureType::AncientRuins;
        self.owner_id = None;
        self.owner_type = None;
        self.health = 0.0;
        self.last_updated_tick = tick;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(hp: f64) -> Structure {
        Structure::new(
            "house_1".into(),
            StructureType::House,
            (10, 10),
            hp,
            Side::South,
            Some("clan_1".into()),
            Some(OwnerType::Clan),
            0,
        )
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut s = make(100.0);
        s.apply_damage(150.0, 1).unwrap();
        assert_eq!(s.health(), 0.0);
    }

    #[test]
    fn repair_clamps_at_max() {
        let mut s = make(100.0);
        s.apply_damage(50.0, 1).unwrap();
        s.repair(200.0, 2);
        assert_eq!(s.health(), 100.0);
    }

    #[test]
    fn entrance_front_tile_matches_side() {
        let s = make(100.0);
        assert_eq!(s.entrance_front_tile(), (10, 11));
    }

    #[test]
    fn ruin_conversion_preserves_id_suffix_convention_fields() {
        let mut s = make(100.0);
        s.apply_damage(100.0, 5).unwrap();
        s.convert_to_ruin(5);
        assert!(s.is_ruin());
        assert_eq!(s.owner_id, None);
        assert_eq!(s.metadata.get("original_owner").unwrap(), "clan_1");
        assert_eq!(s.max_health, 100.0);
    }
}
