//! Error taxonomy. Each kind maps to a distinct enum so callers can
//! match on what actually went wrong instead of string-sniffing.

use thiserror::Error;

/// Rejected a world/tick request before any state changed.
#[derive(Debug, Clone, Error)]
pub enum InvalidInputError {
    #[error("width and height must be > 0, got {width}x{height}")]
    NonPositiveDimensions { width: u32, height: u32 },
    #[error("unknown generator preset: {0}")]
    UnknownPreset(String),
    #[error("density must be within [0.0, 2.0], got {0}")]
    DensityOutOfRange(f32),
}

/// Why a structure placement at a candidate tile was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("candidate location is outside world bounds")]
    OutOfBounds,
    #[error("candidate is within the minimum spacing distance of an existing structure")]
    TooClose,
    #[error("the tile in front of the entrance is occupied by another structure")]
    BlockingEntrance,
    #[error("the target tile lies on an existing road")]
    OnRoad,
    #[error("the terrain at the target tile is unsuitable for this structure type")]
    UnsuitableTerrain,
}

/// A bounded search (A* road, river descent) ran out of its node budget.
/// Not fatal: the caller skips the specific river/road and generation
/// continues.
#[derive(Debug, Clone, Copy, Error)]
#[error("search exceeded its node budget ({explored}/{limit} nodes explored)")]
pub struct SearchExhausted {
    pub explored: usize,
    pub limit: usize,
}

/// Loading a persisted entity failed.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("entity schema version {found} is newer than this build supports ({supported})")]
    UnsupportedSchema { found: u16, supported: u16 },
    #[error("checksum mismatch loading '{entity_type}': save is corrupt and no valid backup was found")]
    CorruptSave { entity_type: String },
}

/// A bug: an invariant the data model guarantees was violated. In debug
/// builds this halts the tick (the caller should treat it as a panic-level
/// condition); in release builds the offending entity should be logged and
/// quarantined rather than corrupting the rest of the tick.
#[derive(Debug, Clone, Error)]
pub enum InvariantViolation {
    #[error("treasury for clan {clan_id} went negative: {amount}")]
    NegativeTreasury { clan_id: String, amount: f64 },
    #[error("entity id {referenced_id} referenced by {referrer_id} does not exist")]
    OrphanedReference {
        referrer_id: String,
        referenced_id: String,
    },
    #[error("road tile at ({x}, {y}) overlaps structure {structure_id}")]
    RoadStructureOverlap { x: i64, y: i64, structure_id: String },
    #[error("relationship metric '{field}' out of range after update: {value}")]
    RelationshipOutOfRange { field: &'static str, value: f64 },
}
