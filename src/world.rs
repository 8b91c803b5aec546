//! The `World`: one arena per entity kind, plus the append-only
//! per-tick event log and the canonical checksum.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::IdGenerator;
use crate::model::{
    Clan, NamedNpc, Plate, Prophecy, Quest, Region, RegionalFeature, River, RoadTile, Settlement,
    Story, Structure, Village, WorldGrid,
};

/// One entry in the append-only per-tick event log, ordered by
/// `(tick, region, subsystem, sequence)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickEvent {
    pub tick: u64,
    pub region: String,
    pub subsystem: &'static str,
    pub sequence: u64,
    pub description: String,
}

/// The complete simulation state. Every cross-entity reference is an id
/// into one of these maps; there are no owning pointers between entities.
pub struct World {
    pub seed: i64,
    pub grid: WorldGrid,
    pub plates: Vec<Plate>,
    pub rivers: BTreeMap<String, River>,
    pub features: BTreeMap<String, RegionalFeature>,
    pub clans: BTreeMap<String, Clan>,
    pub settlements: BTreeMap<String, Settlement>,
    pub structures: BTreeMap<String, Structure>,
    pub npcs: BTreeMap<String, NamedNpc>,
    pub quests: BTreeMap<String, Quest>,
    pub prophecies: BTreeMap<String, Prophecy>,
    pub stories: BTreeMap<String, Story>,
    /// Keyed by tile position; append-only.
    pub roads: BTreeMap<(i64, i64), RoadTile>,
    pub villages: BTreeMap<String, Village>,
    pub regions: BTreeMap<String, Region>,
    pub current_tick: u64,
    pub event_log: Vec<TickEvent>,
    /// Last tick a dynamic quest was generated for a given `(type, source
    /// id)` key, enforcing the dynamic quest generator's 10,000-tick
    /// per-source cooldown.
    pub quest_cooldowns: BTreeMap<String, u64>,
    id_gen: IdGenerator,
    event_sequence: u64,
}

impl World {
    pub fn new(seed: i64, width: u32, height: u32) -> Self {
        Self {
            seed,
            grid: WorldGrid::new(seed, width, height),
            plates: Vec::new(),
            rivers: BTreeMap::new(),
            features: BTreeMap::new(),
            clans: BTreeMap::new(),
            settlements: BTreeMap::new(),
            structures: BTreeMap::new(),
            npcs: BTreeMap::new(),
            quests: BTreeMap::new(),
            prophecies: BTreeMap::new(),
            stories: BTreeMap::new(),
            roads: BTreeMap::new(),
            villages: BTreeMap::new(),
            regions: BTreeMap::new(),
            current_tick: 0,
            event_log: Vec::new(),
            quest_cooldowns: BTreeMap::new(),
            id_gen: IdGenerator::new(seed as u64),
            event_sequence: 0,
        }
    }

    /// Is the given `(type, source id)` cooldown key still active at
    /// `tick`? If not (or never set), records `tick` as the new last-fired
    /// time and returns `false`.
    pub fn try_fire_cooldown(&mut self, key: &str, tick: u64, cooldown_ticks: u64) -> bool {
        if let Some(&last) = self.quest_cooldowns.get(key) {
            if tick.saturating_sub(last) < cooldown_ticks {
                return true;
            }
        }
        self.quest_cooldowns.insert(key.to_string(), tick);
        false
    }

    pub fn id_gen(&self) -> &IdGenerator {
        &self.id_gen
    }

    /// Append one entry to the per-tick event log.
    pub fn log_event(&mut self, region: &str, subsystem: &'static str, description: String) {
        let sequence = self.event_sequence;
        self.event_sequence += 1;
        self.event_log.push(TickEvent {
            tick: self.current_tick,
            region: region.to_string(),
            subsystem,
            sequence,
            description,
        });
    }

    /// Is any tile of the structure's footprint (currently just its
    /// single location tile) occupied by a road? Used by the placement
    /// validator and by invariant checks.
    pub fn tile_has_road(&self, x: i64, y: i64) -> bool {
        self.roads.contains_key(&(x, y))
    }

    pub fn structure_at(&self, x: i64, y: i64) -> Option<&Structure> {
        self.structures.values().find(|s| s.location == (x, y))
    }

    /// Check the road/structure disjointness invariant across the whole
    /// world. Returns the offending tile, if any.
    pub fn check_roads_disjoint_from_structures(&self) -> Option<(i64, i64)> {
        self.structures
            .values()
            .map(|s| s.location)
            .find(|&(x, y)| self.tile_has_road(x, y))
    }
}
