//! Cross-system signal bus: the payload systems exchange during the
//! reaction phase of a tick dispatch.

use serde::{Deserialize, Serialize};

use crate::model::VillageTier;

/// A signal emitted by one system and consumed by others within the same
/// tick. Carries the event_id that caused it so reacting systems can
/// chain causality when they create follow-up log entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub event_id: u64,
    pub kind: SignalKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalKind {
    NpcDied { npc_id: String },
    NpcBorn { npc_id: String, clan_id: String },
    NpcMarried { a_id: String, b_id: String },
    StructureRuined { structure_id: String, clan_id: Option<String> },
    StructureDamaged { structure_id: String, new_health: f64 },
    ClanWarDeclared { attacker_id: String, defender_id: String },
    ClanAllianceFormed { a_id: String, b_id: String },
    ClanSplit { parent_id: String, child_id: String },
    TradeRouteEstablished { a_id: String, b_id: String },
    VillagePromoted { village_id: String, tier: VillageTier },
    StoryOriginated { story_id: String },
}
