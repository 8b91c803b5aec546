//! Quest.

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Available,
    Active,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Investigate,
    Explore,
    Retrieve,
    Defeat,
    Mediate,
    Repair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub description: String,
    pub target_x: i64,
    pub target_y: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub gold: u32,
    pub reputation: i32,
    pub rare_item: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub schema_version: u16,
    pub id: String,
    pub title: String,
    pub quest_type: QuestType,
    pub status: QuestStatus,
    pub objectives: Vec<Objective>,
    pub rewards: Vec<Reward>,
    /// The feature, ruin, conflict pair, disaster, or story this quest was
    /// generated from, for cooldown and traceability purposes.
    pub linked_source_id: Option<String>,
    pub required_level: u32,
    pub expiration_tick: Option<u64>,
}

impl Persisted for Quest {
    const TYPE: &'static str = "world/Quest";
    const SCHEMA_VERSION: u16 = 1;
}

impl Quest {
    pub fn expire_if_due(&mut self, tick: u64) {
        if self.status == QuestStatus::Available || self.status == QuestStatus::Active {
            if let Some(exp) = self.expiration_tick {
                if tick >= exp {
                    self.status = QuestStatus::Failed;
                }
            }
        }
    }
}
