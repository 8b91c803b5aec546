//! Prophecy: hybrid countdown + condition trigger, linked to a
//! special feature.

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProphecyStatus {
    Pending,
    Triggered,
    Fulfilled,
    Lapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriggerCondition {
    /// Fires once `current_tick >= tick`.
    CountdownTick(u64),
    /// Fires once the linked feature's intensity reaches the threshold.
    FeatureIntensityAtLeast(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prophecy {
    pub schema_version: u16,
    pub id: String,
    pub title: String,
    pub prophecy_type: String,
    pub trigger_tick: u64,
    pub trigger_condition: TriggerCondition,
    pub linked_feature_id: String,
    pub status: ProphecyStatus,
}

impl Persisted for Prophecy {
    const TYPE: &'static str = "world/Prophecy";
    const SCHEMA_VERSION: u16 = 1;
}

impl Prophecy {
    /// A hybrid trigger fires when *either* the countdown has elapsed *or*
    /// the condition is independently satisfied.
    pub fn should_trigger(&self, current_tick: u64, feature_intensity: f64) -> bool {
        if self.status != ProphecyStatus::Pending {
            return false;
        }
        let countdown_done = current_tick >= self.trigger_tick;
        let condition_met = match self.trigger_condition {
            TriggerCondition::CountdownTick(t) => current_tick >= t,
            TriggerCondition::FeatureIntensityAtLeast(threshold) => {
                feature_intensity >= threshold
            }
        };
        countdown_done || condition_met
    }
}
