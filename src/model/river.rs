//! River: a traced downhill path from a source tile to its terminus.

use serde::{Deserialize, Serialize};

use super::Persisted;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct River {
    pub schema_version: u16,
    pub id: String,
    /// 4-connected tile path from source to terminus. Invariant: every
    /// consecutive step descends (or is flat within `ε = 0.002`), checked
    /// at construction time by the hydrology stage, never re-validated
    /// after generation (the grid is frozen).
    pub path: Vec<(i64, i64)>,
    pub source: (i64, i64),
    pub terminus: (i64, i64),
    pub is_lake: bool,
}

impl Persisted for River {
    const TYPE: &'static str = "world/River";
    const SCHEMA_VERSION: u16 = 1;
}

impl River {
    pub fn len_tiles(&self) -> usize {
        self.path.len()
    }
}
