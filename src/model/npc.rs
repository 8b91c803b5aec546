//! Named NPC.

use serde::{Deserialize, Serialize};

use super::Persisted;
use crate::config::TICKS_PER_YEAR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    Child,
    Laborer,
    Merchant,
    Artisan,
    Guard,
    Clergy,
    Leader,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedNpc {
    pub schema_version: u16,
    pub id: String,
    pub name: String,
    pub clan_id: String,
    /// Cached `floor((tick - birth_tick) / TICKS_PER_YEAR)`, refreshed by
    /// the NPC lifecycle system every tick. Kept as a denormalized
    /// field because the data model lists age as a first-class attribute,
    /// not just a derived getter.
    pub age: u32,
    pub gender: Gender,
    pub job: Job,
    pub home_structure_id: Option<String>,
    pub workplace_structure_id: Option<String>,
    pub spouse_id: Option<String>,
    pub children_ids: Vec<String>,
    pub fertility: f64,
    pub is_player: bool,
    /// Signed so world-gen-seeded adults (born before tick 0) keep a
    /// negative birth tick instead of collapsing to genesis.
    pub birth_tick: i64,
    pub last_reproduction_check_tick: u64,
}

impl Persisted for NamedNpc {
    const TYPE: &'static str = "world/NamedNpc";
    const SCHEMA_VERSION: u16 = 1;
}

impl NamedNpc {
    /// Age in years at the given tick.
    pub fn age_at(&self, tick: u64) -> u32 {
        let elapsed = (tick as i64 - self.birth_tick).max(0);
        (elapsed / TICKS_PER_YEAR as i64) as u32
    }

    pub fn refresh_age(&mut self, tick: u64) {
        self.age = self.age_at(tick);
    }

    /// Fertility curve: peaks at 100 at age 27, falls by 5 per year of
    /// deviation, zero outside [18, 45].
    pub fn fertility_for_age(age: u32) -> f64 {
        if !(18..=45).contains(&age) {
            return 0.0;
        }
        let deviation = (age as i32 - 27).unsigned_abs() as f64;
        (100.0 - 5.0 * deviation).max(0.0)
    }

    pub fn is_child(&self) -> bool {
        self.age < 18
    }

    pub fn is_elder(&self) -> bool {
        self.age >= 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_at_floors_whole_years() {
        let npc = NamedNpc {
            schema_version: 1,
            id: "n1".into(),
            name: "Test".into(),
            clan_id: "c1".into(),
            age: 0,
            gender: Gender::Male,
            job: Job::Child,
            home_structure_id: None,
            workplace_structure_id: None,
            spouse_id: None,
            children_ids: Vec::new(),
            fertility: 0.0,
            is_player: false,
            birth_tick: 1000,
            last_reproduction_check_tick: 1000,
        };
        assert_eq!(npc.age_at(1000), 0);
        assert_eq!(npc.age_at(1000 + TICKS_PER_YEAR - 1), 0);
        assert_eq!(npc.age_at(1000 + TICKS_PER_YEAR), 1);
        assert_eq!(npc.age_at(1000 + TICKS_PER_YEAR * 5 + 3), 5);
    }

    #[test]
    fn a_seeded_adult_born_before_genesis_keeps_its_age_at_genesis() {
        let npc = NamedNpc {
            schema_version: 1,
            id: "n1".into(),
            name: "Test".into(),
            clan_id: "c1".into(),
            age: 25,
            gender: Gender::Male,
            job: Job::Laborer,
            home_structure_id: None,
            workplace_structure_id: None,
            spouse_id: None,
            children_ids: Vec::new(),
            fertility: 0.0,
            is_player: false,
            birth_tick: -(25 * TICKS_PER_YEAR as i64),
            last_reproduction_check_tick: 0,
        };
        assert_eq!(npc.age_at(0), 25);
        assert_eq!(npc.age_at(TICKS_PER_YEAR * 5), 30);
    }

    #[test]
    fn fertility_peaks_at_27() {
        assert_eq!(NamedNpc::fertility_for_age(27), 100.0);
        assert_eq!(NamedNpc::fertility_for_age(22), 75.0);
        assert_eq!(NamedNpc::fertility_for_age(32), 75.0);
    }

    #[test]
    fn fertility_zero_outside_range() {
        assert_eq!(NamedNpc::fertility_for_age(17), 0.0);
        assert_eq!(NamedNpc::fertility_for_age(46), 0.0);
    }
}
