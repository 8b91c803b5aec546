//! Clan and its pairwise Relationship Record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Persisted;
use crate::error::InvariantViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClanType {
    Nomadic,
    Settled,
    Mercantile,
}

/// Stored on one side of a clan pair (the lower-sorting clan id by
/// convention). Every field is clamped at construction and after every
/// update so the testable invariant "relationship metrics remain within
/// their clamped ranges" always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub reputation: f64,
    pub influence: f64,
    pub alignment: f64,
    /// Does not decay — an explicit update is the only thing that changes
    /// it.
    pub race_affinity: f64,
    pub last_updated_tick: u64,
}

impl RelationshipRecord {
    pub fn new(tick: u64) -> Self {
        Self {
            reputation: 0.0,
            influence: 0.0,
            alignment: 0.0,
            race_affinity: 0.0,
            last_updated_tick: tick,
        }
    }

    /// Apply deltas and re-clamp, returning an error if the caller somehow
    /// produced a NaN (an invariant violation, not a user error).
    pub fn apply_delta(
        &mut self,
        d_reputation: f64,
        d_influence: f64,
        d_alignment: f64,
        d_race_affinity: f64,
        tick: u64,
    ) -> Result<(), InvariantViolation> {
        self.reputation = (self.reputation + d_reputation).clamp(-100.0, 100.0);
        self.influence = (self.influence + d_influence).clamp(0.0, 100.0);
        self.alignment = (self.alignment + d_alignment).clamp(-100.0, 100.0);
        self.race_affinity = (self.race_affinity + d_race_affinity).clamp(-50.0, 50.0);
        self.last_updated_tick = tick;
        for (field, value) in [
            ("reputation", self.reputation),
            ("influence", self.influence),
            ("alignment", self.alignment),
            ("race_affinity", self.race_affinity),
        ] {
            if value.is_nan() {
                return Err(InvariantViolation::RelationshipOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clan {
    pub schema_version: u16,
    pub id: String,
    pub name: String,
    pub clan_type: ClanType,
    pub member_ids: Vec<String>,
    treasury: f64,
    /// Keyed by the *other* clan's id; this clan's half of each pair.
    pub relationships: BTreeMap<String, RelationshipRecord>,
    pub founding_tick: u64,
    pub last_active_tick: u64,
    /// Abstract input: true when this clan owes taxes it hasn't paid.
    /// Nothing in this crate computes taxation itself; callers set this
    /// directly, and structure neglect checks read it.
    pub unpaid_taxes: bool,
}

impl Persisted for Clan {
    const TYPE: &'static str = "world/Clan";
    const SCHEMA_VERSION: u16 = 1;
}

impl Clan {
    pub fn new(id: String, name: String, clan_type: ClanType, founding_tick: u64) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION,
            id,
            name,
            clan_type,
            member_ids: Vec::new(),
            treasury: 0.0,
            relationships: BTreeMap::new(),
            founding_tick,
            last_active_tick: founding_tick,
            unpaid_taxes: false,
        }
    }

    pub fn treasury(&self) -> f64 {
        self.treasury
    }

    pub fn is_player_controlled(&self, is_player: impl Fn(&str) -> bool) -> bool {
        self.member_ids.iter().any(|id| is_player(id))
    }

    /// Deposit funds; cannot fail (treasury only grows).
    pub fn deposit(&mut self, amount: f64) {
        debug_assert!(amount >= 0.0, "deposit amount must be non-negative");
        self.treasury += amount.max(0.0);
    }

    /// Withdraw funds, rejecting any withdrawal that would drive the
    /// treasury negative rather than allowing the invariant to break.
    pub fn withdraw(&mut self, amount: f64) -> Result<(), InvariantViolation> {
        if amount > self.treasury {
            return Err(InvariantViolation::NegativeTreasury {
                clan_id: self.id.clone(),
                amount: self.treasury - amount,
            });
        }
        self.treasury -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_clamps_on_overflow() {
        let mut rel = RelationshipRecord::new(0);
        rel.apply_delta(200.0, 200.0, 200.0, 200.0, 1).unwrap();
        assert_eq!(rel.reputation, 100.0);
        assert_eq!(rel.influence, 100.0);
        assert_eq!(rel.alignment, 100.0);
        assert_eq!(rel.race_affinity, 50.0);
    }

    #[test]
    fn relationship_clamps_on_underflow() {
        let mut rel = RelationshipRecord::new(0);
        rel.apply_delta(-200.0, -200.0, -200.0, -200.0, 1).unwrap();
        assert_eq!(rel.reputation, -100.0);
        assert_eq!(rel.influence, 0.0);
        assert_eq!(rel.alignment, -100.0);
        assert_eq!(rel.race_affinity, -50.0);
    }

    #[test]
    fn withdraw_rejects_overdraft() {
        let mut clan = Clan::new("c1".into(), "Test".into(), ClanType::Settled, 0);
        clan.deposit(100.0);
        assert!(clan.withdraw(150.0).is_err());
        assert_eq!(clan.treasury(), 100.0);
    }

    #[test]
    fn withdraw_within_balance_succeeds() {
        let mut clan = Clan::new("c1".into(), "Test".into(), ClanType::Settled, 0);
        clan.deposit(100.0);
        clan.withdraw(60.0).unwrap();
        assert_eq!(clan.treasury(), 40.0);
    }
}
