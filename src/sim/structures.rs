//! Structure lifecycle: disaster rolls, neglect decay, and ruin
//! conversion, run once per tick for every non-ruin structure.

use rand::Rng;

use super::context::TickContext;
use super::signal::{Signal, SignalKind};
use super::system::SimSystem;
use crate::config::DisasterWeights;
use crate::id::{hash_for, rng_for};
use crate::model::StructureType;

const DISASTER_CHECK_INTERVAL: u64 = 1_000;
const DISASTER_CHANCE: f64 = 0.05;
const EARTHQUAKE_OUTRIGHT_DESTRUCTION_CHANCE: f64 = 0.10;
const NEGLECT_STALE_TICKS: u64 = 50_000;
const NEGLECT_CHECK_INTERVAL: u64 = 7_000;
const NEGLECT_DAMAGE_FRACTION: f64 = 0.05;

#[derive(Clone, Copy)]
enum DisasterKind {
    Earthquake,
    Fire,
    Flood,
}

fn roll_disaster_kind(rng: &mut impl rand::RngCore, weights: &DisasterWeights) -> DisasterKind {
    let roll: f64 = rng.random();
    if roll < weights.earthquake {
        DisasterKind::Earthquake
    } else if roll < weights.earthquake + weights.fire {
        DisasterKind::Fire
    } else {
        DisasterKind::Flood
    }
}

fn is_stale(last_updated_tick: u64, tick: u64) -> bool {
    tick.saturating_sub(last_updated_tick) >= NEGLECT_STALE_TICKS
}

/// Damage fraction of `max_health` for one disaster roll. Wooden
/// (residential/commercial) structures burn worse; low-elevation
/// structures flood worse.
fn disaster_damage_fraction(
    kind: DisasterKind,
    structure_type: StructureType,
    elevation: f64,
    rng: &mut impl rand::RngCore,
) -> f64 {
    match kind {
        DisasterKind::Earthquake => rng.random_range(0.30..=0.50),
        DisasterKind::Fire => {
            let base = rng.random_range(0.40..=0.60);
            if matches!(structure_type, StructureType::House | StructureType::Market | StructureType::Workshop) {
                (base + 0.10).min(1.0)
            } else {
                base
            }
        }
        DisasterKind::Flood => {
            let base = rng.random_range(0.20..=0.30);
            if elevation < 0.3 {
                (base + 0.10).min(1.0)
            } else {
                base
            }
        }
    }
}

pub struct StructureLifecycleSystem;

impl SimSystem for StructureLifecycleSystem {
    fn name(&self) -> &'static str {
        "structure_lifecycle"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let tick = ctx.tick;
        let seed = ctx.world.seed as u64;
        let structure_ids: Vec<String> = ctx
            .world
            .structures
            .iter()
            .filter(|(_, s)| !s.is_ruin())
            .map(|(id, _)| id.clone())
            .collect();

        for id in &structure_ids {
            let elevation = ctx
                .world
                .structures
                .get(id)
                .and_then(|s| ctx.world.grid.elevation_at(s.location.0, s.location.1))
                .unwrap_or(0.5);

            if tick > 0 && tick % DISASTER_CHECK_INTERVAL == 0 {
                let mut rng = rng_for(tick ^ hash_for(seed, (id.as_str(), "disaster")), "disaster");
                if rng.random_bool(DISASTER_CHANCE) {
                    let weights = DisasterWeights::default();
                    let kind = roll_disaster_kind(&mut rng, &weights);
                    let Some(structure) = ctx.world.structures.get_mut(id) else { continue };
                    let fraction = disaster_damage_fraction(kind, structure.structure_type, elevation, &mut rng);
                    let damage = structure.max_health * fraction;
                    let _ = structure.apply_damage(damage, tick);
                    if matches!(kind, DisasterKind::Earthquake) && rng.random_bool(EARTHQUAKE_OUTRIGHT_DESTRUCTION_CHANCE)
                    {
                        let _ = structure.apply_damage(structure.max_health, tick);
                    }
                }
            }

            if tick > 0 && tick % NEGLECT_CHECK_INTERVAL == 0 {
                let stale = ctx
                    .world
                    .structures
                    .get(id)
                    .map(|s| is_stale(s.last_updated_tick, tick))
                    .unwrap_or(false);
                let unpaid_taxes = ctx
                    .world
                    .structures
                    .get(id)
                    .and_then(|s| s.owner_id.as_deref())
                    .and_then(|owner_id| ctx.world.clans.get(owner_id))
                    .map(|clan| clan.unpaid_taxes)
                    .unwrap_or(false);
                if stale || unpaid_taxes {
                    if let Some(structure) = ctx.world.structures.get_mut(id) {
                        let damage = structure.max_health * NEGLECT_DAMAGE_FRACTION;
                        let _ = structure.apply_damage(damage, tick);
                    }
                }
            }

            let (is_destroyed, owner_id) = ctx
                .world
                .structures
                .get(id)
                .map(|s| (s.health() <= 0.0, s.owner_id.clone()))
                .unwrap_or((false, None));
            if is_destroyed {
                if let Some(structure) = ctx.world.structures.get_mut(id) {
                    structure.convert_to_ruin(tick);
                }
                if let Some(structure) = ctx.world.structures.remove(id) {
                    let ruin_id = format!("{id}_ruin");
                    let mut ruin = structure;
                    ruin.id = ruin_id.clone();
                    ctx.world.structures.insert(ruin_id.clone(), ruin);
                    ctx.signals.push(Signal {
                        event_id: 0,
                        kind: SignalKind::StructureRuined { structure_id: ruin_id, clan_id: owner_id },
                    });
                }
            } else if ctx.world.structures.get(id).map(|s| s.health() < s.max_health).unwrap_or(false) {
                let new_health = ctx.world.structures.get(id).unwrap().health();
                ctx.signals.push(Signal {
                    event_id: 0,
                    kind: SignalKind::StructureDamaged { structure_id: id.clone(), new_health },
                });
            }
        }
    }
}
