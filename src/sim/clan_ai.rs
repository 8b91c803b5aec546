//! Clan AI: expansion, warfare, alliance, trade, and splitting, run once
//! per tick for every clan not under direct player control.

use rand::Rng;

use super::context::TickContext;
use super::signal::{Signal, SignalKind};
use super::system::SimSystem;
use crate::id::{hash_for, rng_for};
use crate::model::{Clan, ClanType, OwnerType, RelationshipRecord, Side, Structure, StructureType};
use crate::worldgen::placement::{choose_entrance_side, validate_placement};
use crate::worldgen::roads::force_connect;

const EXPANSION_TREASURY_THRESHOLD: f64 = 500.0;
const EXPANSION_POPULATION_THRESHOLD: usize = 10;
const WARFARE_RELATIONSHIP_THRESHOLD: f64 = -50.0;
const WARFARE_STRENGTH_RATIO: f64 = 1.5;
const WARFARE_COOLDOWN_TICKS: u64 = 500;
const ALLIANCE_RELATIONSHIP_THRESHOLD: f64 = 50.0;
const SHARED_ENEMY_THRESHOLD: f64 = -30.0;
const ALLIANCE_RELATIONSHIP_VALUE: f64 = 75.0;
const TRADE_RELATIONSHIP_THRESHOLD: f64 = 0.0;
const TRADE_RANGE_TILES: i64 = 50;
const TRADE_INCOME_INTERVAL: u64 = 100;
const TRADE_INCOME_AMOUNT: f64 = 10.0;
const TRADE_DRIFT_INTERVAL: u64 = 1000;
const TRADE_DRIFT_AMOUNT: f64 = 5.0;
const SPLIT_MEMBER_THRESHOLD: usize = 50;
const SPLIT_MAJORITY_FRACTION: f64 = 0.6;

#[derive(Clone, Copy)]
enum ConstructionCategory {
    Residential,
    Commercial,
    Special,
    Military,
}

fn construction_weights(population: usize) -> Vec<(ConstructionCategory, f64)> {
    use ConstructionCategory::*;
    if population < 20 {
        vec![(Residential, 0.8), (Commercial, 0.2)]
    } else if population <= 50 {
        vec![(Residential, 0.5), (Commercial, 0.3), (Special, 0.2)]
    } else {
        vec![(Residential, 0.3), (Commercial, 0.4), (Special, 0.2), (Military, 0.1)]
    }
}

fn choose_category(rng: &mut impl rand::RngCore, weights: &[(ConstructionCategory, f64)]) -> ConstructionCategory {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for (category, weight) in weights {
        cumulative += weight;
        if roll < cumulative {
            return *category;
        }
    }
    weights.last().unwrap().0
}

/// `Special` maps to Temple (no dedicated civic building in this data
/// model) and `Military` maps to GuildHall, the closest existing type to
/// a garrison/command building.
fn structure_type_for_category(category: ConstructionCategory, rng: &mut impl rand::RngCore) -> StructureType {
    match category {
        ConstructionCategory::Residential => StructureType::House,
        ConstructionCategory::Commercial => {
            if rng.random_bool(0.5) {
                StructureType::Market
            } else {
                StructureType::Workshop
            }
        }
        ConstructionCategory::Special => StructureType::Temple,
        ConstructionCategory::Military => StructureType::GuildHall,
    }
}

fn clan_strength(world: &crate::world::World, clan_id: &str) -> f64 {
    world.clans.get(clan_id).map(|c| c.member_ids.len() as f64).unwrap_or(0.0)
}

fn run_expansion(ctx: &mut TickContext, clan_id: &str) {
    let Some(clan) = ctx.world.clans.get(clan_id) else { return };
    let population = clan.member_ids.len();
    if clan.treasury() <= EXPANSION_TREASURY_THRESHOLD || population <= EXPANSION_POPULATION_THRESHOLD {
        return;
    }
    let Some(settlement) = ctx.world.settlements.values().find(|s| s.clan_id == clan_id).cloned() else {
        return;
    };
    let seed = ctx.world.seed as u64;
    let mut rng = rng_for(ctx.tick ^ hash_for(seed, (clan_id, "expansion")), "expansion");

    let weights = construction_weights(population);
    let category = choose_category(&mut rng, &weights);
    let structure_type = structure_type_for_category(category, &mut rng);

    for _ in 0..40 {
        let dx = rng.random_range(-20..=20);
        let dy = rng.random_range(-20..=20);
        let (x, y) = (settlement.center.0 + dx, settlement.center.1 + dy);
        if !ctx.world.grid.in_bounds(x, y) {
            continue;
        }
        let side = choose_entrance_side(&ctx.world.grid, x, y);
        if validate_placement(ctx.world, x, y, structure_type, side).is_err() {
            continue;
        }
        let cost = rng.random_range(50.0..=200.0);
        let Some(clan) = ctx.world.clans.get_mut(clan_id) else { return };
        if clan.withdraw(cost).is_err() {
            return;
        }
        let id = ctx.world.id_gen().make_id("structure", clan_id, ctx.tick);
        let structure = Structure::new(
            id.clone(),
            structure_type,
            (x, y),
            100.0,
            side,
            Some(clan_id.to_string()),
            Some(OwnerType::Clan),
            ctx.tick,
        );
        ctx.world.structures.insert(id.clone(), structure);
        crate::worldgen::roads::connect_structure(ctx.world, &id, ctx.tick);
        return;
    }
}

fn run_warfare(ctx: &mut TickContext, clan_id: &str) {
    let seed = ctx.world.seed as u64;
    let Some(clan) = ctx.world.clans.get(clan_id) else { return };
    let hostile: Vec<(String, u64)> = clan
        .relationships
        .iter()
        .filter(|(_, rel)| rel.reputation < WARFARE_RELATIONSHIP_THRESHOLD)
        .map(|(id, rel)| (id.clone(), rel.last_updated_tick))
        .collect();

    for (target_id, last_updated_tick) in hostile {
        if ctx.tick.saturating_sub(last_updated_tick) < WARFARE_COOLDOWN_TICKS {
            continue;
        }
        if clan_strength(ctx.world, clan_id) <= WARFARE_STRENGTH_RATIO * clan_strength(ctx.world, &target_id) {
            continue;
        }
        let target_structure_id = ctx
            .world
            .structures
            .values()
            .filter(|s| s.owner_id.as_deref() == Some(target_id.as_str()) && !s.is_ruin())
            .map(|s| s.id.clone())
            .next();
        let Some(target_structure_id) = target_structure_id else { continue };

        let mut rng = rng_for(ctx.tick ^ hash_for(seed, (clan_id, target_id.as_str())), "warfare");
        let fraction = rng.random_range(0.5..=0.7);
        if let Some(structure) = ctx.world.structures.get_mut(&target_structure_id) {
            let damage = structure.max_health * fraction;
            let _ = structure.apply_damage(damage, ctx.tick);
        }
        if let Some(clan) = ctx.world.clans.get_mut(clan_id) {
            if let Some(rel) = clan.relationships.get_mut(&target_id) {
                rel.last_updated_tick = ctx.tick;
            }
        }
        ctx.signals.push(Signal {
            event_id: 0,
            kind: SignalKind::ClanWarDeclared { attacker_id: clan_id.to_string(), defender_id: target_id },
        });
        return;
    }
}

fn run_alliance(ctx: &mut TickContext, clan_id: &str) {
    let Some(clan) = ctx.world.clans.get(clan_id) else { return };
    let friendly: Vec<String> = clan
        .relationships
        .iter()
        .filter(|(_, rel)| rel.reputation > ALLIANCE_RELATIONSHIP_THRESHOLD)
        .map(|(id, _)| id.clone())
        .collect();
    let own_enemies: Vec<String> = clan
        .relationships
        .iter()
        .filter(|(_, rel)| rel.reputation < SHARED_ENEMY_THRESHOLD)
        .map(|(id, _)| id.clone())
        .collect();

    for other_id in friendly {
        let Some(other) = ctx.world.clans.get(&other_id) else { continue };
        let shares_enemy = own_enemies.iter().any(|enemy_id| {
            other
                .relationships
                .get(enemy_id)
                .map(|rel| rel.reputation < SHARED_ENEMY_THRESHOLD)
                .unwrap_or(false)
        });
        if !shares_enemy {
            continue;
        }
        let tick = ctx.tick;
        if let Some(clan) = ctx.world.clans.get_mut(clan_id) {
            clan.relationships
                .entry(other_id.clone())
                .or_insert_with(|| RelationshipRecord::new(tick))
                .reputation = ALLIANCE_RELATIONSHIP_VALUE;
        }
        if let Some(other) = ctx.world.clans.get_mut(&other_id) {
            other
                .relationships
                .entry(clan_id.to_string())
                .or_insert_with(|| RelationshipRecord::new(tick))
                .reputation = ALLIANCE_RELATIONSHIP_VALUE;
        }
        ctx.signals.push(Signal {
            event_id: 0,
            kind: SignalKind::ClanAllianceFormed { a_id: clan_id.to_string(), b_id: other_id },
        });
        return;
    }
}

fn run_trade(ctx: &mut TickContext, clan_id: &str) {
    let Some(clan) = ctx.world.clans.get(clan_id) else { return };
    let Some(own_settlement) = ctx.world.settlements.values().find(|s| s.clan_id == clan_id).cloned() else {
        return;
    };
    let partners: Vec<String> = clan
        .relationships
        .iter()
        .filter(|(_, rel)| rel.reputation > TRADE_RELATIONSHIP_THRESHOLD)
        .map(|(id, _)| id.clone())
        .collect();

    for partner_id in partners {
        let Some(partner_settlement) = ctx.world.settlements.values().find(|s| s.clan_id == partner_id).cloned()
        else {
            continue;
        };
        let dx = own_settlement.center.0 - partner_settlement.center.0;
        let dy = own_settlement.center.1 - partner_settlement.center.1;
        let distance = ((dx * dx + dy * dy) as f64).sqrt();
        if distance > TRADE_RANGE_TILES as f64 {
            continue;
        }

        if ctx.tick > 0 && ctx.tick % TRADE_INCOME_INTERVAL == 0 {
            if let Some(clan) = ctx.world.clans.get_mut(clan_id) {
                clan.deposit(TRADE_INCOME_AMOUNT);
            }
            if let Some(partner) = ctx.world.clans.get_mut(&partner_id) {
                partner.deposit(TRADE_INCOME_AMOUNT);
            }
        }
        if ctx.tick > 0 && ctx.tick % TRADE_DRIFT_INTERVAL == 0 {
            let tick = ctx.tick;
            if let Some(clan) = ctx.world.clans.get_mut(clan_id) {
                let _ = clan
                    .relationships
                    .entry(partner_id.clone())
                    .or_insert_with(|| RelationshipRecord::new(tick))
                    .apply_delta(TRADE_DRIFT_AMOUNT, 0.0, 0.0, 0.0, tick);
            }
        }

        let route_exists = ctx.world.roads.keys().any(|&(x, y)| {
            crate::model::WorldGrid::chebyshev_distance(x, y, own_settlement.center.0, own_settlement.center.1) <= 1
        });
        if !route_exists {
            force_connect(
                ctx.world,
                own_settlement.center,
                partner_settlement.center,
                StructureType::House,
                ctx.tick,
            );
            ctx.signals.push(Signal {
                event_id: 0,
                kind: SignalKind::TradeRouteEstablished { a_id: clan_id.to_string(), b_id: partner_id },
            });
        }
    }
}

fn run_split(ctx: &mut TickContext, clan_id: &str) {
    let settlement_count = ctx.world.settlements.values().filter(|s| s.clan_id == clan_id).count();
    let Some(clan) = ctx.world.clans.get(clan_id).cloned() else { return };
    if clan.member_ids.len() <= SPLIT_MEMBER_THRESHOLD || settlement_count <= 1 {
        return;
    }

    let mut members = clan.member_ids.clone();
    members.sort();
    let split_at = (members.len() as f64 * SPLIT_MAJORITY_FRACTION).round() as usize;
    let (_, split_off) = members.split_at(split_at);

    let new_clan_id = ctx.world.id_gen().make_id("clan", "split", ctx.tick);
    let mut new_clan = Clan::new(new_clan_id.clone(), format!("{} (Splinter)", clan.name), clan.clan_type, ctx.tick);
    new_clan.member_ids = split_off.to_vec();
    new_clan.relationships = clan.relationships.clone();
    let transferred_treasury = clan.treasury() * (1.0 - SPLIT_MAJORITY_FRACTION);
    new_clan.deposit(transferred_treasury);

    for member_id in split_off {
        if let Some(npc) = ctx.world.npcs.get_mut(member_id) {
            npc.clan_id = new_clan_id.clone();
        }
    }
    if let Some(clan) = ctx.world.clans.get_mut(clan_id) {
        clan.member_ids.retain(|id| !split_off.contains(id));
        let _ = clan.withdraw(transferred_treasury.min(clan.treasury()));
    }
    ctx.world.clans.insert(new_clan_id.clone(), new_clan);
    ctx.signals.push(Signal {
        event_id: 0,
        kind: SignalKind::ClanSplit { parent_id: clan_id.to_string(), child_id: new_clan_id },
    });
}

pub struct ClanAiSystem;

impl SimSystem for ClanAiSystem {
    fn name(&self) -> &'static str {
        "clan_ai"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let clan_ids: Vec<String> = ctx.world.clans.keys().cloned().collect();
        for clan_id in clan_ids {
            let is_player_controlled = ctx
                .world
                .clans
                .get(&clan_id)
                .map(|clan| clan.is_player_controlled(|npc_id| ctx.world.npcs.get(npc_id).map(|n| n.is_player).unwrap_or(false)))
                .unwrap_or(false);
            if is_player_controlled {
                continue;
            }
            run_expansion(ctx, &clan_id);
            run_warfare(ctx, &clan_id);
            run_alliance(ctx, &clan_id);
            run_trade(ctx, &clan_id);
            run_split(ctx, &clan_id);
        }
    }
}
