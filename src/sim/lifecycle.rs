//! NPC lifecycle: aging, marriage, reproduction, and death, run once per
//! tick for every non-player NPC.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::context::TickContext;
use super::signal::{Signal, SignalKind};
use super::system::SimSystem;
use crate::id::{hash_for, rng_for};
use crate::model::{Gender, Job, NamedNpc, Persisted};

const MARRIAGE_CHECK_INTERVAL: u64 = 5_000;
const REPRODUCTION_CHECK_INTERVAL: u64 = 5_000;
const MAX_SPOUSE_AGE_GAP: i32 = 10;
const MAX_HOME_OCCUPANTS: usize = 4;
const ADULT_AGE: u32 = 18;

fn death_probability(age: u32) -> f64 {
    match age {
        0..=69 => 0.0,
        70..=74 => 0.01,
        75..=79 => 0.05,
        80..=84 => 0.20,
        85..=89 => 0.50,
        90..=94 => 0.90,
        _ => 1.0,
    }
}

fn job_for_adult(rng: &mut impl rand::RngCore) -> Job {
    const ADULT_JOBS: [Job; 5] = [Job::Laborer, Job::Merchant, Job::Artisan, Job::Guard, Job::Clergy];
    *ADULT_JOBS.choose(rng).unwrap()
}

fn home_occupancy(world: &crate::world::World, home_id: &str) -> usize {
    world
        .npcs
        .values()
        .filter(|n| n.home_structure_id.as_deref() == Some(home_id))
        .count()
}

fn run_marriage_check(ctx: &mut TickContext) {
    if ctx.tick == 0 || ctx.tick % MARRIAGE_CHECK_INTERVAL != 0 {
        return;
    }
    let seed = ctx.world.seed as u64;
    let candidates: Vec<String> = ctx
        .world
        .npcs
        .iter()
        .filter(|(_, n)| !n.is_player && n.spouse_id.is_none() && n.age >= ADULT_AGE)
        .map(|(id, _)| id.clone())
        .collect();

    let mut paired: HashSet<String> = HashSet::new();
    for proposer_id in &candidates {
        if paired.contains(proposer_id) {
            continue;
        }
        let proposer = ctx.world.npcs.get(proposer_id).unwrap().clone();
        let pool: Vec<String> = candidates
            .iter()
            .filter(|id| *id != proposer_id && !paired.contains(*id))
            .filter(|id| {
                let candidate = ctx.world.npcs.get(*id).unwrap();
                candidate.clan_id == proposer.clan_id
                    && (candidate.age as i32 - proposer.age as i32).abs() <= MAX_SPOUSE_AGE_GAP
            })
            .cloned()
            .collect();
        if pool.is_empty() {
            continue;
        }
        let mut rng = rng_for(ctx.tick ^ hash_for(seed, proposer_id.as_str()), "marriage");
        if !rng.random_bool(0.10) {
            continue;
        }
        let partner_id = pool.choose(&mut rng).unwrap().clone();
        paired.insert(proposer_id.clone());
        paired.insert(partner_id.clone());

        let proposer_home = proposer.home_structure_id.clone();
        if let Some(partner) = ctx.world.npcs.get_mut(&partner_id) {
            partner.spouse_id = Some(proposer_id.clone());
            partner.home_structure_id = proposer_home;
        }
        if let Some(p) = ctx.world.npcs.get_mut(proposer_id) {
            p.spouse_id = Some(partner_id.clone());
        }
        ctx.signals.push(Signal {
            event_id: 0,
            kind: SignalKind::NpcMarried {
                a_id: proposer_id.clone(),
                b_id: partner_id,
            },
        });
    }
}

fn run_reproduction_check(ctx: &mut TickContext) {
    if ctx.tick == 0 || ctx.tick % REPRODUCTION_CHECK_INTERVAL != 0 {
        return;
    }
    let seed = ctx.world.seed as u64;
    let pairs: Vec<(String, String)> = ctx
        .world
        .npcs
        .iter()
        .filter(|(id, n)| {
            !n.is_player
                && n.spouse_id
                    .as_deref()
                    .map(|spouse| id.as_str() < spouse)
                    .unwrap_or(false)
        })
        .map(|(id, n)| (id.clone(), n.spouse_id.clone().unwrap()))
        .collect();

    let mut birth_index = 0u64;
    for (a_id, b_id) in pairs {
        let Some(a) = ctx.world.npcs.get(&a_id).cloned() else { continue };
        let Some(home_id) = a.home_structure_id.clone() else { continue };
        if home_occupancy(ctx.world, &home_id) >= MAX_HOME_OCCUPANTS {
            continue;
        }
        let fertility = a
            .fertility
            .max(ctx.world.npcs.get(&b_id).map(|n| n.fertility).unwrap_or(0.0));
        let mut rng = rng_for(ctx.tick ^ hash_for(seed, a_id.as_str()), "reproduction");
        if !rng.random_bool((fertility / 100.0).clamp(0.0, 1.0)) {
            continue;
        }
        let gender = if rng.random_bool(0.5) { Gender::Male } else { Gender::Female };
        birth_index += 1;
        let child_id = ctx.world.id_gen().make_id("npc", &a_id, ctx.tick ^ birth_index);
        let child = NamedNpc {
            schema_version: NamedNpc::SCHEMA_VERSION,
            id: child_id.clone(),
            name: if gender == Gender::Male { "Newborn Son" } else { "Newborn Daughter" }.to_string(),
            clan_id: a.clan_id.clone(),
            age: 0,
            gender,
            job: Job::Child,
            home_structure_id: Some(home_id),
            workplace_structure_id: None,
            spouse_id: None,
            children_ids: Vec::new(),
            fertility: NamedNpc::fertility_for_age(0),
            is_player: false,
            birth_tick: ctx.tick as i64,
            last_reproduction_check_tick: ctx.tick,
        };
        ctx.world.npcs.insert(child_id.clone(), child);
        if let Some(a) = ctx.world.npcs.get_mut(&a_id) {
            a.children_ids.push(child_id.clone());
        }
        if let Some(b) = ctx.world.npcs.get_mut(&b_id) {
            b.children_ids.push(child_id.clone());
        }
        if let Some(clan) = ctx.world.clans.get_mut(&a.clan_id) {
            clan.member_ids.push(child_id.clone());
        }
        ctx.signals.push(Signal {
            event_id: 0,
            kind: SignalKind::NpcBorn { npc_id: child_id, clan_id: a.clan_id },
        });
    }
}

pub struct NpcLifecycleSystem;

impl SimSystem for NpcLifecycleSystem {
    fn name(&self) -> &'static str {
        "npc_lifecycle"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let tick = ctx.tick;
        let seed = ctx.world.seed as u64;
        let npc_ids: Vec<String> = ctx.world.npcs.keys().cloned().collect();

        for id in &npc_ids {
            let Some(npc) = ctx.world.npcs.get_mut(id) else { continue };
            if npc.is_player {
                continue;
            }
            let was_child = npc.is_child();
            npc.refresh_age(tick);
            if was_child && npc.age >= ADULT_AGE && npc.job == Job::Child {
                let mut rng = rng_for(tick ^ hash_for(seed, id.as_str()), "coming_of_age");
                npc.job = job_for_adult(&mut rng);
            }
        }

        run_marriage_check(ctx);
        run_reproduction_check(ctx);

        let mut died = Vec::new();
        for id in &npc_ids {
            let Some(npc) = ctx.world.npcs.get(id) else { continue };
            if npc.is_player || npc.age < 70 {
                continue;
            }
            let mut rng = rng_for(tick ^ hash_for(seed, id.as_str()), "death");
            if rng.random_bool(death_probability(npc.age)) {
                died.push(id.clone());
            }
        }
        for id in died {
            let Some(npc) = ctx.world.npcs.get(&id).cloned() else { continue };
            if let Some(spouse_id) = &npc.spouse_id {
                if let Some(spouse) = ctx.world.npcs.get_mut(spouse_id) {
                    spouse.spouse_id = None;
                }
            }
            ctx.world.npcs.remove(&id);
            ctx.signals.push(Signal {
                event_id: 0,
                kind: SignalKind::NpcDied { npc_id: id },
            });
        }
    }
}
