//! Dynamic quest generation: rolled each tick from fresh ruins, hostile
//! clan pairs, damaged structures, and active stories, each gated behind
//! a 10,000-tick cooldown keyed by `(type, source id)`.

use rand::Rng;

use super::context::TickContext;
use super::system::SimSystem;
use crate::id::{hash_for, rng_for};
use crate::model::{Objective, Persisted, Quest, QuestStatus, QuestType, Reward};

const QUEST_COOLDOWN_TICKS: u64 = 10_000;
const RUIN_QUEST_CHANCE: f64 = 0.30;
const CONFLICT_QUEST_CHANCE: f64 = 1.0;
const REPAIR_QUEST_CHANCE: f64 = 0.15;
const STORY_QUEST_CHANCE: f64 = 0.10;

fn default_reward(rng: &mut impl rand::RngCore) -> Reward {
    Reward {
        gold: rng.random_range(50..500),
        reputation: rng.random_range(1..20),
        rare_item: if rng.random_bool(0.15) {
            Some("relic_shard".to_string())
        } else {
            None
        },
    }
}

fn spawn_quest(
    ctx: &mut TickContext,
    index: &mut u64,
    title: String,
    quest_type: QuestType,
    target: (i64, i64),
    objective_description: String,
    source_id: String,
    rng: &mut impl rand::RngCore,
) {
    let id = ctx.world.id_gen().make_id("quest", "dynamic", ctx.tick ^ *index);
    *index += 1;
    let quest = Quest {
        schema_version: Quest::SCHEMA_VERSION,
        id: id.clone(),
        title,
        quest_type,
        status: QuestStatus::Available,
        objectives: vec![Objective {
            description: objective_description,
            target_x: target.0,
            target_y: target.1,
            completed: false,
        }],
        rewards: vec![default_reward(rng)],
        linked_source_id: Some(source_id),
        required_level: 1,
        expiration_tick: Some(ctx.tick + QUEST_COOLDOWN_TICKS),
    };
    ctx.world.quests.insert(id, quest);
}

pub struct DynamicQuestSystem;

impl SimSystem for DynamicQuestSystem {
    fn name(&self) -> &'static str {
        "dynamic_quests"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let tick = ctx.tick;
        let seed = ctx.world.seed as u64;
        let mut index = 0u64;

        let fresh_ruins: Vec<(String, (i64, i64))> = ctx
            .world
            .structures
            .iter()
            .filter(|(_, s)| s.is_ruin())
            .map(|(id, s)| (id.clone(), s.location))
            .collect();
        for (ruin_id, location) in fresh_ruins {
            let key = format!("ruin:{ruin_id}");
            if ctx.world.try_fire_cooldown(&key, tick, QUEST_COOLDOWN_TICKS) {
                continue;
            }
            let mut rng = rng_for(tick ^ hash_for(seed, key.as_str()), "dynamic_quest");
            if !rng.random_bool(RUIN_QUEST_CHANCE) {
                continue;
            }
            spawn_quest(
                ctx,
                &mut index,
                format!("Explore the Ruins at ({}, {})", location.0, location.1),
                QuestType::Explore,
                location,
                "Search the ruin for salvage".to_string(),
                ruin_id,
                &mut rng,
            );
        }

        let clan_ids: Vec<String> = ctx.world.clans.keys().cloned().collect();
        for a_id in &clan_ids {
            let Some(a) = ctx.world.clans.get(a_id) else { continue };
            let hostile_partners: Vec<String> = a
                .relationships
                .iter()
                .filter(|(other_id, rel)| rel.reputation < 0.0 && a_id.as_str() < other_id.as_str())
                .map(|(other_id, _)| other_id.clone())
                .collect();
            for b_id in hostile_partners {
                let key = format!("conflict:{a_id}:{b_id}");
                if ctx.world.try_fire_cooldown(&key, tick, QUEST_COOLDOWN_TICKS) {
                    continue;
                }
                let mut rng = rng_for(tick ^ hash_for(seed, key.as_str()), "dynamic_quest");
                if !rng.random_bool(CONFLICT_QUEST_CHANCE) {
                    continue;
                }
                let target = ctx
                    .world
                    .settlements
                    .values()
                    .find(|s| s.clan_id == *a_id)
                    .map(|s| s.center)
                    .unwrap_or((0, 0));
                spawn_quest(
                    ctx,
                    &mut index,
                    format!("Mediate the dispute between {a_id} and {b_id}"),
                    QuestType::Mediate,
                    target,
                    "Broker peace between the feuding clans".to_string(),
                    key,
                    &mut rng,
                );
            }
        }

        let damaged: Vec<(String, (i64, i64))> = ctx
            .world
            .structures
            .iter()
            .filter(|(_, s)| !s.is_ruin() && s.health() < s.max_health)
            .map(|(id, s)| (id.clone(), s.location))
            .collect();
        for (structure_id, location) in damaged {
            let key = format!("repair:{structure_id}");
            if ctx.world.try_fire_cooldown(&key, tick, QUEST_COOLDOWN_TICKS) {
                continue;
            }
            let mut rng = rng_for(tick ^ hash_for(seed, key.as_str()), "dynamic_quest");
            if !rng.random_bool(REPAIR_QUEST_CHANCE) {
                continue;
            }
            spawn_quest(
                ctx,
                &mut index,
                format!("Repair the structure at ({}, {})", location.0, location.1),
                QuestType::Repair,
                location,
                "Bring materials to repair the damage".to_string(),
                structure_id,
                &mut rng,
            );
        }

        let active_stories: Vec<(String, (i64, i64))> = ctx
            .world
            .stories
            .iter()
            .filter(|(_, s)| s.is_active())
            .map(|(id, s)| (id.clone(), s.origin))
            .collect();
        for (story_id, origin) in active_stories {
            let key = format!("story:{story_id}");
            if ctx.world.try_fire_cooldown(&key, tick, QUEST_COOLDOWN_TICKS) {
                continue;
            }
            let mut rng = rng_for(tick ^ hash_for(seed, key.as_str()), "dynamic_quest");
            if !rng.random_bool(STORY_QUEST_CHANCE) {
                continue;
            }
            spawn_quest(
                ctx,
                &mut index,
                "Investigate the rumors".to_string(),
                QuestType::Investigate,
                origin,
                "Investigate the origin of the rumor".to_string(),
                story_id,
                &mut rng,
            );
        }
    }
}
