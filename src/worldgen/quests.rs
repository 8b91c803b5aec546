//! Prophecy and quest seeding: feature-linked missions and world-ending
//! countdowns rolled at world creation.

use tracing::instrument;

use crate::id::{self, rng_for, stage};
use crate::model::{
    FeatureKind, Objective, Persisted, Prophecy, ProphecyStatus, Quest, QuestStatus, QuestType,
    Reward, TriggerCondition,
};
use crate::world::World;
use rand::Rng;

const MIN_PROPHECIES: u32 = 1;
const MAX_PROPHECIES: u32 = 3;
const STORY_QUEST_CHANCE: f64 = 0.10;

fn quest_type_for_feature(kind: FeatureKind) -> Option<QuestType> {
    match kind {
        FeatureKind::MagicZone => Some(QuestType::Investigate),
        FeatureKind::AncientRuin => Some(QuestType::Explore),
        FeatureKind::SubmergedCity => Some(QuestType::Retrieve),
        FeatureKind::Volcano => Some(QuestType::Defeat),
        FeatureKind::CrystalCave => None,
    }
}

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

/// Run the prophecy and quest seeding stage.
#[instrument(skip(world))]
pub fn generate_quests(world: &mut World, current_tick: u64) {
    let seed = world.seed as u64;
    let quest_seed = id::sub_seed(seed, stage::QUESTS);
    let mut rng = rng_for(quest_seed, "quests");

    let special_features: Vec<(String, (i64, i64))> = world
        .features
        .iter()
        .filter(|(_, f)| matches!(f.kind, FeatureKind::MagicZone | FeatureKind::AncientRuin))
        .map(|(id, f)| (id.clone(), f.position))
        .collect();

    let prophecy_count = rng
        .random_range(MIN_PROPHECIES..=MAX_PROPHECIES)
        .min(special_features.len() as u32);
    for i in 0..prophecy_count {
        let (feature_id, _) = &special_features[i as usize];
        let trigger_tick = current_tick + rng.random_range(10_000..200_000);
        let id = world.id_gen().make_id("prophecy", "world", i as u64);
        let prophecy = Prophecy {
            schema_version: Prophecy::SCHEMA_VERSION,
            id: id.clone(),
            title: format!("Omen of {feature_id}"),
            prophecy_type: "world_ending".to_string(),
            trigger_tick,
            trigger_condition: TriggerCondition::FeatureIntensityAtLeast(0.9),
            linked_feature_id: feature_id.clone(),
            status: ProphecyStatus::Pending,
        };
        world.prophecies.insert(id, prophecy);
    }

    let features: Vec<(String, FeatureKind, (i64, i64))> = world
        .features
        .iter()
        .map(|(id, f)| (id.clone(), f.kind, f.position))
        .collect();
    let mut index = 0u64;
    for (feature_id, kind, position) in features {
        let Some(quest_type) = quest_type_for_feature(kind) else {
            continue;
        };
        let id = world.id_gen().make_id("quest", "world", index);
        index += 1;
        let quest = Quest {
            schema_version: Quest::SCHEMA_VERSION,
            id: id.clone(),
            title: format!("{quest_type:?} the {kind:?}"),
            quest_type,
            status: QuestStatus::Available,
            objectives: vec![Objective {
                description: format!("Travel to ({}, {})", position.0, position.1),
                target_x: position.0,
                target_y: position.1,
                completed: false,
            }],
            rewards: vec![default_reward(&mut rng)],
            linked_source_id: Some(feature_id),
            required_level: 1,
            expiration_tick: None,
        };
        world.quests.insert(id, quest);
    }

    for (story_id, story) in world.stories.clone() {
        if !rng.random_bool(STORY_QUEST_CHANCE) {
            continue;
        }
        let id = world.id_gen().make_id("quest", "world", index);
        index += 1;
        let quest = Quest {
            schema_version: Quest::SCHEMA_VERSION,
            id: id.clone(),
            title: format!("Investigate the {:?}", story.category),
            quest_type: QuestType::Investigate,
            status: QuestStatus::Available,
            objectives: vec![Objective {
                description: "Investigate the origin".to_string(),
                target_x: story.origin.0,
                target_y: story.origin.1,
                completed: false,
            }],
            rewards: vec![default_reward(&mut rng)],
            linked_source_id: Some(story_id),
            required_level: 1,
            expiration_tick: None,
        };
        world.quests.insert(id, quest);
    }

    world.log_event(
        "world",
        "quests",
        format!(
            "seeded {} prophecies and {} quests",
            world.prophecies.len(),
            world.quests.len()
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::worldgen::features::generate_features;
    use crate::worldgen::terrain::generate_terrain;

    #[test]
    fn quests_are_deterministic() {
        let config = GeneratorConfig::default();
        let mut w1 = World::new(5, 100, 100);
        generate_terrain(&mut w1, &config);
        generate_features(&mut w1, &config, 1.0);
        generate_quests(&mut w1, 0);

        let mut w2 = World::new(5, 100, 100);
        generate_terrain(&mut w2, &config);
        generate_features(&mut w2, &config, 1.0);
        generate_quests(&mut w2, 0);

        assert_eq!(
            w1.quests.keys().collect::<Vec<_>>(),
            w2.quests.keys().collect::<Vec<_>>()
        );
        assert_eq!(w1.prophecies.len(), w2.prophecies.len());
    }
}
