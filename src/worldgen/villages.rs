//! Village detection: density-based clustering over structures, with
//! monotonic tier promotion and id stability across recomputations.

use std::collections::{BTreeMap, HashSet, VecDeque};

use tracing::instrument;

use crate::model::{Persisted, StructureType, Village, VillageTier};
use crate::world::World;

const CLUSTER_RADIUS: i64 = 10;
const MIN_VILLAGE_SIZE: usize = 3;
const TOWN_SIZE: usize = 15;
const CITY_SIZE: usize = 30;
const CITY_SIZE_WITH_SPECIALS: usize = 20;
const CITY_MIN_POPULATION: usize = 50;

fn classify_tier(
    member_count: usize,
    has_market: bool,
    has_temple_or_guild_hall: bool,
    population: usize,
) -> VillageTier {
    if member_count >= CITY_SIZE
        || (member_count >= CITY_SIZE_WITH_SPECIALS
            && population >= CITY_MIN_POPULATION
            && has_temple_or_guild_hall)
    {
        VillageTier::City
    } else if member_count >= TOWN_SIZE || has_market {
        VillageTier::Town
    } else {
        VillageTier::Village
    }
}

/// Run village detection/refresh over all structures. Monotonic: a
/// village's tier only ever rises across calls, and ids are preserved
/// across recomputations for clusters whose member set is unchanged.
#[instrument(skip(world))]
pub fn detect_villages(world: &mut World) {
    let structure_positions: Vec<(String, (i64, i64))> = world
        .structures
        .values()
        .filter(|s| !s.is_ruin())
        .map(|s| (s.id.clone(), s.location))
        .collect();

    let mut visited: HashSet<String> = HashSet::new();
    let mut clusters: Vec<Vec<String>> = Vec::new();

    for (start_id, _) in &structure_positions {
        if visited.contains(start_id) {
            continue;
        }
        let mut cluster = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start_id.clone());
        visited.insert(start_id.clone());

        while let Some(current_id) = queue.pop_front() {
            cluster.push(current_id.clone());
            let Some(current_pos) = structure_positions
                .iter()
                .find(|(id, _)| id == &current_id)
                .map(|(_, pos)| *pos)
            else {
                continue;
            };
            for (other_id, other_pos) in &structure_positions {
                if visited.contains(other_id) {
                    continue;
                }
                let d = ((current_pos.0 - other_pos.0).pow(2) + (current_pos.1 - other_pos.1).pow(2))
                    as f64;
                if d.sqrt() <= CLUSTER_RADIUS as f64 {
                    visited.insert(other_id.clone());
                    queue.push_back(other_id.clone());
                }
            }
        }

        if cluster.len() >= MIN_VILLAGE_SIZE {
            cluster.sort();
            clusters.push(cluster);
        }
    }

    let previous: BTreeMap<Vec<String>, (String, VillageTier)> = world
        .villages
        .values()
        .map(|v| {
            let mut members = v.structure_ids.clone();
            members.sort();
            (members, (v.id.clone(), v.tier))
        })
        .collect();

    let mut next_villages: BTreeMap<String, Village> = BTreeMap::new();
    for (index, cluster) in clusters.iter().enumerate() {
        let has_market = cluster.iter().any(|id| {
            world
                .structures
                .get(id)
                .map(|s| s.structure_type == StructureType::Market)
                .unwrap_or(false)
        });
        let has_temple_or_guild_hall = cluster.iter().any(|id| {
            world
                .structures
                .get(id)
                .map(|s| matches!(s.structure_type, StructureType::Temple | StructureType::GuildHall))
                .unwrap_or(false)
        });

        let mut owner_votes: BTreeMap<String, u32> = BTreeMap::new();
        for id in cluster {
            if let Some(owner) = world.structures.get(id).and_then(|s| s.owner_id.clone()) {
                *owner_votes.entry(owner).or_insert(0) += 1;
            }
        }
        let governing_clan_id = owner_votes.into_iter().max_by_key(|(_, count)| *count).map(|(id, _)| id);

        let population = world
            .npcs
            .values()
            .filter(|n| {
                n.home_structure_id
                    .as_ref()
                    .map(|h| cluster.contains(h))
                    .unwrap_or(false)
            })
            .count();

        let centroid = {
            let sum = cluster.iter().fold((0i64, 0i64), |acc, id| {
                let pos = world.structures.get(id).map(|s| s.location).unwrap_or((0, 0));
                (acc.0 + pos.0, acc.1 + pos.1)
            });
            (
                sum.0 as f64 / cluster.len() as f64,
                sum.1 as f64 / cluster.len() as f64,
            )
        };

        let computed_tier = classify_tier(cluster.len(), has_market, has_temple_or_guild_hall, population);

        let (id, tier) = match previous.get(cluster) {
            // Promotions only go up: keep the stable id, never downgrade.
            Some((existing_id, existing_tier)) => {
                let tier = computed_tier.max(*existing_tier);
                (existing_id.clone(), tier)
            }
            None => (world.id_gen().make_id("village", "world", index as u64), computed_tier),
        };

        let village = Village {
            schema_version: Village::SCHEMA_VERSION,
            id: id.clone(),
            name: format!("Settlement {index}"),
            tier,
            center: centroid,
            structure_ids: cluster.clone(),
            population: population as u32,
            governing_clan_id,
        };
        next_villages.insert(id, village);
    }

    world.villages = next_villages;
    world.log_event(
        "world",
        "villages",
        format!("detected {} villages", world.villages.len()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OwnerType, Side, Structure};

    fn world_with_structures(positions: &[((i64, i64), StructureType)]) -> World {
        let mut world = World::new(1, 100, 100);
        for (i, (pos, structure_type)) in positions.iter().enumerate() {
            let id = format!("s{i}");
            let structure = Structure::new(
                id.clone(),
                *structure_type,
                *pos,
                100.0,
                Side::South,
                Some("c1".into()),
                Some(OwnerType::Clan),
                0,
            );
            world.structures.insert(id, structure);
        }
        world
    }

    #[test]
    fn promotes_to_town_on_market_presence() {
        let mut world = world_with_structures(&[
            ((10, 10), StructureType::House),
            ((12, 12), StructureType::House),
            ((11, 14), StructureType::House),
            ((13, 11), StructureType::Market),
        ]);
        detect_villages(&mut world);
        assert_eq!(world.villages.len(), 1);
        let village = world.villages.values().next().unwrap();
        assert_eq!(village.structure_ids.len(), 4);
        assert_eq!(village.tier, VillageTier::Town);
    }

    #[test]
    fn clusters_below_minimum_are_not_villages() {
        let mut world = world_with_structures(&[
            ((10, 10), StructureType::House),
            ((12, 12), StructureType::House),
        ]);
        detect_villages(&mut world);
        assert!(world.villages.is_empty());
    }

    #[test]
    fn village_id_is_stable_across_recomputation() {
        let mut world = world_with_structures(&[
            ((10, 10), StructureType::House),
            ((12, 12), StructureType::House),
            ((11, 14), StructureType::House),
        ]);
        detect_villages(&mut world);
        let first_id = world.villages.keys().next().unwrap().clone();
        detect_villages(&mut world);
        let second_id = world.villages.keys().next().unwrap().clone();
        assert_eq!(first_id, second_id);
    }
}
