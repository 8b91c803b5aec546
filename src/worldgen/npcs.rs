//! Named population seeding: age/gender/job distribution, home and
//! workplace assignment, fertility, and initial marriages.

use tracing::instrument;

use crate::id::{self, rng_for, stage};
use crate::model::{Gender, Job, NamedNpc, Persisted, StructureType};
use crate::world::World;
use crate::worldgen::clans::ClanSeed;
use rand::seq::SliceRandom;
use rand::Rng;

const MALE_NAMES: &[&str] = &[
    "Aldric", "Bram", "Cedric", "Dorin", "Edmund", "Falk", "Garrick", "Harwin", "Ivor", "Jorah",
    "Kellan", "Lucan", "Merrik", "Nolan", "Osric", "Perrin", "Quill", "Roland", "Soren", "Tobin",
];
const FEMALE_NAMES: &[&str] = &[
    "Adela", "Brynn", "Cora", "Dessa", "Elowen", "Fenna", "Greta", "Hilde", "Isolde", "Junia",
    "Kira", "Lyra", "Marin", "Nerys", "Odalys", "Petra", "Quenna", "Rosalind", "Sable", "Tamsin",
];

fn random_name(rng: &mut impl rand::RngCore, gender: Gender) -> String {
    let list = match gender {
        Gender::Male => MALE_NAMES,
        Gender::Female => FEMALE_NAMES,
    };
    (*list.choose(rng).unwrap()).to_string()
}

fn draw_age(rng: &mut impl rand::RngCore) -> u32 {
    let roll: f64 = rng.random();
    if roll < 0.20 {
        rng.random_range(0..18)
    } else if roll < 0.70 {
        rng.random_range(18..61)
    } else {
        rng.random_range(61..81)
    }
}

fn job_for_adult(rng: &mut impl rand::RngCore) -> Job {
    const ADULT_JOBS: [Job; 5] = [Job::Laborer, Job::Merchant, Job::Artisan, Job::Guard, Job::Clergy];
    *ADULT_JOBS.choose(rng).unwrap()
}

fn workplace_for_job(job: Job, structure_ids: &[(String, StructureType)]) -> Option<String> {
    let preferred: &[StructureType] = match job {
        Job::Merchant => &[StructureType::Market],
        Job::Artisan => &[StructureType::Workshop],
        Job::Clergy => &[StructureType::Temple],
        Job::Guard | Job::Leader => &[StructureType::GuildHall],
        Job::Laborer | Job::Child => &[StructureType::Workshop, StructureType::Market],
    };
    structure_ids
        .iter()
        .find(|(_, t)| preferred.contains(t))
        .map(|(id, _)| id.clone())
        .or_else(|| structure_ids.first().map(|(id, _)| id.clone()))
}

/// Run the NPC seeding stage for every clan, using the target headcounts
/// produced by the clan seeder.
#[instrument(skip(world, clan_seeds))]
pub fn generate_npcs(world: &mut World, clan_seeds: &[ClanSeed], current_tick: u64) {
    let seed = world.seed as u64;
    let npc_seed = id::sub_seed(seed, stage::NPCS);

    for clan_seed in clan_seeds {
        let clan_id = &clan_seed.clan_id;
        let mut rng = rng_for(npc_seed, ("npcs", clan_id.as_str()));

        let houses: Vec<String> = world
            .settlements
            .values()
            .find(|s| &s.clan_id == clan_id)
            .map(|s| {
                s.structure_ids
                    .iter()
                    .filter(|id| {
                        world
                            .structures
                            .get(*id)
                            .map(|st| st.structure_type == StructureType::House)
                            .unwrap_or(false)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let workplaces: Vec<(String, StructureType)> = world
            .settlements
            .values()
            .find(|s| &s.clan_id == clan_id)
            .map(|s| {
                s.structure_ids
                    .iter()
                    .filter_map(|id| {
                        world
                            .structures
                            .get(id)
                            .filter(|st| !st.structure_type.is_residential())
                            .map(|st| (id.clone(), st.structure_type))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut house_occupancy = vec![0u32; houses.len()];
        let mut new_npc_ids: Vec<(String, bool)> = Vec::new(); // (id, is_adult)

        for member_index in 0..clan_seed.target_member_count {
            let gender = if rng.random_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            };
            let age = draw_age(&mut rng);
            let name = random_name(&mut rng, gender);
            let job = if age < 18 { Job::Child } else { job_for_adult(&mut rng) };
            let fertility = NamedNpc::fertility_for_age(age);

            let home = houses
                .iter()
                .enumerate()
                .find(|(i, _)| house_occupancy[*i] < 4)
                .map(|(i, id)| {
                    house_occupancy[i] += 1;
                    id.clone()
                });
            let workplace = if age >= 18 {
                workplace_for_job(job, &workplaces)
            } else {
                None
            };

            let id = world
                .id_gen()
                .make_id("npc", clan_id, member_index as u64);
            // Signed: a seeded adult's birth tick is allowed to fall before
            // genesis (tick 0) so `age_at` preserves the rolled-up age
            // instead of collapsing it at the first `refresh_age` call.
            let birth_tick = current_tick as i64 - age as i64 * crate::config::TICKS_PER_YEAR as i64;
            let npc = NamedNpc {
                schema_version: NamedNpc::SCHEMA_VERSION,
                id: id.clone(),
                name,
                clan_id: clan_id.clone(),
                age,
                gender,
                job,
                home_structure_id: home,
                workplace_structure_id: workplace,
                spouse_id: None,
                children_ids: Vec::new(),
                fertility,
                is_player: false,
                birth_tick,
                last_reproduction_check_tick: current_tick,
            };
            new_npc_ids.push((id.clone(), age >= 18));
            world.npcs.insert(id, npc);
        }

        if let Some(clan) = world.clans.get_mut(clan_id) {
            clan.member_ids = new_npc_ids.iter().map(|(id, _)| id.clone()).collect();
        }

        // Shuffle adults and pair adjacent ones, marrying each pair with
        // probability 0.5.
        let mut adults: Vec<String> = new_npc_ids
            .iter()
            .filter(|(_, is_adult)| *is_adult)
            .map(|(id, _)| id.clone())
            .collect();
        adults.shuffle(&mut rng);
        for pair in adults.chunks(2) {
            if pair.len() < 2 {
                continue;
            }
            if !rng.random_bool(0.5) {
                continue;
            }
            let (a_id, b_id) = (pair[0].clone(), pair[1].clone());
            let a_home = world.npcs.get(&a_id).and_then(|n| n.home_structure_id.clone());
            if let Some(b) = world.npcs.get_mut(&b_id) {
                b.spouse_id = Some(a_id.clone());
                b.home_structure_id = a_home.clone();
            }
            if let Some(a) = world.npcs.get_mut(&a_id) {
                a.spouse_id = Some(b_id.clone());
            }
        }
    }

    world.log_event("world", "npcs", format!("seeded {} npcs", world.npcs.len()));
}
