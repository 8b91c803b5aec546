mod common;

use living_world_core::model::OwnerType;
use living_world_core::WorldRequest;

#[test]
fn same_seed_produces_bit_identical_worlds() {
    let a = common::build_world(12345, 128, 128);
    let b = common::build_world(12345, 128, 128);

    assert_eq!(a.grid.elevation, b.grid.elevation);
    assert_eq!(
        a.structures.keys().collect::<Vec<_>>(),
        b.structures.keys().collect::<Vec<_>>()
    );
    assert_eq!(
        a.clans.keys().collect::<Vec<_>>(),
        b.clans.keys().collect::<Vec<_>>()
    );
    assert_eq!(a.rivers.len(), b.rivers.len());
}

#[test]
fn different_seeds_diverge() {
    let a = common::build_world(1, 96, 96);
    let b = common::build_world(2, 96, 96);
    assert_ne!(a.grid.elevation, b.grid.elevation);
}

#[test]
fn generated_world_has_no_overlapping_roads_and_structures() {
    let world = common::build_world(7, 100, 100);
    assert!(world.check_roads_disjoint_from_structures().is_none());
}

#[test]
fn clan_count_stays_within_configured_bounds() {
    let world = common::build_world(99, 150, 150);
    assert!(world.clans.len() >= 3);
    assert!(world.clans.len() <= 50);
}

#[test]
fn every_structure_has_a_surviving_owner_clan_or_is_unowned() {
    let world = common::build_world(5, 80, 80);
    for structure in world.structures.values() {
        if let Some(owner_id) = &structure.owner_id {
            if structure.owner_type == Some(OwnerType::Clan) {
                assert!(world.clans.contains_key(owner_id));
            }
        }
    }
}

#[test]
fn rejects_invalid_preset_before_touching_the_rng() {
    let request = WorldRequest {
        seed: 1,
        width: 10,
        height: 10,
        preset: "not-a-real-preset".to_string(),
        density: 1.0,
    };
    assert!(living_world_core::generate_world(&request).is_err());
}
