use living_world_core::model::{OwnerType, RoadType, Side, Structure, StructureType};
use living_world_core::worldgen::roads::{connect_structure, force_connect};
use living_world_core::World;

fn flat_world() -> World {
    let mut world = World::new(1, 50, 50);
    for e in world.grid.elevation.iter_mut() {
        *e = 0.4;
    }
    world
}

fn place(world: &mut World, id: &str, pos: (i64, i64)) {
    let structure = Structure::new(
        id.to_string(),
        StructureType::House,
        pos,
        100.0,
        Side::South,
        Some("c1".into()),
        Some(OwnerType::Clan),
        0,
    );
    world.structures.insert(id.to_string(), structure);
}

#[test]
fn repeated_force_connect_between_the_same_points_reuses_every_tile() {
    let mut world = flat_world();
    assert!(force_connect(&mut world, (10, 10), (16, 10), StructureType::House, 0));
    let tile_count_after_first_pass = world.roads.len();
    assert!(tile_count_after_first_pass > 0);

    assert!(force_connect(&mut world, (10, 10), (16, 10), StructureType::House, 0));

    // Same endpoints, same flat terrain: the second pass lays down the
    // identical path rather than a new one, so the tile count is
    // unchanged but every tile's traffic has doubled.
    assert_eq!(world.roads.len(), tile_count_after_first_pass);
    assert!(world.roads.values().all(|t| t.traffic_level() == 2));
}

#[test]
fn heavily_reused_tiles_upgrade_from_dirt_to_paved() {
    let mut world = flat_world();
    for _ in 0..80 {
        force_connect(&mut world, (10, 10), (16, 10), StructureType::House, 0);
    }
    assert!(world.roads.values().any(|t| t.road_type == RoadType::Paved));
}

#[test]
fn connecting_a_new_structure_lays_at_least_one_road_tile() {
    let mut world = flat_world();
    place(&mut world, "a", (20, 20));
    place(&mut world, "b", (24, 20));
    connect_structure(&mut world, "b", 0);
    assert!(!world.roads.is_empty());
}

#[test]
fn roads_never_overlap_a_structure_tile() {
    let mut world = flat_world();
    place(&mut world, "a", (20, 20));
    place(&mut world, "b", (26, 23));
    connect_structure(&mut world, "b", 0);

    assert!(world.check_roads_disjoint_from_structures().is_none());
}
