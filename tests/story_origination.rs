use living_world_core::model::{Clan, ClanType, OwnerType, RelationshipRecord, Side, Structure, StructureType};
use living_world_core::sim::clan_ai::ClanAiSystem;
use living_world_core::sim::story_origin::StoryOriginSystem;
use living_world_core::sim::structures::StructureLifecycleSystem;
use living_world_core::sim::{Signal, SimSystem, TickContext};
use living_world_core::World;
use rand::SeedableRng;

/// Runs the two real phases of a tick dispatch (one or more `tick()`
/// systems, then `StoryOriginSystem::handle_signals`) over a shared signal
/// buffer, the same contract the region scheduler uses internally.
fn dispatch(world: &mut World, tick: u64, systems: &mut [&mut dyn SimSystem]) {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(tick);
    let mut signals: Vec<Signal> = Vec::new();
    for system in systems.iter_mut() {
        let mut ctx = TickContext {
            world,
            rng: &mut rng,
            tick,
            region_id: "r0",
            signals: &mut signals,
            inbox: &[],
        };
        system.tick(&mut ctx);
    }
    let mut discarded = Vec::new();
    let mut ctx = TickContext {
        world,
        rng: &mut rng,
        tick,
        region_id: "r0",
        signals: &mut discarded,
        inbox: &signals,
    };
    StoryOriginSystem.handle_signals(&mut ctx);
}

#[test]
fn a_structure_that_becomes_a_ruin_originates_a_propagated_story() {
    let mut world = World::new(7, 80, 80);
    for e in world.grid.elevation.iter_mut() {
        *e = 0.4;
    }
    let mut structure = Structure::new(
        "house_1".into(),
        StructureType::House,
        (40, 40),
        100.0,
        Side::South,
        Some("clan_1".into()),
        Some(OwnerType::Clan),
        0,
    );
    structure.apply_damage(100.0, 0).unwrap();
    world.structures.insert("house_1".into(), structure);

    dispatch(&mut world, 1, &mut [&mut StructureLifecycleSystem]);

    assert!(world.structures.contains_key("house_1_ruin"));
    assert_eq!(world.stories.len(), 1);
    let story = world.stories.values().next().unwrap();
    assert!(story.is_active());
    assert_eq!(story.origin, (40, 40));
    assert!(!story.affected_tiles.is_empty());
}

#[test]
fn a_declared_war_between_clans_originates_a_story() {
    let mut world = World::new(3, 200, 200);
    for e in world.grid.elevation.iter_mut() {
        *e = 0.4;
    }
    let mut attacker = Clan::new("clan_a".into(), "A".into(), ClanType::Settled, 0);
    attacker.member_ids = (0..15).map(|i| format!("npc_a_{i}")).collect();
    attacker.relationships.insert(
        "clan_b".into(),
        RelationshipRecord { reputation: -80.0, influence: 0.0, alignment: 0.0, race_affinity: 0.0, last_updated_tick: 0 },
    );
    let mut defender = Clan::new("clan_b".into(), "B".into(), ClanType::Settled, 0);
    defender.member_ids = (0..2).map(|i| format!("npc_b_{i}")).collect();
    world.clans.insert("clan_a".into(), attacker);
    world.clans.insert("clan_b".into(), defender);
    world.structures.insert(
        "house_b".into(),
        Structure::new(
            "house_b".into(),
            StructureType::House,
            (50, 50),
            100.0,
            Side::South,
            Some("clan_b".into()),
            Some(OwnerType::Clan),
            0,
        ),
    );

    dispatch(&mut world, 600, &mut [&mut ClanAiSystem]);

    assert_eq!(world.stories.len(), 1);
    let story = world.stories.values().next().unwrap();
    assert_eq!(story.category, living_world_core::model::StoryCategory::Conflict);
}
