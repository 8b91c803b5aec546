mod common;

use living_world_core::persist::{canonical_checksum, flush_to_jsonl};

#[test]
fn flushing_a_generated_world_produces_one_line_per_entity() {
    let world = common::build_world(12345, 64, 64);
    let dir = tempfile::tempdir().unwrap();
    flush_to_jsonl(&world, dir.path()).unwrap();

    let clan_lines = common::read_lines(&dir.path().join("clans.jsonl"));
    let structure_lines = common::read_lines(&dir.path().join("structures.jsonl"));
    let npc_lines = common::read_lines(&dir.path().join("npcs.jsonl"));

    assert_eq!(clan_lines.len(), world.clans.len());
    assert_eq!(structure_lines.len(), world.structures.len());
    assert_eq!(npc_lines.len(), world.npcs.len());

    let checksum_file = std::fs::read_to_string(dir.path().join("checksum.sha256")).unwrap();
    assert_eq!(checksum_file, canonical_checksum(&world));
}

#[test]
fn checksum_is_insensitive_to_event_log_growth() {
    // The checksum covers entity state, not the append-only event log, so
    // two worlds differing only by how much logging happened during
    // generation still compare equal if their entities match.
    let mut world = common::build_world(5, 48, 48);
    let before = canonical_checksum(&world);
    world.log_event("world", "test", "an unrelated log line".to_string());
    let after = canonical_checksum(&world);
    assert_eq!(before, after);
}
