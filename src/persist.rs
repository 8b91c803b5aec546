//! Persistence contracts: the canonical byte encoding and checksum this
//! crate hands to the external persistence layer, plus backup rotation
//! bookkeeping and the schema migration table.
//!
//! The core never performs file I/O itself beyond the flush helper below
//! (mirroring the flush step the generation/tick loop already leans on);
//! actual storage (disk, object store, database) is the excluded
//! persistence layer's job.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::world::World;

/// How many timestamped backups to retain; the caller's backup directory
/// is pruned down to this count after every successful flush.
pub const BACKUP_RETENTION_COUNT: usize = 5;

fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Flush every entity arena to JSONL files in `output_dir`, one file per
/// entity kind, named after its `Persisted::TYPE` tail.
pub fn flush_to_jsonl(world: &World, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    write_jsonl(&output_dir.join("grid.jsonl"), std::iter::once(&world.grid))?;
    write_jsonl(&output_dir.join("plates.jsonl"), world.plates.iter())?;
    write_jsonl(&output_dir.join("rivers.jsonl"), world.rivers.values())?;
    write_jsonl(&output_dir.join("features.jsonl"), world.features.values())?;
    write_jsonl(&output_dir.join("clans.jsonl"), world.clans.values())?;
    write_jsonl(&output_dir.join("settlements.jsonl"), world.settlements.values())?;
    write_jsonl(&output_dir.join("structures.jsonl"), world.structures.values())?;
    write_jsonl(&output_dir.join("npcs.jsonl"), world.npcs.values())?;
    write_jsonl(&output_dir.join("quests.jsonl"), world.quests.values())?;
    write_jsonl(&output_dir.join("prophecies.jsonl"), world.prophecies.values())?;
    write_jsonl(&output_dir.join("stories.jsonl"), world.stories.values())?;
    write_jsonl(&output_dir.join("roads.jsonl"), world.roads.values())?;
    write_jsonl(&output_dir.join("villages.jsonl"), world.villages.values())?;
    write_jsonl(&output_dir.join("regions.jsonl"), world.regions.values())?;
    write_jsonl(&output_dir.join("event_log.jsonl"), world.event_log.iter())?;

    let checksum = canonical_checksum(world);
    fs::write(output_dir.join("checksum.sha256"), checksum)?;

    Ok(())
}

/// SHA-256 over a stable field-ordered encoding of the world grid and
/// every seeded entity collection, hex-encoded. Entity maps are
/// `BTreeMap`s, so iteration order is already canonical (ascending id);
/// this function relies on that rather than re-sorting.
pub fn canonical_checksum(world: &World) -> String {
    let mut hasher = Sha256::new();

    hash_value(&mut hasher, &world.grid);
    hash_value(&mut hasher, &world.plates);
    for v in world.rivers.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.features.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.clans.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.settlements.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.structures.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.npcs.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.quests.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.prophecies.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.stories.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.roads.values() {
        hash_value(&mut hasher, v);
    }
    for v in world.villages.values() {
        hash_value(&mut hasher, v);
    }

    format!("{:x}", hasher.finalize())
}

fn hash_value<T: Serialize>(hasher: &mut Sha256, value: &T) {
    // `to_vec` rather than `to_writer` directly into the hasher: serde_json
    // doesn't implement `io::Write` hashing passthrough, and the encoded
    // size here is small per entity.
    let bytes = serde_json::to_vec(value).expect("entity types are always serializable");
    hasher.update(&bytes);
}

/// Schema migration: maps `(type, from_version)` to a function that
/// upgrades a raw JSON value one step, towards the current version.
/// Looked up repeatedly until the value's `schemaVersion` matches the
/// type's current `Persisted::SCHEMA_VERSION`, or no migration is found
/// (an `UnsupportedSchema` error surfaces to the caller in that case).
pub type MigrationFn = fn(serde_json::Value) -> serde_json::Value;

pub struct MigrationTable {
    migrations: BTreeMap<(&'static str, u16), MigrationFn>,
}

impl MigrationTable {
    pub fn new() -> Self {
        Self {
            migrations: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, type_name: &'static str, from_version: u16, migration: MigrationFn) {
        self.migrations.insert((type_name, from_version), migration);
    }

    /// Upgrade `value` from `from_version` to `to_version` by chaining
    /// single-step migrations. Returns `None` if the chain is broken
    /// before reaching `to_version`.
    pub fn migrate(
        &self,
        type_name: &'static str,
        mut value: serde_json::Value,
        mut from_version: u16,
        to_version: u16,
    ) -> Option<serde_json::Value> {
        while from_version < to_version {
            let migration = self.migrations.get(&(type_name, from_version))?;
            value = migration(value);
            from_version += 1;
        }
        Some(value)
    }
}

impl Default for MigrationTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Name a rotated backup file: `{name}.backup.{YYYYMMDD_HHMMSS}`. The
/// timestamp is supplied by the caller (this crate never reads the
/// clock), formatted exactly as given.
pub fn backup_file_name(name: &str, timestamp: &str) -> String {
    format!("{name}.backup.{timestamp}")
}

/// Given every backup file name present (any order), return the subset
/// that should be deleted to bring the count down to
/// [`BACKUP_RETENTION_COUNT`], oldest first by lexicographic timestamp
/// order (which sorts chronologically for the `YYYYMMDD_HHMMSS` format).
pub fn rotate_backup_names(mut existing: Vec<String>) -> Vec<String> {
    existing.sort();
    let overflow = existing.len().saturating_sub(BACKUP_RETENTION_COUNT);
    existing.into_iter().take(overflow).collect()
}
