//! Deterministic procedural world generator and tick-driven simulation
//! engine: from a single seed, through a fixed generation pipeline, into
//! a region-scheduled world that ages NPCs, runs clan AI, decays
//! structures, spawns quests, and detects villages one tick at a time.

pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod persist;
pub mod sim;
pub mod world;
pub mod worldgen;

pub use config::{GeneratorConfig, SaturationConfig, TickConfig, WorldRequest};
pub use error::{InvalidInputError, InvariantViolation, LoadError, PlacementError, SearchExhausted};
pub use id::IdGenerator;
pub use sim::{SimSystem, Signal, SignalKind, TickContext, TickRequest};
pub use world::World;
pub use worldgen::generate_world;
