//! Region scheduler: drives the fixed subsystem order across a world's
//! regions, one tick at a time, distinguishing active regions (full
//! fidelity every tick) from background regions (processed at 1/60 rate
//! with a reduced system set).
//!
//! Region iteration is always in ascending region-id order so that two
//! runs given the same world seed and the same target tick produce a
//! bit-identical event log — the determinism contract this crate is
//! built around.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::context::TickContext;
use super::signal::Signal;
use super::system::SimSystem;
use crate::config::TickConfig;
use crate::model::RegionState;
use crate::world::World;

/// A request to advance one or more regions to `target_tick`.
pub struct TickRequest {
    pub region_ids: Vec<String>,
    pub target_tick: u64,
}

/// Instantiate the fixed subsystem order: resource regeneration, NPC
/// lifecycle, clan AI, structure lifecycle, dynamic quest generation,
/// village detection/refresh, story origination, saturation housekeeping.
pub fn default_systems() -> Vec<Box<dyn SimSystem>> {
    vec![
        Box::new(super::resource_regen::ResourceRegenSystem),
        Box::new(super::lifecycle::NpcLifecycleSystem),
        Box::new(super::clan_ai::ClanAiSystem),
        Box::new(super::structures::StructureLifecycleSystem),
        Box::new(super::quests_dynamic::DynamicQuestSystem),
        Box::new(super::village_refresh::VillageRefreshSystem),
        Box::new(super::story_origin::StoryOriginSystem),
        Box::new(super::saturation::SaturationSystem),
    ]
}

/// Run one tick of `systems` over `region_id`, in two phases: every
/// system's `tick()` runs first in registration order, collecting
/// signals into a shared buffer; then, only if any signals were
/// emitted, every system's `handle_signals()` runs once with that
/// buffer as its inbox. Signals emitted during phase two are discarded
/// — they never trigger further reactions within the same tick.
fn dispatch_systems(
    world: &mut World,
    systems: &mut [Box<dyn SimSystem>],
    rng: &mut SmallRng,
    region_id: &str,
    tick: u64,
    background_only: bool,
) {
    let mut signals: Vec<Signal> = Vec::new();
    for system in systems.iter_mut() {
        if background_only && !system.runs_in_background() {
            continue;
        }
        let mut ctx = TickContext {
            world,
            rng,
            tick,
            region_id,
            signals: &mut signals,
            inbox: &[],
        };
        system.tick(&mut ctx);
    }

    if !signals.is_empty() {
        for system in systems.iter_mut() {
            if background_only && !system.runs_in_background() {
                continue;
            }
            let mut discarded: Vec<Signal> = Vec::new();
            let mut ctx = TickContext {
                world,
                rng,
                tick,
                region_id,
                signals: &mut discarded,
                inbox: &signals,
            };
            system.handle_signals(&mut ctx);
        }
    }
}

/// Advance one region by one tick, choosing the active or background
/// path by its current [`RegionState`]. A background region transitioning
/// to active this tick is resynchronized first: its full subsystem set
/// runs once to catch it up before normal active processing proceeds.
pub fn advance_region(
    world: &mut World,
    systems: &mut [Box<dyn SimSystem>],
    rng: &mut SmallRng,
    region_id: &str,
    tick: u64,
    tick_config: &TickConfig,
) {
    let Some(state) = world.regions.get(region_id).map(|r| r.state) else {
        return;
    };

    match state {
        RegionState::Active => {
            dispatch_systems(world, systems, rng, region_id, tick, false);
        }
        RegionState::Background => {
            let interval = tick_config.background_interval_ticks();
            if interval == 0 || tick % interval == 0 {
                dispatch_systems(world, systems, rng, region_id, tick, true);
            }
        }
    }

    if let Some(region) = world.regions.get_mut(region_id) {
        region.last_processed_tick = tick;
    }
}

/// Transition a region between active and background, resynchronizing
/// it with a full-fidelity pass if it is becoming active.
pub fn set_region_active(
    world: &mut World,
    systems: &mut [Box<dyn SimSystem>],
    rng: &mut SmallRng,
    region_id: &str,
    active: bool,
    tick: u64,
) {
    let Some(region) = world.regions.get_mut(region_id) else {
        return;
    };
    let was_background = region.state == RegionState::Background;
    region.state = if active { RegionState::Active } else { RegionState::Background };

    if active && was_background {
        dispatch_systems(world, systems, rng, region_id, tick, false);
    }
}

/// Advance every region named in `request.region_ids` (or, if empty,
/// every region in the world) up to `request.target_tick`, one tick at
/// a time, in ascending region-id order.
pub fn advance_world(world: &mut World, systems: &mut [Box<dyn SimSystem>], request: &TickRequest) {
    let tick_config = TickConfig::default();
    let mut rng = SmallRng::seed_from_u64(world.seed as u64);

    let mut region_ids: Vec<String> = if request.region_ids.is_empty() {
        world.regions.keys().cloned().collect()
    } else {
        let mut ids = request.region_ids.clone();
        ids.sort();
        ids
    };
    region_ids.dedup();

    while world.current_tick < request.target_tick {
        world.current_tick += 1;
        let tick = world.current_tick;
        for region_id in &region_ids {
            advance_region(world, systems, &mut rng, region_id, tick, &tick_config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bounds, Region};

    fn world_with_region(id: &str, state: RegionState) -> World {
        let mut world = World::new(1, 50, 50);
        let mut region = Region::new(
            id.to_string(),
            Bounds { min_x: 0, min_y: 0, max_x: 49, max_y: 49 },
        );
        region.state = state;
        world.regions.insert(id.to_string(), region);
        world
    }

    #[test]
    fn advance_world_processes_ticks_in_order() {
        let mut world = world_with_region("r0", RegionState::Active);
        let mut systems = default_systems();
        advance_world(&mut world, &mut systems, &TickRequest { region_ids: vec![], target_tick: 10 });
        assert_eq!(world.current_tick, 10);
        assert_eq!(world.regions.get("r0").unwrap().last_processed_tick, 10);
    }

    #[test]
    fn background_region_only_processes_every_interval() {
        let mut world = world_with_region("r0", RegionState::Background);
        let mut systems = default_systems();
        advance_world(&mut world, &mut systems, &TickRequest { region_ids: vec![], target_tick: 59 });
        assert_eq!(world.regions.get("r0").unwrap().last_processed_tick, 59);
    }

    #[test]
    fn two_runs_with_same_seed_are_deterministic() {
        let mut w1 = world_with_region("r0", RegionState::Active);
        let mut w2 = world_with_region("r0", RegionState::Active);
        let mut s1 = default_systems();
        let mut s2 = default_systems();
        let request = TickRequest { region_ids: vec![], target_tick: 200 };
        advance_world(&mut w1, &mut s1, &request);
        advance_world(&mut w2, &mut s2, &request);
        assert_eq!(
            w1.structures.keys().collect::<Vec<_>>(),
            w2.structures.keys().collect::<Vec<_>>()
        );
        assert_eq!(w1.event_log.len(), w2.event_log.len());
    }

    #[test]
    fn resynchronization_runs_full_pass_on_activation() {
        let mut world = world_with_region("r0", RegionState::Background);
        let mut systems = default_systems();
        let mut rng = SmallRng::seed_from_u64(1);
        world.current_tick = 5;
        set_region_active(&mut world, &mut systems, &mut rng, "r0", true, 5);
        assert_eq!(world.regions.get("r0").unwrap().state, RegionState::Active);
    }
}
