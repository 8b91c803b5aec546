//! Story origination: turns a handful of signals other systems already
//! emit (ruin, war, alliance) into a `Story`, runs it through event
//! propagation once, and records the result. The only system whose work
//! happens entirely in `handle_signals` rather than `tick`.

use std::collections::BTreeMap;

use super::context::TickContext;
use super::propagation::{propagate, DecayCurve};
use super::saturation::saturation_factor;
use super::signal::{Signal, SignalKind};
use super::system::SimSystem;
use crate::config::{PropagationConfig, SaturationConfig};
use crate::model::{Story, StoryCategory, StoryStatus};

const RUIN_BASE_PROBABILITY: f64 = 0.8;
const WAR_BASE_PROBABILITY: f64 = 0.7;
const ALLIANCE_BASE_PROBABILITY: f64 = 0.4;

fn settlement_center(world: &crate::world::World, clan_id: &str) -> (i64, i64) {
    world
        .settlements
        .values()
        .find(|s| s.clan_id == clan_id)
        .map(|s| s.center)
        .unwrap_or((0, 0))
}

fn origin_for_signal(world: &crate::world::World, kind: &SignalKind) -> Option<(StoryCategory, (i64, i64), f64)> {
    match kind {
        SignalKind::StructureRuined { structure_id, .. } => {
            let origin = world
                .structures
                .get(structure_id)
                .map(|s| s.location)
                .unwrap_or((0, 0));
            Some((StoryCategory::Ruin, origin, RUIN_BASE_PROBABILITY))
        }
        SignalKind::ClanWarDeclared { attacker_id, .. } => {
            Some((StoryCategory::Conflict, settlement_center(world, attacker_id), WAR_BASE_PROBABILITY))
        }
        SignalKind::ClanAllianceFormed { a_id, .. } => {
            Some((StoryCategory::Custom, settlement_center(world, a_id), ALLIANCE_BASE_PROBABILITY))
        }
        _ => None,
    }
}

pub struct StoryOriginSystem;

impl SimSystem for StoryOriginSystem {
    fn name(&self) -> &'static str {
        "story_origin"
    }

    fn tick(&mut self, _ctx: &mut TickContext) {
        // This system only reacts to signals other systems raise; it has
        // nothing of its own to do during the tick phase.
    }

    fn handle_signals(&mut self, ctx: &mut TickContext) {
        let propagation_config = PropagationConfig::default();
        let saturation_config = SaturationConfig::default();

        for (index, signal) in ctx.inbox.iter().enumerate() {
            let Some((category, origin, base_probability)) = origin_for_signal(ctx.world, &signal.kind) else {
                continue;
            };

            let active_count = ctx.world.stories.values().filter(|s| s.is_active()).count() as u32;
            let saturation = saturation_factor(active_count, saturation_config.story_cap);
            if saturation <= 0.0 {
                continue;
            }

            let story_id = ctx.world.id_gen().make_id("story", "origin", ctx.tick ^ index as u64);
            let result = propagate(
                &ctx.world.grid,
                origin,
                base_probability,
                &propagation_config,
                DecayCurve::Exponential,
                &BTreeMap::new(),
                active_count,
                saturation_config.story_cap,
                ctx.world.seed as u64,
                ctx.tick ^ index as u64,
                ctx.tick,
            );
            let max_hop = result.reached.iter().map(|(_, hop)| *hop).max().unwrap_or(0);
            let affected_tiles: Vec<(i64, i64)> = result.reached.iter().map(|(pos, _)| *pos).collect();

            let story = Story {
                schema_version: Story::SCHEMA_VERSION,
                id: story_id.clone(),
                category,
                status: StoryStatus::Active,
                origin,
                origin_tick: ctx.tick,
                base_probability,
                hop_count: max_hop,
                max_hops: propagation_config.max_hops,
                priority: 0,
                affected_tiles,
                metadata: BTreeMap::new(),
            };
            ctx.world.log_event(
                ctx.region_id,
                "story_origin",
                format!("story {story_id} originated ({category:?}), reached {} tiles", result.reached.len()),
            );
            ctx.world.stories.insert(story_id.clone(), story);
            ctx.signals.push(Signal {
                event_id: signal.event_id,
                kind: SignalKind::StoryOriginated { story_id },
            });
        }
    }
}
