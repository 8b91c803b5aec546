//! Saturation manager: per-region story/event caps, the probability
//! multiplier derived from them, and the story housekeeping state
//! machine (active -> dormant/resolved/discredited -> archived).

use super::context::TickContext;
use super::system::SimSystem;
use crate::config::SaturationConfig;
use crate::model::StoryStatus;

/// `max(0, 1 - currentCount/maxCap)`. A cap of zero is treated as fully
/// saturated rather than dividing by zero.
pub fn saturation_factor(current_count: u32, max_cap: u32) -> f64 {
    if max_cap == 0 {
        return 0.0;
    }
    (1.0 - current_count as f64 / max_cap as f64).max(0.0)
}

/// Is `current_count` past the soft cap (a warning threshold below the
/// hard cap used to taper generation rates before they're outright
/// blocked)?
pub fn past_soft_cap(current_count: u32, max_cap: u32, config: &SaturationConfig) -> bool {
    max_cap > 0 && current_count as f64 >= max_cap as f64 * config.soft_cap_fraction
}

const DORMANCY_IDLE_TICKS: u64 = 20_000;
const ARCHIVE_IDLE_TICKS: u64 = 50_000;

/// Advance every story one step through its housekeeping state machine
/// and drop archived stories past the cap, oldest first.
pub struct SaturationSystem;

impl SimSystem for SaturationSystem {
    fn name(&self) -> &'static str {
        "saturation"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let tick = ctx.tick;
        let config = SaturationConfig::default();

        for story in ctx.world.stories.values_mut() {
            let idle = tick.saturating_sub(story.origin_tick + story.hop_count as u64);
            match story.status {
                StoryStatus::Active if idle >= DORMANCY_IDLE_TICKS => {
                    story.status = StoryStatus::Dormant;
                }
                StoryStatus::Dormant | StoryStatus::Resolved | StoryStatus::Discredited
                    if idle >= ARCHIVE_IDLE_TICKS =>
                {
                    story.status = StoryStatus::Archived;
                }
                _ => {}
            }
        }

        let active_count = ctx.world.stories.values().filter(|s| s.is_active()).count() as u32;
        if active_count > config.story_cap {
            let mut archivable: Vec<String> = ctx
                .world
                .stories
                .iter()
                .filter(|(_, s)| s.status == StoryStatus::Archived)
                .map(|(id, _)| id.clone())
                .collect();
            archivable.sort();
            let overflow = (active_count - config.story_cap) as usize;
            for id in archivable.into_iter().take(overflow) {
                ctx.world.stories.remove(&id);
            }
        }
    }
}
