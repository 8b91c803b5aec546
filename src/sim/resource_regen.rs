//! Passive resource regeneration: trickle treasury income to clans and
//! slow natural repair to damaged (non-ruin) structures. The only
//! subsystem that still makes sense at the background tick rate, since
//! it has no dependency on the rest of the fixed order.

use super::context::TickContext;
use super::system::SimSystem;

const TREASURY_TICK_INCOME: f64 = 0.5;
const STRUCTURE_REPAIR_FRACTION: f64 = 0.01;

pub struct ResourceRegenSystem;

impl SimSystem for ResourceRegenSystem {
    fn name(&self) -> &'static str {
        "resource_regen"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        for clan in ctx.world.clans.values_mut() {
            clan.deposit(TREASURY_TICK_INCOME * clan.member_ids.len() as f64);
        }

        let tick = ctx.tick;
        for structure in ctx.world.structures.values_mut() {
            if !structure.is_ruin() && structure.health() < structure.max_health {
                structure.repair(structure.max_health * STRUCTURE_REPAIR_FRACTION, tick);
            }
        }
    }

    fn runs_in_background(&self) -> bool {
        true
    }
}
