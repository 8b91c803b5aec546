//! Wraps village detection/refresh as the last step of the fixed
//! subsystem order, run every tick so promotions are visible the same
//! tick a qualifying structure goes up.

use super::context::TickContext;
use super::signal::{Signal, SignalKind};
use super::system::SimSystem;
use crate::model::VillageTier;
use crate::worldgen::villages::detect_villages;

pub struct VillageRefreshSystem;

impl SimSystem for VillageRefreshSystem {
    fn name(&self) -> &'static str {
        "village_refresh"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let before: std::collections::BTreeMap<String, VillageTier> = ctx
            .world
            .villages
            .iter()
            .map(|(id, v)| (id.clone(), v.tier))
            .collect();

        detect_villages(ctx.world);

        for (id, village) in &ctx.world.villages {
            let promoted = before
                .get(id)
                .map(|prior_tier| village.tier > *prior_tier)
                .unwrap_or(false);
            if promoted {
                ctx.signals.push(Signal {
                    event_id: 0,
                    kind: SignalKind::VillagePromoted {
                        village_id: id.clone(),
                        tier: village.tier,
                    },
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OwnerType, Side, Structure, StructureType, VillageTier};
    use crate::world::World;

    fn run_tick(world: &mut World, tick: u64) {
        use rand::SeedableRng;
        let mut rng = rand::rngs::SmallRng::seed_from_u64(tick);
        let mut signals = Vec::new();
        let inbox = Vec::new();
        let mut ctx = TickContext {
            world,
            rng: &mut rng,
            tick,
            region_id: "r0",
            signals: &mut signals,
            inbox: &inbox,
        };
        VillageRefreshSystem.tick(&mut ctx);
    }

    fn place(world: &mut World, id: &str, pos: (i64, i64), structure_type: StructureType) {
        world.structures.insert(
            id.to_string(),
            Structure::new(
                id.to_string(),
                structure_type,
                pos,
                100.0,
                Side::South,
                Some("c1".into()),
                Some(OwnerType::Clan),
                0,
            ),
        );
    }

    #[test]
    fn market_addition_emits_promotion_signal() {
        let mut world = World::new(1, 100, 100);
        place(&mut world, "h1", (10, 10), StructureType::House);
        place(&mut world, "h2", (12, 12), StructureType::House);
        place(&mut world, "h3", (11, 14), StructureType::House);
        run_tick(&mut world, 0);

        let village = world.villages.values().next().unwrap();
        assert_eq!(village.tier, VillageTier::Village);

        place(&mut world, "m1", (13, 11), StructureType::Market);
        let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
        let mut signals = Vec::new();
        let inbox = Vec::new();
        let mut ctx = TickContext {
            world: &mut world,
            rng: &mut rng,
            tick: 1,
            region_id: "r0",
            signals: &mut signals,
            inbox: &inbox,
        };
        VillageRefreshSystem.tick(&mut ctx);
        assert!(signals.iter().any(|s| matches!(s.kind, SignalKind::VillagePromoted { .. })));
    }
}
