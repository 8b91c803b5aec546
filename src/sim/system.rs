use super::context::TickContext;

/// A pluggable tick-time system, run in a fixed registration order by the
/// region scheduler.
///
/// Object-safe so systems can be stored as `Box<dyn SimSystem>`.
pub trait SimSystem {
    fn name(&self) -> &'static str;

    fn tick(&mut self, ctx: &mut TickContext);

    /// React to signals emitted by other systems during Phase 1 (`tick()`).
    ///
    /// Called once per dispatch cycle with the full signal buffer as
    /// `ctx.inbox`. Signals pushed to `ctx.signals` here are **not**
    /// re-delivered within the same cycle. Default: no-op.
    fn handle_signals(&mut self, ctx: &mut TickContext) {
        let _ = ctx;
    }

    /// Whether this system still runs when its region is in `Background`
    /// state. Only resource regeneration qualifies; everything else
    /// (NPC lifecycle, clan AI, ...) is full-fidelity-only.
    fn runs_in_background(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::signal::Signal;
    use crate::world::World;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingSystem {
        count: Rc<Cell<u32>>,
    }

    impl SimSystem for CountingSystem {
        fn name(&self) -> &'static str {
            "counting"
        }
        fn tick(&mut self, _ctx: &mut TickContext) {
            self.count.set(self.count.get() + 1);
        }
    }

    #[test]
    fn default_handle_signals_is_noop() {
        use rand::SeedableRng;
        let count = Rc::new(Cell::new(0));
        let mut sys = CountingSystem { count: count.clone() };
        let mut world = World::new(1, 10, 10);
        let mut rng = rand::rngs::SmallRng::seed_from_u64(0);
        let mut signals = Vec::new();
        let inbox: Vec<Signal> = Vec::new();
        let mut ctx = TickContext {
            world: &mut world,
            rng: &mut rng,
            tick: 0,
            region_id: "r0",
            signals: &mut signals,
            inbox: &inbox,
        };
        sys.handle_signals(&mut ctx);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn default_runs_in_background_is_false() {
        let count = Rc::new(Cell::new(0));
        let sys = CountingSystem { count };
        assert!(!sys.runs_in_background());
    }
}
