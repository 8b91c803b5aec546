use rand::RngCore;

use super::signal::Signal;
use crate::world::World;

/// Context passed to each system on every tick.
///
/// Bundled so fields can be added later (e.g. a logger handle) without
/// changing the `SimSystem` trait signature.
pub struct TickContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut dyn RngCore,
    pub tick: u64,
    pub region_id: &'a str,
    /// Signals this system emits during its phase; collected into the
    /// shared buffer and delivered to every system's `handle_signals`.
    pub signals: &'a mut Vec<Signal>,
    /// Signals emitted by any system during the tick phase, visible to
    /// every system's reaction phase. Empty during the tick phase itself.
    pub inbox: &'a [Signal],
}
