/*!
 * I/O Triggers
 * Pluggable predicate deciding when a running process blocks
 */

use super::record::Process;
use crate::core::types::Tick;

/// Decides whether a process blocks after executing a unit
///
/// Consulted once per executed unit that did not finish the process.
/// Returning `Some(ticks)` blocks the process for that many ticks.
pub trait IoTrigger: Send + Sync {
    fn io_ticks(&self, process: &Process, tick: Tick) -> Option<Tick>;
}

/// Blocks according to each process's own `IoProfile`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileTrigger;

impl IoTrigger for ProfileTrigger {
    fn io_ticks(&self, process: &Process, _tick: Tick) -> Option<Tick> {
        let profile = process.io_profile()?;
        (profile.every > 0 && process.pcb().since_io() >= profile.every).then_some(profile.duration)
    }
}

/// Never blocks; every process is CPU-bound
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverBlock;

impl IoTrigger for NeverBlock {
    fn io_ticks(&self, _process: &Process, _tick: Tick) -> Option<Tick> {
        None
    }
}

impl<F> IoTrigger for F
where
    F: Fn(&Process, Tick) -> Option<Tick> + Send + Sync,
{
    fn io_ticks(&self, process: &Process, tick: Tick) -> Option<Tick> {
        self(process, tick)
    }
}
