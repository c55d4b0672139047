/*!
 * Core Messages
 * Commands sent to a core worker and the reports it sends back
 */

use crate::core::types::{CoreId, Pid, SimulationResult, Tick};
use crate::scheduler::TickOutcome;

/// Control messages for a core worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoreCommand {
    /// Tick boundary: honour a pending interrupt
    Boundary(Tick),
    /// Execute one unit of the assigned process
    Execute(Tick),
    /// Exit the worker loop
    Shutdown,
}

/// What a core did in one phase of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreEvent {
    /// Boundary passed with nothing to do
    Unchanged,
    /// Interrupt honoured; the process went back to ready
    Preempted { pid: Pid },
    /// No process assigned
    Idle,
    /// Executed one unit; `outcome` is not yet applied
    Ran { pid: Pid, outcome: TickOutcome },
}

/// Reply to a `Boundary` or `Execute` command
#[derive(Debug)]
pub struct CoreReport {
    pub core: CoreId,
    pub tick: Tick,
    pub event: SimulationResult<CoreEvent>,
}
