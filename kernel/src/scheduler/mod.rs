/*!
 * Scheduler
 * Applies the active dispatch policy and drives every
 * ready <-> running <-> blocked/terminated transition
 */

use crate::core::errors::SimulationError;
use crate::core::types::{CoreId, Pid, SimulationResult, Tick, WorkUnits};
use crate::process::{IoTrigger, Process};
use crate::queue::QueueManager;
use std::sync::Arc;
use tracing::{debug, info};

mod atomic_stats;
mod policy;
mod select;
mod stats;
mod transitions;

pub use atomic_stats::AtomicSchedulerStats;
pub use policy::Policy;
pub use stats::SchedulerStats;

/// What a core reports after executing one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep running next tick
    Continue,
    /// Start simulated I/O for `io_ticks` ticks
    Block { io_ticks: Tick },
    /// No work left
    Terminate,
    /// Quantum used up; back to ready (demoted under feedback)
    QuantumExpired,
}

/// CPU Scheduler
pub struct Scheduler {
    queues: Arc<QueueManager>,
    policy: Policy,
    quantum: WorkUnits,
    trigger: Arc<dyn IoTrigger>,
    stats: AtomicSchedulerStats,
}

impl Scheduler {
    pub fn new(
        queues: Arc<QueueManager>,
        policy: Policy,
        quantum: WorkUnits,
        trigger: Arc<dyn IoTrigger>,
    ) -> Self {
        info!(%policy, quantum, "Scheduler initialized");
        Self {
            queues,
            policy,
            quantum,
            trigger,
            stats: AtomicSchedulerStats::new(policy, quantum),
        }
    }

    #[inline(always)]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    #[inline(always)]
    pub fn quantum(&self) -> WorkUnits {
        self.quantum
    }

    pub fn queues(&self) -> &Arc<QueueManager> {
        &self.queues
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats.snapshot()
    }

    pub(crate) fn atomic_stats(&self) -> &AtomicSchedulerStats {
        &self.stats
    }

    /// Select the next process and install it on `core` in one critical section
    ///
    /// Returns the dispatched pid, or `None` when nothing is ready.
    pub fn dispatch(&self, core: CoreId, tick: Tick) -> SimulationResult<Option<Pid>> {
        self.queues.with_queues(|queues| {
            if let Some(current) = queues.running(core) {
                return Err(SimulationError::AssignmentConflict {
                    core,
                    pid: current.pid(),
                });
            }
            let Some(process) = self.take_next(queues) else {
                return Ok(None);
            };
            let pid = process.pid();
            debug!(
                tick,
                core,
                pid,
                name = process.name(),
                remaining = process.remaining(),
                level = ?process.level(),
                "Dispatch"
            );
            queues.place_running(core, process)?;
            self.stats.inc_dispatches();
            Ok(Some(pid))
        })
    }

    /// Decide what happens to a process that just executed a unit
    ///
    /// Termination wins over blocking, which wins over quantum expiry.
    pub fn classify(&self, process: &Process, tick: Tick) -> TickOutcome {
        if process.is_finished() {
            return TickOutcome::Terminate;
        }
        if let Some(io_ticks) = self.trigger.io_ticks(process, tick) {
            return TickOutcome::Block { io_ticks };
        }
        if self.policy.uses_quantum() && process.pcb().slice_used() >= self.quantum {
            return TickOutcome::QuantumExpired;
        }
        TickOutcome::Continue
    }

    /// Busy core to interrupt so a shorter ready process can run
    ///
    /// Picks the core whose process has the most remaining work, provided
    /// it exceeds the SRT candidate's. Nothing qualifies while any core is
    /// idle, since that core takes the candidate at the next dispatch.
    /// Cores for which `pending` returns true are skipped.
    pub fn preemption_target(&self, pending: impl Fn(CoreId) -> bool) -> Option<CoreId> {
        self.queues.with_queues(|queues| {
            if queues.running.iter().any(Option::is_none) {
                return None;
            }
            let candidate = queues
                .ready
                .iter()
                .min_by(|a, b| select::srt_order(a, b))?
                .remaining();

            let mut longest: Option<(CoreId, WorkUnits)> = None;
            for (core, process) in queues.running.iter().enumerate() {
                let Some(process) = process else { continue };
                if pending(core) || process.remaining() <= candidate {
                    continue;
                }
                if longest.map_or(true, |(_, remaining)| process.remaining() > remaining) {
                    longest = Some((core, process.remaining()));
                }
            }
            longest.map(|(core, _)| core)
        })
    }
}
