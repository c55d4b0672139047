/*!
 * Scheduler Transitions
 * Moves a process off a core into the queue matching its outcome
 */

use super::{Scheduler, TickOutcome};
use crate::core::types::{CoreId, Pid, SimulationResult, Tick};
use tracing::debug;

impl Scheduler {
    /// Route a core's per-tick outcome to the matching queue transition
    ///
    /// Returns the pid that left the core, if any.
    pub fn apply(&self, core: CoreId, outcome: TickOutcome, tick: Tick) -> SimulationResult<Option<Pid>> {
        match outcome {
            TickOutcome::Continue => Ok(None),
            TickOutcome::Block { io_ticks } => self.block_process(core, io_ticks, tick),
            TickOutcome::Terminate => self.finish_process(core, tick),
            TickOutcome::QuantumExpired => self.requeue_process(core, tick),
        }
    }

    /// RUNNING -> BLOCKED for `io_ticks` ticks
    pub fn block_process(&self, core: CoreId, io_ticks: Tick, tick: Tick) -> SimulationResult<Option<Pid>> {
        self.queues.with_queues(|queues| {
            let Some(process) = queues.take_running(core) else {
                return Ok(None);
            };
            let pid = process.pid();
            debug!(tick, core, pid, name = process.name(), io_ticks, "Blocked on I/O");
            queues.push_blocked(process, io_ticks, tick)?;
            self.stats.inc_blocks();
            Ok(Some(pid))
        })
    }

    /// RUNNING -> TERMINATED
    pub fn finish_process(&self, core: CoreId, tick: Tick) -> SimulationResult<Option<Pid>> {
        self.queues.with_queues(|queues| {
            let Some(process) = queues.take_running(core) else {
                return Ok(None);
            };
            let pid = process.pid();
            debug!(tick, core, pid, name = process.name(), "Terminated");
            queues.push_terminated(process, tick)?;
            self.stats.inc_completions();
            Ok(Some(pid))
        })
    }

    /// RUNNING -> READY at quantum expiry, one level lower under feedback
    pub fn requeue_process(&self, core: CoreId, tick: Tick) -> SimulationResult<Option<Pid>> {
        self.queues.with_queues(|queues| {
            let Some(process) = queues.take_running(core) else {
                return Ok(None);
            };
            let pid = process.pid();
            let level = self.policy.is_feedback().then(|| process.level().demote());
            if level.is_some_and(|new| new != process.level()) {
                self.stats.inc_demotions();
            }
            debug!(tick, core, pid, name = process.name(), ?level, "Quantum expired");
            queues.push_ready(process, level)?;
            self.stats.inc_quantum_expirations();
            Ok(Some(pid))
        })
    }

    /// RUNNING -> READY on interrupt; level and progress are kept
    pub fn preempt_process(&self, core: CoreId, tick: Tick) -> SimulationResult<Option<Pid>> {
        self.queues.with_queues(|queues| {
            let Some(process) = queues.take_running(core) else {
                return Ok(None);
            };
            let pid = process.pid();
            debug!(
                tick,
                core,
                pid,
                name = process.name(),
                remaining = process.remaining(),
                "Preempted"
            );
            queues.push_ready(process, None)?;
            self.stats.inc_preemptions();
            Ok(Some(pid))
        })
    }

    /// BLOCKED -> READY for every process whose I/O has elapsed
    pub fn resolve_blocked(&self, tick: Tick) -> SimulationResult<Vec<Pid>> {
        let released = self.queues.resolve_blocked(tick)?;
        self.stats.add_unblocks(released.len() as u64);
        Ok(released)
    }
}
