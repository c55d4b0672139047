/*!
 * Queue Manager
 * Owns the ready, blocked and terminated queues plus the per-core running
 * slots behind one lock, so every cross-queue move is atomic
 */

use crate::core::types::{CoreId, Pid, SimulationResult, Tick, WorkUnits};
use crate::process::{FeedbackLevel, Process};
use parking_lot::Mutex;
use tracing::debug;

mod ready;
mod snapshot;
mod state;

pub(crate) use state::Queues;
pub use snapshot::{BlockedView, CoreView, ProcessView, QueueCounts, QueueSnapshot};

/// Queue manager shared by the kernel loop, the scheduler and every core
///
/// A process lives in exactly one of: a ready level, the blocked queue,
/// the terminated queue, or one core's running slot.
pub struct QueueManager {
    inner: Mutex<Queues>,
    feedback: bool,
}

impl QueueManager {
    pub fn new(cores: usize, feedback: bool) -> Self {
        Self {
            inner: Mutex::new(Queues::new(cores, feedback)),
            feedback,
        }
    }

    #[inline]
    pub fn is_feedback(&self) -> bool {
        self.feedback
    }

    /// Run `f` inside the critical section
    pub(crate) fn with_queues<R>(&self, f: impl FnOnce(&mut Queues) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Load the initial population into ready (Q1 under feedback)
    pub fn load(&self, processes: Vec<Process>) -> SimulationResult<()> {
        let mut queues = self.inner.lock();
        for process in processes {
            queues.load(process)?;
        }
        debug!(loaded = queues.loaded, "Workload loaded into ready queue");
        Ok(())
    }

    /// Append to ready, optionally at a specific feedback level
    pub fn enqueue_ready(&self, process: Process, level: Option<FeedbackLevel>) -> SimulationResult<()> {
        self.inner.lock().push_ready(process, level)
    }

    /// Take the head of ready (highest non-empty level first)
    pub fn dequeue_ready(&self) -> Option<Process> {
        self.inner.lock().ready.pop_front()
    }

    pub fn peek_ready(&self) -> Option<Pid> {
        self.inner.lock().ready.front().map(Process::pid)
    }

    pub fn enqueue_blocked(&self, process: Process, io_ticks: Tick, tick: Tick) -> SimulationResult<()> {
        self.inner.lock().push_blocked(process, io_ticks, tick)
    }

    /// Return every process whose I/O has elapsed to ready
    pub fn resolve_blocked(&self, tick: Tick) -> SimulationResult<Vec<Pid>> {
        let released = self.inner.lock().resolve_blocked(tick)?;
        if !released.is_empty() {
            debug!(tick, ?released, "I/O complete");
        }
        Ok(released)
    }

    pub fn enqueue_terminated(&self, process: Process, tick: Tick) -> SimulationResult<()> {
        self.inner.lock().push_terminated(process, tick)
    }

    /// Add one tick of wait time to every ready process
    pub fn age_ready(&self) {
        self.inner.lock().age_ready();
    }

    pub fn counts(&self) -> QueueCounts {
        QueueCounts::capture(&self.inner.lock())
    }

    /// Ready and blocked empty, every core idle
    pub fn all_finished(&self) -> bool {
        self.inner.lock().all_finished()
    }

    pub fn is_core_free(&self, core: CoreId) -> bool {
        self.inner.lock().is_core_free(core)
    }

    /// Remaining work of the process running on `core`
    pub fn running_remaining(&self, core: CoreId) -> Option<WorkUnits> {
        self.inner.lock().running(core).map(Process::remaining)
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot::capture(&self.inner.lock())
    }

    /// Names of terminated processes in completion order
    pub fn terminated_order(&self) -> Vec<String> {
        self.inner
            .lock()
            .terminated
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Population conservation and pid uniqueness across all queues
    pub fn verify_integrity(&self) -> SimulationResult<()> {
        self.inner.lock().verify_integrity()
    }
}
