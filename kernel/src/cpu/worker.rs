/*!
 * Core Worker
 * Thread body modelling one processor
 */

use super::command::{CoreCommand, CoreEvent, CoreReport};
use crate::core::types::{CoreId, SimulationResult, Tick};
use crate::scheduler::Scheduler;
use flume::RecvTimeoutError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// How often an idle worker re-checks its stop flag
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) struct CoreWorker {
    pub id: CoreId,
    pub scheduler: Arc<Scheduler>,
    pub interrupt: Arc<AtomicBool>,
    pub stopped: Arc<AtomicBool>,
    pub commands: flume::Receiver<CoreCommand>,
    pub reports: flume::Sender<CoreReport>,
}

impl CoreWorker {
    /// Worker loop; returns once stopped or the kernel goes away
    pub fn run(self) {
        debug!(core = self.id, "Core worker started");

        while !self.stopped.load(Ordering::Acquire) {
            let (tick, event) = match self.commands.recv_timeout(POLL_INTERVAL) {
                Ok(CoreCommand::Boundary(tick)) => (tick, self.boundary(tick)),
                Ok(CoreCommand::Execute(tick)) => (tick, self.tick(tick)),
                Ok(CoreCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => continue,
            };

            let report = CoreReport {
                core: self.id,
                tick,
                event,
            };
            if self.reports.send(report).is_err() {
                warn!(core = self.id, "Kernel dropped report channel");
                break;
            }
        }

        debug!(core = self.id, "Core worker stopped");
    }

    /// Honour a pending interrupt: the running process returns to ready
    /// with its progress intact
    fn boundary(&self, tick: Tick) -> SimulationResult<CoreEvent> {
        if !self.interrupt.swap(false, Ordering::AcqRel) {
            return Ok(CoreEvent::Unchanged);
        }
        Ok(match self.scheduler.preempt_process(self.id, tick)? {
            Some(pid) => CoreEvent::Preempted { pid },
            None => CoreEvent::Unchanged,
        })
    }

    /// Consume one unit of the assigned process and report its outcome
    ///
    /// The process stays on the core; the kernel applies the outcome in
    /// core order once every core has reported.
    pub fn tick(&self, tick: Tick) -> SimulationResult<CoreEvent> {
        let executed = self.scheduler.queues().with_queues(|queues| {
            let process = queues.running_mut(self.id)?;
            process.consume_unit();
            Some((process.pid(), self.scheduler.classify(process, tick)))
        });

        let Some((pid, outcome)) = executed else {
            return Ok(CoreEvent::Idle);
        };
        trace!(core = self.id, tick, pid, ?outcome, "Executed unit");

        self.scheduler.atomic_stats().inc_busy_ticks();
        Ok(CoreEvent::Ran { pid, outcome })
    }
}
