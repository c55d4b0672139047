/*!
 * Core Handle
 * Kernel-side handle to a spawned core worker
 */

use super::command::{CoreCommand, CoreReport};
use super::worker::CoreWorker;
use crate::core::errors::SimulationError;
use crate::core::traits::Stoppable;
use crate::core::types::{CoreId, SimulationResult};
use crate::process::Process;
use crate::scheduler::Scheduler;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Handle to one core worker thread
pub struct CoreHandle {
    id: CoreId,
    scheduler: Arc<Scheduler>,
    commands: flume::Sender<CoreCommand>,
    interrupt: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl CoreHandle {
    /// Spawn the worker thread for `id`
    pub fn spawn(
        id: CoreId,
        scheduler: Arc<Scheduler>,
        reports: flume::Sender<CoreReport>,
    ) -> SimulationResult<Self> {
        let (commands, command_rx) = flume::unbounded();
        let interrupt = Arc::new(AtomicBool::new(false));
        let stopped = Arc::new(AtomicBool::new(false));

        let worker = CoreWorker {
            id,
            scheduler: Arc::clone(&scheduler),
            interrupt: Arc::clone(&interrupt),
            stopped: Arc::clone(&stopped),
            commands: command_rx,
            reports,
        };

        let thread = thread::Builder::new()
            .name(format!("core-{id}"))
            .spawn(move || worker.run())
            .map_err(|e| SimulationError::WorkerSpawn {
                core: id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            scheduler,
            commands,
            interrupt,
            stopped,
            thread: Some(thread),
        })
    }

    #[inline(always)]
    pub fn id(&self) -> CoreId {
        self.id
    }

    /// No process assigned
    pub fn is_free(&self) -> bool {
        self.scheduler.queues().is_core_free(self.id)
    }

    /// Assign a process taken from ready via `Scheduler::select_next`
    ///
    /// Fails with `AssignmentConflict` if the core is busy; the process is
    /// then returned to the head of ready.
    pub fn assign(&self, process: Process) -> SimulationResult<()> {
        self.scheduler
            .queues()
            .with_queues(|queues| queues.place_running(self.id, process))
    }

    /// Request the current process be abandoned at the next tick boundary
    ///
    /// Safe to call from any thread, including while the worker is mid-tick.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Release);
    }

    pub fn has_pending_interrupt(&self) -> bool {
        self.interrupt.load(Ordering::Acquire)
    }

    pub(crate) fn send(&self, command: CoreCommand) -> SimulationResult<()> {
        self.commands
            .send(command)
            .map_err(|_| SimulationError::WorkerLost { core: self.id })
    }

    /// Stop and wait for the worker thread to exit
    pub fn join(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!(core = self.id, "Core worker panicked");
            } else {
                info!(core = self.id, "Core worker joined");
            }
        }
    }
}

impl Stoppable for CoreHandle {
    fn stop(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            let _ = self.commands.send(CoreCommand::Shutdown);
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl Drop for CoreHandle {
    fn drop(&mut self) {
        self.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CoreEvent;
    use crate::process::{NeverBlock, ProcessSpec};
    use crate::queue::QueueManager;
    use crate::scheduler::{Policy, TickOutcome};
    use std::time::Duration;

    fn spawn_one(specs: &[(&str, u32)]) -> (CoreHandle, Arc<Scheduler>, flume::Receiver<CoreReport>) {
        let queues = Arc::new(QueueManager::new(1, false));
        let processes = specs
            .iter()
            .enumerate()
            .map(|(i, (name, work))| Process::new(i as u32 + 1, i as u32, &ProcessSpec::new(*name, *work)))
            .collect();
        queues.load(processes).unwrap();
        let scheduler = Arc::new(Scheduler::new(queues, Policy::Fcfs, 1, Arc::new(NeverBlock)));
        let (tx, rx) = flume::unbounded();
        let handle = CoreHandle::spawn(0, Arc::clone(&scheduler), tx).unwrap();
        (handle, scheduler, rx)
    }

    fn roundtrip(handle: &CoreHandle, rx: &flume::Receiver<CoreReport>, command: CoreCommand) -> CoreEvent {
        handle.send(command).unwrap();
        rx.recv_timeout(Duration::from_secs(5)).unwrap().event.unwrap()
    }

    #[test]
    fn test_assign_and_execute() {
        let (mut handle, scheduler, rx) = spawn_one(&[("A", 2)]);
        assert!(handle.is_free());

        let process = scheduler.select_next().unwrap();
        handle.assign(process).unwrap();
        assert!(!handle.is_free());

        assert_eq!(
            roundtrip(&handle, &rx, CoreCommand::Execute(1)),
            CoreEvent::Ran { pid: 1, outcome: TickOutcome::Continue }
        );
        assert_eq!(
            roundtrip(&handle, &rx, CoreCommand::Execute(2)),
            CoreEvent::Ran { pid: 1, outcome: TickOutcome::Terminate }
        );
        // Outcomes are left for the kernel to apply
        assert!(!handle.is_free());
        assert_eq!(scheduler.apply(0, TickOutcome::Terminate, 2).unwrap(), Some(1));
        assert!(handle.is_free());
        assert_eq!(roundtrip(&handle, &rx, CoreCommand::Execute(3)), CoreEvent::Idle);

        handle.join();
        assert!(handle.is_stopped());
    }

    #[test]
    fn test_assign_busy_core_conflicts() {
        let (handle, scheduler, _rx) = spawn_one(&[("A", 2), ("B", 2)]);
        let a = scheduler.select_next().unwrap();
        handle.assign(a).unwrap();

        let b = scheduler.select_next().unwrap();
        assert_eq!(
            handle.assign(b),
            Err(SimulationError::AssignmentConflict { core: 0, pid: 2 })
        );
        scheduler.queues().verify_integrity().unwrap();
    }

    #[test]
    fn test_interrupt_honoured_at_boundary() {
        let (handle, scheduler, rx) = spawn_one(&[("A", 5)]);
        scheduler.dispatch(0, 1).unwrap();
        roundtrip(&handle, &rx, CoreCommand::Execute(1));

        handle.interrupt();
        assert!(handle.has_pending_interrupt());
        assert_eq!(
            roundtrip(&handle, &rx, CoreCommand::Boundary(2)),
            CoreEvent::Preempted { pid: 1 }
        );
        assert!(!handle.has_pending_interrupt());
        assert!(handle.is_free());
        assert_eq!(scheduler.queues().snapshot().ready[0].remaining, 4);
    }
}
