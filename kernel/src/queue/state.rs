/*!
 * Queue State
 * Everything guarded by the queue manager's lock: ready, blocked,
 * terminated and the per-core running slots
 */

use super::ready::ReadyQueues;
use crate::core::errors::SimulationError;
use crate::core::types::{CoreId, Pid, SimulationResult, Tick};
use crate::process::{FeedbackLevel, Process, ProcessState};
use std::collections::{HashSet, VecDeque};

/// Blocked-queue entry carrying its remaining simulated I/O
#[derive(Debug)]
pub(crate) struct BlockedEntry {
    pub process: Process,
    pub io_remaining: Tick,
    /// Tick the process blocked in; that tick's resolve pass skips it
    pub since: Tick,
}

#[derive(Debug)]
pub(crate) struct Queues {
    pub ready: ReadyQueues,
    pub blocked: VecDeque<BlockedEntry>,
    pub terminated: Vec<Process>,
    pub running: Vec<Option<Process>>,
    pub loaded: usize,
}

impl Queues {
    pub fn new(cores: usize, feedback: bool) -> Self {
        Self {
            ready: ReadyQueues::new(feedback),
            blocked: VecDeque::new(),
            terminated: Vec::new(),
            running: (0..cores).map(|_| None).collect(),
            loaded: 0,
        }
    }

    pub fn load(&mut self, mut process: Process) -> SimulationResult<()> {
        process.transition(ProcessState::Ready)?;
        process.set_level(FeedbackLevel::Q1);
        self.ready.push_back(process);
        self.loaded += 1;
        Ok(())
    }

    /// Move into ready at the tail of `level` (current level if `None`)
    pub fn push_ready(
        &mut self,
        mut process: Process,
        level: Option<FeedbackLevel>,
    ) -> SimulationResult<()> {
        process.transition(ProcessState::Ready)?;
        if let Some(level) = level {
            process.set_level(level);
        }
        self.ready.push_back(process);
        Ok(())
    }

    pub fn push_blocked(
        &mut self,
        mut process: Process,
        io_ticks: Tick,
        tick: Tick,
    ) -> SimulationResult<()> {
        process.transition(ProcessState::Blocked)?;
        process.reset_io_counter();
        self.blocked.push_back(BlockedEntry {
            process,
            io_remaining: io_ticks.max(1),
            since: tick,
        });
        Ok(())
    }

    pub fn push_terminated(&mut self, mut process: Process, tick: Tick) -> SimulationResult<()> {
        process.transition(ProcessState::Terminated)?;
        process.mark_completed(tick);
        self.terminated.push(process);
        Ok(())
    }

    /// Count down I/O and return finished entries to ready, in blocked order
    pub fn resolve_blocked(&mut self, tick: Tick) -> SimulationResult<Vec<Pid>> {
        let reset_level = self.ready.is_feedback().then_some(FeedbackLevel::Q1);
        let mut still_blocked = VecDeque::with_capacity(self.blocked.len());
        let mut released = Vec::new();

        for mut entry in self.blocked.drain(..) {
            if entry.since < tick {
                entry.io_remaining = entry.io_remaining.saturating_sub(1);
            }
            if entry.io_remaining == 0 {
                released.push(entry.process);
            } else {
                still_blocked.push_back(entry);
            }
        }
        self.blocked = still_blocked;

        let mut pids = Vec::with_capacity(released.len());
        for process in released {
            pids.push(process.pid());
            self.push_ready(process, reset_level)?;
        }
        Ok(pids)
    }

    pub fn age_ready(&mut self) {
        self.ready.iter_mut().for_each(Process::age);
    }

    #[inline]
    pub fn running(&self, core: CoreId) -> Option<&Process> {
        self.running.get(core).and_then(Option::as_ref)
    }

    #[inline]
    pub fn running_mut(&mut self, core: CoreId) -> Option<&mut Process> {
        self.running.get_mut(core).and_then(Option::as_mut)
    }

    #[inline]
    pub fn take_running(&mut self, core: CoreId) -> Option<Process> {
        self.running.get_mut(core).and_then(Option::take)
    }

    #[inline]
    pub fn is_core_free(&self, core: CoreId) -> bool {
        self.running(core).is_none()
    }

    /// Install a dispatched process on a core
    ///
    /// On conflict or an illegal state the process goes back to the head
    /// of its ready queue, so nothing is lost.
    pub fn place_running(&mut self, core: CoreId, mut process: Process) -> SimulationResult<()> {
        let pid = process.pid();
        let Some(slot) = self.running.get_mut(core).filter(|slot| slot.is_none()) else {
            self.ready.push_front(process);
            return Err(SimulationError::AssignmentConflict { core, pid });
        };
        if let Err(e) = process.start_slice() {
            self.ready.push_front(process);
            return Err(e);
        }
        *slot = Some(process);
        Ok(())
    }

    pub fn running_count(&self) -> usize {
        self.running.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn all_finished(&self) -> bool {
        self.ready.is_empty() && self.blocked.is_empty() && self.running_count() == 0
    }

    pub fn population(&self) -> usize {
        self.ready.len() + self.blocked.len() + self.terminated.len() + self.running_count()
    }

    pub fn verify_integrity(&self) -> SimulationResult<()> {
        let population = self.population();
        if population != self.loaded {
            return Err(SimulationError::IntegrityViolation(format!(
                "{} processes tracked, {} loaded",
                population, self.loaded
            )));
        }

        let mut seen = HashSet::with_capacity(population);
        let all = self
            .ready
            .iter()
            .chain(self.blocked.iter().map(|entry| &entry.process))
            .chain(self.terminated.iter())
            .chain(self.running.iter().flatten());
        for process in all {
            if !seen.insert(process.pid()) {
                return Err(SimulationError::IntegrityViolation(format!(
                    "process {} ({}) held in two places",
                    process.pid(),
                    process.name()
                )));
            }
        }
        Ok(())
    }
}
