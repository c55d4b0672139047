/*!
 * Process Record
 * Process identity plus its PCB
 */

use super::pcb::Pcb;
use super::types::{FeedbackLevel, IoProfile, ProcessSpec, ProcessState};
use crate::core::errors::SimulationError;
use crate::core::types::{Pid, SimulationResult, Tick, WorkUnits};

/// A simulated process
///
/// Only ever owned by one place at a time: a ready level, the blocked
/// queue, the terminated queue, or a core's running slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
    name: String,
    total_work: WorkUnits,
    /// Position in the loaded workload, used as the final tie-breaker
    arrival: u32,
    io: Option<IoProfile>,
    pcb: Pcb,
}

impl Process {
    #[must_use]
    pub fn new(pid: Pid, arrival: u32, spec: &ProcessSpec) -> Self {
        Self {
            pid,
            name: spec.name.clone(),
            total_work: spec.work,
            arrival,
            io: spec.io,
            pcb: Pcb::new(spec.work, spec.priority),
        }
    }

    #[inline(always)]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn total_work(&self) -> WorkUnits {
        self.total_work
    }

    #[inline(always)]
    pub fn arrival(&self) -> u32 {
        self.arrival
    }

    #[inline]
    pub fn io_profile(&self) -> Option<IoProfile> {
        self.io
    }

    #[inline(always)]
    pub fn pcb(&self) -> &Pcb {
        &self.pcb
    }

    #[inline(always)]
    pub fn remaining(&self) -> WorkUnits {
        self.pcb.remaining
    }

    #[inline(always)]
    pub fn state(&self) -> ProcessState {
        self.pcb.state
    }

    #[inline(always)]
    pub fn level(&self) -> FeedbackLevel {
        self.pcb.level
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.pcb.remaining == 0
    }

    /// Move to `to`, rejecting steps outside the process lifecycle
    pub(crate) fn transition(&mut self, to: ProcessState) -> SimulationResult<()> {
        let from = self.pcb.state;
        if !from.can_transition_to(to) {
            return Err(SimulationError::InvalidTransition {
                pid: self.pid,
                from,
                to,
            });
        }
        self.pcb.state = to;
        Ok(())
    }

    /// Mark a dispatch onto a core
    pub(crate) fn start_slice(&mut self) -> SimulationResult<()> {
        self.transition(ProcessState::Running)?;
        self.pcb.slice_used = 0;
        self.pcb.dispatches += 1;
        Ok(())
    }

    /// Execute one unit of work
    pub(crate) fn consume_unit(&mut self) {
        debug_assert!(self.pcb.remaining > 0, "running a finished process");
        self.pcb.remaining = self.pcb.remaining.saturating_sub(1);
        self.pcb.run_time += 1;
        self.pcb.slice_used += 1;
        self.pcb.since_io += 1;
    }

    #[inline]
    pub(crate) fn age(&mut self) {
        self.pcb.wait_time += 1;
    }

    pub(crate) fn set_level(&mut self, level: FeedbackLevel) {
        self.pcb.level = level;
    }

    pub(crate) fn reset_io_counter(&mut self) {
        self.pcb.since_io = 0;
    }

    pub(crate) fn mark_completed(&mut self, tick: Tick) {
        self.pcb.completed_at = Some(tick);
    }
}
