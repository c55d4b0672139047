/*!
 * Process Control Block
 * Mutable scheduling state attached to every process
 */

use super::types::{FeedbackLevel, ProcessState};
use crate::core::types::{Priority, Tick, WorkUnits};
use serde::Serialize;

/// Process control block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Pcb {
    pub(crate) state: ProcessState,
    pub(crate) level: FeedbackLevel,
    pub(crate) priority: Priority,
    pub(crate) remaining: WorkUnits,
    /// Ticks spent in a ready queue
    pub(crate) wait_time: Tick,
    /// Units executed on any core
    pub(crate) run_time: Tick,
    /// Units executed since the current dispatch
    pub(crate) slice_used: WorkUnits,
    /// Units executed since the last I/O wait
    pub(crate) since_io: WorkUnits,
    pub(crate) dispatches: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) completed_at: Option<Tick>,
}

impl Pcb {
    pub(crate) fn new(work: WorkUnits, priority: Priority) -> Self {
        Self {
            state: ProcessState::New,
            level: FeedbackLevel::Q1,
            priority,
            remaining: work,
            wait_time: 0,
            run_time: 0,
            slice_used: 0,
            since_io: 0,
            dispatches: 0,
            completed_at: None,
        }
    }

    #[inline(always)]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline(always)]
    pub fn level(&self) -> FeedbackLevel {
        self.level
    }

    #[inline(always)]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[inline(always)]
    pub fn remaining(&self) -> WorkUnits {
        self.remaining
    }

    #[inline(always)]
    pub fn wait_time(&self) -> Tick {
        self.wait_time
    }

    #[inline(always)]
    pub fn run_time(&self) -> Tick {
        self.run_time
    }

    #[inline(always)]
    pub fn slice_used(&self) -> WorkUnits {
        self.slice_used
    }

    #[inline(always)]
    pub fn since_io(&self) -> WorkUnits {
        self.since_io
    }

    pub fn dispatches(&self) -> u32 {
        self.dispatches
    }

    pub fn completed_at(&self) -> Option<Tick> {
        self.completed_at
    }
}
