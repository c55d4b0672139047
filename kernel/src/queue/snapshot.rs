/*!
 * Queue Snapshots
 * Read-only, serializable copies of queue and core contents
 */

use super::state::Queues;
use crate::core::types::{CoreId, Pid, Priority, Tick, WorkUnits};
use crate::process::{FeedbackLevel, Process, ProcessState};
use serde::Serialize;

/// Observable copy of one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessView {
    pub pid: Pid,
    pub name: String,
    pub state: ProcessState,
    pub level: FeedbackLevel,
    pub priority: Priority,
    pub remaining: WorkUnits,
    pub total_work: WorkUnits,
    pub wait_time: Tick,
    pub run_time: Tick,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Tick>,
}

impl From<&Process> for ProcessView {
    fn from(process: &Process) -> Self {
        let pcb = process.pcb();
        Self {
            pid: process.pid(),
            name: process.name().to_string(),
            state: pcb.state(),
            level: pcb.level(),
            priority: pcb.priority(),
            remaining: pcb.remaining(),
            total_work: process.total_work(),
            wait_time: pcb.wait_time(),
            run_time: pcb.run_time(),
            completed_at: pcb.completed_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedView {
    #[serde(flatten)]
    pub process: ProcessView,
    pub io_remaining: Tick,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreView {
    pub core: CoreId,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<ProcessView>,
}

/// Consistent copy of every queue, taken under a single lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueSnapshot {
    /// Ready processes in dispatch-precedence order
    pub ready: Vec<ProcessView>,
    /// Per-level contents, feedback mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<[Vec<ProcessView>; 3]>,
    pub blocked: Vec<BlockedView>,
    pub terminated: Vec<ProcessView>,
    pub cores: Vec<CoreView>,
}

impl QueueSnapshot {
    pub(crate) fn capture(queues: &Queues) -> Self {
        let levels = queues.ready.is_feedback().then(|| {
            let level = |l: FeedbackLevel| {
                queues.ready.levels()[l.index()]
                    .iter()
                    .map(ProcessView::from)
                    .collect::<Vec<_>>()
            };
            [level(FeedbackLevel::Q1), level(FeedbackLevel::Q2), level(FeedbackLevel::Q3)]
        });

        Self {
            ready: queues.ready.iter().map(ProcessView::from).collect(),
            levels,
            blocked: queues
                .blocked
                .iter()
                .map(|entry| BlockedView {
                    process: ProcessView::from(&entry.process),
                    io_remaining: entry.io_remaining,
                })
                .collect(),
            terminated: queues.terminated.iter().map(ProcessView::from).collect(),
            cores: queues
                .running
                .iter()
                .enumerate()
                .map(|(core, slot)| CoreView {
                    core,
                    busy: slot.is_some(),
                    process: slot.as_ref().map(ProcessView::from),
                })
                .collect(),
        }
    }

    pub fn ready_names(&self) -> Vec<&str> {
        self.ready.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn terminated_names(&self) -> Vec<&str> {
        self.terminated.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Queue sizes at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueCounts {
    pub ready: usize,
    pub levels: [usize; 3],
    pub blocked: usize,
    pub terminated: usize,
    pub running: usize,
    pub loaded: usize,
}

impl QueueCounts {
    pub(crate) fn capture(queues: &Queues) -> Self {
        Self {
            ready: queues.ready.len(),
            levels: FeedbackLevel::ALL.map(|level| queues.ready.level_len(level)),
            blocked: queues.blocked.len(),
            terminated: queues.terminated.len(),
            running: queues.running_count(),
            loaded: queues.loaded,
        }
    }

    /// ready + blocked + terminated + running
    #[inline]
    pub fn total(&self) -> usize {
        self.ready + self.blocked + self.terminated + self.running
    }
}
