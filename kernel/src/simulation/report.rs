/*!
 * Run Reports
 * Per-tick summaries and the final report of a run
 */

use super::context::SimulationContext;
use crate::core::types::{CoreId, Pid, Tick, WorkUnits};
use crate::queue::{ProcessView, QueueSnapshot};
use crate::scheduler::{Policy, SchedulerStats};
use serde::Serialize;
use uuid::Uuid;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TickSummary {
    pub tick: Tick,
    /// Interrupts honoured at the tick boundary
    pub preempted: Vec<Pid>,
    pub dispatched: Vec<(CoreId, Pid)>,
    pub completed: Vec<Pid>,
    pub blocked: Vec<Pid>,
    pub requeued: Vec<Pid>,
    pub unblocked: Vec<Pid>,
    /// Core interrupted by the SRT check at the end of the tick
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupted: Option<CoreId>,
    /// All work done; the kernel has halted
    pub finished: bool,
}

/// Final accounting for one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessSummary {
    pub pid: Pid,
    pub name: String,
    pub total_work: WorkUnits,
    pub remaining: WorkUnits,
    pub wait_time: Tick,
    pub run_time: Tick,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Tick>,
}

impl ProcessSummary {
    /// Every process arrives at tick 0, so turnaround is the completion tick
    pub fn turnaround(&self) -> Option<Tick> {
        self.completed_at
    }
}

impl From<&ProcessView> for ProcessSummary {
    fn from(view: &ProcessView) -> Self {
        Self {
            pid: view.pid,
            name: view.name.clone(),
            total_work: view.total_work,
            remaining: view.remaining,
            wait_time: view.wait_time,
            run_time: view.run_time,
            completed_at: view.completed_at,
        }
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub policy: Policy,
    pub cores: usize,
    pub ticks: Tick,
    /// Every process terminated (false when cancelled)
    pub completed: bool,
    pub terminated_order: Vec<String>,
    pub processes: Vec<ProcessSummary>,
    pub average_wait: f64,
    pub average_turnaround: f64,
    /// Completions per tick
    pub throughput: f64,
    /// Busy core-ticks over available core-ticks
    pub utilization: f64,
    pub stats: SchedulerStats,
}

impl SimulationReport {
    pub(crate) fn build(context: &SimulationContext, snapshot: &QueueSnapshot, stats: SchedulerStats) -> Self {
        let ticks = context.now();
        let cores = context.cores();

        let mut processes: Vec<ProcessSummary> = snapshot
            .ready
            .iter()
            .chain(snapshot.blocked.iter().map(|b| &b.process))
            .chain(snapshot.cores.iter().filter_map(|c| c.process.as_ref()))
            .chain(snapshot.terminated.iter())
            .map(ProcessSummary::from)
            .collect();
        processes.sort_by_key(|p| p.pid);

        let completed = processes.iter().all(|p| p.completed_at.is_some());
        let finished: Vec<&ProcessSummary> =
            processes.iter().filter(|p| p.completed_at.is_some()).collect();

        Self {
            run_id: context.run_id(),
            policy: context.policy(),
            cores,
            ticks,
            completed,
            terminated_order: snapshot.terminated.iter().map(|p| p.name.clone()).collect(),
            average_wait: mean(processes.iter().map(|p| p.wait_time)),
            average_turnaround: mean(finished.iter().filter_map(|p| p.turnaround())),
            throughput: ratio(finished.len() as u64, ticks),
            utilization: ratio(stats.busy_ticks, ticks * cores as u64),
            processes,
            stats,
        }
    }
}

fn mean(values: impl Iterator<Item = Tick>) -> f64 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| (sum + v, count + 1));
    ratio(sum, count)
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
