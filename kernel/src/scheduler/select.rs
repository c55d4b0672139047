/*!
 * Process Selection
 * Per-policy choice of the next ready process
 */

use super::policy::Policy;
use super::Scheduler;
use crate::core::types::WorkUnits;
use crate::process::Process;
use crate::queue::Queues;
use std::cmp::Ordering;

/// Shortest remaining work, then longest wait, then earliest arrival
pub(crate) fn srt_order(a: &Process, b: &Process) -> Ordering {
    a.remaining()
        .cmp(&b.remaining())
        .then_with(|| b.pcb().wait_time().cmp(&a.pcb().wait_time()))
        .then_with(|| a.arrival().cmp(&b.arrival()))
}

/// Shortest total work, then earliest arrival
fn spn_order(a: &Process, b: &Process) -> Ordering {
    a.total_work()
        .cmp(&b.total_work())
        .then_with(|| a.arrival().cmp(&b.arrival()))
}

/// Highest (wait + service) / service first, compared without division
fn hrrn_order(a: &Process, b: &Process) -> Ordering {
    let (wa, sa) = (a.pcb().wait_time(), u64::from(a.total_work().max(1)));
    let (wb, sb) = (b.pcb().wait_time(), u64::from(b.total_work().max(1)));
    let ratio_a = u128::from(wa + sa) * u128::from(sb);
    let ratio_b = u128::from(wb + sb) * u128::from(sa);
    ratio_b
        .cmp(&ratio_a)
        .then_with(|| a.arrival().cmp(&b.arrival()))
}

/// Highest priority first; queue order breaks ties
fn priority_order(a: &Process, b: &Process) -> Ordering {
    b.pcb().priority().cmp(&a.pcb().priority())
}

/// Position of the best process by `order`; the first of equals wins
fn best_by<'a>(
    candidates: impl Iterator<Item = &'a Process>,
    order: fn(&Process, &Process) -> Ordering,
) -> Option<usize> {
    candidates
        .enumerate()
        .min_by(|(_, a), (_, b)| order(a, b))
        .map(|(index, _)| index)
}

impl Scheduler {
    /// Flattened ready position the active policy would dispatch next
    pub(crate) fn pick_index(&self, queues: &Queues) -> Option<usize> {
        let ready = &queues.ready;
        if ready.is_empty() {
            return None;
        }
        match self.policy {
            Policy::Fcfs | Policy::RoundRobin | Policy::Feedback => Some(0),
            Policy::Srt => best_by(ready.iter(), srt_order),
            Policy::Spn => best_by(ready.iter(), spn_order),
            Policy::Hrrn => best_by(ready.iter(), hrrn_order),
            Policy::Priority => best_by(ready.iter(), priority_order),
        }
    }

    /// Remove the next process per policy from ready
    pub(crate) fn take_next(&self, queues: &mut Queues) -> Option<Process> {
        let index = self.pick_index(queues)?;
        queues.ready.remove(index)
    }

    /// Select and remove the next ready process; `None` when ready is empty
    pub fn select_next(&self) -> Option<Process> {
        self.queues.with_queues(|queues| self.take_next(queues))
    }

    /// Remaining work of the process SRT would pick, without removing it
    pub fn srt_candidate(&self) -> Option<WorkUnits> {
        self.queues.with_queues(|queues| {
            queues
                .ready
                .iter()
                .min_by(|a, b| srt_order(a, b))
                .map(Process::remaining)
        })
    }
}
