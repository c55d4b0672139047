/*!
 * Queue Manager Tests
 * Loading, feedback levels, snapshots and lifecycle validation
 */

use cpu_sim_kernel::{FeedbackLevel, Process, ProcessSpec, ProcessState, QueueManager, SimulationError};
use pretty_assertions::assert_eq;

fn processes(names: &[&str]) -> Vec<Process> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Process::new(i as u32 + 1, i as u32, &ProcessSpec::new(*name, 3)))
        .collect()
}

#[test]
fn test_load_marks_ready_in_order() {
    let queues = QueueManager::new(2, false);
    queues.load(processes(&["A", "B", "C"])).unwrap();

    let snapshot = queues.snapshot();
    assert_eq!(snapshot.ready_names(), vec!["A", "B", "C"]);
    assert!(snapshot.ready.iter().all(|p| p.state == ProcessState::Ready));
    assert!(snapshot.levels.is_none());
    assert_eq!(snapshot.cores.len(), 2);
    assert!(snapshot.cores.iter().all(|c| !c.busy));
    assert_eq!(queues.peek_ready(), Some(1));
    assert!(!queues.all_finished());
    queues.verify_integrity().unwrap();
}

#[test]
fn test_feedback_levels_served_in_order() {
    let queues = QueueManager::new(1, true);
    queues.load(processes(&["A", "B", "C"])).unwrap();

    let snapshot = queues.snapshot();
    let levels = snapshot.levels.unwrap();
    assert_eq!(levels[0].len(), 3);
    assert!(levels[0].iter().all(|p| p.level == FeedbackLevel::Q1));

    let counts = queues.counts();
    assert_eq!(counts.levels, [3, 0, 0]);
    assert_eq!(counts.total(), 3);
}

#[test]
fn test_illegal_transition_rejected() {
    let queues = QueueManager::new(1, false);
    queues.load(processes(&["A"])).unwrap();

    let ready = queues.dequeue_ready().unwrap();
    let err = queues.enqueue_blocked(ready, 2, 1).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidTransition { pid: 1, .. }));
}

#[test]
fn test_dequeue_empties_ready() {
    let queues = QueueManager::new(1, false);
    queues.load(processes(&["A", "B"])).unwrap();

    assert_eq!(queues.dequeue_ready().map(|p| p.pid()), Some(1));
    assert_eq!(queues.dequeue_ready().map(|p| p.pid()), Some(2));
    assert!(queues.dequeue_ready().is_none());
    assert_eq!(queues.peek_ready(), None);
}
