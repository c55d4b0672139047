/*!
 * Scheduler Tests
 * End-to-end runs of each dispatch policy on simulated cores
 */

use cpu_sim_kernel::{
    ChannelObserver, Policy, Process, ProcessSpec, Simulation, SimulationConfig, SimulationView, TickSummary,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn simulation(
    cores: i64,
    algorithm: &str,
    quantum: u32,
    specs: Vec<ProcessSpec>,
) -> (Simulation, flume::Receiver<SimulationView>) {
    let config = SimulationConfig::new(cores, algorithm, specs)
        .with_quantum(quantum)
        .with_tick_duration(Duration::ZERO);
    let (observer, views) = ChannelObserver::unbounded();
    let sim = Simulation::builder(config)
        .with_observer(observer)
        .build()
        .unwrap();
    (sim, views)
}

/// Step until every process terminates, returning each tick's summary
fn drive(sim: &mut Simulation) -> Vec<TickSummary> {
    let mut ticks = Vec::new();
    for _ in 0..1_000 {
        let summary = sim.step().unwrap();
        let finished = summary.finished;
        ticks.push(summary);
        if finished {
            return ticks;
        }
    }
    panic!("simulation did not finish");
}

fn names(specs: &[(&str, u32)]) -> Vec<ProcessSpec> {
    specs.iter().map(|(name, work)| ProcessSpec::new(*name, *work)).collect()
}

#[test]
fn test_round_robin_two_cores() {
    let (mut sim, _views) = simulation(2, "rr", 3, names(&[("A", 5), ("B", 2)]));
    let ticks = drive(&mut sim);

    assert_eq!(ticks.len(), 5);
    assert_eq!(ticks[0].dispatched, vec![(0, 1), (1, 2)]);
    assert_eq!(ticks[1].completed, vec![2]);
    assert_eq!(ticks[2].requeued, vec![1]);
    assert_eq!(ticks[3].dispatched, vec![(0, 1)]);
    assert_eq!(ticks[4].completed, vec![1]);
    assert_eq!(sim.queues().terminated_order(), vec!["B", "A"]);
}

#[test]
fn test_same_tick_outcomes_applied_in_core_order() {
    let specs: Vec<ProcessSpec> = (0..6).map(|i| ProcessSpec::new(format!("P{i}"), 3)).collect();

    for _ in 0..20 {
        let (mut sim, _views) = simulation(4, "rr", 1, specs.clone());

        let first = sim.step().unwrap();
        assert_eq!(first.requeued, vec![1, 2, 3, 4]);
        assert_eq!(
            sim.queues().snapshot().ready_names(),
            vec!["P4", "P5", "P0", "P1", "P2", "P3"]
        );

        let ticks = drive(&mut sim);
        assert_eq!(ticks.len(), 4);
        assert_eq!(ticks[2].completed, vec![1, 2, 3, 4]);
        assert_eq!(
            sim.queues().terminated_order(),
            vec!["P0", "P1", "P2", "P3", "P4", "P5"]
        );
    }
}

#[test]
fn test_feedback_demotes_long_process() {
    let (mut sim, views) = simulation(1, "feedback", 4, names(&[("C", 10)]));
    let ticks = drive(&mut sim);

    assert_eq!(ticks.len(), 10);
    assert_eq!(ticks[3].requeued, vec![1]);
    assert_eq!(ticks[7].requeued, vec![1]);
    assert!(ticks[9].finished);
    assert_eq!(sim.scheduler().stats().demotions, 2);

    let views: Vec<SimulationView> = views.try_iter().collect();
    let level_sizes = |tick: usize| {
        let levels = views[tick - 1].queues.levels.as_ref().unwrap();
        [levels[0].len(), levels[1].len(), levels[2].len()]
    };
    assert_eq!(level_sizes(4), [0, 1, 0]);
    assert_eq!(level_sizes(8), [0, 0, 1]);
}

#[test]
fn test_fcfs_runs_to_completion_in_order() {
    let (mut sim, _views) = simulation(1, "fcfs", 1, names(&[("A", 3), ("B", 1), ("C", 2)]));
    let ticks = drive(&mut sim);

    assert_eq!(ticks.len(), 6);
    assert!(ticks.iter().all(|t| t.requeued.is_empty()));
    assert_eq!(sim.queues().terminated_order(), vec!["A", "B", "C"]);
}

#[test]
fn test_priority_runs_highest_first() {
    let specs = vec![
        ProcessSpec::new("low", 2).with_priority(1),
        ProcessSpec::new("high", 2).with_priority(9),
        ProcessSpec::new("mid", 2).with_priority(5),
    ];
    let (mut sim, _views) = simulation(1, "priority", 4, specs);
    drive(&mut sim);
    assert_eq!(sim.queues().terminated_order(), vec!["high", "mid", "low"]);
}

#[test]
fn test_spn_runs_shortest_job_first() {
    let (mut sim, _views) = simulation(1, "spn", 4, names(&[("long", 6), ("short", 1), ("medium", 3)]));
    drive(&mut sim);
    assert_eq!(sim.queues().terminated_order(), vec!["short", "medium", "long"]);
}

#[test]
fn test_srt_preempts_longer_process() {
    let specs = vec![ProcessSpec::new("S", 2).with_io(1, 1), ProcessSpec::new("L", 6)];
    let (mut sim, _views) = simulation(1, "srt", 4, specs);
    let ticks = drive(&mut sim);

    // S blocks after its first unit, L takes the core
    assert_eq!(ticks[0].blocked, vec![1]);
    assert_eq!(ticks[1].dispatched, vec![(0, 2)]);
    // S is back with 1 unit left while L has 5: L's core is interrupted
    assert_eq!(ticks[1].unblocked, vec![1]);
    assert_eq!(ticks[1].interrupted, Some(0));
    // honoured at the next boundary
    assert_eq!(ticks[2].preempted, vec![2]);
    assert_eq!(ticks[2].dispatched, vec![(0, 1)]);
    assert_eq!(ticks[2].completed, vec![1]);

    assert_eq!(ticks.len(), 8);
    assert_eq!(sim.queues().terminated_order(), vec!["S", "L"]);
    assert_eq!(sim.scheduler().stats().preemptions, 1);
    assert_eq!(sim.scheduler().policy(), Policy::Srt);
}

#[test]
fn test_blocked_process_returns_after_duration() {
    let specs = vec![ProcessSpec::new("A", 4).with_io(2, 2), ProcessSpec::new("B", 1)];
    let (mut sim, _views) = simulation(1, "fcfs", 4, specs);
    let ticks = drive(&mut sim);

    assert_eq!(ticks[1].blocked, vec![1]);
    assert_eq!(ticks[2].dispatched, vec![(0, 2)]);
    assert!(ticks[2].unblocked.is_empty());
    assert_eq!(ticks[3].unblocked, vec![1]);
    assert_eq!(ticks[4].dispatched, vec![(0, 1)]);
    assert_eq!(ticks.len(), 6);
    assert_eq!(sim.queues().terminated_order(), vec!["B", "A"]);

    let stats = sim.scheduler().stats();
    assert_eq!(stats.blocks, 1);
    assert_eq!(stats.unblocks, 1);
}

#[test]
fn test_custom_io_trigger() {
    let config = SimulationConfig::new(1, "fcfs", names(&[("A", 3)])).with_tick_duration(Duration::ZERO);
    let (observer, _views) = ChannelObserver::unbounded();
    let mut sim = Simulation::builder(config)
        .with_observer(observer)
        .with_io_trigger(|_: &Process, tick: u64| -> Option<u64> { (tick == 1).then_some(1) })
        .build()
        .unwrap();

    let first = sim.step().unwrap();
    assert_eq!(first.blocked, vec![1]);
    let second = sim.step().unwrap();
    assert_eq!(second.unblocked, vec![1]);
    let ticks = drive(&mut sim);
    assert_eq!(ticks.len(), 2);
}
