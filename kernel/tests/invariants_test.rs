/*!
 * Invariant Tests
 * Property tests over random workloads, policies and core counts
 */

use cpu_sim_kernel::{ChannelObserver, Policy, ProcessSpec, Simulation, SimulationConfig};
use proptest::prelude::*;
use std::time::Duration;

fn spec_strategy() -> impl Strategy<Value = (u32, u8, Option<(u32, u64)>)> {
    (1u32..8, 0u8..=10, proptest::option::of((1u32..4, 1u64..4)))
}

fn workload(raw: Vec<(u32, u8, Option<(u32, u64)>)>) -> Vec<ProcessSpec> {
    raw.into_iter()
        .enumerate()
        .map(|(i, (work, priority, io))| {
            let spec = ProcessSpec::new(format!("P{i}"), work).with_priority(priority);
            match io {
                Some((every, duration)) => spec.with_io(every, duration),
                None => spec,
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_every_process_terminates_once(
        raw in proptest::collection::vec(spec_strategy(), 1..6),
        policy in proptest::sample::select(Policy::ALL.to_vec()),
        cores in 1i64..4,
        quantum in 1u32..5,
    ) {
        let specs = workload(raw);
        let total: usize = specs.len();
        let work: u64 = specs.iter().map(|s| u64::from(s.work)).sum();

        let config = SimulationConfig::new(cores, policy.as_str(), specs)
            .with_quantum(quantum)
            .with_tick_duration(Duration::ZERO);
        let (observer, _views) = ChannelObserver::unbounded();
        let mut sim = Simulation::builder(config).with_observer(observer).build().unwrap();

        let mut finished = false;
        for _ in 0..10_000 {
            let summary = sim.step().unwrap();
            let counts = sim.queues().counts();
            prop_assert_eq!(counts.total(), total);
            prop_assert!(counts.running <= cores as usize);
            if summary.finished {
                finished = true;
                break;
            }
        }
        prop_assert!(finished);

        let report = sim.report();
        prop_assert!(report.completed);
        prop_assert_eq!(report.terminated_order.len(), total);
        prop_assert_eq!(report.stats.busy_ticks, work);
        prop_assert_eq!(report.stats.completions, total as u64);
        for process in &report.processes {
            prop_assert_eq!(process.run_time, u64::from(process.total_work));
        }
    }
}
