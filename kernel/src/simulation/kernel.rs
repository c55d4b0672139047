/*!
 * Kernel Loop
 * Drives the clock and coordinates queues, scheduler and core workers
 */

use super::builder::SimulationBuilder;
use super::context::{KernelHandle, SimulationContext};
use super::observer::{Observer, SimulationView};
use super::report::{SimulationReport, TickSummary};
use crate::config::SimulationConfig;
use crate::core::errors::SimulationError;
use crate::core::types::{CoreId, SimulationResult, Tick};
use crate::cpu::{CoreCommand, CoreEvent, CoreHandle, CoreReport};
use crate::queue::QueueManager;
use crate::scheduler::{Policy, Scheduler, TickOutcome};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn};

/// Upper bound on how long a phase waits for every core to report
const REPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// The Kernel Loop of one simulation run
pub struct Simulation {
    context: Arc<SimulationContext>,
    queues: Arc<QueueManager>,
    scheduler: Arc<Scheduler>,
    cores: Vec<CoreHandle>,
    reports: flume::Receiver<CoreReport>,
    observer: Option<Arc<dyn Observer>>,
    halted: bool,
}

impl Simulation {
    pub fn builder(config: SimulationConfig) -> SimulationBuilder {
        SimulationBuilder::new(config)
    }

    pub(super) fn assemble(
        context: Arc<SimulationContext>,
        queues: Arc<QueueManager>,
        scheduler: Arc<Scheduler>,
        cores: Vec<CoreHandle>,
        reports: flume::Receiver<CoreReport>,
        observer: Option<Arc<dyn Observer>>,
    ) -> Self {
        Self {
            context,
            queues,
            scheduler,
            cores,
            reports,
            observer,
            halted: false,
        }
    }

    /// Handle for cancelling this run from another thread
    pub fn handle(&self) -> KernelHandle {
        KernelHandle::new(Arc::clone(&self.context))
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn queues(&self) -> &QueueManager {
        &self.queues
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn cores(&self) -> &[CoreHandle] {
        &self.cores
    }

    pub fn now(&self) -> Tick {
        self.context.now()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Perform exactly one tick without sleeping
    ///
    /// After the kernel has halted this is a no-op reporting the current
    /// tick.
    pub fn step(&mut self) -> SimulationResult<TickSummary> {
        if self.halted {
            return Ok(TickSummary {
                tick: self.now(),
                finished: self.queues.all_finished(),
                ..TickSummary::default()
            });
        }

        let tick = self.context.advance();
        let span = info_span!("tick", run_id = %self.context.run_id(), tick);
        let _enter = span.enter();
        let mut summary = TickSummary {
            tick,
            ..TickSummary::default()
        };

        self.queues.age_ready();

        for (_, event) in self.phase(CoreCommand::Boundary(tick), tick)? {
            if let CoreEvent::Preempted { pid } = event {
                summary.preempted.push(pid);
            }
        }

        for core in 0..self.cores.len() {
            if !self.queues.is_core_free(core) {
                continue;
            }
            if let Some(pid) = self.scheduler.dispatch(core, tick)? {
                summary.dispatched.push((core, pid));
            }
        }

        // Outcomes are applied in core order so same-tick moves land in
        // the queues deterministically
        for (core, event) in self.phase(CoreCommand::Execute(tick), tick)? {
            let CoreEvent::Ran { pid, outcome } = event else {
                continue;
            };
            self.scheduler.apply(core, outcome, tick)?;
            match outcome {
                TickOutcome::Continue => {}
                TickOutcome::Block { .. } => summary.blocked.push(pid),
                TickOutcome::Terminate => summary.completed.push(pid),
                TickOutcome::QuantumExpired => summary.requeued.push(pid),
            }
        }

        summary.unblocked = self.scheduler.resolve_blocked(tick)?;

        if self.scheduler.policy() == Policy::Srt {
            summary.interrupted = self.force_preempt();
        }

        self.queues.verify_integrity()?;
        self.notify(tick)?;

        if self.queues.all_finished() {
            summary.finished = true;
            info!(tick, "All processes terminated");
            self.halt();
        }

        debug!(
            dispatched = summary.dispatched.len(),
            completed = summary.completed.len(),
            blocked = summary.blocked.len(),
            unblocked = summary.unblocked.len(),
            "Tick complete"
        );
        Ok(summary)
    }

    /// Tick until every process terminates or the run is cancelled
    ///
    /// Any error halts the kernel before being returned.
    pub fn run(&mut self) -> SimulationResult<SimulationReport> {
        let span = info_span!("simulation", run_id = %self.context.run_id());
        let _enter = span.enter();
        info!(policy = %self.context.policy(), cores = self.cores.len(), "Simulation started");

        while self.context.is_running() && !self.halted {
            match self.step() {
                Ok(summary) if summary.finished => break,
                Ok(_) => self.context.sleep_tick(),
                Err(e) => {
                    error!(tick = self.now(), error = %e, "Simulation fault");
                    self.halt();
                    return Err(e);
                }
            }
        }

        if !self.halted {
            info!(tick = self.now(), "Simulation cancelled");
            self.halt();
        }
        Ok(self.report())
    }

    /// Interrupt the busy core running the most remaining work, if it
    /// exceeds that of the shortest ready process
    ///
    /// The interrupt is honoured at the next tick boundary.
    pub fn force_preempt(&self) -> Option<CoreId> {
        let core = self
            .scheduler
            .preemption_target(|core| self.cores[core].has_pending_interrupt())?;
        self.cores[core].interrupt();
        debug!(core, "Preemption requested");
        Some(core)
    }

    /// Consistent view of every queue and core
    pub fn view(&self) -> SimulationView {
        SimulationView {
            run_id: self.context.run_id(),
            tick: self.now(),
            policy: self.context.policy(),
            queues: self.queues.snapshot(),
        }
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport::build(&self.context, &self.queues.snapshot(), self.scheduler.stats())
    }

    /// Stop and join every core worker
    pub fn halt(&mut self) {
        if self.halted {
            return;
        }
        self.halted = true;
        self.context.request_stop();
        for core in &mut self.cores {
            core.join();
        }
        info!(tick = self.now(), "Simulation halted");
    }

    fn notify(&self, tick: Tick) -> SimulationResult<()> {
        match &self.observer {
            Some(observer) if observer.is_available() => {
                observer.on_tick(&self.view());
                Ok(())
            }
            _ => {
                warn!(tick, "Observer unavailable");
                Err(SimulationError::ObserverUnavailable { tick })
            }
        }
    }

    /// Send `command` to every core and collect one report from each
    fn phase(&self, command: CoreCommand, tick: Tick) -> SimulationResult<Vec<(CoreId, CoreEvent)>> {
        // Leftovers from a phase abandoned on error
        self.reports.drain().for_each(drop);

        for core in &self.cores {
            core.send(command)?;
        }

        let deadline = Instant::now() + REPORT_TIMEOUT;
        let mut events: Vec<Option<CoreEvent>> = vec![None; self.cores.len()];
        let mut pending = self.cores.len();
        while pending > 0 {
            let report = self.reports.recv_deadline(deadline).map_err(|_| {
                let core = events.iter().position(Option::is_none).unwrap_or_default();
                SimulationError::WorkerLost { core }
            })?;
            if report.tick != tick {
                continue;
            }
            let event = report.event?;
            if let Some(slot) = events.get_mut(report.core) {
                if slot.replace(event).is_none() {
                    pending -= 1;
                }
            }
        }

        Ok(events
            .into_iter()
            .enumerate()
            .filter_map(|(core, event)| event.map(|e| (core, e)))
            .collect())
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.halt();
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("run_id", &self.context.run_id())
            .field("tick", &self.now())
            .field("cores", &self.cores.len())
            .field("halted", &self.halted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessSpec;
    use crate::simulation::ChannelObserver;
    use pretty_assertions::assert_eq;

    fn build(cores: i64, algorithm: &str, specs: Vec<ProcessSpec>) -> (Simulation, flume::Receiver<SimulationView>) {
        let (observer, views) = ChannelObserver::unbounded();
        let config = SimulationConfig::new(cores, algorithm, specs)
            .with_quantum(3)
            .with_tick_duration(Duration::ZERO);
        let sim = Simulation::builder(config).with_observer(observer).build().unwrap();
        (sim, views)
    }

    #[test]
    fn test_step_dispatches_in_core_order() {
        let (mut sim, _views) = build(
            2,
            "fcfs",
            vec![ProcessSpec::new("A", 2), ProcessSpec::new("B", 2), ProcessSpec::new("C", 1)],
        );
        let summary = sim.step().unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.dispatched, vec![(0, 1), (1, 2)]);
        assert_eq!(sim.queues().counts().ready, 1);
    }

    #[test]
    fn test_missing_observer_is_fatal() {
        let config = SimulationConfig::new(1, "fcfs", vec![ProcessSpec::new("A", 3)])
            .with_tick_duration(Duration::ZERO);
        let mut sim = Simulation::builder(config).build().unwrap();
        assert_eq!(sim.step(), Err(SimulationError::ObserverUnavailable { tick: 1 }));
    }

    #[test]
    fn test_step_after_halt_is_noop() {
        let (mut sim, _views) = build(1, "fcfs", vec![ProcessSpec::new("A", 1)]);
        let summary = sim.step().unwrap();
        assert!(summary.finished);
        assert!(sim.is_halted());

        let again = sim.step().unwrap();
        assert_eq!(again.tick, 1);
        assert!(again.dispatched.is_empty());
    }

    #[test]
    fn test_force_preempt_noop_with_idle_core() {
        let (mut sim, _views) = build(2, "srt", vec![ProcessSpec::new("A", 9)]);
        sim.step().unwrap();
        assert_eq!(sim.force_preempt(), None);
    }
}
