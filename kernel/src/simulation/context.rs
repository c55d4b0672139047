/*!
 * Simulation Context
 * Per-run settings, clock and running flag shared by every component
 */

use crate::config::ValidatedConfig;
use crate::core::traits::Stoppable;
use crate::core::types::{Tick, WorkUnits};
use crate::scheduler::Policy;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Granularity at which a tick sleep re-checks the running flag
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Explicit per-run state; created by the builder, dropped with the run
#[derive(Debug)]
pub struct SimulationContext {
    run_id: Uuid,
    policy: Policy,
    quantum: WorkUnits,
    tick_duration: Duration,
    cores: usize,
    running: AtomicBool,
    clock: AtomicU64,
}

impl SimulationContext {
    pub fn new(config: &ValidatedConfig) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            policy: config.policy,
            quantum: config.quantum,
            tick_duration: config.tick_duration,
            cores: config.cores.get(),
            running: AtomicBool::new(false),
            clock: AtomicU64::new(0),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn quantum(&self) -> WorkUnits {
        self.quantum
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    pub fn cores(&self) -> usize {
        self.cores
    }

    /// Current tick; 0 before the first tick
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn advance(&self) -> Tick {
        self.clock.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn start(&self) {
        self.running.store(true, Ordering::Release);
    }

    pub fn request_stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Sleep one tick duration, returning early once stopped
    pub(crate) fn sleep_tick(&self) {
        let deadline = Instant::now() + self.tick_duration;
        while self.is_running() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }
}

/// Clonable handle for cancelling a run from another thread
#[derive(Debug, Clone)]
pub struct KernelHandle {
    context: Arc<SimulationContext>,
}

impl KernelHandle {
    pub(crate) fn new(context: Arc<SimulationContext>) -> Self {
        Self { context }
    }

    pub fn tick(&self) -> Tick {
        self.context.now()
    }
}

impl Stoppable for KernelHandle {
    fn stop(&self) {
        self.context.request_stop();
    }

    fn is_stopped(&self) -> bool {
        !self.context.is_running()
    }
}
