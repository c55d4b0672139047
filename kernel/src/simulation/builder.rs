/*!
 * Simulation Builder
 * Validates configuration and wires the kernel, queues, scheduler and cores
 */

use super::context::SimulationContext;
use super::kernel::Simulation;
use super::observer::Observer;
use crate::config::SimulationConfig;
use crate::core::types::SimulationResult;
use crate::cpu::CoreHandle;
use crate::process::{IoTrigger, Process, ProfileTrigger};
use crate::queue::QueueManager;
use crate::scheduler::Scheduler;
use std::sync::Arc;
use tracing::info;

/// Builder for Simulation
pub struct SimulationBuilder {
    config: SimulationConfig,
    observer: Option<Arc<dyn Observer>>,
    trigger: Option<Arc<dyn IoTrigger>>,
}

impl SimulationBuilder {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            observer: None,
            trigger: None,
        }
    }

    /// Attach the per-tick observer
    pub fn with_observer(self, observer: impl Observer + 'static) -> Self {
        self.with_shared_observer(Arc::new(observer))
    }

    pub fn with_shared_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replace the I/O trigger (defaults to each process's I/O profile)
    pub fn with_io_trigger(mut self, trigger: impl IoTrigger + 'static) -> Self {
        self.trigger = Some(Arc::new(trigger));
        self
    }

    /// Validate, load the workload and spawn one worker per core
    ///
    /// Configuration errors surface here, before any tick runs.
    pub fn build(self) -> SimulationResult<Simulation> {
        let config = self.config.validate()?;
        let context = Arc::new(SimulationContext::new(&config));
        let cores = context.cores();
        let policy = context.policy();

        let queues = Arc::new(QueueManager::new(cores, policy.is_feedback()));
        let processes = config
            .processes
            .iter()
            .enumerate()
            .map(|(i, spec)| Process::new(i as u32 + 1, i as u32, spec))
            .collect();
        queues.load(processes)?;

        let custom_trigger = self.trigger.is_some();
        let trigger = self.trigger.unwrap_or_else(|| Arc::new(ProfileTrigger));
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&queues),
            policy,
            context.quantum(),
            trigger,
        ));

        let (report_tx, report_rx) = flume::unbounded();
        let handles = (0..cores)
            .map(|id| CoreHandle::spawn(id, Arc::clone(&scheduler), report_tx.clone()))
            .collect::<SimulationResult<Vec<_>>>()?;

        let mut features = vec![policy.as_str()];
        if policy.uses_quantum() {
            features.push("quantum");
        }
        if policy.is_preemptive() {
            features.push("preemption");
        }
        if custom_trigger {
            features.push("custom-io");
        }
        if self.observer.is_some() {
            features.push("observer");
        }
        info!(
            run_id = %context.run_id(),
            cores,
            processes = config.processes.len(),
            "Simulation initialized with: {}",
            features.join(", ")
        );

        context.start();
        Ok(Simulation::assemble(context, queues, scheduler, handles, report_rx, self.observer))
    }
}
