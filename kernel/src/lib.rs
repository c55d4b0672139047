/*!
 * CPU Scheduling Simulator Kernel
 * Multi-core process scheduling simulation exposed as a library
 */

pub mod config;
pub mod core;
pub mod cpu;
pub mod monitoring;
pub mod process;
pub mod queue;
pub mod scheduler;
pub mod simulation;

// Re-exports
pub use config::{SimulationConfig, ValidatedConfig};
pub use crate::core::{ConfigError, SimulationError, SimulationResult, Stoppable};
pub use cpu::{CoreEvent, CoreHandle, CoreReport};
pub use monitoring::init_tracing;
pub use process::{FeedbackLevel, IoProfile, IoTrigger, NeverBlock, Process, ProcessSpec, ProcessState, ProfileTrigger};
pub use queue::{QueueCounts, QueueManager, QueueSnapshot};
pub use scheduler::{Policy, Scheduler, SchedulerStats, TickOutcome};
pub use simulation::{
    ChannelObserver, KernelHandle, LogObserver, Observer, Simulation, SimulationBuilder, SimulationReport,
    SimulationView, TickSummary,
};
