/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use super::types::{CoreId, Pid, Priority, Tick};
use crate::process::ProcessState;
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Configuration errors, detected once before the simulation starts
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid core count: {0}")]
    #[diagnostic(
        code(config::invalid_core_count),
        help("At least one core is required.")
    )]
    InvalidCoreCount(i64),

    #[error("Unknown algorithm '{0}'")]
    #[diagnostic(
        code(config::unknown_algorithm),
        help("Valid: fcfs, rr, srt, spn, hrrn, priority, feedback")
    )]
    UnknownAlgorithm(String),

    #[error("Workload is empty")]
    #[diagnostic(
        code(config::empty_workload),
        help("Add at least one process to the workload.")
    )]
    EmptyWorkload,

    #[error("Quantum must be at least one work unit")]
    #[diagnostic(code(config::zero_quantum))]
    ZeroQuantum,

    #[error("Process '{name}' has no work")]
    #[diagnostic(
        code(config::zero_work),
        help("Every process needs at least one work unit.")
    )]
    ZeroWork { name: String },

    #[error("Process '{name}' has an invalid I/O profile")]
    #[diagnostic(
        code(config::invalid_io_profile),
        help("Both `every` and `duration` must be at least 1.")
    )]
    InvalidIoProfile { name: String },

    #[error("Process '{name}' has priority {priority}, outside 0-10")]
    #[diagnostic(
        code(config::invalid_priority),
        help("Priorities range from 0 (lowest) to 10 (highest).")
    )]
    InvalidPriority { name: String, priority: Priority },

    #[error("Process name '{name}' is used more than once")]
    #[diagnostic(code(config::duplicate_process))]
    DuplicateProcess { name: String },

    #[error("Failed to parse configuration: {0}")]
    #[diagnostic(code(config::parse_error))]
    Parse(String),

    #[error("Failed to read configuration: {0}")]
    #[diagnostic(
        code(config::io_error),
        help("Check that the file exists and is readable.")
    )]
    Io(String),
}

/// Unified simulation error type with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Core {core} is busy, cannot assign process {pid}")]
    #[diagnostic(
        code(simulation::assignment_conflict),
        help("Dispatch only targets idle cores. This indicates a kernel bug.")
    )]
    AssignmentConflict { core: CoreId, pid: Pid },

    #[error("No observer available at tick {tick}")]
    #[diagnostic(
        code(simulation::observer_unavailable),
        help("Attach an observer before running, and keep its receiver alive.")
    )]
    ObserverUnavailable { tick: Tick },

    #[error("Invalid state transition for process {pid}: {from:?} -> {to:?}")]
    #[diagnostic(code(simulation::invalid_transition))]
    InvalidTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },

    #[error("Queue integrity violated: {0}")]
    #[diagnostic(
        code(simulation::integrity_violation),
        help("A process was lost or duplicated between queues.")
    )]
    IntegrityViolation(String),

    #[error("Core {core} stopped responding")]
    #[diagnostic(code(simulation::worker_lost))]
    WorkerLost { core: CoreId },

    #[error("Failed to spawn worker for core {core}: {reason}")]
    #[diagnostic(code(simulation::worker_spawn))]
    WorkerSpawn { core: CoreId, reason: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
