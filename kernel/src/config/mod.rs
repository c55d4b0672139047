/*!
 * Simulation Configuration
 * Core count, algorithm, quantum, tick duration and the initial workload
 */

use crate::core::errors::ConfigError;
use crate::core::types::{WorkUnits, MAX_PRIORITY, MIN_PRIORITY};
use crate::process::ProcessSpec;
use crate::scheduler::Policy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_QUANTUM: WorkUnits = 4;
pub const DEFAULT_TICK_MS: u64 = 100;

fn default_quantum() -> WorkUnits {
    DEFAULT_QUANTUM
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

/// Raw configuration as supplied by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    pub cores: i64,
    pub algorithm: String,
    #[serde(default = "default_quantum")]
    pub quantum: WorkUnits,
    #[serde(default = "default_tick_ms")]
    pub tick_duration_ms: u64,
    pub processes: Vec<ProcessSpec>,
}

/// Configuration that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub cores: NonZeroUsize,
    pub policy: Policy,
    pub quantum: WorkUnits,
    pub tick_duration: Duration,
    pub processes: Vec<ProcessSpec>,
}

impl SimulationConfig {
    pub fn new(cores: i64, algorithm: impl Into<String>, processes: Vec<ProcessSpec>) -> Self {
        Self {
            cores,
            algorithm: algorithm.into(),
            quantum: DEFAULT_QUANTUM,
            tick_duration_ms: DEFAULT_TICK_MS,
            processes,
        }
    }

    #[must_use]
    pub fn with_quantum(mut self, quantum: WorkUnits) -> Self {
        self.quantum = quantum;
        self
    }

    #[must_use]
    pub fn with_tick_duration(mut self, duration: Duration) -> Self {
        self.tick_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check every startup precondition
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let cores = usize::try_from(self.cores)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(ConfigError::InvalidCoreCount(self.cores))?;

        let policy: Policy = self.algorithm.parse()?;

        if self.processes.is_empty() {
            return Err(ConfigError::EmptyWorkload);
        }
        if policy.uses_quantum() && self.quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }

        let mut names = HashSet::with_capacity(self.processes.len());
        for spec in &self.processes {
            if spec.work == 0 {
                return Err(ConfigError::ZeroWork {
                    name: spec.name.clone(),
                });
            }
            if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&spec.priority) {
                return Err(ConfigError::InvalidPriority {
                    name: spec.name.clone(),
                    priority: spec.priority,
                });
            }
            if spec.io.is_some_and(|io| !io.is_valid()) {
                return Err(ConfigError::InvalidIoProfile {
                    name: spec.name.clone(),
                });
            }
            if !names.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateProcess {
                    name: spec.name.clone(),
                });
            }
        }

        Ok(ValidatedConfig {
            cores,
            policy,
            quantum: self.quantum,
            tick_duration: Duration::from_millis(self.tick_duration_ms),
            processes: self.processes.clone(),
        })
    }

    /// Built-in mixed CPU/I-O workload
    pub fn demo() -> Self {
        Self::new(
            2,
            "feedback",
            vec![
                ProcessSpec::new("editor", 12).with_io(3, 2),
                ProcessSpec::new("compiler", 20).with_priority(3),
                ProcessSpec::new("shell", 4).with_priority(8),
                ProcessSpec::new("backup", 15).with_io(5, 4).with_priority(1),
                ProcessSpec::new("daemon", 6),
            ],
        )
    }
}
