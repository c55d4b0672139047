/*!
 * Process Types
 * States, feedback levels and workload descriptions
 */

use crate::core::types::{Priority, Tick, WorkUnits, DEFAULT_PRIORITY};
use serde::{Deserialize, Serialize};

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Loaded but not yet queued
    New,
    /// Waiting in a ready queue
    Ready,
    /// Owned by a core
    Running,
    /// Waiting on simulated I/O
    Blocked,
    /// Finished all of its work
    Terminated,
}

impl ProcessState {
    /// Whether moving from `self` to `to` is a legal lifecycle step
    #[inline]
    #[must_use]
    pub const fn can_transition_to(self, to: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, to),
            (New, Ready)
                | (Ready, Running)
                | (Running, Ready)
                | (Running, Blocked)
                | (Running, Terminated)
                | (Blocked, Ready)
        )
    }
}

/// Multilevel feedback queue level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeedbackLevel {
    #[default]
    Q1,
    Q2,
    Q3,
}

impl FeedbackLevel {
    pub const ALL: [FeedbackLevel; 3] = [FeedbackLevel::Q1, FeedbackLevel::Q2, FeedbackLevel::Q3];

    /// Next lower level; Q3 is the floor
    #[inline]
    #[must_use]
    pub const fn demote(self) -> Self {
        match self {
            Self::Q1 => Self::Q2,
            Self::Q2 | Self::Q3 => Self::Q3,
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            Self::Q1 => 0,
            Self::Q2 => 1,
            Self::Q3 => 2,
        }
    }
}

/// I/O behaviour of a process: after every `every` executed units it
/// blocks for `duration` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoProfile {
    pub every: WorkUnits,
    pub duration: Tick,
}

impl IoProfile {
    #[must_use]
    pub const fn new(every: WorkUnits, duration: Tick) -> Self {
        Self { every, duration }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.every > 0 && self.duration > 0
    }
}

/// Workload entry describing a process to load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessSpec {
    pub name: String,
    pub work: WorkUnits,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io: Option<IoProfile>,
}

fn default_priority() -> Priority {
    DEFAULT_PRIORITY
}

impl ProcessSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, work: WorkUnits) -> Self {
        Self {
            name: name.into(),
            work,
            priority: DEFAULT_PRIORITY,
            io: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_io(mut self, every: WorkUnits, duration: Tick) -> Self {
        self.io = Some(IoProfile::new(every, duration));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        use ProcessState::*;
        assert!(New.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Running));
        assert!(Running.can_transition_to(Blocked));
        assert!(Blocked.can_transition_to(Ready));
        assert!(!Blocked.can_transition_to(Running));
        assert!(!Terminated.can_transition_to(Ready));
        assert!(!New.can_transition_to(Running));
    }

    #[test]
    fn test_demotion_floors_at_q3() {
        assert_eq!(FeedbackLevel::Q1.demote(), FeedbackLevel::Q2);
        assert_eq!(FeedbackLevel::Q2.demote(), FeedbackLevel::Q3);
        assert_eq!(FeedbackLevel::Q3.demote(), FeedbackLevel::Q3);
    }

    #[test]
    fn test_new_processes_start_at_q1() {
        assert_eq!(FeedbackLevel::default(), FeedbackLevel::Q1);
    }

    #[test]
    fn test_spec_defaults_from_json() {
        let spec: ProcessSpec = serde_json::from_str(r#"{"name":"A","work":5}"#).unwrap();
        assert_eq!(spec, ProcessSpec::new("A", 5));
    }
}
