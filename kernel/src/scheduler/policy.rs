/*!
 * Scheduling Policies
 * Dispatch policy identifiers and their properties
 */

use crate::core::errors::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Dispatch policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// First come, first served
    Fcfs,
    /// FIFO capped at one quantum per dispatch
    RoundRobin,
    /// Preemptive shortest remaining time
    Srt,
    /// Non-preemptive shortest process next
    Spn,
    /// Highest response ratio next
    Hrrn,
    /// Highest priority first
    Priority,
    /// Three-level multilevel feedback queue
    Feedback,
}

impl Policy {
    pub const ALL: [Policy; 7] = [
        Policy::Fcfs,
        Policy::RoundRobin,
        Policy::Srt,
        Policy::Spn,
        Policy::Hrrn,
        Policy::Priority,
        Policy::Feedback,
    ];

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::RoundRobin => "round_robin",
            Self::Srt => "srt",
            Self::Spn => "spn",
            Self::Hrrn => "hrrn",
            Self::Priority => "priority",
            Self::Feedback => "feedback",
        }
    }

    /// Dispatches are capped at one quantum
    #[inline(always)]
    pub const fn uses_quantum(&self) -> bool {
        matches!(self, Self::RoundRobin | Self::Feedback)
    }

    #[inline(always)]
    pub const fn is_feedback(&self) -> bool {
        matches!(self, Self::Feedback)
    }

    /// Running processes can be interrupted by a shorter ready one
    #[inline(always)]
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::Srt)
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "rr" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "srt" => Ok(Self::Srt),
            "spn" | "sjf" => Ok(Self::Spn),
            "hrrn" => Ok(Self::Hrrn),
            "priority" | "prio" => Ok(Self::Priority),
            "feedback" | "mlfq" => Ok(Self::Feedback),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Policy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("RR".parse::<Policy>().unwrap(), Policy::RoundRobin);
        assert_eq!("Feedback".parse::<Policy>().unwrap(), Policy::Feedback);
        assert_eq!("mlfq".parse::<Policy>().unwrap(), Policy::Feedback);
        assert_eq!(" srt ".parse::<Policy>().unwrap(), Policy::Srt);
        assert_eq!(
            "lottery".parse::<Policy>(),
            Err(ConfigError::UnknownAlgorithm("lottery".into()))
        );
    }

    #[test]
    fn test_as_str_round_trips() {
        for policy in Policy::ALL {
            assert_eq!(policy.as_str().parse::<Policy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_quantum_policies() {
        assert!(Policy::RoundRobin.uses_quantum());
        assert!(Policy::Feedback.uses_quantum());
        assert!(!Policy::Fcfs.uses_quantum());
        assert!(!Policy::Srt.uses_quantum());
    }
}
