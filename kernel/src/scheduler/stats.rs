/*!
 * Scheduler Statistics
 * Snapshot type for scheduler counters
 */

use super::policy::Policy;
use crate::core::types::WorkUnits;
use serde::Serialize;

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

/// Scheduler statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub policy: Policy,
    pub quantum: WorkUnits,
    pub dispatches: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub preemptions: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub quantum_expirations: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub demotions: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub blocks: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub unblocks: u64,
    pub completions: u64,
    /// Core-ticks spent executing a unit
    pub busy_ticks: u64,
}
