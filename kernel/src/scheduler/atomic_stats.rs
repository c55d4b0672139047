/*!
 * Lock-Free Scheduler Statistics
 * Uses atomic counters so cores can record events without touching the queue lock
 */

use super::policy::Policy;
use super::stats::SchedulerStats;
use crate::core::types::WorkUnits;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic scheduler statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing between core threads
/// - All operations use relaxed ordering; counters are independent
#[repr(C, align(64))]
pub struct AtomicSchedulerStats {
    dispatches: AtomicU64,
    preemptions: AtomicU64,
    quantum_expirations: AtomicU64,
    demotions: AtomicU64,
    blocks: AtomicU64,
    unblocks: AtomicU64,
    completions: AtomicU64,
    busy_ticks: AtomicU64,
    policy: Policy,
    quantum: WorkUnits,
}

impl AtomicSchedulerStats {
    #[inline]
    pub fn new(policy: Policy, quantum: WorkUnits) -> Self {
        Self {
            dispatches: AtomicU64::new(0),
            preemptions: AtomicU64::new(0),
            quantum_expirations: AtomicU64::new(0),
            demotions: AtomicU64::new(0),
            blocks: AtomicU64::new(0),
            unblocks: AtomicU64::new(0),
            completions: AtomicU64::new(0),
            busy_ticks: AtomicU64::new(0),
            policy,
            quantum,
        }
    }

    #[inline(always)]
    pub fn inc_dispatches(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_quantum_expirations(&self) {
        self.quantum_expirations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_demotions(&self) {
        self.demotions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_blocks(&self) {
        self.blocks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn add_unblocks(&self, count: u64) {
        self.unblocks.fetch_add(count, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_completions(&self) {
        self.completions.fetch_add(1, Ordering::Relaxed);
    }

    /// Hot path - called by every busy core on every tick
    #[inline(always)]
    pub fn inc_busy_ticks(&self) {
        self.busy_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats
    ///
    /// # Note
    /// Counter values may not be perfectly consistent with each other while
    /// cores are mid-tick, but each individual value is accurate.
    #[inline]
    pub fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            policy: self.policy,
            quantum: self.quantum,
            dispatches: self.dispatches.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            quantum_expirations: self.quantum_expirations.load(Ordering::Relaxed),
            demotions: self.demotions.load(Ordering::Relaxed),
            blocks: self.blocks.load(Ordering::Relaxed),
            unblocks: self.unblocks.load(Ordering::Relaxed),
            completions: self.completions.load(Ordering::Relaxed),
            busy_ticks: self.busy_ticks.load(Ordering::Relaxed),
        }
    }
}
