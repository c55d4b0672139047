/*!
 * Observers
 * Display collaborators notified once per tick with a consistent view
 */

use crate::core::types::Tick;
use crate::queue::QueueSnapshot;
use crate::scheduler::Policy;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Everything a display needs for one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationView {
    pub run_id: Uuid,
    pub tick: Tick,
    pub policy: Policy,
    #[serde(flatten)]
    pub queues: QueueSnapshot,
}

/// Per-tick observer
///
/// Must not block and must not touch simulation state.
pub trait Observer: Send + Sync {
    fn on_tick(&self, view: &SimulationView);

    /// Whether the observer can still receive updates
    fn is_available(&self) -> bool {
        true
    }
}

/// Logs queue sizes and core assignments every tick
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_tick(&self, view: &SimulationView) {
        log_view(view);
    }
}

/// Render a view through tracing
pub fn log_view(view: &SimulationView) {
    let queues = &view.queues;
    match &queues.levels {
        Some([q1, q2, q3]) => info!(
            tick = view.tick,
            q1 = q1.len(),
            q2 = q2.len(),
            q3 = q3.len(),
            blocked = queues.blocked.len(),
            terminated = queues.terminated.len(),
            "Clock cycle"
        ),
        None => info!(
            tick = view.tick,
            ready = queues.ready.len(),
            blocked = queues.blocked.len(),
            terminated = queues.terminated.len(),
            "Clock cycle"
        ),
    }

    for core in &queues.cores {
        match &core.process {
            Some(process) => info!(
                core = core.core,
                process = %process.name,
                remaining = process.remaining,
                "Core busy"
            ),
            None => info!(core = core.core, "Core idle"),
        }
    }
}

/// Forwards views over a channel without ever blocking the kernel
///
/// Becomes unavailable once the receiving side is dropped.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: flume::Sender<SimulationView>,
}

impl ChannelObserver {
    pub fn unbounded() -> (Self, flume::Receiver<SimulationView>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }

    /// Views arriving while the channel is full are dropped
    pub fn bounded(capacity: usize) -> (Self, flume::Receiver<SimulationView>) {
        let (sender, receiver) = flume::bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl Observer for ChannelObserver {
    fn on_tick(&self, view: &SimulationView) {
        let _ = self.sender.try_send(view.clone());
    }

    fn is_available(&self) -> bool {
        !self.sender.is_disconnected()
    }
}
