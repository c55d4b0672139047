/*!
 * Process Module
 * Process records, control blocks and I/O triggers
 */

pub mod pcb;
pub mod record;
pub mod trigger;
pub mod types;

// Re-export public API
pub use pcb::Pcb;
pub use record::Process;
pub use trigger::{IoTrigger, NeverBlock, ProfileTrigger};
pub use types::{FeedbackLevel, IoProfile, ProcessSpec, ProcessState};
