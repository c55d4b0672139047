/*!
 * CPU Module
 * Core workers: one thread per simulated processor
 */

mod command;
mod handle;
mod worker;

pub(crate) use command::CoreCommand;
pub use command::{CoreEvent, CoreReport};
pub use handle::CoreHandle;
