/*!
 * Simulation
 * Kernel Loop, run lifecycle, observers and reporting
 */

mod builder;
mod context;
mod kernel;
mod observer;
mod report;

pub use builder::SimulationBuilder;
pub use context::{KernelHandle, SimulationContext};
pub use kernel::Simulation;
pub use observer::{log_view, ChannelObserver, LogObserver, Observer, SimulationView};
pub use report::{ProcessSummary, SimulationReport, TickSummary};
