/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Core (processor) index, 0-based
pub type CoreId = usize;

/// Simulated clock value, counted from 0
pub type Tick = u64;

/// Units of work a process needs (one unit is consumed per tick)
pub type WorkUnits = u32;

/// Priority level (0-10, higher is more important)
pub type Priority = u8;

/// Priority bounds
pub const MIN_PRIORITY: Priority = 0;
pub const MAX_PRIORITY: Priority = 10;
pub const DEFAULT_PRIORITY: Priority = 5;

/// Common result type for simulation operations
pub type SimulationResult<T> = Result<T, super::errors::SimulationError>;
