/*!
 * Core Module
 * Fundamental simulator types and error handling
 */

pub mod errors;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use traits::*;
pub use types::*;
