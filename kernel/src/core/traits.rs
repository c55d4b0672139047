/*!
 * Core Traits
 * Capabilities shared between the kernel loop and its core workers
 */

/// Something that can be told to stop
///
/// Stopping is cooperative and permanent: the target observes the request
/// at its next check and does not resume.
pub trait Stoppable: Send + Sync {
    fn stop(&self);

    fn is_stopped(&self) -> bool;
}
