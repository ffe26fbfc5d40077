//! Sink trait for event destinations

use super::{error::Result, log_event::LogEvent};

/// Destination that durably records events.
///
/// A sink is owned and driven exclusively by the worker thread, so it needs
/// `Send` but never `Sync`; implementations do not need internal locking.
/// Write and flush failures are absorbed by the worker (counted and
/// reported), never propagated to producers.
pub trait Sink: Send {
    fn write(&mut self, event: &LogEvent) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
