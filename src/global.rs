//! Process-wide pipeline instance
//!
//! Explicit `init`/`shutdown` lifecycle instead of a lazily-created
//! singleton, so startup and teardown order is under the caller's control
//! and testable. Call sites that want convenience go through [`get`] or
//! the crate macros; everything else should hold its own `Pipeline`.

use crate::core::error::{PipelineError, Result};
use crate::core::pipeline::Pipeline;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

static GLOBAL: RwLock<Option<Arc<Pipeline>>> = RwLock::new(None);

/// Install `pipeline` as the process-wide instance.
///
/// Fails with [`PipelineError::AlreadyInitialized`] if one is already
/// installed; shut the previous one down first.
pub fn init(pipeline: Pipeline) -> Result<Arc<Pipeline>> {
    let mut global = GLOBAL.write();
    if global.is_some() {
        return Err(PipelineError::AlreadyInitialized);
    }
    let pipeline = Arc::new(pipeline);
    *global = Some(Arc::clone(&pipeline));
    Ok(pipeline)
}

/// The process-wide pipeline, if one has been installed.
pub fn get() -> Option<Arc<Pipeline>> {
    GLOBAL.read().clone()
}

/// Shut down and uninstall the process-wide pipeline.
///
/// Returns `Ok` when no instance is installed, so teardown paths need no
/// init/no-init bookkeeping.
pub fn shutdown(timeout: Duration) -> Result<()> {
    let taken = GLOBAL.write().take();
    match taken {
        Some(pipeline) => pipeline.shutdown(timeout),
        None => Ok(()),
    }
}
