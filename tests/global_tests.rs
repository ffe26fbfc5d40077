//! Lifecycle test for the process-wide pipeline instance
//!
//! Kept in a single test function: the global slot is process state, and
//! parallel tests would race on it.

use log_pipeline::core::error::PipelineError;
use log_pipeline::global;
use log_pipeline::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct NullSink;

impl Sink for NullSink {
    fn write(&mut self, _event: &LogEvent) -> log_pipeline::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> log_pipeline::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

#[test]
fn test_global_init_get_shutdown_cycle() {
    // Nothing installed yet
    assert!(global::get().is_none());
    global::shutdown(Duration::from_secs(1)).unwrap();

    let pipeline = Pipeline::builder().sink(NullSink).build().unwrap();
    let handle = global::init(pipeline).unwrap();

    // Second init is rejected until the first is shut down
    let second = Pipeline::builder().sink(NullSink).build().unwrap();
    assert!(matches!(
        global::init(second),
        Err(PipelineError::AlreadyInitialized)
    ));

    // The installed instance is reachable and usable from call sites
    let seen = Arc::new(Mutex::new(0u32));
    let seen_clone = Arc::clone(&seen);
    handle
        .subscribe(Condition::any(), Arc::new(move |_| *seen_clone.lock() += 1))
        .unwrap();

    let site = global::get().expect("global pipeline installed");
    site.info("from a call site").unwrap();

    global::shutdown(Duration::from_secs(5)).unwrap();
    assert!(global::get().is_none());
    assert_eq!(*seen.lock(), 1);

    // Slot is free again after shutdown
    let replacement = Pipeline::builder().sink(NullSink).build().unwrap();
    global::init(replacement).unwrap();
    global::shutdown(Duration::from_secs(5)).unwrap();
}
