//! The pipeline's single consumer thread
//!
//! Exactly one worker drains the queue, writes each event to the sink, and
//! then dispatches it to matching observers. Single-consumer by design:
//! write order to the sink is the queue's FIFO order, and the sink needs no
//! locking because no other thread ever touches it.

use super::observer::ObserverRegistry;
use super::metrics::PipelineMetrics;
use super::queue::{BoundedQueue, Dequeued};
use super::sink::Sink;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Bounded wait per dequeue attempt, so an idle worker neither busy-spins
/// nor sleeps past a close signal for long.
pub(crate) const DEQUEUE_WAIT: Duration = Duration::from_millis(100);

/// Lifecycle of the worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Created = 0,
    Running = 1,
    /// Queue closed, still consuming what remains
    Draining = 2,
    Stopped = 3,
}

/// Shared, lock-free view of the worker's current state.
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(WorkerState::Created as u8))
    }

    pub(crate) fn set(&self, state: WorkerState) {
        self.0.store(state as u8, Ordering::Release);
    }

    pub(crate) fn get(&self) -> WorkerState {
        match self.0.load(Ordering::Acquire) {
            0 => WorkerState::Created,
            1 => WorkerState::Running,
            2 => WorkerState::Draining,
            _ => WorkerState::Stopped,
        }
    }
}

/// Spawn the consumer thread.
///
/// The loop exits only on a closed-and-empty queue. After the loop the
/// sink is flushed and a completion token is sent so `shutdown` can return
/// knowing every already-submitted event has been fully dispatched.
pub(crate) fn spawn(
    queue: Arc<BoundedQueue>,
    registry: Arc<ObserverRegistry>,
    mut sink: Box<dyn Sink>,
    metrics: Arc<PipelineMetrics>,
    state: Arc<StateCell>,
    done_tx: Sender<()>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("log-pipeline-worker".to_string())
        .spawn(move || {
            state.set(WorkerState::Running);
            loop {
                if state.get() == WorkerState::Running && queue.is_closed() {
                    state.set(WorkerState::Draining);
                }
                match queue.try_dequeue(DEQUEUE_WAIT) {
                    Dequeued::Event(event) => {
                        // Sink write strictly before observer dispatch
                        if let Err(e) = sink.write(&event) {
                            metrics.record_sink_error();
                            eprintln!(
                                "[PIPELINE ERROR] sink '{}' write failed: {}",
                                sink.name(),
                                e
                            );
                        }
                        registry.dispatch(&event);
                        metrics.record_dispatched();
                    }
                    Dequeued::TimedOut => continue,
                    Dequeued::Closed => break,
                }
            }

            if let Err(e) = sink.flush() {
                metrics.record_sink_error();
                eprintln!("[PIPELINE ERROR] sink '{}' flush failed: {}", sink.name(), e);
            }

            state.set(WorkerState::Stopped);
            // Receiver may already be gone if shutdown timed out and the
            // pipeline was dropped; the drain itself still completed.
            let _ = done_tx.send(());
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condition::Condition;
    use crate::core::log_event::LogEvent;
    use crate::core::log_level::LogLevel;
    use crate::core::queue::OverflowPolicy;
    use crate::core::error::Result;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct RecordingSink {
        messages: Arc<Mutex<Vec<String>>>,
        fail_writes: bool,
    }

    impl Sink for RecordingSink {
        fn write(&mut self, event: &LogEvent) -> Result<()> {
            if self.fail_writes {
                return Err(crate::core::error::PipelineError::sink(
                    "recording",
                    "simulated failure",
                ));
            }
            self.messages.lock().push(event.message.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn harness(
        fail_writes: bool,
    ) -> (
        Arc<BoundedQueue>,
        Arc<ObserverRegistry>,
        Arc<PipelineMetrics>,
        Arc<Mutex<Vec<String>>>,
        crossbeam_channel::Receiver<()>,
        JoinHandle<()>,
    ) {
        let metrics = Arc::new(PipelineMetrics::new());
        let queue = Arc::new(BoundedQueue::new(
            16,
            OverflowPolicy::Block,
            Arc::clone(&metrics),
        ));
        let registry = Arc::new(ObserverRegistry::new(8, Arc::clone(&metrics)));
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Box::new(RecordingSink {
            messages: Arc::clone(&messages),
            fail_writes,
        });
        let state = Arc::new(StateCell::new());
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let handle = spawn(
            Arc::clone(&queue),
            Arc::clone(&registry),
            sink,
            Arc::clone(&metrics),
            state,
            done_tx,
        )
        .unwrap();
        (queue, registry, metrics, messages, done_rx, handle)
    }

    #[test]
    fn test_worker_drains_to_empty_before_stopping() {
        let (queue, _registry, metrics, messages, done_rx, handle) = harness(false);

        for i in 0..10 {
            queue.submit(LogEvent::new(LogLevel::Info, format!("event {}", i))).unwrap();
        }
        queue.close();

        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        handle.join().unwrap();

        assert_eq!(messages.lock().len(), 10);
        assert_eq!(metrics.dispatched(), 10);
    }

    #[test]
    fn test_sink_failure_does_not_stop_dispatch() {
        let (queue, registry, metrics, _messages, done_rx, handle) = harness(true);

        let observed = Arc::new(Mutex::new(0u32));
        let observed_clone = Arc::clone(&observed);
        registry
            .subscribe(Condition::any(), Arc::new(move |_| *observed_clone.lock() += 1))
            .unwrap();

        for _ in 0..3 {
            queue.submit(LogEvent::new(LogLevel::Info, "doomed write")).unwrap();
        }
        queue.close();

        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        handle.join().unwrap();

        // Every write failed, yet observers saw every event and the loop
        // kept going
        assert_eq!(metrics.sink_errors(), 3);
        assert_eq!(*observed.lock(), 3);
        assert_eq!(metrics.dispatched(), 3);
    }
}
