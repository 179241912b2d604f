use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    error::{Result, TraceError},
    events::Entry,
    sinks::Sink,
};

/// Callback for failures that happen on the writer task. The entry is `None`
/// when a flush fails, since a flush covers every entry written before it.
pub type ErrorHandler = Arc<dyn Fn(Option<&Entry>, &TraceError) + Send + Sync>;

/// Hands entries to a single background writer over a bounded FIFO queue.
///
/// Producers block (or await) when the queue is full; nothing is dropped.
/// Write and flush failures go to the error handler instead of the producer.
/// The inner sink is flushed whenever the queue runs empty, so buffered output
/// and its failures surface without waiting for stop.
pub struct AsyncSink {
    tx: Mutex<Option<mpsc::Sender<Entry>>>,
    worker: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl AsyncSink {
    /// Spawns the writer on Tokio's blocking pool. Must be called from within
    /// a Tokio runtime.
    pub fn start<S, H>(sink: S, capacity: usize, on_error: H) -> Self
    where
        S: Sink + 'static,
        H: Fn(Option<&Entry>, &TraceError) + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel::<Entry>(capacity.max(1));
        let on_error: ErrorHandler = Arc::new(on_error);
        let worker = tokio::task::spawn_blocking(move || drain(rx, sink, on_error));
        tracing::debug!(capacity, "async sink started");

        Self {
            tx: Mutex::new(Some(tx)),
            worker: tokio::sync::Mutex::new(Some(worker)),
        }
    }

    fn sender(&self) -> Result<mpsc::Sender<Entry>> {
        self.tx.lock().clone().ok_or(TraceError::SinkClosed)
    }

    /// Enqueues an entry, waiting for room when the queue is full.
    pub async fn write(&self, entry: Entry) -> Result<()> {
        self.sender()?
            .send(entry)
            .await
            .map_err(|_| TraceError::SinkClosed)
    }

    /// Enqueues an entry from synchronous code, blocking the thread while the
    /// queue is full. Panics if called from an async context.
    pub fn blocking_write(&self, entry: Entry) -> Result<()> {
        self.sender()?
            .blocking_send(entry)
            .map_err(|_| TraceError::SinkClosed)
    }

    /// Stops accepting entries and waits until every queued entry has been
    /// written or handed to the error handler, and the final flush is done.
    ///
    /// Safe to call more than once, including concurrently; every call returns
    /// only after the drain has finished.
    pub async fn stop(&self) {
        drop(self.tx.lock().take());

        let mut worker = self.worker.lock().await;
        if let Some(handle) = worker.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "async sink writer panicked");
            }
            tracing::debug!("async sink stopped");
        }
    }
}

// The channel only closes once it is empty, so the last entry is always
// followed by a flush.
fn drain<S: Sink>(mut rx: mpsc::Receiver<Entry>, sink: S, on_error: ErrorHandler) {
    while let Some(entry) = rx.blocking_recv() {
        if let Err(e) = sink.write(&entry) {
            tracing::warn!(id = %entry.id(), error = %e, "async write failed");
            on_error(Some(&entry), &e);
        }
        if rx.is_empty() {
            if let Err(e) = sink.flush() {
                tracing::warn!(error = %e, "async sink flush failed");
                on_error(None, &e);
            }
        }
    }
}
