//! Run lifecycle events and the bus that fans them out.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEventKind {
    Started,
    Progress,
    Completed,
    Failed,
}

impl fmt::Display for RunEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunEventKind::Started => "started",
            RunEventKind::Progress => "progress",
            RunEventKind::Completed => "completed",
            RunEventKind::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunEvent {
    pub kind: RunEventKind,
    pub run_id: String,
    /// Simulated time in seconds.
    pub timestamp: f64,
    /// Fraction of steps done, in [0, 1].
    pub progress: f64,
    pub message: String,
}

impl RunEvent {
    pub fn new(kind: RunEventKind, run_id: impl Into<String>, timestamp: f64) -> Self {
        Self {
            kind,
            run_id: run_id.into(),
            timestamp,
            progress: 0.0,
            message: String::new(),
        }
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress.clamp(0.0, 1.0);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

pub type EventCallback = Arc<dyn Fn(&RunEvent) + Send + Sync>;

/// Broadcasts run events to subscribers.
///
/// Clones share one subscriber list. Callbacks run on the publishing thread
/// without the list lock held, so a callback may subscribe or publish.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<EventCallback>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&RunEvent) + Send + Sync + 'static,
    {
        self.subscribers.lock().push(Arc::new(callback));
    }

    pub fn publish(&self, event: &RunEvent) {
        let snapshot: Vec<EventCallback> = self.subscribers.lock().clone();
        tracing::trace!(
            kind = %event.kind,
            run_id = %event.run_id,
            subscribers = snapshot.len(),
            "publishing run event"
        );
        for callback in &snapshot {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
