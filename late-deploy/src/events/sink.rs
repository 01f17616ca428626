//! Event sink trait and implementations.

use super::LateDeployEvent;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, Level};

/// Receives the events of late deployment passes.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: &LateDeployEvent) {
        self.try_emit(event);
    }

    /// Records an event without blocking.
    ///
    /// Must never fail; problems are logged and suppressed.
    fn try_emit(&self, event: &LateDeployEvent);
}

/// A no-op event sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn try_emit(&self, _event: &LateDeployEvent) {}
}

/// An event sink that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::DEBUG }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates an info-level logging sink.
    #[must_use]
    pub const fn info() -> Self {
        Self::new(Level::INFO)
    }

    fn log_event(&self, event: &LateDeployEvent) {
        let data = serde_json::to_string(event).unwrap_or_default();
        if self.level == Level::INFO {
            info!(event_type = event.name(), event_data = %data, "Event: {}", event.name());
        } else {
            debug!(event_type = event.name(), event_data = %data, "Event: {}", event.name());
        }
    }
}

impl EventSink for LoggingEventSink {
    fn try_emit(&self, event: &LateDeployEvent) {
        self.log_event(event);
    }
}

/// A collecting event sink for tests and diagnostics.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<LateDeployEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<LateDeployEvent> {
        self.events.read().clone()
    }

    /// Returns the names of all collected events, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.read().iter().map(LateDeployEvent::name).collect()
    }

    /// Returns the events that accompany a logged warning.
    #[must_use]
    pub fn warnings(&self) -> Vec<LateDeployEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.is_warning())
            .cloned()
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventSink for CollectingEventSink {
    fn try_emit(&self, event: &LateDeployEvent) {
        self.events.write().push(event.clone());
    }
}
