//! Event sink system for observability.
//!
//! Every warning logged by a late deployment pass is also recorded as a
//! [`LateDeployEvent`], so hosts and tests can observe failures that never
//! propagate as errors.

mod event;
mod sink;

pub use event::LateDeployEvent;
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
