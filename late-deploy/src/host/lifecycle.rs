//! Host lifecycle signals.

use super::HostServer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lifecycle transition reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The component is starting.
    Starting,
    /// The component finished starting.
    Started,
    /// The component is stopping.
    Stopping,
    /// The component has stopped.
    Stopped,
    /// The component failed.
    Failure {
        /// Description of the failure.
        cause: String,
    },
}

impl LifecycleEvent {
    /// Creates a failure event.
    #[must_use]
    pub fn failure(cause: impl Into<String>) -> Self {
        Self::Failure {
            cause: cause.into(),
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::Started => write!(f, "started"),
            Self::Stopping => write!(f, "stopping"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failure { .. } => write!(f, "failure"),
        }
    }
}

/// The component an event is about.
#[derive(Clone, Copy)]
pub enum LifecycleSource<'a> {
    /// The host server itself.
    Server(&'a dyn HostServer),
    /// Any other host component, by name.
    Component(&'a str),
}

impl LifecycleSource<'_> {
    /// Name of the source for diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Server(server) => server.name(),
            Self::Component(name) => name,
        }
    }
}

impl fmt::Debug for LifecycleSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(server) => f.debug_tuple("Server").field(&server.name()).finish(),
            Self::Component(name) => f.debug_tuple("Component").field(name).finish(),
        }
    }
}

/// Receives lifecycle events from the host.
///
/// Hosts may deliver events from any thread.
pub trait LifecycleListener: Send + Sync {
    /// Called for every lifecycle transition of `source`.
    fn lifecycle_event(&self, source: LifecycleSource<'_>, event: &LifecycleEvent);
}
