//! # Late Deploy
//!
//! Deferred deployment of web applications into a host server that has
//! already finished starting.
//!
//! A scan directory is listed once, after the host reports that it has
//! started. Its `.war` packages and `.xml` descriptors are paired by
//! basename, so that a descriptor overrides the package it sits next to,
//! and the resulting applications are handed to the host's existing
//! deployment manager:
//!
//! - **Resolution**: a sorted, deduplicated sequence of deployables
//! - **One-shot trigger**: the pass runs on the first started event only
//! - **Contained failures**: nothing from the pass reaches host startup
//! - **Event-driven observability**: every pass step is reported to an event sink
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use late_deploy::prelude::*;
//! use std::sync::Arc;
//!
//! let trigger = Arc::new(DeploymentTrigger::new(LateDeployConfig::from_env()?));
//! server.add_listener(trigger);
//! server.start();
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod deploy;
pub mod errors;
pub mod events;
pub mod host;
pub mod observability;
pub mod resolver;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::LateDeployConfig;
    pub use crate::core::{
        basename, extension, matches_extension, ArtifactKind, DeployableArtifact,
        DeployableSequence,
    };
    pub use crate::deploy::{
        DeploymentReport, DeploymentTrigger, LateDeployProvider, LateDeploymentRegistrar,
        PassOutcome,
    };
    pub use crate::errors::{
        ConfigError, LateDeployError, ManagerUnavailableError, RegistrationError, ScanError,
    };
    pub use crate::events::{EventSink, LateDeployEvent, LoggingEventSink, NoOpEventSink};
    pub use crate::host::{
        App, AppProvider, DeploymentManager, HostComponent, HostServer, LifecycleEvent,
        LifecycleListener, LifecycleSource,
    };
    pub use crate::observability::init_tracing;
    pub use crate::resolver::DeployableResolver;
    pub use crate::utils::{generate_uuid, iso_timestamp, Timestamp};
}
