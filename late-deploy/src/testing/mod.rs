//! Testing utilities for hosts embedding the late deployment pass.
//!
//! This module provides:
//! - In-memory server, deployment manager and provider doubles
//! - Scan directory fixtures

mod fixtures;
mod mocks;

pub use fixtures::ScanDirFixture;
pub use mocks::{
    InMemoryDeploymentManager, InMemoryServer, PanickingDeploymentManager,
    ProviderRegistrationClosed, StubWebAppProvider,
};
