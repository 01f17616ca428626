//! Interfaces of the host server this crate plugs into.
//!
//! The host's lifecycle, deployment manager and providers are external
//! collaborators. They are modelled as traits so any server can adapt its
//! own machinery.

mod deploy;
mod lifecycle;

pub use deploy::{
    find_deployment_manager, find_web_app_provider, App, AppContext, AppProvider,
    DeploymentManager, HostComponent, HostServer, ProviderKind,
};
pub use lifecycle::{LifecycleEvent, LifecycleListener, LifecycleSource};
