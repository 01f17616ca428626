//! Host deployment machinery as seen from the late deployment pass.
//!
//! The host owns its deployment manager and providers. This crate only
//! looks them up, builds [`App`] records and hands them to
//! [`DeploymentManager::add_app`].

use crate::errors::RegistrationError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What kind of applications a provider creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Builds web application contexts from packages and descriptors.
    WebApp,
    /// Anything else the host deploys.
    Other,
}

/// A started application context as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppContext {
    /// The context path the application is served under.
    pub context_path: String,
    /// The artifact the context was built from.
    pub origin: PathBuf,
    /// Name of the provider that built it.
    pub provider: String,
}

/// Creates application contexts for the deployment manager.
pub trait AppProvider: Send + Sync + Debug {
    /// Returns the provider's name.
    fn name(&self) -> &str;

    /// Returns the kind of applications this provider builds.
    fn kind(&self) -> ProviderKind {
        ProviderKind::Other
    }

    /// Builds the context for `app`.
    fn create_context(&self, app: &App) -> Result<AppContext, RegistrationError>;
}

/// An application record submitted to the deployment manager.
#[derive(Debug, Clone)]
pub struct App {
    origin: PathBuf,
    provider: Arc<dyn AppProvider>,
}

impl App {
    /// Creates an application record for `origin` built by `provider`.
    pub fn new(provider: Arc<dyn AppProvider>, origin: impl Into<PathBuf>) -> Self {
        Self {
            origin: origin.into(),
            provider,
        }
    }

    /// The artifact this application is deployed from.
    #[must_use]
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// The provider responsible for this application.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn AppProvider> {
        &self.provider
    }

    /// Asks the provider to build this application's context.
    pub fn create_context(&self) -> Result<AppContext, RegistrationError> {
        self.provider.create_context(self)
    }
}

/// The host's deployment manager.
///
/// Providers are only registered while the host is starting; applications
/// may be added at any time.
pub trait DeploymentManager: Send + Sync + Debug {
    /// The providers currently registered with the manager.
    fn app_providers(&self) -> Vec<Arc<dyn AppProvider>>;

    /// Adds and deploys an application.
    fn add_app(&self, app: App) -> Result<(), RegistrationError>;
}

/// A component registered on the host server.
#[derive(Debug, Clone)]
pub enum HostComponent {
    /// A deployment manager.
    DeploymentManager(Arc<dyn DeploymentManager>),
    /// Anything the late deployment pass has no use for.
    Other(String),
}

impl HostComponent {
    /// Returns the deployment manager capability, if this component has it.
    #[must_use]
    pub fn as_deployment_manager(&self) -> Option<&Arc<dyn DeploymentManager>> {
        match self {
            Self::DeploymentManager(manager) => Some(manager),
            Self::Other(_) => None,
        }
    }
}

/// The running host server.
pub trait HostServer: Send + Sync {
    /// Returns the server's name.
    fn name(&self) -> &str;

    /// All components registered on the server.
    fn components(&self) -> Vec<HostComponent>;

    /// Builds an empty deployment manager with the host's defaults.
    ///
    /// Used only when no manager is registered.
    fn default_deployment_manager(&self) -> Option<Arc<dyn DeploymentManager>> {
        None
    }

    /// Builds a web application provider bound to `manager`.
    ///
    /// The returned provider is used as a context factory only and must not
    /// be registered with the manager.
    fn default_web_app_provider(
        &self,
        _manager: Arc<dyn DeploymentManager>,
    ) -> Option<Arc<dyn AppProvider>> {
        None
    }
}

/// Finds the first registered deployment manager on `server`.
#[must_use]
pub fn find_deployment_manager(server: &dyn HostServer) -> Option<Arc<dyn DeploymentManager>> {
    server
        .components()
        .iter()
        .find_map(HostComponent::as_deployment_manager)
        .cloned()
}

/// Finds the first web application provider registered with `manager`.
#[must_use]
pub fn find_web_app_provider(manager: &dyn DeploymentManager) -> Option<Arc<dyn AppProvider>> {
    manager
        .app_providers()
        .into_iter()
        .find(|provider| provider.kind() == ProviderKind::WebApp)
}
