//! In-memory host doubles.

use crate::core::{basename, extension_of_name, ArtifactKind};
use crate::errors::RegistrationError;
use crate::host::{
    App, AppContext, AppProvider, DeploymentManager, HostComponent, HostServer, LifecycleEvent,
    LifecycleListener, LifecycleSource, ProviderKind,
};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// A web application provider that derives context paths from basenames.
///
/// `root` maps to `/`; every other basename `name` maps to `/name`.
#[derive(Debug, Clone)]
pub struct StubWebAppProvider {
    name: String,
}

impl StubWebAppProvider {
    /// Creates a new stub provider.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl AppProvider for StubWebAppProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::WebApp
    }

    fn create_context(&self, app: &App) -> Result<AppContext, RegistrationError> {
        let origin = app.origin();
        let file_name = origin
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if extension_of_name(&file_name)
            .as_deref()
            .and_then(ArtifactKind::from_extension)
            .is_none()
        {
            return Err(RegistrationError::unsupported(origin, "not a .war or .xml artifact"));
        }

        let name = basename(origin);
        let context_path = if name.eq_ignore_ascii_case("root") {
            "/".to_string()
        } else {
            format!("/{name}")
        };
        Ok(AppContext {
            context_path,
            origin: origin.to_path_buf(),
            provider: self.name.clone(),
        })
    }
}

/// Raised when a provider is added to a started manager.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot add provider '{0}' to a started deployment manager")]
pub struct ProviderRegistrationClosed(pub String);

/// A deployment manager that keeps deployed contexts in memory.
#[derive(Debug, Default)]
pub struct InMemoryDeploymentManager {
    providers: RwLock<Vec<Arc<dyn AppProvider>>>,
    deployed: RwLock<Vec<AppContext>>,
    submitted_by: RwLock<Vec<String>>,
    rejected: RwLock<HashSet<PathBuf>>,
    started: AtomicBool,
}

impl InMemoryDeploymentManager {
    /// Creates an empty, unstarted manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider. Only allowed before [`start`](Self::start).
    pub fn add_app_provider(
        &self,
        provider: Arc<dyn AppProvider>,
    ) -> Result<(), ProviderRegistrationClosed> {
        if self.is_started() {
            return Err(ProviderRegistrationClosed(provider.name().to_string()));
        }
        self.providers.write().push(provider);
        Ok(())
    }

    /// Marks the manager as running.
    pub fn start(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    /// Returns whether the manager is running.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Makes every later `add_app` for `origin` fail.
    pub fn reject(&self, origin: impl Into<PathBuf>) {
        self.rejected.write().insert(origin.into());
    }

    /// Contexts deployed so far, in order.
    #[must_use]
    pub fn deployed(&self) -> Vec<AppContext> {
        self.deployed.read().clone()
    }

    /// Names of the providers recorded on each deployed app, in order.
    #[must_use]
    pub fn submitted_by(&self) -> Vec<String> {
        self.submitted_by.read().clone()
    }

    /// Names of the registered providers.
    #[must_use]
    pub fn app_provider_names(&self) -> Vec<String> {
        self.providers
            .read()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }
}

impl DeploymentManager for InMemoryDeploymentManager {
    fn app_providers(&self) -> Vec<Arc<dyn AppProvider>> {
        self.providers.read().clone()
    }

    fn add_app(&self, app: App) -> Result<(), RegistrationError> {
        let origin = app.origin().to_path_buf();
        if self.rejected.read().contains(&origin) {
            return Err(RegistrationError::rejected(origin, "refused by deployment manager"));
        }
        if self.deployed.read().iter().any(|c| c.origin == origin) {
            return Err(RegistrationError::duplicate(origin));
        }

        let context = app.create_context()?;
        self.submitted_by.write().push(app.provider().name().to_string());
        self.deployed.write().push(context);
        Ok(())
    }
}

/// A deployment manager that panics in `add_app` once it has accepted a
/// fixed number of applications.
#[derive(Debug, Default)]
pub struct PanickingDeploymentManager {
    accept: usize,
    deployed: RwLock<Vec<PathBuf>>,
}

impl PanickingDeploymentManager {
    /// Creates a manager that panics on the first application.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager that accepts `accept` applications, then panics.
    #[must_use]
    pub fn after(accept: usize) -> Self {
        Self {
            accept,
            deployed: RwLock::new(Vec::new()),
        }
    }

    /// Origins accepted before the panic, in order.
    #[must_use]
    pub fn deployed(&self) -> Vec<PathBuf> {
        self.deployed.read().clone()
    }
}

impl DeploymentManager for PanickingDeploymentManager {
    fn app_providers(&self) -> Vec<Arc<dyn AppProvider>> {
        vec![Arc::new(StubWebAppProvider::new("webapps"))]
    }

    fn add_app(&self, app: App) -> Result<(), RegistrationError> {
        let mut deployed = self.deployed.write();
        if deployed.len() >= self.accept {
            drop(deployed);
            panic!("deployment manager crashed on {}", app.origin().display());
        }
        deployed.push(app.origin().to_path_buf());
        Ok(())
    }
}

/// A host server that drives listeners through its lifecycle.
pub struct InMemoryServer {
    name: String,
    components: Vec<HostComponent>,
    manager: Option<Arc<InMemoryDeploymentManager>>,
    default_manager: Option<Arc<InMemoryDeploymentManager>>,
    listeners: RwLock<Vec<Arc<dyn LifecycleListener>>>,
    started: AtomicBool,
}

impl InMemoryServer {
    /// Creates a server with no components.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
            manager: None,
            default_manager: None,
            listeners: RwLock::new(Vec::new()),
            started: AtomicBool::new(false),
        }
    }

    /// Creates a server with a registered deployment manager that owns a
    /// web application provider.
    #[must_use]
    pub fn with_web_app_manager(name: impl Into<String>) -> Self {
        let manager = Arc::new(InMemoryDeploymentManager::new());
        manager.providers.write().push(Arc::new(StubWebAppProvider::new("webapps")));
        let mut server = Self::new(name)
            .with_component(HostComponent::DeploymentManager(manager.clone()));
        server.manager = Some(manager);
        server
    }

    /// Registers a component.
    #[must_use]
    pub fn with_component(mut self, component: HostComponent) -> Self {
        self.components.push(component);
        self
    }

    /// Lets the server build an empty manager when none is registered.
    #[must_use]
    pub fn with_default_manager(mut self) -> Self {
        self.default_manager = Some(Arc::new(InMemoryDeploymentManager::new()));
        self
    }

    /// The manager late deployments land in, registered or default.
    #[must_use]
    pub fn manager(&self) -> Option<Arc<InMemoryDeploymentManager>> {
        self.manager.clone().or_else(|| self.default_manager.clone())
    }

    /// Adds a lifecycle listener.
    pub fn add_listener(&self, listener: Arc<dyn LifecycleListener>) {
        self.listeners.write().push(listener);
    }

    /// Returns whether [`start`](Self::start) completed.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Starts the server.
    ///
    /// Emits `Starting`, starts each component (reporting `Started` for
    /// the ones that are not deployment managers), then emits `Started`.
    pub fn start(&self) {
        self.notify(&LifecycleEvent::Starting);
        for component in &self.components {
            match component {
                HostComponent::DeploymentManager(_) => {}
                HostComponent::Other(name) => {
                    self.notify_from(LifecycleSource::Component(name), &LifecycleEvent::Started);
                }
            }
        }
        if let Some(manager) = &self.manager {
            manager.start();
        }
        self.started.store(true, Ordering::SeqCst);
        self.notify(&LifecycleEvent::Started);
    }

    /// Stops the server.
    pub fn stop(&self) {
        self.notify(&LifecycleEvent::Stopping);
        self.started.store(false, Ordering::SeqCst);
        self.notify(&LifecycleEvent::Stopped);
    }

    /// Delivers `event` with the server as source.
    pub fn notify(&self, event: &LifecycleEvent) {
        self.notify_from(LifecycleSource::Server(self), event);
    }

    fn notify_from(&self, source: LifecycleSource<'_>, event: &LifecycleEvent) {
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener.lifecycle_event(source, event);
        }
    }
}

impl HostServer for InMemoryServer {
    fn name(&self) -> &str {
        &self.name
    }

    fn components(&self) -> Vec<HostComponent> {
        self.components.clone()
    }

    fn default_deployment_manager(&self) -> Option<Arc<dyn DeploymentManager>> {
        self.default_manager
            .clone()
            .map(|manager| manager as Arc<dyn DeploymentManager>)
    }

    fn default_web_app_provider(
        &self,
        _manager: Arc<dyn DeploymentManager>,
    ) -> Option<Arc<dyn AppProvider>> {
        self.default_manager
            .as_ref()
            .map(|_| Arc::new(StubWebAppProvider::new("default-webapps")) as Arc<dyn AppProvider>)
    }
}
