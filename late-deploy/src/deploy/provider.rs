//! The provider attached to late-deployed applications.

use crate::host::{App, AppContext, AppProvider, DeploymentManager, ProviderKind};
use crate::errors::RegistrationError;
use std::sync::Arc;

/// Provider recorded on every late-deployed [`App`].
///
/// Context creation is delegated to the host's web application provider.
/// This provider is never added to the manager's provider list: providers
/// can only be registered before the host starts.
#[derive(Debug)]
pub struct LateDeployProvider {
    delegate: Arc<dyn AppProvider>,
    manager: Arc<dyn DeploymentManager>,
}

impl LateDeployProvider {
    /// Name reported by this provider.
    pub const NAME: &'static str = "late-deploy";

    /// Creates a provider delegating to `delegate` for apps submitted to `manager`.
    pub fn new(delegate: Arc<dyn AppProvider>, manager: Arc<dyn DeploymentManager>) -> Self {
        Self { delegate, manager }
    }

    /// The provider that builds the contexts.
    #[must_use]
    pub fn delegate(&self) -> &Arc<dyn AppProvider> {
        &self.delegate
    }

    /// The manager applications are submitted to.
    #[must_use]
    pub fn deployment_manager(&self) -> &Arc<dyn DeploymentManager> {
        &self.manager
    }
}

impl AppProvider for LateDeployProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> ProviderKind {
        self.delegate.kind()
    }

    fn create_context(&self, app: &App) -> Result<AppContext, RegistrationError> {
        self.delegate.create_context(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryDeploymentManager, StubWebAppProvider};

    #[test]
    fn test_create_context_uses_delegate() {
        let manager: Arc<dyn DeploymentManager> = Arc::new(InMemoryDeploymentManager::new());
        let provider = Arc::new(LateDeployProvider::new(
            Arc::new(StubWebAppProvider::new("webapps")),
            manager,
        ));
        let app = App::new(provider.clone(), "/srv/late/root.war");

        let context = app.create_context().unwrap();

        assert_eq!(context.context_path, "/");
        assert_eq!(context.provider, "webapps");
        assert_eq!(provider.name(), "late-deploy");
        assert_eq!(provider.kind(), ProviderKind::WebApp);
    }
}
