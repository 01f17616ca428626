//! Submission of resolved deployables to the host deployment manager.

use super::LateDeployProvider;
use crate::core::{DeployableArtifact, DeployableSequence};
use crate::errors::{ManagerUnavailableError, RegistrationError};
use crate::host::{
    find_deployment_manager, find_web_app_provider, App, AppProvider, DeploymentManager,
    HostServer,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Hands deployables to a running deployment manager.
#[derive(Debug, Clone)]
pub struct LateDeploymentRegistrar {
    provider: Arc<LateDeployProvider>,
}

impl LateDeploymentRegistrar {
    /// Creates a registrar for `manager`, building contexts with `web_app_provider`.
    pub fn new(
        manager: Arc<dyn DeploymentManager>,
        web_app_provider: Arc<dyn AppProvider>,
    ) -> Self {
        Self {
            provider: Arc::new(LateDeployProvider::new(web_app_provider, manager)),
        }
    }

    /// Locates the host's deployment machinery.
    ///
    /// Uses the first registered deployment manager, or the host's default
    /// one if none is registered. The web application provider is taken
    /// from the manager's providers, or built by the host without being
    /// registered.
    pub fn locate(server: &dyn HostServer) -> Result<Self, ManagerUnavailableError> {
        let manager = match find_deployment_manager(server) {
            Some(manager) => manager,
            None => {
                debug!(server = server.name(), "No deployment manager registered, using default");
                server.default_deployment_manager().ok_or_else(|| {
                    ManagerUnavailableError::new(format!(
                        "no deployment manager registered on '{}' and none could be created",
                        server.name()
                    ))
                })?
            }
        };

        let web_app_provider = match find_web_app_provider(manager.as_ref()) {
            Some(provider) => provider,
            None => {
                debug!(server = server.name(), "No web application provider registered, using default");
                server
                    .default_web_app_provider(manager.clone())
                    .ok_or_else(|| {
                        ManagerUnavailableError::new(format!(
                            "no web application provider available on '{}'",
                            server.name()
                        ))
                    })?
            }
        };

        Ok(Self::new(manager, web_app_provider))
    }

    /// The manager applications are submitted to.
    #[must_use]
    pub fn manager(&self) -> &Arc<dyn DeploymentManager> {
        self.provider.deployment_manager()
    }

    /// The provider recorded on submitted applications.
    #[must_use]
    pub fn provider(&self) -> &Arc<LateDeployProvider> {
        &self.provider
    }

    /// Submits one deployable.
    pub fn submit(&self, artifact: &DeployableArtifact) -> Result<(), RegistrationError> {
        let app = App::new(self.provider.clone(), artifact.path.clone());
        debug!(path = %artifact.path.display(), kind = %artifact.kind, "Submitting application");
        self.manager().add_app(app)
    }

    /// Submits every deployable in order.
    ///
    /// `record` sees each result as soon as the manager returns it. A
    /// rejected artifact is logged and the remaining ones are still
    /// submitted.
    pub fn submit_all<F>(&self, deployables: &DeployableSequence, mut record: F)
    where
        F: FnMut(&DeployableArtifact, Result<(), RegistrationError>),
    {
        for artifact in deployables {
            let result = self.submit(artifact);
            if let Err(e) = &result {
                warn!(path = %artifact.path.display(), error = %e, "Failed to deploy application");
            }
            record(artifact, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostComponent;
    use crate::testing::{InMemoryDeploymentManager, InMemoryServer, StubWebAppProvider};
    use std::path::{Path, PathBuf};

    fn manager_with_provider() -> Arc<InMemoryDeploymentManager> {
        let manager = Arc::new(InMemoryDeploymentManager::new());
        manager
            .add_app_provider(Arc::new(StubWebAppProvider::new("webapps")))
            .unwrap();
        manager.start();
        manager
    }

    #[test]
    fn test_locate_uses_registered_manager_and_provider() {
        let manager = manager_with_provider();
        let server = InMemoryServer::new("host")
            .with_component(HostComponent::DeploymentManager(manager.clone()));

        let registrar = LateDeploymentRegistrar::locate(&server).unwrap();

        assert_eq!(registrar.provider().delegate().name(), "webapps");
        assert_eq!(manager.app_providers().len(), 1);
    }

    #[test]
    fn test_locate_falls_back_to_host_defaults() {
        let server = InMemoryServer::new("host").with_default_manager();

        let registrar = LateDeploymentRegistrar::locate(&server).unwrap();

        assert_eq!(registrar.provider().delegate().name(), "default-webapps");
        assert!(registrar.manager().app_providers().is_empty());
    }

    #[test]
    fn test_locate_without_manager_is_unavailable() {
        let server = InMemoryServer::new("bare");

        let err = LateDeploymentRegistrar::locate(&server).unwrap_err();

        assert!(err.reason.contains("no deployment manager"));
    }

    #[test]
    fn test_locate_without_provider_is_unavailable() {
        let manager = Arc::new(InMemoryDeploymentManager::new());
        let server = InMemoryServer::new("host")
            .with_component(HostComponent::DeploymentManager(manager));

        let err = LateDeploymentRegistrar::locate(&server).unwrap_err();

        assert!(err.reason.contains("no web application provider"));
    }

    #[test]
    fn test_submit_registers_app_with_late_provider() {
        let manager = manager_with_provider();
        let registrar = LateDeploymentRegistrar::new(
            manager.clone(),
            Arc::new(StubWebAppProvider::new("webapps")),
        );

        registrar
            .submit(&DeployableArtifact::package("/srv/late/shop.war"))
            .unwrap();

        let deployed = manager.deployed();
        assert_eq!(deployed.len(), 1);
        assert_eq!(deployed[0].origin, Path::new("/srv/late/shop.war"));
        assert_eq!(deployed[0].context_path, "/shop");
        assert_eq!(manager.app_provider_names(), vec!["webapps".to_string()]);
        assert_eq!(manager.submitted_by(), vec!["late-deploy".to_string()]);
    }

    #[test]
    fn test_submit_all_continues_after_rejection() {
        let manager = manager_with_provider();
        manager.reject("/srv/late/b.war");
        let registrar = LateDeploymentRegistrar::new(
            manager.clone(),
            Arc::new(StubWebAppProvider::new("webapps")),
        );
        let seq = DeployableSequence::from(vec![
            DeployableArtifact::package("/srv/late/a.war"),
            DeployableArtifact::package("/srv/late/b.war"),
            DeployableArtifact::descriptor("/srv/late/c.xml"),
        ]);

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        registrar.submit_all(&seq, |artifact, result| match result {
            Ok(()) => accepted.push(artifact.path.clone()),
            Err(e) => rejected.push(e),
        });

        assert_eq!(
            accepted,
            vec![PathBuf::from("/srv/late/a.war"), PathBuf::from("/srv/late/c.xml")]
        );
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].path(), Path::new("/srv/late/b.war"));
        assert_eq!(manager.deployed().len(), 2);
    }

    #[test]
    fn test_duplicate_submission_is_rejected() {
        let manager = manager_with_provider();
        let registrar = LateDeploymentRegistrar::new(
            manager.clone(),
            Arc::new(StubWebAppProvider::new("webapps")),
        );
        let artifact = DeployableArtifact::descriptor("/srv/late/app.xml");

        registrar.submit(&artifact).unwrap();
        let err = registrar.submit(&artifact).unwrap_err();

        assert_eq!(err, RegistrationError::duplicate("/srv/late/app.xml"));
    }
}
