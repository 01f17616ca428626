//! One-shot trigger reacting to the host's started event.

use super::{DeploymentReport, LateDeploymentRegistrar, PassOutcome, SubmissionFailure};
use crate::config::LateDeployConfig;
use crate::core::DeployableSequence;
use crate::errors::LateDeployError;
use crate::events::{EventSink, LateDeployEvent, LoggingEventSink};
use crate::host::{HostServer, LifecycleEvent, LifecycleListener, LifecycleSource};
use crate::resolver::DeployableResolver;
use crate::utils::iso_timestamp;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Runs the late deployment pass the first time the host server reports
/// it has started.
///
/// Firing is idempotent: later started events are logged and ignored.
/// Nothing that goes wrong during the pass escapes to the caller.
pub struct DeploymentTrigger {
    config: LateDeployConfig,
    resolver: DeployableResolver,
    sink: Arc<dyn EventSink>,
    triggered: AtomicBool,
}

impl DeploymentTrigger {
    /// Creates an idle trigger for `config`.
    #[must_use]
    pub fn new(config: LateDeployConfig) -> Self {
        Self {
            config,
            resolver: DeployableResolver::new(),
            sink: Arc::new(LoggingEventSink::default()),
            triggered: AtomicBool::new(false),
        }
    }

    /// Records pass events to `sink` instead of the log.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The configuration this trigger scans with.
    #[must_use]
    pub fn config(&self) -> &LateDeployConfig {
        &self.config
    }

    /// Returns whether the pass has already been started.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Runs the pass against `server` unless it already ran.
    ///
    /// Returns the report of the pass, or `None` when this call was a
    /// duplicate.
    pub fn fire(&self, server: &dyn HostServer) -> Option<DeploymentReport> {
        if self
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(server = server.name(), "Late deploy already triggered, ignoring started event");
            self.sink.try_emit(&LateDeployEvent::DuplicateStart {
                server: server.name().to_string(),
            });
            return None;
        }
        Some(self.run(server))
    }

    /// Fires on a blocking thread of the current tokio runtime.
    ///
    /// Must be called from within a runtime.
    pub fn fire_blocking(
        self: Arc<Self>,
        server: Arc<dyn HostServer>,
    ) -> tokio::task::JoinHandle<Option<DeploymentReport>> {
        tokio::task::spawn_blocking(move || self.fire(server.as_ref()))
    }

    fn run(&self, server: &dyn HostServer) -> DeploymentReport {
        let mut report = DeploymentReport::begin(self.config.scan_dir());
        let pass_id = report.pass_id;
        let span = info_span!("late_deploy", pass_id = %pass_id);
        let _guard = span.enter();

        info!(
            scan_dir = %self.config.scan_dir().display(),
            started_at = %iso_timestamp(&report.started_at),
            "Late deploy triggered"
        );
        self.sink.try_emit(&LateDeployEvent::Triggered {
            pass_id,
            scan_dir: self.config.scan_dir().to_path_buf(),
        });

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.deploy(server, &mut report)))
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                warn!(error = %message, "Failed late deploy: host component panicked");
                self.sink.try_emit(&LateDeployEvent::Panicked {
                    pass_id,
                    message: message.clone(),
                });
                PassOutcome::Panicked { message }
            });

        report.finish(outcome)
    }

    fn deploy(&self, server: &dyn HostServer, report: &mut DeploymentReport) -> PassOutcome {
        let pass_id = report.pass_id;
        let (deployables, registrar) = match self.prepare(server) {
            Ok(prepared) => prepared,
            Err(e) => return self.abort(pass_id, e),
        };

        registrar.submit_all(&deployables, |artifact, result| match result {
            Ok(()) => {
                self.sink.try_emit(&LateDeployEvent::Submitted {
                    pass_id,
                    path: artifact.path.clone(),
                    kind: artifact.kind,
                });
                report.submitted.push(artifact.clone());
            }
            Err(e) => {
                self.sink.try_emit(&LateDeployEvent::RegistrationFailed {
                    pass_id,
                    error: serde_json::Value::Object(e.to_dict().into_iter().collect()),
                });
                report.failures.push(SubmissionFailure {
                    path: artifact.path.clone(),
                    error: e.to_string(),
                });
            }
        });

        info!(
            submitted = report.submitted.len(),
            failed = report.failures.len(),
            "Late deploy complete"
        );
        self.sink.try_emit(&LateDeployEvent::Completed {
            pass_id,
            submitted: report.submitted.len(),
            failed: report.failures.len(),
        });
        PassOutcome::Completed
    }

    fn prepare(
        &self,
        server: &dyn HostServer,
    ) -> Result<(DeployableSequence, LateDeploymentRegistrar), LateDeployError> {
        self.config.validate()?;
        let deployables = self.resolver.resolve(self.config.scan_dir())?;
        for artifact in &deployables {
            debug!(path = %artifact.path.display(), kind = %artifact.kind, "Deployable");
        }
        let registrar = LateDeploymentRegistrar::locate(server)?;
        Ok((deployables, registrar))
    }

    fn abort(&self, pass_id: Uuid, error: LateDeployError) -> PassOutcome {
        let payload = serde_json::Value::Object(error.to_dict().into_iter().collect());
        match error {
            LateDeployError::ManagerUnavailable(e) => {
                warn!(error = %e, "Skipping late deploy");
                self.sink.try_emit(&LateDeployEvent::ManagerUnavailable {
                    pass_id,
                    reason: e.reason.clone(),
                });
                PassOutcome::ManagerUnavailable { reason: e.reason }
            }
            other => {
                warn!(error = %other, "Failed late deploy");
                self.sink.try_emit(&LateDeployEvent::ScanFailed {
                    pass_id,
                    error: payload,
                });
                PassOutcome::ScanFailed {
                    error: other.to_string(),
                }
            }
        }
    }
}

impl std::fmt::Debug for DeploymentTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentTrigger")
            .field("config", &self.config)
            .field("triggered", &self.is_triggered())
            .finish_non_exhaustive()
    }
}

impl LifecycleListener for DeploymentTrigger {
    fn lifecycle_event(&self, source: LifecycleSource<'_>, event: &LifecycleEvent) {
        match (source, event) {
            (LifecycleSource::Server(server), LifecycleEvent::Started) => {
                let _ = self.fire(server);
            }
            (_, LifecycleEvent::Failure { cause }) => {
                debug!(source = source.name(), cause = %cause, "Lifecycle failure");
            }
            _ => {
                debug!(source = source.name(), event = %event, "Lifecycle event");
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::testing::{InMemoryServer, ScanDirFixture};
    use tempfile::tempdir;

    #[test]
    fn test_fire_runs_once() {
        let dir = tempdir().unwrap();
        ScanDirFixture::new(dir.path()).war("app");
        let server = InMemoryServer::with_web_app_manager("host");
        let trigger = DeploymentTrigger::new(LateDeployConfig::new(dir.path()));

        assert!(!trigger.is_triggered());
        assert!(trigger.fire(&server).is_some());
        assert!(trigger.is_triggered());
        assert!(trigger.fire(&server).is_none());
    }

    #[test]
    fn test_non_server_started_event_is_ignored() {
        let dir = tempdir().unwrap();
        let sink = Arc::new(CollectingEventSink::new());
        let trigger =
            DeploymentTrigger::new(LateDeployConfig::new(dir.path())).with_event_sink(sink.clone());

        trigger.lifecycle_event(LifecycleSource::Component("connector"), &LifecycleEvent::Started);

        assert!(!trigger.is_triggered());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_other_server_events_do_not_trigger() {
        let dir = tempdir().unwrap();
        let server = InMemoryServer::with_web_app_manager("host");
        let trigger = DeploymentTrigger::new(LateDeployConfig::new(dir.path()));

        for event in [
            LifecycleEvent::Starting,
            LifecycleEvent::Stopping,
            LifecycleEvent::Stopped,
            LifecycleEvent::failure("bind failed"),
        ] {
            trigger.lifecycle_event(LifecycleSource::Server(&server), &event);
        }

        assert!(!trigger.is_triggered());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fire_blocking() {
        let dir = tempdir().unwrap();
        ScanDirFixture::new(dir.path()).war("app");
        let server: Arc<dyn HostServer> = Arc::new(InMemoryServer::with_web_app_manager("host"));
        let trigger = Arc::new(DeploymentTrigger::new(LateDeployConfig::new(dir.path())));

        let report = trigger.clone().fire_blocking(server).await.unwrap().unwrap();

        assert_eq!(report.submitted.len(), 1);
        assert!(trigger.is_triggered());
    }
}
