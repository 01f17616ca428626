//! Events recorded during a late deployment pass.

use crate::core::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// An observable step or failure of the late deployment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LateDeployEvent {
    /// The host reported it started and the pass begins.
    Triggered {
        /// Identifier of this pass.
        pass_id: Uuid,
        /// Directory being scanned.
        scan_dir: PathBuf,
    },
    /// A further started event arrived after the pass already ran.
    DuplicateStart {
        /// Name of the reporting server.
        server: String,
    },
    /// The scan directory could not be listed.
    ScanFailed {
        /// Identifier of this pass.
        pass_id: Uuid,
        /// Error details.
        error: serde_json::Value,
    },
    /// No deployment manager could be found or built.
    ManagerUnavailable {
        /// Identifier of this pass.
        pass_id: Uuid,
        /// What was missing.
        reason: String,
    },
    /// An application was accepted by the manager.
    Submitted {
        /// Identifier of this pass.
        pass_id: Uuid,
        /// The deployed artifact.
        path: PathBuf,
        /// The artifact kind.
        kind: ArtifactKind,
    },
    /// The manager rejected an application.
    RegistrationFailed {
        /// Identifier of this pass.
        pass_id: Uuid,
        /// Error details.
        error: serde_json::Value,
    },
    /// A host collaborator panicked during the pass.
    Panicked {
        /// Identifier of this pass.
        pass_id: Uuid,
        /// Panic payload, when it was a string.
        message: String,
    },
    /// The pass finished.
    Completed {
        /// Identifier of this pass.
        pass_id: Uuid,
        /// Number of applications accepted.
        submitted: usize,
        /// Number of applications rejected.
        failed: usize,
    },
}

impl LateDeployEvent {
    /// The dotted event name, e.g. `late_deploy.scan_failed`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Triggered { .. } => "late_deploy.triggered",
            Self::DuplicateStart { .. } => "late_deploy.duplicate_start",
            Self::ScanFailed { .. } => "late_deploy.scan_failed",
            Self::ManagerUnavailable { .. } => "late_deploy.manager_unavailable",
            Self::Submitted { .. } => "late_deploy.submitted",
            Self::RegistrationFailed { .. } => "late_deploy.registration_failed",
            Self::Panicked { .. } => "late_deploy.panicked",
            Self::Completed { .. } => "late_deploy.completed",
        }
    }

    /// Returns true for events that accompany a logged warning.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::DuplicateStart { .. }
                | Self::ScanFailed { .. }
                | Self::ManagerUnavailable { .. }
                | Self::RegistrationFailed { .. }
                | Self::Panicked { .. }
        )
    }
}
