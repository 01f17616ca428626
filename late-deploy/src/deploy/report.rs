//! Summary of one late deployment pass.

use crate::core::DeployableArtifact;
use crate::utils::{generate_uuid, now, Timestamp};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// How a pass ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassOutcome {
    /// The pass has not finished yet.
    Running,
    /// Every deployable was offered to the manager.
    Completed,
    /// The scan directory could not be listed.
    ScanFailed {
        /// Error message.
        error: String,
    },
    /// No deployment manager could be found or built.
    ManagerUnavailable {
        /// What was missing.
        reason: String,
    },
    /// A host collaborator panicked.
    Panicked {
        /// Panic message.
        message: String,
    },
}

/// A deployable the manager rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFailure {
    /// The artifact that was rejected.
    pub path: PathBuf,
    /// Rejection message.
    pub error: String,
}

/// What a late deployment pass did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentReport {
    /// Identifier of the pass, also recorded on its log span and events.
    pub pass_id: Uuid,
    /// Directory that was scanned.
    pub scan_dir: PathBuf,
    /// When the pass started.
    pub started_at: Timestamp,
    /// When the pass ended.
    pub finished_at: Option<Timestamp>,
    /// How the pass ended.
    pub outcome: PassOutcome,
    /// Artifacts accepted by the manager, in submission order.
    pub submitted: Vec<DeployableArtifact>,
    /// Artifacts rejected by the manager.
    pub failures: Vec<SubmissionFailure>,
}

impl DeploymentReport {
    pub(crate) fn begin(scan_dir: &Path) -> Self {
        Self {
            pass_id: generate_uuid(),
            scan_dir: scan_dir.to_path_buf(),
            started_at: now(),
            finished_at: None,
            outcome: PassOutcome::Running,
            submitted: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub(crate) fn finish(mut self, outcome: PassOutcome) -> Self {
        self.outcome = outcome;
        self.finished_at = Some(now());
        self
    }

    /// Returns true if every deployable was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.outcome == PassOutcome::Completed && self.failures.is_empty()
    }

    /// Duration of the pass in milliseconds, once finished.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}
