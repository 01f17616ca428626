//! Error types for the late deployment pass.
//!
//! Every failure here is recoverable: the deployment trigger catches them,
//! logs a warning and records an event. None of them may reach the host's
//! startup sequence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures that end a late deployment pass before any submission.
///
/// Per-application [`RegistrationError`]s are not part of this type: they
/// never end a pass.
#[derive(Debug, Error)]
pub enum LateDeployError {
    /// The scan directory could not be listed.
    #[error("{0}")]
    Scan(#[from] ScanError),

    /// No deployment manager could be found or constructed.
    #[error("{0}")]
    ManagerUnavailable(#[from] ManagerUnavailableError),

    /// The configuration is unusable.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl LateDeployError {
    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        match self {
            Self::Scan(e) => e.to_dict(),
            Self::ManagerUnavailable(e) => {
                let mut map = HashMap::new();
                map.insert("type".to_string(), serde_json::json!("ManagerUnavailable"));
                map.insert("reason".to_string(), serde_json::json!(e.reason));
                map.insert("message".to_string(), serde_json::json!(e.to_string()));
                map
            }
            Self::Config(e) => {
                let mut map = HashMap::new();
                map.insert("type".to_string(), serde_json::json!("ConfigError"));
                map.insert("message".to_string(), serde_json::json!(e.to_string()));
                map
            }
        }
    }
}

/// Why a scan directory could not be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// The directory does not exist.
    NotFound,
    /// The path exists but is not a directory.
    NotADirectory,
    /// The process may not read the directory.
    PermissionDenied,
    /// Any other IO failure while listing.
    Io(String),
}

impl std::fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "directory not found"),
            Self::NotADirectory => write!(f, "not a directory"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::Io(message) => write!(f, "{message}"),
        }
    }
}

/// Error raised when the scan directory cannot be listed.
#[derive(Debug, Clone, Error)]
#[error("Cannot scan '{}': {kind}", .path.display())]
pub struct ScanError {
    /// The directory that was being scanned.
    pub path: PathBuf,
    /// The failure category.
    pub kind: ScanErrorKind,
}

impl ScanError {
    /// Creates a new scan error.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: ScanErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Maps an IO error raised while listing `path`.
    #[must_use]
    pub fn from_io(path: &Path, err: &std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ScanErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ScanErrorKind::PermissionDenied,
            _ => ScanErrorKind::Io(err.to_string()),
        };
        Self::new(path, kind)
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("ScanError"));
        map.insert(
            "path".to_string(),
            serde_json::json!(self.path.display().to_string()),
        );
        map.insert("kind".to_string(), serde_json::json!(self.kind.to_string()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Errors returned by the host deployment manager for a submitted application.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// An application with the same origin is already registered.
    #[error("Application already registered: {}", .path.display())]
    Duplicate {
        /// The application origin.
        path: PathBuf,
    },

    /// No provider knows how to build a context from this origin.
    #[error("Unsupported application '{}': {reason}", .path.display())]
    Unsupported {
        /// The application origin.
        path: PathBuf,
        /// Why it is unsupported.
        reason: String,
    },

    /// The manager refused the application for another reason.
    #[error("Application '{}' rejected: {reason}", .path.display())]
    Rejected {
        /// The application origin.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },
}

impl RegistrationError {
    /// Creates a duplicate registration error.
    #[must_use]
    pub fn duplicate(path: impl Into<PathBuf>) -> Self {
        Self::Duplicate { path: path.into() }
    }

    /// Creates an unsupported application error.
    #[must_use]
    pub fn unsupported(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a rejected application error.
    #[must_use]
    pub fn rejected(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The origin of the application that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Duplicate { path } | Self::Unsupported { path, .. } | Self::Rejected { path, .. } => {
                path
            }
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::Duplicate { path } => {
                map.insert("type".to_string(), serde_json::json!("DuplicateApplication"));
                map.insert("path".to_string(), serde_json::json!(path.display().to_string()));
            }
            Self::Unsupported { path, reason } => {
                map.insert("type".to_string(), serde_json::json!("UnsupportedApplication"));
                map.insert("path".to_string(), serde_json::json!(path.display().to_string()));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
            Self::Rejected { path, reason } => {
                map.insert("type".to_string(), serde_json::json!("RejectedApplication"));
                map.insert("path".to_string(), serde_json::json!(path.display().to_string()));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised when no usable deployment manager exists on the host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Deployment manager unavailable: {reason}")]
pub struct ManagerUnavailableError {
    /// What was missing.
    pub reason: String,
}

impl ManagerUnavailableError {
    /// Creates a new manager unavailable error.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The scan directory option is missing or empty.
    #[error("late deploy scan directory is not configured")]
    MissingScanDir,

    /// The configuration source could not be parsed.
    #[error("invalid late deploy configuration: {0}")]
    Parse(String),
}
