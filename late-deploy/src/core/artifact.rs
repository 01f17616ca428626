//! Deployable artifact model.

use super::classify;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension of descriptor artifacts.
pub const DESCRIPTOR_EXTENSION: &str = "xml";

/// Extension of package artifacts.
pub const PACKAGE_EXTENSION: &str = "war";

/// Extensions accepted by a scan, in no particular order.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[DESCRIPTOR_EXTENSION, PACKAGE_EXTENSION];

/// The kind of a deployable artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// A configuration descriptor (`.xml`) that builds an application context.
    Descriptor,
    /// A packaged web application (`.war`).
    Package,
}

impl ArtifactKind {
    /// Classifies a regular file by extension.
    ///
    /// Returns `None` for anything that is not a regular `.xml` or `.war` file.
    #[must_use]
    pub fn of(path: &Path) -> Option<Self> {
        Self::from_extension(classify::extension(path).as_deref()?)
    }

    /// Maps a lower-cased extension to a kind.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            DESCRIPTOR_EXTENSION => Some(Self::Descriptor),
            PACKAGE_EXTENSION => Some(Self::Package),
            _ => None,
        }
    }

    /// The file extension for this kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Descriptor => DESCRIPTOR_EXTENSION,
            Self::Package => PACKAGE_EXTENSION,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descriptor => write!(f, "descriptor"),
            Self::Package => write!(f, "package"),
        }
    }
}

/// A resolved unit of deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployableArtifact {
    /// Location of the artifact.
    pub path: PathBuf,
    /// Whether this is a descriptor or a package.
    pub kind: ArtifactKind,
    /// The package this descriptor stands in for, when paired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<PathBuf>,
}

impl DeployableArtifact {
    /// Creates an unpaired package artifact.
    #[must_use]
    pub fn package(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ArtifactKind::Package,
            overrides: None,
        }
    }

    /// Creates a descriptor artifact.
    #[must_use]
    pub fn descriptor(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ArtifactKind::Descriptor,
            overrides: None,
        }
    }

    /// Creates a descriptor that replaces the sibling package `package`.
    #[must_use]
    pub fn override_for(path: impl Into<PathBuf>, package: impl Into<PathBuf>) -> Self {
        Self {
            overrides: Some(package.into()),
            ..Self::descriptor(path)
        }
    }
}

impl fmt::Display for DeployableArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.kind)
    }
}

/// The ordered output of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployableSequence(Vec<DeployableArtifact>);

impl DeployableSequence {
    /// Creates an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, artifact: DeployableArtifact) {
        self.0.push(artifact);
    }

    /// Number of deployables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the scan found nothing to deploy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the deployables in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DeployableArtifact> {
        self.0.iter()
    }
}

impl From<Vec<DeployableArtifact>> for DeployableSequence {
    fn from(artifacts: Vec<DeployableArtifact>) -> Self {
        Self(artifacts)
    }
}

impl IntoIterator for DeployableSequence {
    type Item = DeployableArtifact;
    type IntoIter = std::vec::IntoIter<DeployableArtifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeployableSequence {
    type Item = &'a DeployableArtifact;
    type IntoIter = std::slice::Iter<'a, DeployableArtifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(ArtifactKind::from_extension("xml"), Some(ArtifactKind::Descriptor));
        assert_eq!(ArtifactKind::from_extension("war"), Some(ArtifactKind::Package));
        assert_eq!(ArtifactKind::from_extension("txt"), None);
        assert_eq!(ArtifactKind::Package.extension(), "war");
    }

    #[test]
    fn test_kind_serialize() {
        let json = serde_json::to_string(&ArtifactKind::Descriptor).unwrap();
        assert_eq!(json, r#""descriptor""#);
    }

    #[test]
    fn test_override_descriptor() {
        let artifact = DeployableArtifact::override_for("/srv/late/app.xml", "/srv/late/app.war");

        assert_eq!(artifact.kind, ArtifactKind::Descriptor);
        assert_eq!(artifact.overrides, Some(PathBuf::from("/srv/late/app.war")));
        assert_eq!(artifact.to_string(), "/srv/late/app.xml (descriptor)");
    }

    #[test]
    fn test_sequence_iteration_order() {
        let seq = DeployableSequence::from(vec![
            DeployableArtifact::package("/srv/late/a.war"),
            DeployableArtifact::descriptor("/srv/late/b.xml"),
        ]);

        assert_eq!(seq.len(), 2);
        let kinds: Vec<_> = seq.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![ArtifactKind::Package, ArtifactKind::Descriptor]);
        let paths: Vec<_> = seq.into_iter().map(|a| a.path).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/srv/late/a.war"), PathBuf::from("/srv/late/b.xml")]
        );
    }
}
