//! Directory scanning and override resolution.
//!
//! A scan lists the regular `.xml` and `.war` files directly inside a
//! directory, sorts them by path, then walks them as a work queue. A
//! package with a sibling descriptor of the same basename is replaced by
//! that descriptor; everything else is emitted as found.

use crate::core::{
    is_extension, ArtifactKind, DeployableArtifact, DeployableSequence, ACCEPTED_EXTENSIONS,
};
use crate::errors::{ScanError, ScanErrorKind};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolves the deployables of a directory.
///
/// Holds no state between calls: every `resolve` reads the directory as
/// it is at that instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeployableResolver;

impl DeployableResolver {
    /// Creates a new resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Lists the candidate files of `dir` in canonical processing order.
    pub fn candidates(&self, dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            if dir.metadata().is_ok_and(|m| !m.is_dir()) {
                ScanError::new(dir, ScanErrorKind::NotADirectory)
            } else {
                ScanError::from_io(dir, &e)
            }
        })?;
        let mut relevant = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ScanError::from_io(dir, &e))?.path();
            if is_extension(&path, ACCEPTED_EXTENSIONS) {
                relevant.push(path);
            }
        }
        relevant.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        for path in &relevant {
            debug!(path = %path.display(), "Relevant file");
        }
        Ok(relevant)
    }

    /// Scans `dir` and returns its deployables in order.
    pub fn resolve(&self, dir: &Path) -> Result<DeployableSequence, ScanError> {
        let relevant = self.candidates(dir)?;
        Ok(Self::reduce(relevant))
    }

    /// Pairs packages with their descriptor overrides.
    ///
    /// `queue` must already be sorted. Consumed entries are cleared in place
    /// through the path index, so no entry shifts position.
    fn reduce(queue: Vec<PathBuf>) -> DeployableSequence {
        let index: HashMap<PathBuf, usize> = queue
            .iter()
            .enumerate()
            .map(|(i, path)| (path.clone(), i))
            .collect();
        let mut slots: Vec<Option<PathBuf>> = queue.into_iter().map(Some).collect();
        let mut emitted: HashSet<PathBuf> = HashSet::new();
        let mut deployables = DeployableSequence::new();

        for head in 0..slots.len() {
            let Some(entry) = slots[head].take() else {
                continue;
            };
            debug!(path = %entry.display(), "Top entry");

            match ArtifactKind::of(&entry) {
                Some(ArtifactKind::Package) => {
                    let descriptor = entry.with_extension(ArtifactKind::Descriptor.extension());
                    debug!(descriptor = %descriptor.display(), "Checking for descriptor override");

                    if descriptor.is_file() {
                        if let Some(&pos) = index.get(&descriptor) {
                            slots[pos] = None;
                        }
                        if emitted.contains(&descriptor) {
                            debug!(
                                package = %entry.display(),
                                descriptor = %descriptor.display(),
                                "Descriptor override already deployed"
                            );
                            continue;
                        }
                        debug!(
                            package = %entry.display(),
                            descriptor = %descriptor.display(),
                            "Descriptor override exists"
                        );
                        emitted.insert(descriptor.clone());
                        deployables.push(DeployableArtifact::override_for(descriptor, entry));
                    } else {
                        debug!(path = %entry.display(), "Using package directly");
                        emitted.insert(entry.clone());
                        deployables.push(DeployableArtifact::package(entry));
                    }
                }
                Some(ArtifactKind::Descriptor) => {
                    if emitted.insert(entry.clone()) {
                        debug!(path = %entry.display(), "Using descriptor directly");
                        deployables.push(DeployableArtifact::descriptor(entry));
                    }
                }
                None => {
                    info!(path = %entry.display(), "Ignoring unrecognized deployable file");
                }
            }
        }

        deployables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    fn resolved_names(seq: &DeployableSequence) -> Vec<String> {
        seq.iter()
            .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_package_with_descriptor_yields_descriptor_only() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["app.war", "app.xml"]);

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["app.xml"]);
        let only = seq.iter().next().unwrap();
        assert_eq!(only.kind, ArtifactKind::Descriptor);
        assert_eq!(only.overrides, Some(dir.path().join("app.war")));
    }

    #[test]
    fn test_lone_package_is_deployed_directly() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["app.war"]);

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["app.war"]);
        assert_eq!(seq.iter().next().unwrap().kind, ArtifactKind::Package);
    }

    #[test]
    fn test_unrelated_artifacts_keep_lexicographic_order() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["b.xml", "a.war"]);

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["a.war", "b.xml"]);
    }

    #[test]
    fn test_empty_directory_yields_empty_sequence() {
        let dir = tempdir().unwrap();

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert!(seq.is_empty());
    }

    #[test]
    fn test_unrecognized_files_are_never_deployed() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["readme.txt", "app.war", "notes", ".war"]);
        fs::create_dir(dir.path().join("exploded.war")).unwrap();

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["app.war"]);
    }

    #[test]
    fn test_override_substitutes_in_place() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["c.war", "a.war", "b.war", "b.xml", "d.xml"]);

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["a.war", "b.xml", "c.war", "d.xml"]);
    }

    #[test]
    fn test_two_packages_without_descriptors() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["one.war", "two.war"]);

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["one.war", "two.war"]);
    }

    #[test]
    fn test_upper_case_package_pairs_with_lower_case_descriptor() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["Shop.WAR", "Shop.xml"]);

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["Shop.xml"]);
    }

    #[test]
    fn test_descriptor_sorted_before_package_is_emitted_once() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["app.war", "app.xml"]);
        let queue = vec![dir.path().join("app.xml"), dir.path().join("app.war")];

        let seq = DeployableResolver::reduce(queue);

        assert_eq!(resolved_names(&seq), vec!["app.xml"]);
    }

    #[test]
    fn test_directory_entries_are_not_recursed() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested, &["inner.war"]);
        touch(dir.path(), &["outer.war"]);

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["outer.war"]);
    }

    #[test]
    fn test_missing_directory_is_scan_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("webapps-late");

        let err = DeployableResolver::new().resolve(&missing).unwrap_err();

        assert_eq!(err.kind, ScanErrorKind::NotFound);
        assert_eq!(err.path, missing);
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["app.war"]);

        let err = DeployableResolver::new()
            .resolve(&dir.path().join("app.war"))
            .unwrap_err();

        assert_eq!(err.kind, ScanErrorKind::NotADirectory);
    }

    #[test]
    fn test_unreadable_path_is_not_reported_missing() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["app.war"]);

        let err = DeployableResolver::new()
            .resolve(&dir.path().join("app.war").join("late"))
            .unwrap_err();

        assert!(matches!(err.kind, ScanErrorKind::Io(_)), "got {:?}", err.kind);
    }

    #[test]
    fn test_unrecognized_entry_in_queue_is_skipped() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["readme.txt", "a.war"]);
        let queue = vec![dir.path().join("readme.txt"), dir.path().join("a.war")];

        let seq = DeployableResolver::reduce(queue);

        assert_eq!(resolved_names(&seq), vec!["a.war"]);
    }

    #[test]
    fn test_descriptor_directory_does_not_override_package() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["app.war"]);
        fs::create_dir(dir.path().join("app.xml")).unwrap();

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["app.war"]);
        assert_eq!(seq.iter().next().unwrap().kind, ArtifactKind::Package);
    }

    #[test]
    fn test_multi_dot_package_pairs_on_last_suffix() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["foo.tar.war", "foo.tar.xml"]);

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        assert_eq!(resolved_names(&seq), vec!["foo.tar.xml"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_package_pairs_with_descriptor() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let war = dir.path().join(OsStr::from_bytes(b"caf\xE9.war"));
        let xml = dir.path().join(OsStr::from_bytes(b"caf\xE9.xml"));
        fs::write(&war, b"").unwrap();
        fs::write(&xml, b"").unwrap();

        let seq = DeployableResolver::new().resolve(dir.path()).unwrap();

        let paths: Vec<_> = seq.iter().map(|a| a.path.clone()).collect();
        assert_eq!(paths, vec![xml]);
        assert_eq!(seq.iter().next().unwrap().overrides, Some(war));
    }

    #[test]
    fn test_resolution_is_stable_across_runs() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["z.war", "m.xml", "a.war", "a.xml", "k.war"]);
        let resolver = DeployableResolver::new();

        let first = resolver.resolve(dir.path()).unwrap();
        let second = resolver.resolve(dir.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(resolved_names(&first), vec!["a.xml", "k.war", "m.xml", "z.war"]);
    }
}
