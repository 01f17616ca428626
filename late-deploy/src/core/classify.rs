//! File naming helpers used to classify deployable artifacts.

use std::path::Path;

/// Returns the last segment of `path` with any dot suffix removed.
///
/// ```
/// use std::path::Path;
/// use late_deploy::core::basename;
///
/// assert_eq!(basename(Path::new("/srv/late/foo.tar.gz")), "foo.tar");
/// assert_eq!(basename(Path::new("foo")), "foo");
/// ```
#[must_use]
pub fn basename(path: &Path) -> String {
    let Some(name) = path.file_name() else {
        return String::new();
    };
    let name = name.to_string_lossy();
    match name.rfind('.') {
        Some(dot) => name[..dot].to_string(),
        None => name.into_owned(),
    }
}

/// Returns the lower-cased extension of a regular file.
///
/// Absent when the path has no final segment, is not a regular file at
/// call time, has no dot, or only has a leading dot (`.bar`). A name
/// ending in a dot yields an empty extension.
#[must_use]
pub fn extension(path: &Path) -> Option<String> {
    let name = path.file_name()?;
    if !path.is_file() {
        return None;
    }
    extension_of_name(&name.to_string_lossy())
}

/// Applies the extension rule to a bare file name, without touching the
/// filesystem.
///
/// Names ending in a path separator have no extension; anything before
/// the last separator is ignored.
///
/// ```
/// use late_deploy::core::extension_of_name;
///
/// assert_eq!(extension_of_name("foo.tar.gz").as_deref(), Some("gz"));
/// assert_eq!(extension_of_name("foo.").as_deref(), Some(""));
/// assert_eq!(extension_of_name("foo"), None);
/// assert_eq!(extension_of_name(".bar"), None);
/// ```
#[must_use]
pub fn extension_of_name(name: &str) -> Option<String> {
    if name.ends_with('/') || name.ends_with('\\') {
        return None;
    }
    let name = match name.rfind(std::path::MAIN_SEPARATOR) {
        Some(slash) => &name[slash + 1..],
        None => name,
    };
    match name.rfind('.') {
        None | Some(0) => None,
        Some(dot) => Some(name[dot + 1..].to_lowercase()),
    }
}

/// Tests an already computed extension against a candidate set.
///
/// Candidates are expected in lower case without the leading dot.
#[must_use]
pub fn matches_extension(ext: Option<&str>, candidates: &[&str]) -> bool {
    ext.is_some_and(|ext| candidates.contains(&ext))
}

/// Tests whether `path` is a regular file whose extension is one of `candidates`.
#[must_use]
pub fn is_extension(path: &Path, candidates: &[&str]) -> bool {
    matches_extension(extension(path).as_deref(), candidates)
}
