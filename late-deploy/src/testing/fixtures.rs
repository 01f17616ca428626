//! Scan directory fixtures.

use std::path::{Path, PathBuf};

/// Writes artifacts into an existing scan directory.
#[derive(Debug, Clone)]
pub struct ScanDirFixture {
    root: PathBuf,
}

impl ScanDirFixture {
    /// Wraps `root`, creating it if needed.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).expect("create scan directory");
        Self { root }
    }

    /// The scan directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `<basename>.war`.
    pub fn war(&self, basename: &str) -> PathBuf {
        self.file(&format!("{basename}.war"), b"PK\x03\x04")
    }

    /// Writes `<basename>.xml` pointing at the sibling package.
    pub fn xml(&self, basename: &str) -> PathBuf {
        let descriptor = format!(
            "<Configure class=\"WebAppContext\">\n  \
             <Set name=\"contextPath\">/{basename}</Set>\n  \
             <Set name=\"war\">{basename}.war</Set>\n\
             </Configure>\n"
        );
        self.file(&format!("{basename}.xml"), descriptor.as_bytes())
    }

    /// Writes an arbitrary file.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, contents).expect("write fixture file");
        path
    }
}
