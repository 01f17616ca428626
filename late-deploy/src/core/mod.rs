//! Core domain model types.
//!
//! This module contains the file classification rules and the artifact
//! types produced by a scan:
//! - Basename and extension helpers
//! - Artifact kinds, deployable artifacts and sequences

mod artifact;
mod classify;

pub use artifact::{
    ArtifactKind, DeployableArtifact, DeployableSequence, ACCEPTED_EXTENSIONS,
    DESCRIPTOR_EXTENSION, PACKAGE_EXTENSION,
};
pub use classify::{basename, extension, extension_of_name, is_extension, matches_extension};
