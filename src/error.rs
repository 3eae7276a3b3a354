//! Error types for trackchanges modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository at {path}: {source}")]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to find commit {0}: {1}")]
    CommitNotFound(String, #[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to look up tag '{0}': {1}")]
    TagLookup(String, #[source] git2::Error),

    #[error("Tag {tag} does not exist and no fallback branch was given")]
    MissingFallbackBranch { tag: String },
}

/// Errors from composing and writing changelog entries.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read changes file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write changes file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace changes file {path}: {source}")]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    #[error("Unknown release kind '{0}' (expected plasma, frameworks, applications or other)")]
    UnknownKind(String),

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Errors from resolving runtime configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No committer identity found. Pass --committer, set TRACKCHANGES_COMMITTER, or configure git user.name and user.email"
    )]
    MissingCommitter,

    #[error("Failed to read git configuration: {0}")]
    GitConfig(#[source] git2::Error),
}

/// Errors from loading batch manifests.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read spec file {path}: {source}")]
    SpecReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
