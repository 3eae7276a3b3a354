//! Version-control capability used by the commit summarizer.

use std::path::Path;

use git2::{Commit, ErrorCode, Oid, Repository, Sort};
use tracing::debug;

use crate::error::GitError;

/// The queries the changelog core needs from a source checkout.
///
/// This abstraction allows mocking the repository in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Vcs {
    /// Hashes of the non-merge commits reachable from `to` but not from
    /// `from`, newest first.
    fn list_commit_hashes(&self, from: &str, to: &str) -> Result<Vec<String>, GitError>;

    /// Subject line of a commit.
    fn commit_subject(&self, hash: &str) -> Result<String, GitError>;

    /// Full message of a commit, one entry per line.
    fn commit_body(&self, hash: &str) -> Result<Vec<String>, GitError>;

    /// Whether `refs/tags/<name>` exists.
    fn tag_exists(&self, name: &str) -> Result<bool, GitError>;
}

/// A git checkout opened at an explicit path.
///
/// All queries go through this handle, so the process working directory is
/// never touched.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository at `path`.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::open(path).map_err(|source| GitError::OpenRepository {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { repo })
    }

    /// Wrap an already opened repository.
    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// Resolve a reference (tag, branch, commit hash) to a commit OID.
    fn resolve_reference(&self, reference: &str) -> Result<Oid, GitError> {
        // Try as a direct OID first
        if let Ok(oid) = Oid::from_str(reference) {
            if self.repo.find_commit(oid).is_ok() {
                return Ok(oid);
            }
        }

        let obj = self
            .repo
            .revparse_single(reference)
            .map_err(|e| GitError::ReferenceNotFound(reference.to_string(), e))?;

        obj.peel_to_commit()
            .map(|commit| commit.id())
            .map_err(|e| GitError::ReferenceNotFound(reference.to_string(), e))
    }

    fn find_commit(&self, hash: &str) -> Result<Commit<'_>, GitError> {
        let oid = Oid::from_str(hash).map_err(|e| GitError::CommitNotFound(hash.to_string(), e))?;
        self.repo
            .find_commit(oid)
            .map_err(|e| GitError::CommitNotFound(hash.to_string(), e))
    }
}

impl Vcs for GitRepository {
    fn list_commit_hashes(&self, from: &str, to: &str) -> Result<Vec<String>, GitError> {
        let to_oid = self.resolve_reference(to)?;
        let from_oid = self.resolve_reference(from)?;

        let mut revwalk = self.repo.revwalk().map_err(GitError::RevwalkError)?;
        revwalk.set_sorting(Sort::TIME).map_err(GitError::RevwalkError)?;
        revwalk.push(to_oid).map_err(GitError::RevwalkError)?;
        revwalk.hide(from_oid).map_err(GitError::RevwalkError)?;

        let mut hashes = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result.map_err(GitError::RevwalkError)?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| GitError::CommitNotFound(oid.to_string(), e))?;

            if commit.parent_count() > 1 {
                debug!(commit = %oid, "Skipping merge commit");
                continue;
            }

            hashes.push(oid.to_string());
        }

        Ok(hashes)
    }

    fn commit_subject(&self, hash: &str) -> Result<String, GitError> {
        let commit = self.find_commit(hash)?;
        let subject = commit
            .summary_bytes()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .unwrap_or_default();
        Ok(subject)
    }

    fn commit_body(&self, hash: &str) -> Result<Vec<String>, GitError> {
        let commit = self.find_commit(hash)?;
        let message = String::from_utf8_lossy(commit.message_bytes());
        Ok(message.lines().map(str::to_string).collect())
    }

    fn tag_exists(&self, name: &str) -> Result<bool, GitError> {
        match self.repo.find_reference(&format!("refs/tags/{name}")) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => Ok(false),
            Err(e) => Err(GitError::TagLookup(name.to_string(), e)),
        }
    }
}
