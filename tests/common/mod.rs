//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use git2::{Oid, Repository, Signature, Time};
use trackchanges::FixedClock;

/// Committer used in expected entry headers.
pub const COMMITTER: &str = "Jane Packager <jane@example.org>";

/// Header line produced by [`fixed_clock`] and [`COMMITTER`].
pub const HEADER: &str = "-------------------------------------------------------------------\n\
                          Thu Aug 24 09:05:03 UTC 2023 - Jane Packager <jane@example.org>\n\n";

/// A clock frozen at Thu Aug 24 09:05:03 UTC 2023.
pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2023, 8, 24, 9, 5, 3).unwrap().fixed_offset())
}

/// Create a temporary directory for test output.
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write a changes file with the given content into `dir`.
pub fn changes_file(dir: &Path, package: &str, content: &str) -> PathBuf {
    let path = dir.join(format!("{}.changes", package));
    std::fs::write(&path, content).expect("Failed to write changes file");
    path
}

/// A test git repository builder for integration tests.
///
/// Commits get strictly increasing timestamps so history order is stable.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
    counter: std::cell::Cell<i64>,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self::init_at(dir)
    }

    fn init_at(dir: tempfile::TempDir) -> Self {
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self {
            dir,
            repo,
            counter: std::cell::Cell::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory containing this repository, usable as a checkout directory.
    pub fn checkout_dir(&self) -> PathBuf {
        self.dir.path().parent().expect("temp dir has a parent").to_path_buf()
    }

    /// Name of this repository inside [`TestRepo::checkout_dir`].
    pub fn name(&self) -> String {
        self.dir
            .path()
            .file_name()
            .expect("temp dir has a name")
            .to_string_lossy()
            .into_owned()
    }

    fn signature(&self) -> Signature<'static> {
        let tick = self.counter.get() + 1;
        self.counter.set(tick);
        Signature::new("Test User", "test@example.com", &Time::new(1_700_000_000 + tick * 60, 0))
            .expect("Failed to create signature")
    }

    /// Create a commit on HEAD with the given message. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<Oid> = parent.iter().map(|c| c.id()).collect();
        self.commit_with_parents(message, &parents, Some("HEAD"))
    }

    /// Create a commit with explicit parents, optionally updating a reference.
    pub fn commit_with_parents(&self, message: &str, parents: &[Oid], update_ref: Option<&str>) -> Oid {
        let sig = self.signature();

        // Create or update a file to have something to commit
        let file_path = self.dir.path().join("test.txt");
        std::fs::write(&file_path, format!("{}\n{}", message, self.counter.get()))
            .expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new("test.txt")).expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).expect("Failed to find parent"))
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        self.repo
            .commit(update_ref, &sig, &sig, message, &tree, &parent_refs)
            .expect("Failed to create commit")
    }

    /// Create a lightweight tag pointing to the given OID.
    pub fn tag_lightweight(&self, name: &str, oid: Oid) {
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo
            .tag_lightweight(name, &obj, false)
            .expect("Failed to create lightweight tag");
    }

    /// Create an annotated tag pointing to the given OID.
    pub fn tag_annotated(&self, name: &str, oid: Oid, message: &str) {
        let sig = self.signature();
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo
            .tag(name, &obj, &sig, message, false)
            .expect("Failed to create annotated tag");
    }

    /// Create a branch pointing to the given OID.
    pub fn branch(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo
            .branch(name, &commit, false)
            .expect("Failed to create branch");
    }
}
