//! Commit message access
//!
//! Hook actions are driven by the text of the commit a ref or patch set
//! points at. [`CommitReader`] is the seam; [`GitCommitReader`] reads from
//! the host's on-disk repositories, [`StaticCommits`] serves canned
//! messages for tests.

use git2::Repository;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reading a commit message
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository directory exists for the project
    #[error("no repository for project {project:?}")]
    RepositoryNotFound { project: String },

    /// The revision does not resolve in the project's repository
    #[error("unknown revision {revision:?} in project {project:?}")]
    UnknownRevision { project: String, revision: String },

    /// The commit message is not valid UTF-8
    #[error("commit message at {revision} is not valid UTF-8")]
    MessageNotUtf8 { revision: String },

    /// Git library errors
    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),
}

/// Source of commit messages, keyed by project and revision.
///
/// `revision` accepts anything the repository can resolve: a commit id, a
/// branch, or a magic patch-set ref.
pub trait CommitReader: Send + Sync {
    fn commit_message(&self, project: &str, revision: &str) -> Result<String, GitError>;
}

/// Reads commit messages from the host's repository tree.
///
/// Projects live under one base directory, either bare (`<base>/<project>.git`)
/// or as working copies (`<base>/<project>`).
pub struct GitCommitReader {
    base_dir: PathBuf,
}

impl GitCommitReader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn repository_path(&self, project: &str) -> Option<PathBuf> {
        let bare = self.base_dir.join(format!("{}.git", project));
        if bare.exists() {
            return Some(bare);
        }
        let plain = self.base_dir.join(project);
        if plain.exists() {
            return Some(plain);
        }
        None
    }
}

impl CommitReader for GitCommitReader {
    fn commit_message(&self, project: &str, revision: &str) -> Result<String, GitError> {
        let path = self
            .repository_path(project)
            .ok_or_else(|| GitError::RepositoryNotFound {
                project: project.to_string(),
            })?;

        tracing::debug!(
            project = project,
            revision = revision,
            path = %path.display(),
            "Reading commit message"
        );

        let repo = Repository::open(&path)?;
        let object = repo
            .revparse_single(revision)
            .map_err(|_| GitError::UnknownRevision {
                project: project.to_string(),
                revision: revision.to_string(),
            })?;
        let commit = object.peel_to_commit()?;

        let message = commit.message().ok_or_else(|| GitError::MessageNotUtf8 {
            revision: revision.to_string(),
        })?;

        Ok(message.to_string())
    }
}

/// In-memory commit messages for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCommits {
    messages: HashMap<(String, String), String>,
}

impl StaticCommits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commit(
        mut self,
        project: impl Into<String>,
        revision: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.messages
            .insert((project.into(), revision.into()), message.into());
        self
    }
}

impl CommitReader for StaticCommits {
    fn commit_message(&self, project: &str, revision: &str) -> Result<String, GitError> {
        self.messages
            .get(&(project.to_string(), revision.to_string()))
            .cloned()
            .ok_or_else(|| GitError::UnknownRevision {
                project: project.to_string(),
                revision: revision.to_string(),
            })
    }
}
