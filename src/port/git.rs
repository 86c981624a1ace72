//! Git repository management port traits
//!
//! This module defines the git operations the scaffolder actions compose.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::{
    credential::GitAuth,
    error::ActionError,
    repository::{CommitInfo, GitIdentity}
};

/// Configuration for cloning repositories
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    /// Credentials for the remote, if it needs any
    pub auth: Option<GitAuth>
}

/// Configuration for pushing a branch
#[derive(Debug, Clone)]
pub struct PushOptions {
    /// Remote name to push to
    pub remote:     String,
    /// Local branch name
    pub branch:     String,
    /// Ref to update on the remote, e.g. `refs/heads/main`
    pub remote_ref: String,
    /// Credentials for the remote
    pub auth:       Option<GitAuth>
}

/// Git client trait for repository operations
#[async_trait]
pub trait GitClient: Send + Sync + 'static {
    /// Clone a repository into `dir`
    async fn clone_repository(&self, url: &str, dir: &Path, options: &CloneOptions) -> Result<(), ActionError>;

    /// Register a remote, re-pointing it when one with the same name exists
    async fn add_remote(&self, dir: &Path, remote: &str, url: &str) -> Result<(), ActionError>;

    /// Check out a local branch, creating it from `<remote>/<branch>` when only the remote one exists
    async fn checkout(&self, dir: &Path, branch: &str, remote: &str) -> Result<(), ActionError>;

    /// Name of the branch HEAD points to, `None` when HEAD is detached
    async fn current_branch(&self, dir: &Path) -> Result<Option<String>, ActionError>;

    /// Create a local branch at HEAD; an existing branch is left as is
    async fn branch(&self, dir: &Path, branch: &str) -> Result<(), ActionError>;

    /// Stage every change in the working tree, deletions included
    async fn add_all(&self, dir: &Path) -> Result<(), ActionError>;

    /// Commit the index on top of HEAD
    async fn commit(
        &self,
        dir: &Path,
        message: &str,
        author: &GitIdentity,
        committer: &GitIdentity
    ) -> Result<CommitInfo, ActionError>;

    /// Push a local branch to a remote ref
    async fn push(&self, dir: &Path, options: &PushOptions) -> Result<(), ActionError>;
}
