//! Repository operations composed from the git and pull request ports
//!
//! Each operation is a straight sequence; the first failing step aborts it
//! and nothing already done is rolled back.

use std::path::PathBuf;

use crate::{
    domain::{
        constant::{DEFAULT_CLONE_BRANCH, DEFAULT_PUSH_BRANCH, DEFAULT_REMOTE},
        credential::{GitAuth, OrgAuth},
        error::ActionError,
        repository::{CommitInfo, CreatedPullRequest, GitAuthorInfo, PullRequestSpec, branch_ref}
    },
    port::{
        git::{CloneOptions, GitClient, PushOptions},
        pull_request::PullRequestClientFactory
    }
};

#[derive(Debug, Clone)]
pub struct CloneRequest {
    pub dir:        PathBuf,
    pub auth:       GitAuth,
    pub remote_url: String,
    /// Defaults to `main`
    pub branch:     Option<String>,
    /// Defaults to `origin`
    pub remote:     Option<String>
}

/// Clone, register the remote, check out the branch
pub async fn clone_repo(git: &dyn GitClient, request: CloneRequest) -> Result<(), ActionError> {
    let branch = request.branch.as_deref().unwrap_or(DEFAULT_CLONE_BRANCH);
    let remote = request.remote.as_deref().unwrap_or(DEFAULT_REMOTE);

    git.clone_repository(&request.remote_url, &request.dir, &CloneOptions { auth: Some(request.auth.clone()) })
        .await?;
    git.add_remote(&request.dir, remote, &request.remote_url).await?;
    git.checkout(&request.dir, branch, remote).await?;

    Ok(())
}

#[derive(Debug, Clone)]
pub struct PushRequest {
    pub dir:            PathBuf,
    pub auth:           GitAuth,
    pub commit_message: String,
    pub author:         GitAuthorInfo,
    /// Defaults to `scaffolder`
    pub branch:         Option<String>,
    /// Defaults to `origin`
    pub remote:         Option<String>
}

/// Switch to the branch, stage everything, commit, push.
///
/// A commit created before a failed push stays in the local repository.
pub async fn commit_and_push_branch(git: &dyn GitClient, request: PushRequest) -> Result<CommitInfo, ActionError> {
    let branch = request.branch.as_deref().unwrap_or(DEFAULT_PUSH_BRANCH);
    let remote = request.remote.as_deref().unwrap_or(DEFAULT_REMOTE);
    let identity = request.author.resolve();

    let current = git.current_branch(&request.dir).await?;
    if current.as_deref() != Some(branch) {
        git.branch(&request.dir, branch).await?;
        git.checkout(&request.dir, branch, remote).await?;
    }

    git.add_all(&request.dir).await?;
    let commit = git.commit(&request.dir, &request.commit_message, &identity, &identity).await?;

    git.push(&request.dir, &PushOptions {
        remote:     remote.to_string(),
        branch:     branch.to_string(),
        remote_ref: branch_ref(branch),
        auth:       Some(request.auth.clone())
    })
    .await?;

    Ok(commit)
}

#[derive(Debug, Clone)]
pub struct PullRequestRequest {
    pub spec:                PullRequestSpec,
    pub server:              String,
    pub auth:                OrgAuth,
    pub repo_id:             String,
    pub project:             Option<String>,
    pub supports_iterations: Option<bool>
}

/// Open a session for the organization and submit one create call; no retry
pub async fn create_pull_request(
    factory: &dyn PullRequestClientFactory,
    request: PullRequestRequest
) -> Result<CreatedPullRequest, ActionError> {
    let client = factory.connect(&request.server, &request.auth)?;

    client
        .create_pull_request(&request.spec, &request.repo_id, request.project.as_deref(), request.supports_iterations)
        .await
}
