//! Git2 implementation of git ports
//!
//! libgit2 is blocking, so every operation runs on the blocking thread pool.

use std::path::Path;

use async_trait::async_trait;
use git2::{
    BranchType, Commit, Cred, ErrorCode, FetchOptions, IndexAddOption, PushOptions as Git2PushOptions,
    RemoteCallbacks, Repository, Signature,
    build::{CheckoutBuilder, RepoBuilder}
};
use tracing::{Level, event};

use crate::{
    domain::{
        constant::git,
        credential::GitAuth,
        error::ActionError,
        repository::{CommitInfo, GitIdentity}
    },
    port::git::{CloneOptions, GitClient, PushOptions}
};

/// Git2 implementation of GitClient
pub struct Git2Client;

impl Git2Client {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Client {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitClient for Git2Client {
    async fn clone_repository(&self, url: &str, dir: &Path, options: &CloneOptions) -> Result<(), ActionError> {
        let url = url.to_string();
        let dir = dir.to_path_buf();
        let auth = options.auth.clone();

        run_blocking("clone", move || {
            if let Some(parent) = dir.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ActionError::FileSystem(e.to_string()))?;
            }

            event!(Level::INFO, event = git::CLONE_STARTED, url = %url, dir = %dir.display());

            let mut fetch_options = FetchOptions::new();
            fetch_options.remote_callbacks(remote_callbacks(auth));

            let mut builder = RepoBuilder::new();
            builder.fetch_options(fetch_options);

            let repo = builder
                .clone(&url, &dir)
                .map_err(|e| ActionError::Operation(format!("Failed to clone repository {}: {}", url, e.message())))?;

            let head = repo.head().ok().and_then(|h| h.target()).map(|oid| oid.to_string()).unwrap_or_default();
            event!(Level::INFO, event = git::CLONE_COMPLETED, url = %url, head = %head);

            Ok(())
        })
        .await
    }

    async fn add_remote(&self, dir: &Path, remote: &str, url: &str) -> Result<(), ActionError> {
        let dir = dir.to_path_buf();
        let remote = remote.to_string();
        let url = url.to_string();

        run_blocking("add-remote", move || {
            let repo = open_repository(&dir)?;

            if repo.find_remote(&remote).is_ok() {
                repo.remote_set_url(&remote, &url)
                    .map_err(|e| ActionError::Operation(format!("Failed to update remote '{}': {}", remote, e)))?;
            } else {
                repo.remote(&remote, &url)
                    .map_err(|e| ActionError::Operation(format!("Failed to add remote '{}': {}", remote, e)))?;
            }

            event!(Level::DEBUG, event = git::REMOTE_REGISTERED, remote = %remote, url = %url);
            Ok(())
        })
        .await
    }

    async fn checkout(&self, dir: &Path, branch: &str, remote: &str) -> Result<(), ActionError> {
        let dir = dir.to_path_buf();
        let branch = branch.to_string();
        let remote = remote.to_string();

        run_blocking("checkout", move || {
            let repo = open_repository(&dir)?;
            let refname = format!("refs/heads/{}", branch);

            let target = match local_or_tracking_branch(&repo, &branch, &remote)? {
                Some(commit) => commit,
                None if head_is_unborn(&repo) => {
                    // Nothing to check out yet; the first commit lands on the new branch
                    repo.set_head(&refname)
                        .map_err(|e| ActionError::Operation(format!("Failed to set HEAD to {}: {}", refname, e)))?;
                    event!(Level::DEBUG, event = git::CHECKOUT_COMPLETED, branch = %branch, unborn = true);
                    return Ok(());
                }
                None => {
                    return Err(ActionError::Operation(format!(
                        "Could not find branch '{}' locally or on remote '{}'",
                        branch, remote
                    )));
                }
            };

            repo.checkout_tree(target.as_object(), Some(CheckoutBuilder::new().safe()))
                .map_err(|e| ActionError::Operation(format!("Failed to check out '{}': {}", branch, e)))?;
            repo.set_head(&refname)
                .map_err(|e| ActionError::Operation(format!("Failed to set HEAD to {}: {}", refname, e)))?;

            event!(Level::DEBUG, event = git::CHECKOUT_COMPLETED, branch = %branch, commit = %target.id());
            Ok(())
        })
        .await
    }

    async fn current_branch(&self, dir: &Path) -> Result<Option<String>, ActionError> {
        let dir = dir.to_path_buf();

        run_blocking("current-branch", move || {
            let repo = open_repository(&dir)?;
            let head = repo
                .find_reference("HEAD")
                .map_err(|e| ActionError::Operation(format!("Failed to read HEAD: {}", e)))?;

            Ok(head.symbolic_target().and_then(|t| t.strip_prefix("refs/heads/")).map(str::to_string))
        })
        .await
    }

    async fn branch(&self, dir: &Path, branch: &str) -> Result<(), ActionError> {
        let dir = dir.to_path_buf();
        let branch = branch.to_string();

        run_blocking("branch", move || {
            let repo = open_repository(&dir)?;

            if repo.find_branch(&branch, BranchType::Local).is_ok() {
                return Ok(());
            }

            let Some(head) = head_commit(&repo)? else {
                return Ok(());
            };

            repo.branch(&branch, &head, false)
                .map_err(|e| ActionError::Operation(format!("Failed to create branch '{}': {}", branch, e)))?;

            event!(Level::DEBUG, event = git::BRANCH_CREATED, branch = %branch, commit = %head.id());
            Ok(())
        })
        .await
    }

    async fn add_all(&self, dir: &Path) -> Result<(), ActionError> {
        let dir = dir.to_path_buf();

        run_blocking("add", move || {
            let repo = open_repository(&dir)?;
            let mut index =
                repo.index().map_err(|e| ActionError::Operation(format!("Failed to get repository index: {}", e)))?;

            index
                .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
                .map_err(|e| ActionError::Operation(format!("Failed to add files to index: {}", e)))?;
            index
                .update_all(["*"].iter(), None)
                .map_err(|e| ActionError::Operation(format!("Failed to stage removed files: {}", e)))?;
            index.write().map_err(|e| ActionError::Operation(format!("Failed to write index: {}", e)))?;

            event!(Level::DEBUG, event = git::INDEX_STAGED, entries = index.len());
            Ok(())
        })
        .await
    }

    async fn commit(
        &self,
        dir: &Path,
        message: &str,
        author: &GitIdentity,
        committer: &GitIdentity
    ) -> Result<CommitInfo, ActionError> {
        let dir = dir.to_path_buf();
        let message = message.to_string();
        let author = author.clone();
        let committer = committer.clone();

        run_blocking("commit", move || {
            let repo = open_repository(&dir)?;

            let mut index =
                repo.index().map_err(|e| ActionError::Operation(format!("Failed to get repository index: {}", e)))?;
            let tree_id = index.write_tree().map_err(|e| ActionError::Operation(format!("Failed to write tree: {}", e)))?;
            let tree = repo.find_tree(tree_id).map_err(|e| ActionError::Operation(format!("Failed to find tree: {}", e)))?;

            let author_sig = signature(&author)?;
            let committer_sig = signature(&committer)?;

            let parent = head_commit(&repo)?;
            let parents: Vec<&Commit<'_>> = parent.iter().collect();

            let oid = repo
                .commit(Some("HEAD"), &author_sig, &committer_sig, &message, &tree, &parents)
                .map_err(|e| ActionError::Operation(format!("Failed to create commit: {}", e)))?;
            let commit =
                repo.find_commit(oid).map_err(|e| ActionError::Operation(format!("Failed to find commit: {}", e)))?;

            event!(Level::INFO, event = git::COMMIT_CREATED, commit = %oid, parents = parents.len());
            Ok(commit_info(&commit))
        })
        .await
    }

    async fn push(&self, dir: &Path, options: &PushOptions) -> Result<(), ActionError> {
        let dir = dir.to_path_buf();
        let options = options.clone();

        run_blocking("push", move || {
            let repo = open_repository(&dir)?;
            let mut remote = repo
                .find_remote(&options.remote)
                .map_err(|e| ActionError::Operation(format!("Failed to find remote '{}': {}", options.remote, e)))?;

            let mut callbacks = remote_callbacks(options.auth.clone());
            callbacks.push_update_reference(|refname, status| match status {
                Some(msg) => {
                    event!(Level::WARN, event = git::PUSH_REJECTED, reference = %refname, reason = %msg);
                    Err(git2::Error::from_str(&format!("Remote rejected {}: {}", refname, msg)))
                }
                None => Ok(())
            });

            let mut push_options = Git2PushOptions::new();
            push_options.remote_callbacks(callbacks);

            let refspec = format!("refs/heads/{}:{}", options.branch, options.remote_ref);
            event!(Level::INFO, event = git::PUSH_STARTED, remote = %options.remote, refspec = %refspec);

            remote
                .push(&[refspec.as_str()], Some(&mut push_options))
                .map_err(|e| ActionError::Operation(format!("Failed to push to '{}': {}", options.remote, e.message())))?;

            event!(Level::INFO, event = git::PUSH_COMPLETED, remote = %options.remote, remote_ref = %options.remote_ref);
            Ok(())
        })
        .await
    }
}

async fn run_blocking<T, F>(operation: &'static str, f: F) -> Result<T, ActionError>
where
    F: FnOnce() -> Result<T, ActionError> + Send + 'static,
    T: Send + 'static
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ActionError::Operation(format!("git {} task failed: {}", operation, e)))?
}

fn open_repository(dir: &Path) -> Result<Repository, ActionError> {
    Repository::open(dir)
        .map_err(|e| ActionError::Operation(format!("Failed to open repository at {}: {}", dir.display(), e)))
}

/// Token credentials are offered once; libgit2 keeps asking after a rejection
fn remote_callbacks(auth: Option<GitAuth>) -> RemoteCallbacks<'static> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0u32;

    callbacks.credentials(move |_url, _username_from_url, _allowed_types| {
        attempts += 1;
        match &auth {
            Some(_) if attempts > 1 => Err(git2::Error::from_str("authentication rejected by remote")),
            Some(auth) => Cred::userpass_plaintext(&auth.username, &auth.password),
            None => Cred::default()
        }
    });

    callbacks
}

fn head_is_unborn(repo: &Repository) -> bool {
    matches!(repo.head(), Err(e) if e.code() == ErrorCode::UnbornBranch)
}

fn head_commit(repo: &Repository) -> Result<Option<Commit<'_>>, ActionError> {
    match repo.head() {
        Ok(head) => head
            .peel_to_commit()
            .map(Some)
            .map_err(|e| ActionError::Operation(format!("Failed to get HEAD commit: {}", e))),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
        Err(e) => Err(ActionError::Operation(format!("Failed to get HEAD: {}", e)))
    }
}

/// Commit of the local branch, or of `<remote>/<branch>` after creating a tracking branch for it
fn local_or_tracking_branch<'r>(
    repo: &'r Repository,
    branch: &str,
    remote: &str
) -> Result<Option<Commit<'r>>, ActionError> {
    if let Ok(local) = repo.find_branch(branch, BranchType::Local) {
        let commit = local
            .get()
            .peel_to_commit()
            .map_err(|e| ActionError::Operation(format!("Failed to resolve branch '{}': {}", branch, e)))?;
        return Ok(Some(commit));
    }

    let upstream = format!("{}/{}", remote, branch);
    let Ok(remote_branch) = repo.find_branch(&upstream, BranchType::Remote) else {
        return Ok(None);
    };

    let commit = remote_branch
        .get()
        .peel_to_commit()
        .map_err(|e| ActionError::Operation(format!("Failed to resolve '{}': {}", upstream, e)))?;
    let mut local = repo
        .branch(branch, &commit, false)
        .map_err(|e| ActionError::Operation(format!("Failed to create branch '{}': {}", branch, e)))?;
    local
        .set_upstream(Some(&upstream))
        .map_err(|e| ActionError::Operation(format!("Failed to track '{}': {}", upstream, e)))?;

    Ok(Some(commit))
}

fn signature(identity: &GitIdentity) -> Result<Signature<'static>, ActionError> {
    Signature::now(&identity.name, &identity.email)
        .map_err(|e| ActionError::Operation(format!("Failed to create signature: {}", e)))
}

fn commit_info(commit: &Commit<'_>) -> CommitInfo {
    let id = commit.id().to_string();
    CommitInfo { short_id: id[..8].to_string(), id }
}
