//! Repository domain types shared by the git and pull request operations

use serde::{Deserialize, Serialize};

use crate::domain::constant::{DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME};

/// Author information as supplied by the caller; either half may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitAuthorInfo {
    pub name:  Option<String>,
    pub email: Option<String>
}

impl GitAuthorInfo {
    /// Fill missing halves with the scaffolder identity
    pub fn resolve(&self) -> GitIdentity {
        GitIdentity {
            name:  self.name.clone().filter(|n| !n.is_empty()).unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string()),
            email: self.email.clone().filter(|e| !e.is_empty()).unwrap_or_else(|| DEFAULT_AUTHOR_EMAIL.to_string())
        }
    }
}

/// Fully resolved identity used for both author and committer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitIdentity {
    pub name:  String,
    pub email: String
}

/// Identifiers of the commit created by the push flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit ID
    pub id:       String,
    /// Short commit ID (first 8 characters)
    pub short_id: String
}

/// Body of a create-pull-request call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestSpec {
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub title:           String
}

impl PullRequestSpec {
    pub fn new(source_branch: &str, target_branch: &str, title: impl Into<String>) -> Self {
        Self { source_ref_name: branch_ref(source_branch), target_ref_name: branch_ref(target_branch), title: title.into() }
    }
}

/// The subset of the created pull request that actions report back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPullRequest {
    pub pull_request_id: u64,
    #[serde(default)]
    pub url:             Option<String>,
    #[serde(default)]
    pub status:          Option<String>
}

/// Qualify a branch name as `refs/heads/<branch>`, leaving full refs untouched
pub fn branch_ref(branch: &str) -> String {
    if branch.starts_with("refs/") { branch.to_string() } else { format!("refs/heads/{}", branch) }
}
