//! Pull request port traits

use async_trait::async_trait;

use crate::domain::{
    credential::OrgAuth,
    error::ActionError,
    repository::{CreatedPullRequest, PullRequestSpec}
};

/// An authenticated session against one Azure DevOps organization
#[async_trait]
pub trait PullRequestClient: Send + Sync {
    /// Submit a single create-pull-request call
    async fn create_pull_request(
        &self,
        spec: &PullRequestSpec,
        repo_id: &str,
        project: Option<&str>,
        supports_iterations: Option<bool>
    ) -> Result<CreatedPullRequest, ActionError>;
}

/// Builds a fresh session per call; sessions are never retained
pub trait PullRequestClientFactory: Send + Sync + 'static {
    fn connect(&self, server: &str, auth: &OrgAuth) -> Result<Box<dyn PullRequestClient>, ActionError>;
}
