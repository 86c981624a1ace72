//! `azure:repo:pr` - create a pull request to a repository in Azure DevOps

use std::sync::Arc;

use async_trait::async_trait;
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tracing::{Level, event};

use crate::{
    domain::{
        action::{ActionContext, ActionOutput},
        constant::{DEFAULT_ORGANIZATION, DEFAULT_PUSH_BRANCH, DEFAULT_TARGET_BRANCH, action, action_id},
        credential::OrgAuth,
        error::ActionError,
        repository::PullRequestSpec
    },
    port::{action::TemplateAction, integration::IntegrationRegistry, pull_request::PullRequestClientFactory},
    service::{
        credentials::resolve_token,
        repository::{PullRequestRequest, create_pull_request}
    }
};

/// Create a PR to a repository in Azure DevOps.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestInput {
    /// Repo ID of the pull request.
    #[schemars(title = "Remote Repo ID")]
    pub repo_id:             String,
    /// The title of the pull request.
    #[schemars(title = "Title")]
    pub title:               String,
    /// The name of the organization in Azure DevOps.
    #[schemars(title = "Organization Name")]
    pub organization:        Option<String>,
    /// The branch to merge into the source.
    #[schemars(title = "Source Branch")]
    pub source_branch:       Option<String>,
    /// The branch to merge into (default: main).
    #[schemars(title = "Target Branch")]
    pub target_branch:       Option<String>,
    /// The Project in Azure DevOps.
    #[schemars(title = "ADO Project")]
    pub project:             Option<String>,
    /// Whether or not the PR supports iterations.
    #[schemars(title = "Supports Iterations")]
    pub supports_iterations: Option<bool>,
    /// The hostname of the Azure DevOps service. Defaults to dev.azure.com
    #[schemars(title = "Server hostname")]
    pub server:              Option<String>,
    /// The token to use for authorization.
    #[schemars(title = "Authentication Token")]
    pub token:               Option<String>
}

pub struct PullRequestAzureRepoAction {
    integrations:  Arc<dyn IntegrationRegistry>,
    pull_requests: Arc<dyn PullRequestClientFactory>
}

impl PullRequestAzureRepoAction {
    pub fn new(integrations: Arc<dyn IntegrationRegistry>, pull_requests: Arc<dyn PullRequestClientFactory>) -> Self {
        Self { integrations, pull_requests }
    }
}

fn non_empty_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(default)
}

#[async_trait]
impl TemplateAction for PullRequestAzureRepoAction {
    fn id(&self) -> &'static str {
        action_id::PULL_REQUEST
    }

    fn description(&self) -> &'static str {
        "Create a PR to a repository in Azure DevOps."
    }

    fn schema(&self) -> Value {
        schema_for!(PullRequestInput).to_value()
    }

    async fn handler(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        let input: PullRequestInput = ctx.typed_input()?;

        let spec = PullRequestSpec::new(
            non_empty_or(&input.source_branch, DEFAULT_PUSH_BRANCH),
            non_empty_or(&input.target_branch, DEFAULT_TARGET_BRANCH),
            input.title.clone()
        );

        let resolved = resolve_token(self.integrations.as_ref(), input.server.as_deref(), input.token.as_deref())?;
        let org = non_empty_or(&input.organization, DEFAULT_ORGANIZATION).to_string();

        event!(Level::INFO, event = action::ACTION_STARTED, run_id = %ctx.run_id, action = action_id::PULL_REQUEST,
               server = %resolved.host, org = %org, repo_id = %input.repo_id);

        let created = create_pull_request(self.pull_requests.as_ref(), PullRequestRequest {
            spec,
            server: resolved.host,
            auth: OrgAuth { org, token: resolved.token },
            repo_id: input.repo_id,
            project: input.project.filter(|p| !p.is_empty()),
            supports_iterations: input.supports_iterations
        })
        .await?;

        let mut output = ActionOutput::new().with("pullRequestId", created.pull_request_id);
        if let Some(url) = created.url {
            output = output.with("remoteUrl", url);
        }
        if let Some(status) = created.status {
            output = output.with("status", status);
        }

        Ok(output)
    }
}
