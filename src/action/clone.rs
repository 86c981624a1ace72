//! `azure:repo:clone` - clone an Azure repository into the workspace directory

use std::sync::Arc;

use async_trait::async_trait;
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tracing::{Level, event};

use crate::{
    domain::{
        action::{ActionContext, ActionOutput},
        constant::{DEFAULT_TARGET_PATH, action, action_id},
        credential::GitAuth,
        error::ActionError,
        workspace::resolve_safe_child_path
    },
    port::{action::TemplateAction, git::GitClient, integration::IntegrationRegistry},
    service::{
        credentials::resolve_token,
        repository::{CloneRequest, clone_repo}
    }
};

/// Clone an Azure repository into the workspace directory.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloneRepoInput {
    /// The Git URL to the repository.
    #[schemars(title = "Remote URL")]
    pub remote_url:  String,
    /// The branch to checkout to.
    #[schemars(title = "Repository Branch")]
    pub branch:      Option<String>,
    /// The subdirectory of the working directory to clone the repository into.
    #[schemars(title = "Working Subdirectory")]
    pub target_path: Option<String>,
    /// The hostname of the Azure DevOps service. Defaults to dev.azure.com
    #[schemars(title = "Server hostname")]
    pub server:      Option<String>,
    /// The token to use for authorization.
    #[schemars(title = "Authentication Token")]
    pub token:       Option<String>
}

pub struct CloneAzureRepoAction {
    integrations: Arc<dyn IntegrationRegistry>,
    git:          Arc<dyn GitClient>
}

impl CloneAzureRepoAction {
    pub fn new(integrations: Arc<dyn IntegrationRegistry>, git: Arc<dyn GitClient>) -> Self {
        Self { integrations, git }
    }
}

#[async_trait]
impl TemplateAction for CloneAzureRepoAction {
    fn id(&self) -> &'static str {
        action_id::CLONE
    }

    fn description(&self) -> &'static str {
        "Clone an Azure repository into the workspace directory."
    }

    fn schema(&self) -> Value {
        schema_for!(CloneRepoInput).to_value()
    }

    async fn handler(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        let input: CloneRepoInput = ctx.typed_input()?;

        let target_path = input.target_path.as_deref().unwrap_or(DEFAULT_TARGET_PATH);
        let output_dir = resolve_safe_child_path(ctx.workspace(), target_path)?;

        let resolved = resolve_token(self.integrations.as_ref(), input.server.as_deref(), input.token.as_deref())?;

        event!(Level::INFO, event = action::ACTION_STARTED, run_id = %ctx.run_id, action = action_id::CLONE,
               remote_url = %input.remote_url, dir = %output_dir.display());

        clone_repo(self.git.as_ref(), CloneRequest {
            dir:        output_dir.clone(),
            auth:       GitAuth::from_token(resolved.token),
            remote_url: input.remote_url,
            branch:     input.branch,
            remote:     None
        })
        .await?;

        Ok(ActionOutput::new().with("repoPath", output_dir.display().to_string()))
    }
}
