//! `azure:repo:push` - push the content in the workspace to a remote Azure repository

use std::sync::Arc;

use async_trait::async_trait;
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tracing::{Level, event};

use crate::{
    domain::{
        action::{ActionContext, ActionOutput},
        constant::{DEFAULT_COMMIT_MESSAGE, DEFAULT_PUSH_BRANCH, action, action_id, config_key},
        credential::GitAuth,
        error::ActionError,
        repository::GitAuthorInfo,
        workspace::repo_source_directory
    },
    port::{action::TemplateAction, config::ConfigReader, git::GitClient, integration::IntegrationRegistry},
    service::{
        credentials::resolve_token,
        repository::{PushRequest, commit_and_push_branch}
    }
};

/// Push the content in the workspace to a remote Azure repository.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushRepoInput {
    /// The branch to checkout to.
    #[schemars(title = "Repository Branch")]
    pub branch:             Option<String>,
    /// The subdirectory of the working directory containing the repository.
    #[schemars(title = "Working Subdirectory")]
    pub source_path:        Option<String>,
    /// Sets the commit message on the repository. The default value is 'Initial commit'
    #[schemars(title = "Git Commit Message")]
    pub git_commit_message: Option<String>,
    /// Sets the default author name for the commit. The default value is 'Scaffolder'.
    #[schemars(title = "Default Author Name")]
    pub git_author_name:    Option<String>,
    /// Sets the default author email for the commit.
    #[schemars(title = "Default Author Email")]
    pub git_author_email:   Option<String>,
    /// The hostname of the Azure DevOps service. Defaults to dev.azure.com
    #[schemars(title = "Server hostname")]
    pub server:             Option<String>,
    /// The token to use for authorization.
    #[schemars(title = "Authentication Token")]
    pub token:              Option<String>
}

pub struct PushAzureRepoAction {
    integrations: Arc<dyn IntegrationRegistry>,
    config:       Arc<dyn ConfigReader>,
    git:          Arc<dyn GitClient>
}

impl PushAzureRepoAction {
    pub fn new(integrations: Arc<dyn IntegrationRegistry>, config: Arc<dyn ConfigReader>, git: Arc<dyn GitClient>) -> Self {
        Self { integrations, config, git }
    }

    /// Input value, then configured default; empty strings count as unset
    fn input_or_config(&self, value: Option<&str>, key: &str) -> Option<String> {
        value
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| self.config.get_optional_string(key).filter(|v| !v.is_empty()))
    }

    fn author_info(&self, input: &PushRepoInput) -> GitAuthorInfo {
        GitAuthorInfo {
            name:  self.input_or_config(input.git_author_name.as_deref(), config_key::DEFAULT_AUTHOR_NAME),
            email: self.input_or_config(input.git_author_email.as_deref(), config_key::DEFAULT_AUTHOR_EMAIL)
        }
    }

    fn commit_message(&self, input: &PushRepoInput) -> String {
        self.input_or_config(input.git_commit_message.as_deref(), config_key::DEFAULT_COMMIT_MESSAGE)
            .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string())
    }
}

#[async_trait]
impl TemplateAction for PushAzureRepoAction {
    fn id(&self) -> &'static str {
        action_id::PUSH
    }

    fn description(&self) -> &'static str {
        "Push the content in the workspace to a remote Azure repository."
    }

    fn schema(&self) -> Value {
        schema_for!(PushRepoInput).to_value()
    }

    async fn handler(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        let input: PushRepoInput = ctx.typed_input()?;

        let source_dir = repo_source_directory(ctx.workspace(), input.source_path.as_deref())?;
        let resolved = resolve_token(self.integrations.as_ref(), input.server.as_deref(), input.token.as_deref())?;
        let branch = input.branch.clone().filter(|b| !b.is_empty()).unwrap_or_else(|| DEFAULT_PUSH_BRANCH.to_string());

        event!(Level::INFO, event = action::ACTION_STARTED, run_id = %ctx.run_id, action = action_id::PUSH,
               branch = %branch, dir = %source_dir.display());

        let commit = commit_and_push_branch(self.git.as_ref(), PushRequest {
            dir:            source_dir.clone(),
            auth:           GitAuth::from_token(resolved.token),
            commit_message: self.commit_message(&input),
            author:         self.author_info(&input),
            branch:         Some(branch.clone()),
            remote:         None
        })
        .await?;

        Ok(ActionOutput::new()
            .with("repoPath", source_dir.display().to_string())
            .with("branch", branch)
            .with("commitHash", commit.id)
            .with("shortCommitHash", commit.short_id))
    }
}
