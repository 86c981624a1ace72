//! Action registry - builds the Azure actions and runs them by id

use std::{path::Path, sync::Arc};

use chrono::Utc;
use serde_json::Value;
use tracing::{Instrument, Level, event, info_span};

use crate::{
    action::{clone::CloneAzureRepoAction, pull_request::PullRequestAzureRepoAction, push::PushAzureRepoAction},
    adapter::{azure_devops::AzureDevOpsClientFactory, git::Git2Client, integration::AzureIntegrations},
    domain::{
        action::{ActionContext, ActionOutput},
        constant::action,
        error::ActionError
    },
    port::{
        action::TemplateAction, config::ConfigReader, git::GitClient, integration::IntegrationRegistry,
        pull_request::PullRequestClientFactory
    },
    service::config::AppConfig
};

/// Shared collaborators handed to every action
#[derive(Clone)]
pub struct ActionDependencies {
    pub integrations:  Arc<dyn IntegrationRegistry>,
    pub config:        Arc<dyn ConfigReader>,
    pub git:           Arc<dyn GitClient>,
    pub pull_requests: Arc<dyn PullRequestClientFactory>
}

impl ActionDependencies {
    /// Production wiring: git2, reqwest, and integrations from the app-config
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            integrations:  Arc::new(AzureIntegrations::from_config(&config)),
            config:        Arc::new(config),
            git:           Arc::new(Git2Client::new()),
            pull_requests: Arc::new(AzureDevOpsClientFactory::new())
        }
    }
}

#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<dyn TemplateAction>>
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the clone, push and pull request actions
    pub fn azure(deps: ActionDependencies) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CloneAzureRepoAction::new(deps.integrations.clone(), deps.git.clone())));
        registry.register(Arc::new(PushAzureRepoAction::new(
            deps.integrations.clone(),
            deps.config.clone(),
            deps.git.clone()
        )));
        registry.register(Arc::new(PullRequestAzureRepoAction::new(deps.integrations, deps.pull_requests)));
        registry
    }

    /// Register an action; a later registration with the same id replaces the earlier one
    pub fn register(&mut self, action: Arc<dyn TemplateAction>) {
        self.actions.retain(|a| a.id() != action.id());
        self.actions.push(action);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn TemplateAction>> {
        self.actions.iter().find(|a| a.id() == id).cloned()
    }

    pub fn actions(&self) -> impl Iterator<Item = &Arc<dyn TemplateAction>> {
        self.actions.iter()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.id()).collect()
    }

    /// Run the handler; inputs that do not deserialize into the action's typed input are rejected before any work
    pub async fn execute(&self, id: &str, workspace: &Path, input: Value) -> Result<ActionOutput, ActionError> {
        let action_impl = self.get(id).ok_or_else(|| ActionError::unknown_action(id))?;

        let ctx = ActionContext::new(workspace, input);
        let span = info_span!("action", run_id = %ctx.run_id, action = %id);

        let result = action_impl.handler(&ctx).instrument(span).await;
        let elapsed_ms = (Utc::now() - ctx.started_at).num_milliseconds();

        match &result {
            Ok(_) => {
                event!(Level::INFO, event = action::ACTION_COMPLETED, run_id = %ctx.run_id, action = %id, elapsed_ms);
            }
            Err(e @ ActionError::Validation(_)) => {
                event!(Level::WARN, event = action::INPUT_REJECTED, run_id = %ctx.run_id, action = %id, error = %e);
            }
            Err(e) => {
                event!(Level::ERROR, event = action::ACTION_FAILED, run_id = %ctx.run_id, action = %id, elapsed_ms,
                       error = %e);
            }
        }

        result
    }
}
