//! Template action trait that every scaffolder action implements

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    action::{ActionContext, ActionOutput},
    error::ActionError
};

/// A named operation invocable by the template runner
#[async_trait]
pub trait TemplateAction: Send + Sync {
    /// Stable identifier, e.g. `azure:repo:clone`
    fn id(&self) -> &'static str;

    /// Human readable description
    fn description(&self) -> &'static str;

    /// JSON schema of the input object, derived from the typed input
    fn schema(&self) -> Value;

    /// Run the action; the raw input is parsed into the typed input before any side effect
    async fn handler(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError>;
}
