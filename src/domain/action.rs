//! Action invocation context and outputs

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::error::ActionError;

/// Everything a handler receives for one invocation
#[derive(Clone, Debug)]
pub struct ActionContext {
    /// Unique run identifier, attached to every log line of the invocation
    pub run_id:         String,
    /// Root directory the action is allowed to touch
    pub workspace_path: PathBuf,
    /// Raw input object
    pub input:          Value,
    /// When the invocation started
    pub started_at:     DateTime<Utc>
}

impl ActionContext {
    pub fn new(workspace_path: impl Into<PathBuf>, input: Value) -> Self {
        Self { run_id: Uuid::new_v4().to_string(), workspace_path: workspace_path.into(), input, started_at: Utc::now() }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace_path
    }

    /// Deserialize the input object into the action's typed input
    pub fn typed_input<T: DeserializeOwned>(&self) -> Result<T, ActionError> {
        serde_json::from_value(self.input.clone()).map_err(|e| ActionError::Validation(format!("Invalid input: {}", e)))
    }
}

/// Named outputs of a completed action
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionOutput {
    values: Map<String, Value>
}

impl ActionOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}
