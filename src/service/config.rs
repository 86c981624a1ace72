//! Application configuration
//!
//! The app-config file carries the Azure integrations and the scaffolder
//! defaults. String values are tera templates rendered with the process
//! environment as `env`, so `{{ env.AZURE_TOKEN }}` reads a variable; a value
//! referencing an unset variable is treated as absent.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf}
};

use directories::ProjectDirs;
use serde::Deserialize;
use serde_yaml::Value;
use tera::{Context as TeraContext, Tera};
use tracing::{Level, event};

use crate::{
    domain::{constant::config, credential::AzureCredential, error::ActionError},
    port::config::ConfigReader
};

/// One `integrations.azure[]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureIntegrationConfig {
    pub host:        String,
    #[serde(default)]
    pub credentials: Vec<AzureCredential>,
    /// Legacy single-token form, equivalent to one personal access token credential
    #[serde(default)]
    pub token:       Option<String>
}

impl AzureIntegrationConfig {
    /// Credentials in lookup order, with the legacy token folded in first
    pub fn all_credentials(&self) -> Vec<AzureCredential> {
        self.token
            .iter()
            .filter(|t| !t.is_empty())
            .map(AzureCredential::personal_access_token)
            .chain(self.credentials.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationsConfig {
    #[serde(default)]
    pub azure: Vec<AzureIntegrationConfig>
}

/// Parsed app-config
#[derive(Debug, Clone)]
pub struct AppConfig {
    raw:              Value,
    pub integrations: IntegrationsConfig
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { raw: Value::Null, integrations: IntegrationsConfig::default() }
    }
}

impl AppConfig {
    /// Parse an app-config document, rendering against the process environment
    pub fn from_yaml(content: &str) -> Result<Self, ActionError> {
        Self::from_yaml_with_env(content, &std::env::vars().collect())
    }

    pub fn from_yaml_with_env(content: &str, env: &HashMap<String, String>) -> Result<Self, ActionError> {
        let mut raw: Value = serde_yaml::from_str(content)
            .map_err(|e| ActionError::Configuration(format!("Failed to parse config file: {}", e)))?;

        let mut tera = Tera::default();
        let mut context = TeraContext::new();
        context.insert("env", env);
        render_env(&mut raw, &mut tera, &context);

        let integrations = match raw.get("integrations") {
            Some(section) if !section.is_null() => serde_yaml::from_value(section.clone())
                .map_err(|e| ActionError::Configuration(format!("Invalid integrations config: {}", e)))?,
            _ => IntegrationsConfig::default()
        };

        Ok(Self { raw, integrations })
    }

    pub fn load(path: &Path) -> Result<Self, ActionError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ActionError::Configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Load `path`, or the default location; a missing default file yields an empty config
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ActionError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Self::default_path()?;
                if default_path.exists() { Self::load(&default_path) } else { Ok(Self::default()) }
            }
        }
    }

    /// `<config dir>/app-config.yaml` for the current platform
    pub fn default_path() -> Result<PathBuf, ActionError> {
        let project_dirs = ProjectDirs::from("io", "scaffolder", "scaffolder-azure")
            .ok_or(ActionError::Configuration("Failed to determine project directories".to_string()))?;

        Ok(project_dirs.config_dir().join("app-config.yaml"))
    }
}

impl ConfigReader for AppConfig {
    fn get_optional_string(&self, key: &str) -> Option<String> {
        let mut node = &self.raw;
        for segment in key.split('.') {
            node = node.get(segment)?;
        }

        match node {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None
        }
    }
}

/// Render every templated string through tera with `env` in the context.
/// A value that fails to render, typically through an unset variable, becomes absent.
fn render_env(value: &mut Value, tera: &mut Tera, context: &TeraContext) {
    match value {
        Value::String(s) if is_template(s) => {
            *value = match tera.render_str(s, context) {
                Ok(rendered) => Value::String(rendered),
                Err(e) => {
                    event!(Level::WARN, event = config::VALUE_UNRESOLVED, error = %e);
                    Value::Null
                }
            };
        }
        Value::Sequence(items) => items.iter_mut().for_each(|item| render_env(item, tera, context)),
        Value::Mapping(map) => map.iter_mut().for_each(|(_, item)| render_env(item, tera, context)),
        _ => {}
    }
}

fn is_template(s: &str) -> bool {
    s.contains("{{") || s.contains("{%")
}
