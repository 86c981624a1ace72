//! CLI command handlers

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;

use super::args::RunArgs;
use crate::{ActionRegistry, AppConfig};

/// App-config written by `init`; the token is read from `AZURE_TOKEN` at load time
pub const STARTER_CONFIG: &str = r#"integrations:
  azure:
    - host: dev.azure.com
      credentials:
        - kind: PersonalAccessToken
          personalAccessToken: "{{ env.AZURE_TOKEN }}"
scaffolder:
  defaultAuthor:
    name: Scaffolder
    email: scaffolder@backstage.io
  defaultCommitMessage: Initial commit
"#;

/// Handle the init command - write a starter app-config if none exists
pub fn handle_init_command() -> Result<()> {
    let path = AppConfig::default_path()?;

    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    fs::write(&path, STARTER_CONFIG).with_context(|| format!("Failed to write config file: {}", path.display()))?;

    println!("Wrote starter config to {}", path.display());
    Ok(())
}

/// Handle the list command
pub fn handle_list_command(registry: &ActionRegistry) -> Result<()> {
    for action in registry.actions() {
        println!("{:<18} {}", action.id(), action.description());
    }
    Ok(())
}

/// Handle the schema command
pub fn handle_schema_command(registry: &ActionRegistry, id: &str) -> Result<()> {
    let action = registry.get(id).with_context(|| format!("Unknown action: {}", id))?;
    println!("{}", serde_json::to_string_pretty(&action.schema())?);
    Ok(())
}

/// Handle the run command - execute one action and print its outputs
pub async fn handle_run_command(registry: &ActionRegistry, args: &RunArgs) -> Result<()> {
    let input = read_input(args)?;
    let workspace = absolute_workspace(&args.workspace)?;

    let output = registry.execute(&args.action, &workspace, input).await?;

    println!("{}", serde_json::to_string_pretty(&output.into_value())?);
    Ok(())
}

fn read_input(args: &RunArgs) -> Result<Value> {
    let raw = match (&args.input, &args.input_json) {
        (Some(path), _) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read input file: {}", path.display()))?
        }
        (None, Some(json)) => json.clone(),
        (None, None) => "{}".to_string()
    };

    serde_json::from_str(&raw).context("Input is not valid JSON")
}

/// Relative workspaces are anchored at the current directory so the traversal guard compares absolute paths
fn absolute_workspace(workspace: &Path) -> Result<std::path::PathBuf> {
    let workspace = if workspace.is_absolute() {
        workspace.to_path_buf()
    } else {
        std::env::current_dir().context("Failed to determine current directory")?.join(workspace)
    };

    fs::create_dir_all(&workspace)
        .with_context(|| format!("Failed to create workspace directory: {}", workspace.display()))?;
    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_starter_config_parses() {
        let env = HashMap::from([("AZURE_TOKEN".to_string(), "pat".to_string())]);
        let config = AppConfig::from_yaml_with_env(STARTER_CONFIG, &env).unwrap();

        assert_eq!(config.integrations.azure.len(), 1);
        assert_eq!(config.integrations.azure[0].all_credentials()[0].token(), Some("pat"));
    }

    #[test]
    fn test_read_inline_input() {
        let args = RunArgs {
            action:     "azure:repo:pr".to_string(),
            workspace:  ".".into(),
            input:      None,
            input_json: Some(r#"{"repoId": "42"}"#.to_string())
        };

        assert_eq!(read_input(&args).unwrap()["repoId"], "42");
    }

    #[test]
    fn test_missing_input_is_empty_object() {
        let args = RunArgs { action: "azure:repo:push".to_string(), workspace: ".".into(), input: None, input_json: None };

        assert!(read_input(&args).unwrap().as_object().unwrap().is_empty());
    }
}
