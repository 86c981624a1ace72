use thiserror::Error;

/// Error types surfaced by the scaffolder actions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Missing integration configuration or unresolvable token
    #[error("{0}")]
    Configuration(String),

    /// A workspace-relative path escaped the workspace root
    #[error("{0}")]
    Path(String),

    /// Failure from the delegated git or REST operation
    #[error("{0}")]
    Operation(String),

    /// Input did not match the action schema
    #[error("{0}")]
    Validation(String),

    /// File system related errors
    #[error("{0}")]
    FileSystem(String),

    /// Serialization/deserialization errors
    #[error("{0}")]
    Serialization(String)
}

impl ActionError {
    pub fn no_integration_for_host(host: &str) -> Self {
        ActionError::Configuration(format!(
            "No matching integration configuration for host {}, please check your integrations config",
            host
        ))
    }

    pub fn no_token_for_host(host: &str) -> Self {
        ActionError::Configuration(format!("No token provided for Azure Integration {}", host))
    }

    pub fn invalid_path(path: &str) -> Self {
        ActionError::Path(format!("Relative path is not allowed to refer to a directory outside its parent: {}", path))
    }

    pub fn invalid_source_path(path: &str) -> Self {
        ActionError::Path(format!("Invalid source path: {}", path))
    }

    pub fn unknown_action(id: &str) -> Self {
        ActionError::Validation(format!("Unknown action: {}", id))
    }
}

/// Convert from anyhow::Error
impl From<anyhow::Error> for ActionError {
    fn from(err: anyhow::Error) -> Self {
        ActionError::Operation(format!("{:#}", err))
    }
}

/// Convert from git2::Error
impl From<git2::Error> for ActionError {
    fn from(err: git2::Error) -> Self {
        ActionError::Operation(err.message().to_string())
    }
}

/// Convert from reqwest::Error
impl From<reqwest::Error> for ActionError {
    fn from(err: reqwest::Error) -> Self {
        ActionError::Operation(err.to_string())
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for ActionError {
    fn from(err: std::io::Error) -> Self {
        ActionError::FileSystem(err.to_string())
    }
}

/// Convert from serde_yaml::Error
impl From<serde_yaml::Error> for ActionError {
    fn from(err: serde_yaml::Error) -> Self {
        ActionError::Serialization(err.to_string())
    }
}

/// Convert from serde_json::Error
impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        ActionError::Serialization(err.to_string())
    }
}
