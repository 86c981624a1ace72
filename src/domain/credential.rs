//! Credential types for Azure DevOps integrations
//!
//! Integration entries are keyed by host and carry a list of credentials.
//! Each credential is discriminated by its `kind`, and only some kinds
//! carry a secret that can be handed to git transport or the REST API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::constant::GIT_TOKEN_USERNAME;

/// A single credential record from an Azure integration entry
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AzureCredential {
    /// Personal access token
    #[serde(rename_all = "camelCase")]
    PersonalAccessToken {
        /// Absent when the configured value rendered to nothing
        #[serde(default)]
        personal_access_token: Option<String>
    },
    /// Service principal with a client secret
    #[serde(rename_all = "camelCase")]
    ClientSecret {
        client_id:     String,
        client_secret: String,
        tenant_id:     String
    },
    /// Managed identity of the hosting machine
    #[serde(rename_all = "camelCase")]
    ManagedIdentity { client_id: String }
}

impl AzureCredential {
    pub fn personal_access_token(token: impl Into<String>) -> Self {
        AzureCredential::PersonalAccessToken { personal_access_token: Some(token.into()) }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AzureCredential::PersonalAccessToken { .. } => "PersonalAccessToken",
            AzureCredential::ClientSecret { .. } => "ClientSecret",
            AzureCredential::ManagedIdentity { .. } => "ManagedIdentity"
        }
    }

    /// The secret usable as a bearer of git and REST access, if this kind has one.
    ///
    /// Client secrets and managed identities need a token exchange against
    /// Entra ID before they are usable, so they yield nothing here.
    pub fn token(&self) -> Option<&str> {
        match self {
            AzureCredential::PersonalAccessToken { personal_access_token, .. } => {
                personal_access_token.as_deref().filter(|t| !t.is_empty())
            }
            AzureCredential::ClientSecret { .. } | AzureCredential::ManagedIdentity { .. } => None
        }
    }
}

impl fmt::Debug for AzureCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AzureCredential::PersonalAccessToken { personal_access_token } => f
                .debug_struct("PersonalAccessToken")
                .field("personal_access_token", &personal_access_token.as_ref().map(|_| "<redacted>"))
                .finish(),
            AzureCredential::ClientSecret { client_id, tenant_id, .. } => f
                .debug_struct("ClientSecret")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .field("tenant_id", tenant_id)
                .finish(),
            AzureCredential::ManagedIdentity { client_id } => {
                f.debug_struct("ManagedIdentity").field("client_id", client_id).finish()
            }
        }
    }
}

/// Username/password pair for git transport
#[derive(Clone, PartialEq, Eq)]
pub struct GitAuth {
    pub username: String,
    pub password: String
}

impl GitAuth {
    /// Token authentication; Azure Repos ignores the user name but requires one
    pub fn from_token(token: impl Into<String>) -> Self {
        Self { username: GIT_TOKEN_USERNAME.to_string(), password: token.into() }
    }
}

impl fmt::Debug for GitAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitAuth").field("username", &self.username).field("password", &"<redacted>").finish()
    }
}

/// Organization and token pair for the REST API
#[derive(Clone, PartialEq, Eq)]
pub struct OrgAuth {
    pub org:   String,
    pub token: String
}

impl fmt::Debug for OrgAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrgAuth").field("org", &self.org).field("token", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_credential_kinds() {
        let yaml = r#"
- kind: PersonalAccessToken
  personalAccessToken: pat-123
- kind: ClientSecret
  clientId: id
  clientSecret: secret
  tenantId: tenant
- kind: ManagedIdentity
  clientId: id
"#;
        let credentials: Vec<AzureCredential> = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(credentials.len(), 3);
        assert_eq!(credentials[0].token(), Some("pat-123"));
        assert_eq!(credentials[1].kind(), "ClientSecret");
        assert_eq!(credentials[1].token(), None);
        assert_eq!(credentials[2].token(), None);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let yaml = "kind: Password\npassword: hunter2\n";
        assert!(serde_yaml::from_str::<AzureCredential>(yaml).is_err());
    }

    #[test]
    fn test_empty_personal_access_token_yields_nothing() {
        assert_eq!(AzureCredential::personal_access_token("").token(), None);
    }

    #[test]
    fn test_null_personal_access_token_yields_nothing() {
        let yaml = "- kind: PersonalAccessToken\n  personalAccessToken: null\n- kind: PersonalAccessToken\n";
        let credentials: Vec<AzureCredential> = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(credentials[0].token(), None);
        assert_eq!(credentials[1].token(), None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?} {:?}", AzureCredential::personal_access_token("pat-123"), GitAuth::from_token("pat-123"));
        assert!(!rendered.contains("pat-123"));
        assert!(rendered.contains("notempty"));
    }
}
