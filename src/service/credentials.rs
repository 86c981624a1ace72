//! Token resolution shared by every action
//!
//! A host must have an integration entry. An explicit input token wins over
//! the entry's own secret; having neither is a configuration error.

use tracing::{Level, event};

use crate::{
    domain::{
        constant::{DEFAULT_SERVER, credentials},
        error::ActionError
    },
    port::integration::IntegrationRegistry
};

/// Where a resolved token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Input,
    Integration
}

/// Host and token an action authenticates with
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub host:   String,
    pub token:  String,
    pub source: TokenSource
}

impl std::fmt::Debug for ResolvedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedToken")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

pub fn resolve_token(
    registry: &dyn IntegrationRegistry,
    server: Option<&str>,
    explicit_token: Option<&str>
) -> Result<ResolvedToken, ActionError> {
    let host = server.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SERVER);
    let entries = registry.by_host(host);

    let Some(first) = entries.first() else {
        event!(Level::WARN, event = credentials::INTEGRATION_MISSING, host = %host);
        return Err(ActionError::no_integration_for_host(host));
    };

    let explicit_token = explicit_token.filter(|t| !t.is_empty());
    let (token, source) = match (explicit_token, first.token()) {
        (Some(token), _) => (token, TokenSource::Input),
        (None, Some(token)) => (token, TokenSource::Integration),
        (None, None) => {
            event!(Level::WARN, event = credentials::TOKEN_MISSING, host = %host, kind = first.kind());
            return Err(ActionError::no_token_for_host(host));
        }
    };

    event!(Level::DEBUG, event = credentials::TOKEN_RESOLVED, host = %host, source = ?source);
    Ok(ResolvedToken { host: host.to_string(), token: token.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credential::AzureCredential;

    struct StaticRegistry(Vec<(&'static str, AzureCredential)>);

    impl IntegrationRegistry for StaticRegistry {
        fn by_host(&self, host: &str) -> Vec<AzureCredential> {
            self.0.iter().filter(|(h, _)| *h == host).map(|(_, c)| c.clone()).collect()
        }
    }

    fn managed_identity() -> AzureCredential {
        AzureCredential::ManagedIdentity { client_id: "id".to_string() }
    }

    #[test]
    fn test_defaults_to_public_host() {
        let registry = StaticRegistry(vec![("dev.azure.com", AzureCredential::personal_access_token("pat"))]);

        let resolved = resolve_token(&registry, None, None).unwrap();

        assert_eq!(resolved.host, "dev.azure.com");
        assert_eq!(resolved.token, "pat");
        assert_eq!(resolved.source, TokenSource::Integration);
    }

    #[test]
    fn test_no_integration_is_configuration_error() {
        let registry = StaticRegistry(vec![]);

        let err = resolve_token(&registry, Some("tfs.example.com"), None).unwrap_err();

        assert_eq!(
            err,
            ActionError::Configuration(
                "No matching integration configuration for host tfs.example.com, please check your integrations config"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_no_integration_fails_even_with_explicit_token() {
        let registry = StaticRegistry(vec![]);

        assert!(matches!(resolve_token(&registry, None, Some("explicit")), Err(ActionError::Configuration(_))));
    }

    #[test]
    fn test_explicit_token_wins() {
        let registry = StaticRegistry(vec![("dev.azure.com", AzureCredential::personal_access_token("configured"))]);

        let resolved = resolve_token(&registry, None, Some("explicit")).unwrap();

        assert_eq!(resolved.token, "explicit");
        assert_eq!(resolved.source, TokenSource::Input);
    }

    #[test]
    fn test_kind_without_secret_needs_explicit_token() {
        let registry = StaticRegistry(vec![("dev.azure.com", managed_identity())]);

        let err = resolve_token(&registry, None, None).unwrap_err();
        assert_eq!(err, ActionError::Configuration("No token provided for Azure Integration dev.azure.com".to_string()));

        let resolved = resolve_token(&registry, None, Some("explicit")).unwrap();
        assert_eq!(resolved.token, "explicit");
    }

    #[test]
    fn test_empty_explicit_token_counts_as_absent() {
        let registry = StaticRegistry(vec![("dev.azure.com", managed_identity())]);

        assert!(matches!(resolve_token(&registry, Some(""), Some("")), Err(ActionError::Configuration(_))));
    }

    #[test]
    fn test_only_first_credential_is_consulted() {
        let registry = StaticRegistry(vec![
            ("dev.azure.com", managed_identity()),
            ("dev.azure.com", AzureCredential::personal_access_token("second"))
        ]);

        assert!(matches!(resolve_token(&registry, None, None), Err(ActionError::Configuration(_))));
    }

    #[test]
    fn test_debug_hides_token() {
        let registry = StaticRegistry(vec![("dev.azure.com", AzureCredential::personal_access_token("s3cret"))]);

        let resolved = resolve_token(&registry, None, None).unwrap();

        assert!(!format!("{:?}", resolved).contains("s3cret"));
    }
}
