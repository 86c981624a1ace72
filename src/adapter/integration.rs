//! Config-backed implementation of the integration registry

use crate::{
    domain::credential::AzureCredential,
    port::integration::IntegrationRegistry,
    service::config::{AppConfig, AzureIntegrationConfig}
};

/// Azure integrations keyed by host, matched case-insensitively
#[derive(Debug, Clone, Default)]
pub struct AzureIntegrations {
    entries: Vec<AzureIntegrationConfig>
}

impl AzureIntegrations {
    pub fn new(entries: Vec<AzureIntegrationConfig>) -> Self {
        Self { entries }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.integrations.azure.clone())
    }
}

impl IntegrationRegistry for AzureIntegrations {
    fn by_host(&self, host: &str) -> Vec<AzureCredential> {
        self.entries
            .iter()
            .find(|entry| entry.host.eq_ignore_ascii_case(host))
            .map(AzureIntegrationConfig::all_credentials)
            .unwrap_or_default()
    }
}
