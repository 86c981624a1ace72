//! Integration registry port

use crate::domain::credential::AzureCredential;

/// Read-only, host-keyed view of the configured Azure integrations
pub trait IntegrationRegistry: Send + Sync + 'static {
    /// Credentials configured for `host`, in configuration order; empty when none
    fn by_host(&self, host: &str) -> Vec<AzureCredential>;
}
