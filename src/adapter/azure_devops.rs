//! Reqwest implementation of the Azure DevOps pull request port

use async_trait::async_trait;
use reqwest::Url;
use tracing::{Level, event};

use crate::{
    domain::{
        constant::{AZURE_API_VERSION, pull_request},
        credential::OrgAuth,
        error::ActionError,
        repository::{CreatedPullRequest, PullRequestSpec}
    },
    port::pull_request::{PullRequestClient, PullRequestClientFactory}
};

/// Session against `<scheme>://<server>/<organization>`, authenticated with a personal access token
pub struct AzureDevOpsClient {
    client:  reqwest::Client,
    org_url: Url,
    token:   String
}

impl AzureDevOpsClient {
    pub fn new(server: &str, auth: &OrgAuth) -> Result<Self, ActionError> {
        Self::with_client(reqwest::Client::new(), "https", server, auth)
    }

    pub fn with_client(
        client: reqwest::Client,
        scheme: &str,
        server: &str,
        auth: &OrgAuth
    ) -> Result<Self, ActionError> {
        let base = format!("{}://{}/", scheme, server);
        let mut org_url =
            Url::parse(&base).map_err(|e| ActionError::Operation(format!("Invalid server URL {}: {}", base, e)))?;
        org_url
            .path_segments_mut()
            .map_err(|_| ActionError::Operation(format!("Invalid server URL {}", base)))?
            .pop_if_empty()
            .push(&auth.org);

        Ok(Self { client, org_url, token: auth.token.clone() })
    }

    pub fn org_url(&self) -> &Url {
        &self.org_url
    }

    /// `<org>/[<project>/]_apis/git/repositories/<repo>/pullrequests?api-version=..`
    pub fn pull_requests_url(
        &self,
        repo_id: &str,
        project: Option<&str>,
        supports_iterations: Option<bool>
    ) -> Result<Url, ActionError> {
        let mut url = self.org_url.clone();
        url.path_segments_mut()
            .map_err(|_| ActionError::Operation(format!("Invalid organization URL {}", self.org_url)))?
            .extend(project.into_iter().chain(["_apis", "git", "repositories", repo_id, "pullrequests"]));

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", AZURE_API_VERSION);
            if let Some(supports_iterations) = supports_iterations {
                query.append_pair("supportsIterations", if supports_iterations { "true" } else { "false" });
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl PullRequestClient for AzureDevOpsClient {
    async fn create_pull_request(
        &self,
        spec: &PullRequestSpec,
        repo_id: &str,
        project: Option<&str>,
        supports_iterations: Option<bool>
    ) -> Result<CreatedPullRequest, ActionError> {
        let url = self.pull_requests_url(repo_id, project, supports_iterations)?;
        event!(Level::INFO, event = pull_request::REQUEST_SENT, url = %url, source = %spec.source_ref_name,
               target = %spec.target_ref_name);

        let response = self
            .client
            .post(url)
            .basic_auth("", Some(&self.token))
            .json(spec)
            .send()
            .await
            .map_err(|e| ActionError::Operation(format!("Pull request request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ActionError::Operation(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            event!(Level::WARN, event = pull_request::REQUEST_FAILED, status = status.as_u16());
            return Err(ActionError::Operation(format!("Failed to create pull request ({}): {}", status, body)));
        }

        let created: CreatedPullRequest = serde_json::from_str(&body)
            .map_err(|e| ActionError::Operation(format!("Unexpected pull request response: {}", e)))?;

        event!(Level::INFO, event = pull_request::CREATED, pull_request_id = created.pull_request_id);
        Ok(created)
    }
}

/// Builds one `AzureDevOpsClient` per action invocation
pub struct AzureDevOpsClientFactory {
    client: reqwest::Client,
    scheme: String
}

impl AzureDevOpsClientFactory {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new(), "https")
    }

    /// Custom HTTP client and URL scheme, e.g. plain `http` for a local server
    pub fn with_client(client: reqwest::Client, scheme: &str) -> Self {
        Self { client, scheme: scheme.to_string() }
    }
}

impl Default for AzureDevOpsClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PullRequestClientFactory for AzureDevOpsClientFactory {
    fn connect(&self, server: &str, auth: &OrgAuth) -> Result<Box<dyn PullRequestClient>, ActionError> {
        Ok(Box::new(AzureDevOpsClient::with_client(self.client.clone(), &self.scheme, server, auth)?))
    }
}
