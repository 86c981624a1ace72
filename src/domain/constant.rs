//! Domain constants and structured event names for internal monitoring

/// Hostname used when an action does not name a server
pub const DEFAULT_SERVER: &str = "dev.azure.com";

/// Placeholder user name for token-authenticated git transport
pub const GIT_TOKEN_USERNAME: &str = "notempty";

/// Organization used when the pull request action does not name one
pub const DEFAULT_ORGANIZATION: &str = "notempty";

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_CLONE_BRANCH: &str = "main";
pub const DEFAULT_PUSH_BRANCH: &str = "scaffolder";
pub const DEFAULT_TARGET_BRANCH: &str = "main";
pub const DEFAULT_TARGET_PATH: &str = "./";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit";
pub const DEFAULT_AUTHOR_NAME: &str = "Scaffolder";
pub const DEFAULT_AUTHOR_EMAIL: &str = "scaffolder@backstage.io";

/// Azure DevOps REST API version sent with every request
pub const AZURE_API_VERSION: &str = "7.1";

/// Configuration keys read through the config port
pub mod config_key {
    pub const DEFAULT_AUTHOR_NAME: &str = "scaffolder.defaultAuthor.name";
    pub const DEFAULT_AUTHOR_EMAIL: &str = "scaffolder.defaultAuthor.email";
    pub const DEFAULT_COMMIT_MESSAGE: &str = "scaffolder.defaultCommitMessage";
}

/// Action identifiers
pub mod action_id {
    pub const CLONE: &str = "azure:repo:clone";
    pub const PUSH: &str = "azure:repo:push";
    pub const PULL_REQUEST: &str = "azure:repo:pr";
}

/// Credential resolution events
pub mod credentials {
    pub const TOKEN_RESOLVED: &str = "token.resolved";
    pub const INTEGRATION_MISSING: &str = "integration.missing";
    pub const TOKEN_MISSING: &str = "token.missing";
}

/// Configuration loading events
pub mod config {
    pub const VALUE_UNRESOLVED: &str = "config.value_unresolved";
}

/// Git adapter events
pub mod git {
    pub const CLONE_STARTED: &str = "git.clone_started";
    pub const CLONE_COMPLETED: &str = "git.clone_completed";
    pub const REMOTE_REGISTERED: &str = "git.remote_registered";
    pub const CHECKOUT_COMPLETED: &str = "git.checkout_completed";
    pub const BRANCH_CREATED: &str = "git.branch_created";
    pub const INDEX_STAGED: &str = "git.index_staged";
    pub const COMMIT_CREATED: &str = "git.commit_created";
    pub const PUSH_STARTED: &str = "git.push_started";
    pub const PUSH_COMPLETED: &str = "git.push_completed";
    pub const PUSH_REJECTED: &str = "git.push_rejected";
}

/// Action lifecycle events
pub mod action {
    pub const ACTION_STARTED: &str = "action.started";
    pub const ACTION_COMPLETED: &str = "action.completed";
    pub const ACTION_FAILED: &str = "action.failed";
    pub const INPUT_REJECTED: &str = "input.rejected";
}

/// Pull request client events
pub mod pull_request {
    pub const REQUEST_SENT: &str = "pull_request.request_sent";
    pub const CREATED: &str = "pull_request.created";
    pub const REQUEST_FAILED: &str = "pull_request.request_failed";
}
