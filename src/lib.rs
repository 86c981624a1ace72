//! # Scaffolder Azure Actions
//!
//! Template actions for a software-template scaffolder that talk to Azure DevOps.
//!
//! This crate provides three actions:
//! - `azure:repo:clone` - clone a remote repository into the workspace
//! - `azure:repo:push` - stage, commit and push workspace changes to a branch
//! - `azure:repo:pr` - open a pull request through the Azure DevOps REST API
//!
//! Every action resolves its token from the host-keyed integration registry,
//! preferring an explicit `token` input over configured credentials.

pub mod domain {
    pub mod action;
    pub mod constant;
    pub mod credential;
    pub mod error;
    pub mod repository;
    pub mod workspace;
}

pub mod port {
    pub mod action;
    pub mod config;
    pub mod git;
    pub mod integration;
    pub mod pull_request;
}

pub mod adapter {
    pub mod azure_devops;
    pub mod git;
    pub mod integration;
}

pub mod service {
    pub mod config;
    pub mod credentials;
    pub mod repository;
}

pub mod action {
    pub mod clone;
    pub mod pull_request;
    pub mod push;
    pub mod registry;
}

pub mod cli;

pub use action::registry::{ActionDependencies, ActionRegistry};
pub use domain::{
    action::{ActionContext, ActionOutput},
    error::ActionError
};
pub use service::config::AppConfig;
