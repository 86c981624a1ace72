//! # Scaffold Azure CLI
//!
//! Runs the Azure DevOps scaffolder actions outside a template engine.
//!
//! ## Usage
//!
//! ```bash
//! # Write a starter app-config
//! scaffold-azure init
//!
//! # List registered actions and print an input schema
//! scaffold-azure list
//! scaffold-azure schema azure:repo:clone
//!
//! # Clone into ./work/svc
//! scaffold-azure run azure:repo:clone --workspace ./work \
//!     --input-json '{"remoteUrl": "https://dev.azure.com/org/p/_git/r", "targetPath": "svc"}'
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use anyhow::Result;
use clap::Parser;
use scaffolder_azure::{
    ActionDependencies, ActionRegistry, AppConfig,
    cli::{
        Cli, Commands,
        commands::{handle_init_command, handle_list_command, handle_run_command, handle_schema_command}
    }
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init => handle_init_command(),
        Commands::List => handle_list_command(&load_registry(&cli)?),
        Commands::Schema { action } => handle_schema_command(&load_registry(&cli)?, action),
        Commands::Run(args) => handle_run_command(&load_registry(&cli)?, args).await
    }
}

fn load_registry(cli: &Cli) -> Result<ActionRegistry> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    Ok(ActionRegistry::azure(ActionDependencies::from_config(config)))
}
