//! CLI argument parsing

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the app-config YAML file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter app-config to the default location
    Init,
    /// List the registered actions
    List,
    /// Print the input schema of an action
    Schema {
        /// Action id, e.g. azure:repo:clone
        action: String
    },
    /// Run an action against a workspace directory
    Run(RunArgs)
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Action id, e.g. azure:repo:push
    pub action: String,

    /// Workspace directory the action operates in
    #[arg(long, short, default_value = ".")]
    pub workspace: PathBuf,

    /// JSON file holding the input object
    #[arg(long, short, conflicts_with = "input_json")]
    pub input: Option<PathBuf>,

    /// Input object as inline JSON
    #[arg(long)]
    pub input_json: Option<String>
}
