//! Command-line surface of the `labinvite` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "labinvite", about = "Bulk-invite manifest ingestion for lab training environments")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides the filter).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Read configuration from this file instead of ~/.config/labinvite/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a manifest and print the detected targets as JSON.
    Parse(ParseArgs),
    /// Print a starter manifest.
    Template(TemplateArgs),
    /// Parse a manifest and submit it to the bulk-invite endpoint.
    Send(SendArgs),
    /// Re-parse a manifest file every time it changes.
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Manifest file; `-` or omitted reads stdin.
    pub input: Option<PathBuf>,

    /// Show the scenario and duration each target ends up with once system
    /// defaults apply.
    #[arg(long)]
    pub effective: bool,

    /// Print only the number of detected targets.
    #[arg(long, conflicts_with = "effective")]
    pub count: bool,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[arg(value_enum)]
    pub format: TemplateFormat,

    /// Write the template to the current directory instead of stdout.
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateFormat {
    Csv,
    Json,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Manifest file; `-` or omitted reads stdin.
    pub input: Option<PathBuf>,

    /// Admin API base URL, e.g. `http://localhost:8000/api/v1`.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token (defaults to `api.token` / `LABINVITE_TOKEN`).
    #[arg(long)]
    pub token: Option<String>,

    /// Print the request body instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    pub path: PathBuf,
}
