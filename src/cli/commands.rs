use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fw", about = concat!("formwidgets v", env!("CARGO_PKG_VERSION"), " - list editors, tombstones and dropdowns for admin forms"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Widget config (default: widgets.toml next to the page, else built-in)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); FW_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a page outline and print it back in canonical form
    Render(PageArgs),
    /// Validate a page's widget markup
    Check(PageArgs),
    /// Wire the page, replay user events, print the result
    Run(RunArgs),
    /// Wire the page and print what a submission would send
    Submit(SubmitArgs),
    /// Print the built-in widget config as TOML
    Config,
}

#[derive(Args)]
pub struct PageArgs {
    /// Page outline file
    pub page: PathBuf,
}

#[derive(Args)]
pub struct RunArgs {
    /// Page outline file
    pub page: PathBuf,
    /// Event script file (one step per line)
    #[arg(short, long)]
    pub script: Option<PathBuf>,
    /// Inline step, e.g. --step "click #add-new-option" (repeatable, runs after --script)
    #[arg(long = "step", action = clap::ArgAction::Append)]
    pub steps: Vec<String>,
    /// Limit the submission snapshot to this form id
    #[arg(long)]
    pub form: Option<String>,
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Page outline file
    pub page: PathBuf,
    /// Limit the snapshot to this form id
    #[arg(long)]
    pub form: Option<String>,
}
