//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Declarative bundles of APT packages
#[derive(Parser, Debug)]
#[command(
    name = "bdapt",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Apply changes without asking for confirmation
    #[arg(
        short = 'y',
        long,
        global = true,
        env = "BDAPT_YES",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub non_interactive: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (`NO_COLOR` is honoured as well)
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a bundle and install its packages
    New(commands::NewArgs),

    /// Add packages to a bundle
    Add(commands::AddArgs),

    /// Remove packages from a bundle
    Rm(commands::RmArgs),

    /// Delete a bundle
    Del(commands::DelArgs),

    /// Reinstall a bundle from its definition
    Sync(commands::BundleArg),

    /// List bundles
    Ls,

    /// Show a bundle's packages
    Show(commands::BundleArg),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            non_interactive,
            quiet,
            no_color,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            yes: non_interactive,
        })?;

        match command {
            Command::New(args) => commands::new::run(&app, args).await,
            Command::Add(args) => commands::add::run(&app, args).await,
            Command::Rm(args) => commands::rm::run(&app, args).await,
            Command::Del(args) => commands::del::run(&app, args).await,
            Command::Sync(args) => commands::sync::run(&app, args).await,
            Command::Ls => commands::ls::run(&app),
            Command::Show(args) => commands::show::run(&app, &args),
        }
    }
}
