//! scriptrealm - script-backed authentication.
//!
//! Delegates credential checks to an operator-supplied command:
//! - login succeeds iff the command exits zero with `U`/`P` in its environment
//! - roles come from an optional second command's stdout
//! - credentials are passed verbatim, never expanded, never logged by default

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use scriptrealm::commands;
use scriptrealm::config::RealmConfig;

#[derive(Parser)]
#[command(name = "scriptrealm")]
#[command(about = "Script-backed authentication")]
#[command(
    after_help = "QUICK START:\n  scriptrealm check          Validate the configured commands\n  scriptrealm login alice    Try a login (password from SCRIPTREALM_PASSWORD or stdin)\n  scriptrealm groups alice   Show the roles a user would be granted\n  scriptrealm show config    Print the resolved configuration"
)]
struct Cli {
    /// Directory holding scriptrealm.json (default: current directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and resolve the configured executables
    Check {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Run one authentication attempt
    Login {
        /// Username handed to the script as U
        username: String,
    },

    /// Look up roles for an already-trusted username
    Groups {
        /// Username handed to the groups script as U
        username: String,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_dir = cli.config_dir.unwrap_or_else(|| PathBuf::from("."));

    // Load .env if present
    dotenvy::dotenv().ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scriptrealm=warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let config = RealmConfig::load(&base_dir)?;

    match cli.command {
        Commands::Check { strict } => commands::cmd_check(&config, strict),
        Commands::Login { username } => commands::cmd_login(&config, &username),
        Commands::Groups { username } => commands::cmd_groups(&config, &username),
        Commands::Show { what } => match what {
            ShowTarget::Config => commands::cmd_show_config(&config),
        },
    }
}
