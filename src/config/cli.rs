use crate::core::{Encoding, Environment};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "script-checker")]
#[command(about = "Submit scripts to the script checker webhook")]
pub struct Cli {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the login ledger path")]
    pub ledger: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive session (default)
    Shell,

    /// Log in and submit one script
    Submit {
        #[arg(long)]
        email: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        file: PathBuf,

        #[arg(long, default_value = "production")]
        environment: Environment,

        #[arg(long, default_value = "standard", help = "standard, base64 or binary")]
        method: Encoding,

        #[arg(long, help = "Show raw status codes and error details")]
        debug: bool,
    },

    /// Print the login history (admin only)
    History {
        #[arg(long)]
        email: String,
    },

    /// Send a connectivity test to the webhook
    Ping {
        #[arg(long, default_value = "production")]
        environment: Environment,
    },
}
