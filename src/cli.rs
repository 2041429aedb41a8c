use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Weather lookups with a login-gated forecast
#[derive(Debug, Parser)]
#[command(name = "skygate", version, about)]
pub struct Cli {
    /// Directory holding config.toml and the saved session
    #[arg(long, global = true, env = "SKYGATE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check whether the saved session is still valid
    Status,
    /// Show current weather (and the forecast when logged in)
    Lookup {
        /// City or country name
        city: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and save the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Look up this city right after logging in
        #[arg(long)]
        city: Option<String>,
    },
    /// Log out and forget the saved session
    Logout,
    /// Interactive session (default)
    Shell,
}
