//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Configuration file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "learner.toml";

/// Command-line arguments for the Learner bot.
#[derive(Parser, Debug, Clone)]
#[command(name = "learner-bot")]
#[command(about = "Discord bot answering questions from a local knowledge base")]
#[command(version)]
pub struct Args {
    /// Path to the TOML configuration file [default: learner.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Discord bot token
    #[arg(long, env = "LEARNER_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Validate configuration and the knowledge base, then exit
    #[arg(long)]
    pub check: bool,

    /// Metrics export interval in seconds (with the `metrics` feature)
    #[arg(long, default_value_t = 60)]
    pub metrics_interval: u64,
}
