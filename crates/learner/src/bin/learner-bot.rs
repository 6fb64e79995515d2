//! Learner bot entry point.

use clap::Parser;
use learner::{Args, init_tracing, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads LEARNER_BOT_TOKEN.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(args.json);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Learner bot");
    run(args).await
}
