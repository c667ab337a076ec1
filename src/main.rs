use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod credentials;
mod error;
mod handlers;
mod router;
mod schemas;
mod session;
mod uploads;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
