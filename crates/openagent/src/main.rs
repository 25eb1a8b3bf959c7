//! openagent - conversational agent with tiered memory
//!
//! The composition root: builds one configuration and hands it to the command.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod state;

use cli::{Cli, Commands};
use openagent_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("openagent=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;

    // Execute command
    match cli.command {
        Commands::Chat(args) => commands::chat::execute(args, &config).await,
        Commands::Context(args) => commands::context::execute(args, &config),
        Commands::Skills { category, query } => {
            commands::skills::execute(category.as_deref(), query.as_deref())
        }
        Commands::Config { json } => commands::config::execute(json, &config),
        Commands::Version => {
            println!("openagent {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
