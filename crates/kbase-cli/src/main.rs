//! kbase - question answering over a single document from the command line
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        reason = "Allow for tests"
    )
)]

use anyhow::Result;
use clap::Parser as _;
use cli::{Cli, Commands};
use kbase_core::KbaseConfig;

mod cli;
mod handlers;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    handlers::init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => KbaseConfig::config_path()?,
    };
    let config = handlers::load_config(&config_path)?;

    match cli.command {
        Commands::Chunk {
            file,
            chunking,
            json,
        } => handlers::handle_chunk(config, &file, chunking, json),
        Commands::Ask {
            file,
            question,
            options,
            json,
        } => handlers::handle_ask(config, &file, &question, options, json).await,
        Commands::Chat { file, options } => handlers::handle_chat(config, &file, options).await,
        Commands::Config { path } => handlers::handle_config(&config, &config_path, path),
    }
}
