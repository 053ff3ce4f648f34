//! PocketChat server binary entry point.

use std::sync::Arc;

use clap::Parser;
use pocketchat::cli::Cli;
use pocketchat::completion::CompletionClient;
use pocketchat::config::ChatConfig;
use pocketchat::web::{self, AppState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> pocketchat::error::Result<()> {
    let config = cli.apply(ChatConfig::from_env());
    info!(?config, "Starting PocketChat");

    let client = CompletionClient::from_config(&config);
    let state = AppState::new(&config, Arc::new(client));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    web::serve(listener, state).await
}
