// ABOUTME: Main entry point for the Slack tic-tac-toe slash command bot
// ABOUTME: Initializes logging, config, the Slack API client, and the HTTP server

use anyhow::{Context, Result};
use slack_morphism::prelude::*;
use std::sync::Arc;
use tictacbot::{directory::SlackDirectory, server};
use tictacbot_core::{commands::GameService, config::Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting tictacbot");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        "Configuration loaded"
    );

    // Slack Web API client for the user directory
    let client = Arc::new(SlackClient::new(
        SlackClientHyperConnector::new().context("Failed to create Slack HTTP connector")?,
    ));
    let token = SlackApiToken::new(SlackApiTokenValue(config.slack.api_token.clone()));
    let directory = Arc::new(SlackDirectory::new(client, token));

    let service = Arc::new(GameService::new(directory));

    server::serve(&config, service).await
}
