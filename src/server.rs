// ABOUTME: HTTP server for the /ttt slash command webhook
// ABOUTME: Parses the Slack form payload, validates the token, and marshals the JSON reply

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use tictacbot_core::commands::{GameService, Invocation, Reply, Visibility};
use tictacbot_core::config::Config;
use tictacbot_core::error::CommandError;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GameService>,
    pub verification_token: String,
}

/// Form fields Slack sends with every slash command request.
#[derive(Debug, Deserialize)]
pub struct SlashPayload {
    pub token: String,
    #[serde(default)]
    pub text: String,
    pub channel_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub response_url: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub channel_name: String,
}

/// The two-field payload Slack expects back from a slash command endpoint.
#[derive(Debug, Serialize)]
pub struct SlashReply {
    pub response_type: Visibility,
    pub text: String,
}

impl From<Reply> for SlashReply {
    fn from(reply: Reply) -> Self {
        Self {
            response_type: reply.visibility,
            text: reply.text,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/play", post(play_handler))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle one slash command request.
///
/// Always responds 200: Slack shows non-200 bodies as an opaque failure, so
/// domain rejections come back as ephemeral replies instead.
async fn play_handler(
    State(state): State<AppState>,
    Form(payload): Form<SlashPayload>,
) -> Json<SlashReply> {
    if payload.token != state.verification_token {
        tracing::warn!(
            channel = %payload.channel_id,
            user = %payload.user_name,
            "Slash command with invalid verification token"
        );
        return Json(Reply::from(CommandError::InvalidToken).into());
    }

    tracing::debug!(
        channel = %payload.channel_id,
        user = %payload.user_name,
        text = %payload.text,
        "Slash command received"
    );

    let inv = Invocation {
        text: payload.text,
        channel_id: payload.channel_id,
        user_id: payload.user_id,
        user_name: payload.user_name,
    };
    let reply = state.service.handle(&inv).await;
    Json(reply.into())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Bind and serve until shutdown.
pub async fn serve(config: &Config, service: Arc<GameService>) -> Result<()> {
    let state = AppState {
        service,
        verification_token: config.slack.verification_token.clone(),
    };
    let app = router(state);

    let addr = format!("{}:{}", config.http.host, config.http.port);
    tracing::info!(addr = %addr, "Starting slash command server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
