// ABOUTME: Slack-backed user directory with in-process caching
// ABOUTME: Wraps users.list and conversations.members behind the core lookup traits

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use slack_morphism::prelude::*;
use tokio::sync::RwLock;

use tictacbot_core::traits::{ChannelRoster, UserDirectory};

/// The two Slack Web API reads the directory needs.
#[async_trait]
pub trait SlackFetch: Send + Sync {
    /// Username -> user ID for the whole team.
    async fn list_users(&self) -> Result<HashMap<String, String>>;
    /// Member user IDs for one channel.
    async fn channel_members(&self, channel_id: &str) -> Result<Vec<String>>;
}

/// Team and channel directory with an in-process cache over a fetcher.
///
/// The team user list is fetched lazily on first lookup and kept for the
/// process lifetime; a lookup miss triggers one refresh so users who joined
/// after the cache was filled are still found. Channel rosters are cached
/// per channel.
pub struct CachedDirectory<F> {
    fetch: F,
    /// username -> user ID
    users: RwLock<HashMap<String, String>>,
    /// channel ID -> member user IDs
    rosters: RwLock<HashMap<String, Vec<String>>>,
}

impl<F: SlackFetch> CachedDirectory<F> {
    pub fn with_fetcher(fetch: F) -> Self {
        Self {
            fetch,
            users: RwLock::new(HashMap::new()),
            rosters: RwLock::new(HashMap::new()),
        }
    }

    async fn refresh_users(&self) -> Result<()> {
        let fetched = self.fetch.list_users().await?;
        tracing::info!(users = fetched.len(), "Refreshed Slack team directory");
        *self.users.write().await = fetched;
        Ok(())
    }
}

#[async_trait]
impl<F: SlackFetch> UserDirectory for CachedDirectory<F> {
    async fn user_id(&self, username: &str) -> Result<Option<String>> {
        if let Some(id) = self.users.read().await.get(username) {
            return Ok(Some(id.clone()));
        }

        // Cold cache or a user who joined since the last fetch: refresh once,
        // then answer from whatever the refresh brought in.
        self.refresh_users().await?;
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[async_trait]
impl<F: SlackFetch> ChannelRoster for CachedDirectory<F> {
    async fn members(&self, channel_id: &str) -> Result<Option<Vec<String>>> {
        if let Some(roster) = self.rosters.read().await.get(channel_id) {
            return Ok(Some(roster.clone()));
        }

        // The API can refuse roster listing for some channel types; callers
        // skip the membership check in that case rather than blocking play.
        match self.fetch.channel_members(channel_id).await {
            Ok(roster) => {
                self.rosters
                    .write()
                    .await
                    .insert(channel_id.to_string(), roster.clone());
                Ok(Some(roster))
            }
            Err(e) => {
                tracing::warn!(
                    channel = %channel_id,
                    error = %e,
                    "Could not fetch channel roster, skipping membership check"
                );
                Ok(None)
            }
        }
    }
}

/// Fetcher backed by the Slack Web API, following cursor pagination.
pub struct SlackApiFetch {
    client: Arc<SlackHyperClient>,
    token: SlackApiToken,
}

#[async_trait]
impl SlackFetch for SlackApiFetch {
    async fn list_users(&self) -> Result<HashMap<String, String>> {
        let session = self.client.open_session(&self.token);
        let mut fetched: HashMap<String, String> = HashMap::new();
        let mut cursor: Option<SlackCursorId> = None;

        loop {
            let mut req = SlackApiUsersListRequest::new().with_limit(200);
            if let Some(c) = cursor.take() {
                req = req.with_cursor(c);
            }
            let resp = session
                .users_list(&req)
                .await
                .context("Failed to call Slack users.list")?;

            for member in resp.members {
                if let Some(name) = member.name {
                    fetched.insert(name, member.id.to_string());
                }
            }

            cursor = resp
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.0.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        Ok(fetched)
    }

    async fn channel_members(&self, channel_id: &str) -> Result<Vec<String>> {
        let session = self.client.open_session(&self.token);
        let mut members: Vec<String> = Vec::new();
        let mut cursor: Option<SlackCursorId> = None;

        loop {
            let mut req =
                SlackApiConversationsMembersRequest::new().with_channel(channel_id.into());
            if let Some(c) = cursor.take() {
                req = req.with_cursor(c);
            }
            let resp = session
                .conversations_members(&req)
                .await
                .context("Failed to call Slack conversations.members")?;

            members.extend(resp.members.into_iter().map(|id| id.to_string()));

            cursor = resp
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.0.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        tracing::debug!(
            channel = %channel_id,
            members = members.len(),
            "Fetched channel roster"
        );
        Ok(members)
    }
}

/// Directory wired to the real Slack Web API.
pub type SlackDirectory = CachedDirectory<SlackApiFetch>;

impl SlackDirectory {
    pub fn new(client: Arc<SlackHyperClient>, token: SlackApiToken) -> Self {
        CachedDirectory::with_fetcher(SlackApiFetch { client, token })
    }
}
