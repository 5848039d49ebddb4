// ABOUTME: Seams between the game logic and the chat platform
// ABOUTME: Command handling only needs name-to-ID lookup and channel membership

use anyhow::Result;
use async_trait::async_trait;

/// Resolve team usernames to user IDs.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up the user ID for a username (without the leading @).
    /// `Ok(None)` means the user does not exist on the team.
    async fn user_id(&self, username: &str) -> Result<Option<String>>;
}

/// List the members of a channel.
#[async_trait]
pub trait ChannelRoster: Send + Sync {
    /// Member user IDs for a channel. `Ok(None)` means the roster could not
    /// be determined; callers skip the membership check in that case.
    async fn members(&self, channel_id: &str) -> Result<Option<Vec<String>>>;
}

/// Combined lookup surface the command handlers depend on.
pub trait Directory: UserDirectory + ChannelRoster {}

impl<T: UserDirectory + ChannelRoster> Directory for T {}
