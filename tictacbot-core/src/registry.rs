// ABOUTME: Channel-keyed registry of games in progress
// ABOUTME: Enforces the one-active-game-per-channel rule for the whole process

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::error::CommandError;
use crate::game::Game;

/// In-memory map from Slack channel ID to the game being played there.
/// State lives for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: Mutex<HashMap<String, Game>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new game for a channel. Fails if the channel already has one.
    pub async fn insert(&self, channel_id: &str, game: Game) -> Result<(), CommandError> {
        let mut games = self.games.lock().await;
        if games.contains_key(channel_id) {
            return Err(CommandError::GameAlreadyExists);
        }
        games.insert(channel_id.to_string(), game);
        Ok(())
    }

    pub async fn contains(&self, channel_id: &str) -> bool {
        self.games.lock().await.contains_key(channel_id)
    }

    /// Run `f` against the channel's game under the lock. Returns `None` when
    /// no game is being played in the channel.
    pub async fn with_game<T>(
        &self,
        channel_id: &str,
        f: impl FnOnce(&mut Game) -> T,
    ) -> Option<T> {
        let mut games = self.games.lock().await;
        games.get_mut(channel_id).map(f)
    }

    /// Remove and return the channel's game, if any.
    pub async fn remove(&self, channel_id: &str) -> Option<Game> {
        self.games.lock().await.remove(channel_id)
    }

    pub async fn len(&self) -> usize {
        self.games.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.lock().await.is_empty()
    }
}
