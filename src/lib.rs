// ABOUTME: Root library module exposing the Slack-facing glue
// ABOUTME: Re-exports the platform-agnostic game logic from tictacbot-core

pub mod directory;
pub mod server;

// Re-export platform-agnostic modules from tictacbot-core
pub use tictacbot_core::commands;
pub use tictacbot_core::config;
pub use tictacbot_core::error;
pub use tictacbot_core::game;
pub use tictacbot_core::paths;
pub use tictacbot_core::registry;
pub use tictacbot_core::traits;
