// ABOUTME: Platform-agnostic tic-tac-toe logic for the Slack slash command bot
// ABOUTME: Provides the board model, per-channel game registry, command routing, and config

pub mod commands;
pub mod config;
pub mod error;
pub mod game;
pub mod paths;
pub mod registry;
pub mod traits;

// Re-export the types most callers need
pub use commands::{GameService, Invocation, Reply, Subcommand, Visibility};
pub use error::CommandError;
pub use game::{Game, Mark, Player, Pos, Seat};
pub use registry::GameRegistry;
pub use traits::{ChannelRoster, Directory, UserDirectory};
