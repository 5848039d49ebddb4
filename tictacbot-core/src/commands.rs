// ABOUTME: Slash command parsing and the five subcommand handlers
// ABOUTME: Turns an incoming /ttt invocation into a reply text plus visibility

use std::sync::Arc;

use serde::Serialize;

use crate::error::CommandError;
use crate::game::{Game, Player, Pos};
use crate::registry::GameRegistry;
use crate::traits::Directory;

/// Who gets to see a reply in Slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to the whole channel.
    InChannel,
    /// Visible only to the invoking user.
    Ephemeral,
}

/// The outcome of handling a slash command: what to say and who sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub visibility: Visibility,
}

impl Reply {
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::InChannel,
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::Ephemeral,
        }
    }
}

impl From<CommandError> for Reply {
    fn from(err: CommandError) -> Self {
        Reply::ephemeral(err.to_string())
    }
}

/// One `/ttt` invocation, extracted from the slash command form fields.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Raw text after `/ttt`
    pub text: String,
    pub channel_id: String,
    pub user_id: String,
    pub user_name: String,
}

/// A parsed `/ttt` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subcommand {
    Start { opponent: String },
    Move { position: String },
    Display,
    Cancel,
    Help,
}

/// Parse the slash command text into a subcommand, enforcing arity.
/// Anything else is a usage error.
pub fn parse_subcommand(text: &str) -> Result<Subcommand, CommandError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.as_slice() {
        ["start", opponent] => Ok(Subcommand::Start {
            opponent: opponent.to_string(),
        }),
        ["move", position] => Ok(Subcommand::Move {
            position: position.to_string(),
        }),
        ["display"] => Ok(Subcommand::Display),
        ["cancel"] => Ok(Subcommand::Cancel),
        ["help"] => Ok(Subcommand::Help),
        _ => Err(CommandError::Usage),
    }
}

/// Help text shown for `/ttt help` (ephemeral).
pub const HELP_TEXT: &str = "Play tic tac toe right here in the channel!\n\
    /ttt start [@user]: challenge someone in this channel to a game\n\
    /ttt move [position]: mark a position, given as row letter and column number (for example B2)\n\
    /ttt display: show the current board and whose turn it is\n\
    /ttt cancel: cancel the game being played (players only)\n\
    /ttt help: show this message";

enum MoveOutcome {
    Won { board: String },
    Tied { board: String },
    InProgress { board: String, next: String },
}

/// Routes parsed subcommands to their handlers against the shared game
/// registry and the user directory.
pub struct GameService {
    registry: GameRegistry,
    directory: Arc<dyn Directory>,
}

impl GameService {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self {
            registry: GameRegistry::new(),
            directory,
        }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Handle one invocation. Rejections come back as ephemeral replies so
    /// this never fails from the HTTP handler's point of view.
    pub async fn handle(&self, inv: &Invocation) -> Reply {
        match self.dispatch(inv).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::debug!(
                    channel = %inv.channel_id,
                    user = %inv.user_name,
                    error = %err,
                    "Command rejected"
                );
                Reply::from(err)
            }
        }
    }

    async fn dispatch(&self, inv: &Invocation) -> Result<Reply, CommandError> {
        match parse_subcommand(&inv.text)? {
            Subcommand::Start { opponent } => self.start(inv, &opponent).await,
            Subcommand::Move { position } => self.make_move(inv, &position).await,
            Subcommand::Display => self.display(inv).await,
            Subcommand::Cancel => self.cancel(inv).await,
            Subcommand::Help => Ok(Reply::ephemeral(HELP_TEXT)),
        }
    }

    /// `start @user`: register a game and publicly challenge the opponent.
    async fn start(&self, inv: &Invocation, opponent: &str) -> Result<Reply, CommandError> {
        if self.registry.contains(&inv.channel_id).await {
            return Err(CommandError::GameAlreadyExists);
        }

        let Some(opponent_name) = opponent.strip_prefix('@') else {
            return Err(CommandError::Usage);
        };

        let opponent_id = self
            .directory
            .user_id(opponent_name)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "User directory lookup failed");
                CommandError::Internal
            })?
            .ok_or(CommandError::UnknownUser)?;

        // Membership check is skipped when the roster can't be determined,
        // e.g. for channel types the API won't enumerate.
        if let Some(members) = self
            .directory
            .members(&inv.channel_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, channel = %inv.channel_id, "Channel roster lookup failed");
                CommandError::Internal
            })?
        {
            if !members.iter().any(|id| *id == opponent_id) {
                return Err(CommandError::UserNotInChannel);
            }
        }

        let game = Game::new(
            Player::new(&inv.user_name, &inv.user_id),
            Player::new(opponent_name, &opponent_id),
        );
        let board = game.render();
        self.registry.insert(&inv.channel_id, game).await?;

        tracing::info!(
            channel = %inv.channel_id,
            challenger = %inv.user_name,
            opponent = %opponent_name,
            "Game started"
        );

        Ok(Reply::in_channel(format!(
            "<@{opponent_id}|{opponent_name}>, {challenger} has challenged you to a game! Your move.\n{board}",
            challenger = inv.user_name,
        )))
    }

    /// `move <pos>`: place the invoker's mark, then settle win/tie/next-turn.
    async fn make_move(&self, inv: &Invocation, position: &str) -> Result<Reply, CommandError> {
        let user_id = inv.user_id.clone();
        let position = position.to_string();
        let outcome = self
            .registry
            .with_game(&inv.channel_id, |game| {
                if game.current_player().id != user_id {
                    // Spectators get a different rejection than the waiting player.
                    return Err(if game.seat_of(&user_id).is_none() {
                        CommandError::NotAuthorized
                    } else {
                        CommandError::NotYourTurn
                    });
                }
                let pos: Pos = position.parse().map_err(|_| CommandError::InvalidMove)?;
                if !game.play(pos) {
                    return Err(CommandError::PositionTaken);
                }
                if game.has_winner() {
                    return Ok(MoveOutcome::Won {
                        board: game.render(),
                    });
                }
                if game.is_full() {
                    return Ok(MoveOutcome::Tied {
                        board: game.render(),
                    });
                }
                game.advance_turn();
                Ok(MoveOutcome::InProgress {
                    board: game.render(),
                    next: game.current_player().name.clone(),
                })
            })
            .await
            .ok_or(CommandError::NoGame)??;

        match outcome {
            MoveOutcome::Won { board } => {
                self.registry.remove(&inv.channel_id).await;
                tracing::info!(
                    channel = %inv.channel_id,
                    winner = %inv.user_name,
                    "Game won"
                );
                Ok(Reply::in_channel(format!(
                    "{board}\n{winner} has won the game!\nGame over. (If the result displeases you, you could always play another game...)",
                    winner = inv.user_name,
                )))
            }
            MoveOutcome::Tied { board } => {
                self.registry.remove(&inv.channel_id).await;
                tracing::info!(channel = %inv.channel_id, "Game tied");
                Ok(Reply::in_channel(format!(
                    "{board}\nYou've tied! Your skills are matched, apparently.\n(You could play another game to find out for sure...)"
                )))
            }
            MoveOutcome::InProgress { board, next } => Ok(Reply::in_channel(format!(
                "{board}\nIt's {next}'s turn to make a move."
            ))),
        }
    }

    /// `display`: show the board publicly. Open to everyone in the channel.
    async fn display(&self, inv: &Invocation) -> Result<Reply, CommandError> {
        let (board, next) = self
            .registry
            .with_game(&inv.channel_id, |game| {
                (game.render(), game.current_player().name.clone())
            })
            .await
            .ok_or(CommandError::NoGame)?;

        Ok(Reply::in_channel(format!(
            "{board}\nIt's {next}'s turn to make a move."
        )))
    }

    /// `cancel`: players only; removes the channel's game.
    async fn cancel(&self, inv: &Invocation) -> Result<Reply, CommandError> {
        let user_id = inv.user_id.clone();
        self.registry
            .with_game(&inv.channel_id, |game| {
                game.seat_of(&user_id)
                    .map(|_| ())
                    .ok_or(CommandError::NotAuthorized)
            })
            .await
            .ok_or(CommandError::NoGame)??;

        self.registry.remove(&inv.channel_id).await;
        tracing::info!(
            channel = %inv.channel_id,
            user = %inv.user_name,
            "Game cancelled"
        );

        Ok(Reply::in_channel(format!(
            "{} has cancelled the current game. Perhaps a rematch later.",
            inv.user_name
        )))
    }
}
