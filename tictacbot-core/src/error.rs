// ABOUTME: Domain errors for slash command handling
// ABOUTME: Each variant carries the exact user-facing text sent back as an ephemeral reply

use thiserror::Error;

/// A rejected slash command. The `Display` text is what the invoking user
/// sees, so phrasing here is part of the bot's interface.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error(
        "Use /ttt to play a game of tic tac toe.\n\
         To start a game: /ttt start [@user]\n\
         To make a move: /ttt move [position]\n\
         To display current board: /ttt display\n\
         To cancel a current game: /ttt cancel\n\
         For help: /ttt help"
    )]
    Usage,

    #[error("A game is already being played in this channel. Try another channel, or /ttt help for help.")]
    GameAlreadyExists,

    #[error("No game is being played yet! Start one with /ttt start [@user], or try /ttt help for help.")]
    NoGame,

    #[error(
        "That's not a valid move! Specify a position on the board using a row letter (A, B, C) and a column number (1, 2, 3).\n\
         For example, to mark the bottom middle spot of the board: /ttt move C2"
    )]
    InvalidMove,

    #[error("That position is already taken!")]
    PositionTaken,

    #[error("It's not your turn to make a move! Patience.")]
    NotYourTurn,

    #[error("Only the two players can do that. You could always start your own game in another channel...")]
    NotAuthorized,

    #[error("That user doesn't exist! Try again, or try /ttt help.")]
    UnknownUser,

    #[error("That user isn't in this channel! Challenge someone who is here to see it.")]
    UserNotInChannel,

    #[error("That's an invalid token. Which means you're an imposter, and you don't get to play!")]
    InvalidToken,

    #[error("An error has occurred. Try again later, or try /ttt help.")]
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lists_all_subcommands() {
        let text = CommandError::Usage.to_string();
        for subcommand in ["start", "move", "display", "cancel", "help"] {
            assert!(text.contains(subcommand), "usage missing {subcommand}");
        }
    }

    #[test]
    fn test_error_texts_are_distinct() {
        let all = [
            CommandError::Usage,
            CommandError::GameAlreadyExists,
            CommandError::NoGame,
            CommandError::InvalidMove,
            CommandError::PositionTaken,
            CommandError::NotYourTurn,
            CommandError::NotAuthorized,
            CommandError::UnknownUser,
            CommandError::UserNotInChannel,
            CommandError::InvalidToken,
            CommandError::Internal,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.to_string(), b.to_string());
            }
        }
    }
}
