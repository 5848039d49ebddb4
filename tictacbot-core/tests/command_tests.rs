// ABOUTME: Integration tests for the /ttt subcommand handlers
// ABOUTME: Exercises start/move/display/cancel/help against an in-memory directory

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use tictacbot_core::{
    ChannelRoster, CommandError, GameService, Invocation, UserDirectory, Visibility,
};

/// Directory backed by fixed maps, standing in for the Slack API.
struct FakeDirectory {
    users: HashMap<String, String>,
    rosters: HashMap<String, Vec<String>>,
}

impl FakeDirectory {
    fn with_test_team() -> Self {
        let mut users = HashMap::new();
        users.insert("blueberry".to_string(), "muffin".to_string());
        users.insert("omelette".to_string(), "bacon".to_string());
        let mut rosters = HashMap::new();
        rosters.insert(
            "C1".to_string(),
            vec!["muffin".to_string(), "bacon".to_string()],
        );
        Self { users, rosters }
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn user_id(&self, username: &str) -> Result<Option<String>> {
        Ok(self.users.get(username).cloned())
    }
}

#[async_trait]
impl ChannelRoster for FakeDirectory {
    async fn members(&self, channel_id: &str) -> Result<Option<Vec<String>>> {
        Ok(self.rosters.get(channel_id).cloned())
    }
}

fn service() -> GameService {
    GameService::new(Arc::new(FakeDirectory::with_test_team()))
}

fn inv(channel: &str, user_name: &str, user_id: &str, text: &str) -> Invocation {
    Invocation {
        text: text.to_string(),
        channel_id: channel.to_string(),
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
    }
}

/// omelette (bacon) challenges blueberry (muffin) in C1
fn omelette(text: &str) -> Invocation {
    inv("C1", "omelette", "bacon", text)
}

fn blueberry(text: &str) -> Invocation {
    inv("C1", "blueberry", "muffin", text)
}

// =========================================================================
// start
// =========================================================================

#[tokio::test]
async fn test_start_challenges_opponent_in_channel() {
    let svc = service();
    let reply = svc.handle(&omelette("start @blueberry")).await;
    assert_eq!(reply.visibility, Visibility::InChannel);
    assert!(reply.text.contains("<@muffin|blueberry>"));
    assert!(reply.text.contains("omelette has challenged you to a game!"));
    assert!(reply.text.contains("A  ... | ... | ..."));
    assert!(svc.registry().contains("C1").await);
}

#[tokio::test]
async fn test_start_without_at_prefix_is_usage_error() {
    let svc = service();
    let reply = svc.handle(&omelette("start blueberry")).await;
    assert_eq!(reply.visibility, Visibility::Ephemeral);
    assert_eq!(reply.text, CommandError::Usage.to_string());
    assert!(!svc.registry().contains("C1").await);
}

#[tokio::test]
async fn test_start_with_missing_or_extra_args_is_usage_error() {
    let svc = service();
    for text in ["start", "start @blueberry @pancakes"] {
        let reply = svc.handle(&omelette(text)).await;
        assert_eq!(reply.text, CommandError::Usage.to_string());
    }
}

#[tokio::test]
async fn test_start_with_unknown_user() {
    let svc = service();
    let reply = svc.handle(&omelette("start @pancakes")).await;
    assert_eq!(reply.visibility, Visibility::Ephemeral);
    assert_eq!(reply.text, CommandError::UnknownUser.to_string());
}

#[tokio::test]
async fn test_start_with_user_outside_channel() {
    // blueberry exists on the team but is not in C2's roster
    let mut rosters = HashMap::new();
    rosters.insert("C2".to_string(), vec!["bacon".to_string()]);
    let directory = FakeDirectory {
        users: FakeDirectory::with_test_team().users,
        rosters,
    };
    let svc = GameService::new(Arc::new(directory));
    let reply = svc
        .handle(&inv("C2", "omelette", "bacon", "start @blueberry"))
        .await;
    assert_eq!(reply.text, CommandError::UserNotInChannel.to_string());
    assert!(!svc.registry().contains("C2").await);
}

#[tokio::test]
async fn test_start_skips_membership_check_without_roster() {
    // No roster entry for C3, so the membership check is skipped
    let svc = service();
    let reply = svc
        .handle(&inv("C3", "omelette", "bacon", "start @blueberry"))
        .await;
    assert_eq!(reply.visibility, Visibility::InChannel);
    assert!(svc.registry().contains("C3").await);
}

#[tokio::test]
async fn test_start_rejected_when_game_already_running() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    let reply = svc.handle(&blueberry("start @omelette")).await;
    assert_eq!(reply.text, CommandError::GameAlreadyExists.to_string());
}

#[tokio::test]
async fn test_start_allowed_when_game_is_in_another_channel() {
    let svc = service();
    svc.handle(&inv("C3", "omelette", "bacon", "start @blueberry"))
        .await;
    let reply = svc.handle(&omelette("start @blueberry")).await;
    assert_eq!(reply.visibility, Visibility::InChannel);
    assert!(svc.registry().contains("C1").await);
    assert!(svc.registry().contains("C3").await);
}

// =========================================================================
// move
// =========================================================================

#[tokio::test]
async fn test_move_without_game() {
    let svc = service();
    let reply = svc.handle(&omelette("move B2")).await;
    assert_eq!(reply.text, CommandError::NoGame.to_string());
}

#[tokio::test]
async fn test_challenged_player_moves_first() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;

    // The challenger must wait for the opponent's opening move
    let reply = svc.handle(&omelette("move B2")).await;
    assert_eq!(reply.text, CommandError::NotYourTurn.to_string());

    let reply = svc.handle(&blueberry("move B2")).await;
    assert_eq!(reply.visibility, Visibility::InChannel);
    assert!(reply.text.contains(" X "));
    assert!(reply.text.contains("It's omelette's turn to make a move."));
}

#[tokio::test]
async fn test_spectator_cannot_move() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    let reply = svc.handle(&inv("C1", "waffles", "syrup", "move A1")).await;
    assert_eq!(reply.text, CommandError::NotAuthorized.to_string());
}

#[tokio::test]
async fn test_move_with_invalid_position() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    for bad in ["X1", "A4", "A11", "center"] {
        let reply = svc.handle(&blueberry(&format!("move {bad}"))).await;
        assert_eq!(reply.text, CommandError::InvalidMove.to_string());
    }
}

#[tokio::test]
async fn test_move_position_is_case_insensitive() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    let reply = svc.handle(&blueberry("move b2")).await;
    assert_eq!(reply.visibility, Visibility::InChannel);
    assert!(reply.text.contains(" X "));
}

#[tokio::test]
async fn test_move_to_taken_position() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    svc.handle(&blueberry("move B2")).await;
    let reply = svc.handle(&omelette("move B2")).await;
    assert_eq!(reply.text, CommandError::PositionTaken.to_string());
    // The failed move does not consume the turn
    let reply = svc.handle(&omelette("move A1")).await;
    assert_eq!(reply.visibility, Visibility::InChannel);
}

#[tokio::test]
async fn test_winning_move_announces_and_ends_game() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    // blueberry (X) fills row A, omelette (O) plays elsewhere
    svc.handle(&blueberry("move A1")).await;
    svc.handle(&omelette("move B1")).await;
    svc.handle(&blueberry("move A2")).await;
    svc.handle(&omelette("move B2")).await;
    let reply = svc.handle(&blueberry("move A3")).await;

    assert_eq!(reply.visibility, Visibility::InChannel);
    assert!(reply.text.contains("blueberry has won the game!"));
    assert!(reply.text.contains("Game over."));
    assert!(!svc.registry().contains("C1").await, "won game should be removed");

    // Channel is free for a rematch
    let reply = svc.handle(&omelette("start @blueberry")).await;
    assert_eq!(reply.visibility, Visibility::InChannel);
}

#[tokio::test]
async fn test_full_board_without_winner_is_announced_as_tie() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    // Alternating moves ending in a full board with no three-in-a-row:
    //   X O X
    //   X O O
    //   O X X
    let moves = [
        ("A1", true),
        ("A2", false),
        ("A3", true),
        ("B2", false),
        ("B1", true),
        ("B3", false),
        ("C2", true),
        ("C1", false),
        ("C3", true),
    ];
    let mut last = None;
    for (pos, is_x) in moves {
        let player: fn(&str) -> Invocation = if is_x { blueberry } else { omelette };
        last = Some(svc.handle(&player(&format!("move {pos}"))).await);
    }
    let reply = last.unwrap();
    assert!(reply.text.contains("You've tied!"), "got: {}", reply.text);
    assert_eq!(reply.visibility, Visibility::InChannel);
    assert!(!svc.registry().contains("C1").await, "tied game should be removed");
}

// =========================================================================
// display
// =========================================================================

#[tokio::test]
async fn test_display_without_game() {
    let svc = service();
    let reply = svc.handle(&omelette("display")).await;
    assert_eq!(reply.text, CommandError::NoGame.to_string());
}

#[tokio::test]
async fn test_display_shows_board_and_turn_to_anyone() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    svc.handle(&blueberry("move C2")).await;

    // A spectator can display
    let reply = svc.handle(&inv("C1", "waffles", "syrup", "display")).await;
    assert_eq!(reply.visibility, Visibility::InChannel);
    assert!(reply.text.contains("omelette (O) vs. blueberry (X)"));
    assert!(reply.text.contains("C  ... |  X  | ..."));
    assert!(reply.text.contains("It's omelette's turn to make a move."));
}

// =========================================================================
// cancel
// =========================================================================

#[tokio::test]
async fn test_cancel_without_game() {
    let svc = service();
    let reply = svc.handle(&omelette("cancel")).await;
    assert_eq!(reply.text, CommandError::NoGame.to_string());
}

#[tokio::test]
async fn test_cancel_by_spectator_rejected() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    let reply = svc.handle(&inv("C1", "waffles", "syrup", "cancel")).await;
    assert_eq!(reply.text, CommandError::NotAuthorized.to_string());
    assert!(svc.registry().contains("C1").await);
}

#[tokio::test]
async fn test_cancel_by_player_frees_the_channel() {
    let svc = service();
    svc.handle(&omelette("start @blueberry")).await;
    let reply = svc.handle(&blueberry("cancel")).await;
    assert_eq!(reply.visibility, Visibility::InChannel);
    assert!(reply
        .text
        .contains("blueberry has cancelled the current game."));
    assert!(!svc.registry().contains("C1").await);
}

// =========================================================================
// help and usage
// =========================================================================

#[tokio::test]
async fn test_help_is_ephemeral() {
    let svc = service();
    let reply = svc.handle(&omelette("help")).await;
    assert_eq!(reply.visibility, Visibility::Ephemeral);
    assert!(reply.text.contains("/ttt start"));
    assert!(reply.text.contains("/ttt move"));
}

#[tokio::test]
async fn test_empty_and_unknown_commands_get_usage() {
    let svc = service();
    for text in ["", "   ", "banana", "help me please"] {
        let reply = svc.handle(&omelette(text)).await;
        assert_eq!(reply.visibility, Visibility::Ephemeral);
        assert_eq!(reply.text, CommandError::Usage.to_string());
    }
}
