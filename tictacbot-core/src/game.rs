// ABOUTME: Board model for a single tic-tac-toe game between two Slack users
// ABOUTME: Covers position parsing, win/tie detection, turn tracking, and board rendering

use std::fmt;
use std::str::FromStr;

/// A mark on the board. The challenged opponent plays X, the challenger plays O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// One of the nine board positions, addressed by row letter (A, B, C) and
/// column number (1, 2, 3). `"b2"` parses to the center cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    row: u8,
    col: u8,
}

impl Pos {
    /// All positions in display order (A1, A2, A3, B1, ...).
    pub const ALL: [Pos; 9] = [
        Pos { row: 0, col: 0 },
        Pos { row: 0, col: 1 },
        Pos { row: 0, col: 2 },
        Pos { row: 1, col: 0 },
        Pos { row: 1, col: 1 },
        Pos { row: 1, col: 2 },
        Pos { row: 2, col: 0 },
        Pos { row: 2, col: 1 },
        Pos { row: 2, col: 2 },
    ];

    fn index(self) -> usize {
        (self.row * 3 + self.col) as usize
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.row) as char, self.col + 1)
    }
}

/// Error returned when a string is not a valid board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPos;

impl FromStr for Pos {
    type Err = InvalidPos;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(row_ch), Some(col_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(InvalidPos);
        };
        let row = match row_ch.to_ascii_uppercase() {
            'A' => 0,
            'B' => 1,
            'C' => 2,
            _ => return Err(InvalidPos),
        };
        let col = match col_ch {
            '1' => 0,
            '2' => 1,
            '3' => 2,
            _ => return Err(InvalidPos),
        };
        Ok(Pos { row, col })
    }
}

/// A participant in a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Slack username (without the leading @)
    pub name: String,
    /// Slack user ID
    pub id: String,
}

impl Player {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Which of the two players a user occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    /// The user who issued `start`. Plays O, moves second.
    Challenger,
    /// The user who was challenged. Plays X, moves first.
    Opponent,
}

impl Seat {
    pub fn mark(self) -> Mark {
        match self {
            Seat::Challenger => Mark::O,
            Seat::Opponent => Mark::X,
        }
    }

    fn other(self) -> Seat {
        match self {
            Seat::Challenger => Seat::Opponent,
            Seat::Opponent => Seat::Challenger,
        }
    }
}

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals (cell indices).
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// One game in progress. The challenged opponent always has the first move.
#[derive(Debug, Clone)]
pub struct Game {
    board: [Option<Mark>; 9],
    turn: Seat,
    challenger: Player,
    opponent: Player,
}

impl Game {
    /// Start a game between `challenger` (O, moves second) and the challenged
    /// `opponent` (X, moves first).
    pub fn new(challenger: Player, opponent: Player) -> Self {
        Self {
            board: [None; 9],
            turn: Seat::Opponent,
            challenger,
            opponent,
        }
    }

    pub fn player(&self, seat: Seat) -> &Player {
        match seat {
            Seat::Challenger => &self.challenger,
            Seat::Opponent => &self.opponent,
        }
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Player {
        self.player(self.turn)
    }

    /// Find the seat a user ID occupies, if they are playing at all.
    pub fn seat_of(&self, user_id: &str) -> Option<Seat> {
        if self.challenger.id == user_id {
            Some(Seat::Challenger)
        } else if self.opponent.id == user_id {
            Some(Seat::Opponent)
        } else {
            None
        }
    }

    pub fn cell(&self, pos: Pos) -> Option<Mark> {
        self.board[pos.index()]
    }

    /// Place the current player's mark at `pos`. Returns false (and leaves the
    /// board untouched) if the cell is already occupied.
    pub fn play(&mut self, pos: Pos) -> bool {
        let cell = &mut self.board[pos.index()];
        if cell.is_some() {
            return false;
        }
        *cell = Some(self.turn.mark());
        true
    }

    /// Hand the turn to the other player.
    pub fn advance_turn(&mut self) {
        self.turn = self.turn.other();
    }

    /// Check the 8 fixed lines for three equal non-empty marks.
    pub fn has_winner(&self) -> bool {
        LINES.iter().any(|line| {
            let first = self.board[line[0]];
            first.is_some() && line.iter().all(|&i| self.board[i] == first)
        })
    }

    /// True when every cell is occupied. Checked after `has_winner`, so a full
    /// board without a winner is a tie.
    pub fn is_full(&self) -> bool {
        self.board.iter().all(|c| c.is_some())
    }

    /// Multi-line board display with a title naming the players.
    ///
    /// ```text
    /// batman (O) vs. superman (X)
    ///       1    2    3
    /// A  ... | ... | ...
    /// B   X  | ... | ...
    /// C  ... |  O  | ...
    /// ```
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} (O) vs. {} (X)\n      1    2    3",
            self.challenger.name, self.opponent.name
        );
        for row in 0..3u8 {
            let cells: Vec<String> = (0..3u8)
                .map(|col| match self.board[Pos { row, col }.index()] {
                    Some(mark) => format!(" {} ", mark),
                    None => "...".to_string(),
                })
                .collect();
            out.push_str(&format!(
                "\n{}  {}",
                (b'A' + row) as char,
                cells.join(" | ")
            ));
        }
        out
    }
}
