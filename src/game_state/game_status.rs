use std::fmt;

use crate::game_state::chess_types::Color;

/// Why a game ended in a draw other than stalemate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

/// Outcome of the position for the side to move. Always derived from a
/// board, never stored next to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Check,
    /// The side that delivered mate.
    Checkmate(Color),
    Stalemate,
    DrawOther(DrawReason),
}

impl GameStatus {
    /// No further moves may be played.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::FiftyMoveRule => "fifty-move rule",
            DrawReason::ThreefoldRepetition => "threefold repetition",
        };
        f.write_str(label)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::Check => f.write_str("check"),
            GameStatus::Checkmate(winner) => write!(f, "checkmate, {} wins", winner.name()),
            GameStatus::Stalemate => f.write_str("stalemate"),
            GameStatus::DrawOther(reason) => write!(f, "draw by {reason}"),
        }
    }
}
