//! Current board plus the position history needed for repetition draws.
//!
//! FEN carries no history, so threefold repetition cannot be read off a
//! single [`Board`]. `GameRecord` keeps the position keys seen since the
//! last irreversible move (pawn move or capture) next to the board they lead
//! to. Advancing the record is pure as well: [`GameRecord::advanced`] returns
//! a new record and leaves `self` alone.

use crate::errors::ChessResult;
use crate::game_state::board::Board;
use crate::game_state::chess_rules::REPETITION_LIMIT;
use crate::game_state::game_status::{DrawReason, GameStatus};
use crate::move_generation::legal_move_apply::apply_request;
use crate::move_generation::status_detection::detect_status;
use crate::moves::chess_move::{Move, MoveRequest, PromotionPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    board: Board,
    // Position keys since the last irreversible move, current one last.
    positions: Vec<String>,
    moves: Vec<Move>,
}

impl GameRecord {
    pub fn new() -> Self {
        Self::from_board(Board::new_game())
    }

    pub fn from_board(board: Board) -> Self {
        let positions = vec![board.position_key()];
        Self {
            board,
            positions,
            moves: Vec::new(),
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves played since the record was created.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The record after playing `request`, together with the resolved move.
    pub fn advanced(
        &self,
        request: MoveRequest,
        policy: PromotionPolicy,
    ) -> ChessResult<(Move, GameRecord)> {
        let (mv, board) = apply_request(&self.board, request, policy)?;

        let mut positions = if board.halfmove_clock() == 0 {
            Vec::new()
        } else {
            self.positions.clone()
        };
        positions.push(board.position_key());

        let mut moves = self.moves.clone();
        moves.push(mv);

        Ok((
            mv,
            GameRecord {
                board,
                positions,
                moves,
            },
        ))
    }

    /// How often the current position has occurred since the last
    /// irreversible move, including now.
    pub fn repetition_count(&self) -> usize {
        let Some(current) = self.positions.last() else {
            return 0;
        };
        self.positions.iter().filter(|key| *key == current).count()
    }

    /// Board status, upgraded to a repetition draw when the current position
    /// has occurred often enough and the game is otherwise still running.
    pub fn status(&self) -> GameStatus {
        let status = detect_status(&self.board);
        if !status.is_terminal() && self.repetition_count() >= REPETITION_LIMIT {
            return GameStatus::DrawOther(DrawReason::ThreefoldRepetition);
        }
        status
    }
}

impl Default for GameRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::long_algebraic::parse_move_request;

    fn play_all(record: GameRecord, moves: &[&str]) -> GameRecord {
        moves.iter().fold(record, |record, lan| {
            let request = parse_move_request(lan).expect("move text should parse");
            record
                .advanced(request, PromotionPolicy::DefaultToQueen)
                .expect("move should be legal")
                .1
        })
    }

    #[test]
    fn knight_shuffle_reaches_threefold_repetition() {
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        let once = play_all(GameRecord::new(), &shuffle);
        assert_eq!(once.repetition_count(), 2);
        assert_eq!(once.status(), GameStatus::Ongoing);

        let twice = play_all(once, &shuffle);
        assert_eq!(twice.repetition_count(), 3);
        assert_eq!(
            twice.status(),
            GameStatus::DrawOther(DrawReason::ThreefoldRepetition)
        );
        assert_eq!(twice.moves().len(), 8);
    }

    #[test]
    fn pawn_move_resets_repetition_history() {
        let record = play_all(GameRecord::new(), &["g1f3", "g8f6", "f3g1", "f6g8", "e2e4"]);
        assert_eq!(record.repetition_count(), 1);
    }

    #[test]
    fn failed_advance_leaves_record_unchanged() {
        let record = GameRecord::new();
        let before = record.clone();
        let bad = record.advanced(MoveRequest::new(12, 44), PromotionPolicy::Strict);
        assert!(bad.is_err());
        assert_eq!(record, before);
    }
}
