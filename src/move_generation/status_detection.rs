//! Game-ending condition detection for a single board.
//!
//! Mate and stalemate take precedence over the draw rules, so a mating move
//! that also reaches the fifty-move limit is still checkmate.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::FIFTY_MOVE_HALFMOVES;
use crate::game_state::chess_types::*;
use crate::game_state::game_status::{DrawReason, GameStatus};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;

const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

pub fn detect_status(board: &Board) -> GameStatus {
    let mover = board.side_to_move();
    let in_check = is_king_in_check(board, mover);

    if !has_legal_move(board) {
        return if in_check {
            GameStatus::Checkmate(mover.opposite())
        } else {
            GameStatus::Stalemate
        };
    }

    if is_insufficient_material(board) {
        return GameStatus::DrawOther(DrawReason::InsufficientMaterial);
    }

    if board.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
        return GameStatus::DrawOther(DrawReason::FiftyMoveRule);
    }

    if in_check {
        GameStatus::Check
    } else {
        GameStatus::Ongoing
    }
}

/// Neither side can ever mate: bare kings, a single minor piece, or only
/// bishops that all stand on one square color.
pub fn is_insufficient_material(board: &Board) -> bool {
    let both = |kind| board.pieces(Color::White, kind) | board.pieces(Color::Black, kind);

    if both(PieceKind::Pawn) | both(PieceKind::Rook) | both(PieceKind::Queen) != 0 {
        return false;
    }

    let knights = both(PieceKind::Knight);
    let bishops = both(PieceKind::Bishop);
    if (knights | bishops).count_ones() <= 1 {
        return true;
    }

    knights == 0 && (bishops & LIGHT_SQUARES == 0 || bishops & !LIGHT_SQUARES == 0)
}
