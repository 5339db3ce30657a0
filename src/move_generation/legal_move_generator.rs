//! Full legal move generation pipeline.
//!
//! Collects piece-wise pseudo-legal moves, applies each candidate, and drops
//! every candidate that leaves the mover's own king attacked.

use crate::game_state::board::Board;
use crate::move_generation::legal_move_apply::make_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::{
    generate_bishop_moves, generate_knight_moves, generate_queen_moves, generate_rook_moves,
};
use crate::moves::chess_move::Move;

/// A legal move together with the board it leads to.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub mv: Move,
    pub board_after: Board,
}

pub fn pseudo_legal_moves(board: &Board) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(64);
    generate_pawn_moves(board, &mut pseudo);
    generate_knight_moves(board, &mut pseudo);
    generate_bishop_moves(board, &mut pseudo);
    generate_rook_moves(board, &mut pseudo);
    generate_queen_moves(board, &mut pseudo);
    generate_king_moves(board, &mut pseudo);
    pseudo
}

/// Every legal move for the side to move, each with its resulting board.
pub fn legal_successors(board: &Board) -> Vec<GeneratedMove> {
    let mover = board.side_to_move();
    pseudo_legal_moves(board)
        .into_iter()
        .filter_map(|mv| {
            let board_after = make_move(board, mv);
            // Illegal if own king is in check after move.
            (!is_king_in_check(&board_after, mover)).then_some(GeneratedMove { mv, board_after })
        })
        .collect()
}

/// Every legal move for the side to move. Moves are distinct.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    legal_successors(board).into_iter().map(|g| g.mv).collect()
}

/// Whether the side to move has at least one legal move. Stops at the first.
pub fn has_legal_move(board: &Board) -> bool {
    let mover = board.side_to_move();
    pseudo_legal_moves(board)
        .into_iter()
        .any(|mv| !is_king_in_check(&make_move(board, mv), mover))
}
