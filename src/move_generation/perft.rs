//! Perft: leaf-node counting over the legal move tree, used to validate move
//! generation against published node counts.

use crate::game_state::board::Board;
use crate::move_generation::legal_move_generator::{legal_moves, legal_successors};

pub fn perft(board: &Board, depth: u8) -> u64 {
    match depth {
        0 => 1,
        // Bulk-count the last ply instead of applying every leaf move.
        1 => legal_moves(board).len() as u64,
        _ => legal_successors(board)
            .iter()
            .map(|next| perft(&next.board_after, depth - 1))
            .sum(),
    }
}

/// Per-root-move node counts, sorted by move text. Handy for bisecting a
/// perft mismatch against another engine.
pub fn perft_divide(board: &Board, depth: u8) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = legal_successors(board)
        .iter()
        .map(|next| {
            let nodes = perft(&next.board_after, depth.saturating_sub(1));
            (next.mv.to_string(), nodes)
        })
        .collect();
    rows.sort();
    rows
}
