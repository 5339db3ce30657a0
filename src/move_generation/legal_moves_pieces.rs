//! Pseudo-legal knight, bishop, rook and queen moves.
//!
//! These pieces only differ in their attack mask, so one routine walks every
//! piece of a kind and turns its mask into quiet moves and captures.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::moves::attack_tables::{bishop_attacks, knight_attacks, queen_attacks, rook_attacks};
use crate::moves::chess_move::{Move, MoveFlags};

pub fn generate_knight_moves(board: &Board, out: &mut Vec<Move>) {
    generate_for_kind(board, PieceKind::Knight, out, |sq, _| knight_attacks(sq));
}

pub fn generate_bishop_moves(board: &Board, out: &mut Vec<Move>) {
    generate_for_kind(board, PieceKind::Bishop, out, bishop_attacks);
}

pub fn generate_rook_moves(board: &Board, out: &mut Vec<Move>) {
    generate_for_kind(board, PieceKind::Rook, out, rook_attacks);
}

pub fn generate_queen_moves(board: &Board, out: &mut Vec<Move>) {
    generate_for_kind(board, PieceKind::Queen, out, queen_attacks);
}

fn generate_for_kind(
    board: &Board,
    kind: PieceKind,
    out: &mut Vec<Move>,
    attacks: impl Fn(Square, u64) -> u64,
) {
    let side = board.side_to_move();
    let own_occ = board.occupancy(side);
    let enemy_occ = board.occupancy(side.opposite());

    let mut pieces = board.pieces(side, kind);
    while pieces != 0 {
        let from = pieces.trailing_zeros() as Square;
        let mut targets = attacks(from, board.occupancy_all()) & !own_occ;

        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            let flags = if (1u64 << to) & enemy_occ != 0 {
                MoveFlags::CAPTURE
            } else {
                MoveFlags::QUIET
            };
            out.push(Move::new(from, to, kind, flags));
            targets &= targets - 1;
        }

        pieces &= pieces - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_knights_have_four_moves() {
        let board = Board::new_game();
        let mut out = Vec::new();
        generate_knight_moves(&board, &mut out);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|mv| !mv.is_capture()));
    }

    #[test]
    fn sliders_capture_enemy_but_not_own_pieces() {
        let board =
            Board::from_fen("4k3/8/8/8/8/1p6/8/R2BK3 w - - 0 1").expect("FEN should parse");
        let mut rook = Vec::new();
        generate_rook_moves(&board, &mut rook);
        // a2..a8 up the file, b1 and c1 before the own bishop on d1
        assert_eq!(rook.len(), 9);

        let mut bishop = Vec::new();
        generate_bishop_moves(&board, &mut bishop);
        let captures: Vec<String> = bishop
            .iter()
            .filter(|mv| mv.is_capture())
            .map(ToString::to_string)
            .collect();
        assert_eq!(captures, vec!["d1b3".to_owned()]);
    }
}
