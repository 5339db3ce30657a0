use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::moves::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};

/// Whether the king of `color` is attacked. A board without that king is
/// never in check.
#[inline]
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = board.king_square(color) else {
        return false;
    };
    is_square_attacked(board, king_sq, color.opposite())
}

/// Whether any piece of `attacker_color` attacks `square`.
pub fn is_square_attacked(board: &Board, square: Square, attacker_color: Color) -> bool {
    // A pawn of the attacker attacks `square` iff a defender pawn on `square`
    // would attack the pawn's square.
    let defender = attacker_color.opposite();
    if pawn_attacks(defender, square) & board.pieces(attacker_color, PieceKind::Pawn) != 0 {
        return true;
    }

    if knight_attacks(square) & board.pieces(attacker_color, PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & board.pieces(attacker_color, PieceKind::King) != 0 {
        return true;
    }

    let queens = board.pieces(attacker_color, PieceKind::Queen);
    let occupancy = board.occupancy_all();

    let bishops_queens = board.pieces(attacker_color, PieceKind::Bishop) | queens;
    if bishop_attacks(square, occupancy) & bishops_queens != 0 {
        return true;
    }

    let rooks_queens = board.pieces(attacker_color, PieceKind::Rook) | queens;
    rook_attacks(square, occupancy) & rooks_queens != 0
}
