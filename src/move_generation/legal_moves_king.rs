//! Pseudo-legal king steps and castling.
//!
//! Castling is only emitted when the right is still held, every square
//! between king and rook is empty, and neither the king's origin nor the
//! squares it crosses or lands on are attacked. The rook must still stand on
//! its corner, which matters for hand-written FENs that claim a right
//! without the rook.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::attack_tables::king_attacks;
use crate::moves::chess_move::{Move, MoveFlags};

struct CastleLane {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    must_be_empty: u64,
    must_be_safe: [Square; 2],
    flag: MoveFlags,
}

const CASTLE_LANES: [CastleLane; 4] = [
    CastleLane {
        right: CASTLE_WHITE_KINGSIDE,
        king_from: 4,
        king_to: 6,
        rook_from: 7,
        must_be_empty: (1 << 5) | (1 << 6),
        must_be_safe: [5, 6],
        flag: MoveFlags::CASTLE_KINGSIDE,
    },
    CastleLane {
        right: CASTLE_WHITE_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        rook_from: 0,
        must_be_empty: (1 << 1) | (1 << 2) | (1 << 3),
        must_be_safe: [3, 2],
        flag: MoveFlags::CASTLE_QUEENSIDE,
    },
    CastleLane {
        right: CASTLE_BLACK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        rook_from: 63,
        must_be_empty: (1 << 61) | (1 << 62),
        must_be_safe: [61, 62],
        flag: MoveFlags::CASTLE_KINGSIDE,
    },
    CastleLane {
        right: CASTLE_BLACK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        rook_from: 56,
        must_be_empty: (1 << 57) | (1 << 58) | (1 << 59),
        must_be_safe: [59, 58],
        flag: MoveFlags::CASTLE_QUEENSIDE,
    },
];

pub fn generate_king_moves(board: &Board, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let Some(from) = board.king_square(side) else {
        return;
    };
    let own_occ = board.occupancy(side);
    let enemy_occ = board.occupancy(side.opposite());

    let mut targets = king_attacks(from) & !own_occ;
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        let flags = if (1u64 << to) & enemy_occ != 0 {
            MoveFlags::CAPTURE
        } else {
            MoveFlags::QUIET
        };
        out.push(Move::new(from, to, PieceKind::King, flags));
        targets &= targets - 1;
    }

    generate_castling_moves(board, from, out);
}

fn generate_castling_moves(board: &Board, king_from: Square, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let enemy = side.opposite();
    let side_rights = match side {
        Color::White => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
        Color::Black => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
    };
    if board.castling_rights() & side_rights == 0 {
        return;
    }

    // Cannot castle out of check.
    if is_square_attacked(board, king_from, enemy) {
        return;
    }

    for lane in CASTLE_LANES.iter().filter(|lane| lane.right & side_rights != 0) {
        if lane.king_from != king_from || board.castling_rights() & lane.right == 0 {
            continue;
        }
        if board.pieces(side, PieceKind::Rook) & (1u64 << lane.rook_from) == 0 {
            continue;
        }
        if board.occupancy_all() & lane.must_be_empty != 0 {
            continue;
        }
        if lane
            .must_be_safe
            .iter()
            .any(|sq| is_square_attacked(board, *sq, enemy))
        {
            continue;
        }
        out.push(Move::new(king_from, lane.king_to, PieceKind::King, lane.flag));
    }
}
