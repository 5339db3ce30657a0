//! Pseudo-legal pawn moves: single and double pushes, captures, en-passant
//! and promotions (one move per promotion kind).

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::moves::attack_tables::pawn_attacks;
use crate::moves::chess_move::{Move, MoveFlags};

pub fn generate_pawn_moves(board: &Board, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let enemy_occ = board.occupancy(side.opposite());
    let empty = !board.occupancy_all();

    let mut pawns = board.pieces(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;

        if let Some(one_step) = forward(side, from) {
            if (1u64 << one_step) & empty != 0 {
                push_pawn_move(out, side, from, one_step, MoveFlags::QUIET);

                if square_rank(from) == side.pawn_start_rank() {
                    if let Some(two_step) = forward(side, one_step) {
                        if (1u64 << two_step) & empty != 0 {
                            out.push(Move::new(
                                from,
                                two_step,
                                PieceKind::Pawn,
                                MoveFlags::DOUBLE_PAWN_PUSH,
                            ));
                        }
                    }
                }
            }
        }

        let targets = pawn_attacks(side, from);
        let mut captures = targets & enemy_occ;
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            push_pawn_move(out, side, from, to, MoveFlags::CAPTURE);
            captures &= captures - 1;
        }

        // The en-passant target is always empty, so it never overlaps the
        // capture set above.
        if let Some(ep) = board.en_passant_square() {
            if targets & (1u64 << ep) != 0 {
                out.push(Move::new(
                    from,
                    ep,
                    PieceKind::Pawn,
                    MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                ));
            }
        }

        pawns &= pawns - 1;
    }
}

#[inline]
fn forward(side: Color, square: Square) -> Option<Square> {
    match side {
        Color::White => (square < 56).then(|| square + 8),
        Color::Black => (square >= 8).then(|| square - 8),
    }
}

fn push_pawn_move(out: &mut Vec<Move>, side: Color, from: Square, to: Square, flags: MoveFlags) {
    let base = Move::new(from, to, PieceKind::Pawn, flags);
    if square_rank(to) == side.promotion_rank() {
        out.extend(
            PieceKind::PROMOTIONS
                .into_iter()
                .map(|promo| base.with_promotion(promo)),
        );
    } else {
        out.push(base);
    }
}
