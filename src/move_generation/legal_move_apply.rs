//! Board transitions.
//!
//! [`make_move`] is the raw transition used by the generator on its own
//! candidate moves. [`apply_move`] and [`apply_request`] are the checked
//! entry points for moves coming from outside: they only accept moves found
//! in the legal move list and never touch the input board.

use tracing::debug;

use crate::errors::{square_label, ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::{Move, MoveRequest, PromotionPolicy};

/// Apply a move produced by the generator for `board`. The move is assumed
/// pseudo-legal; no legality check is made.
pub fn make_move(board: &Board, mv: Move) -> Board {
    let mover = board.side_to_move();
    let enemy = mover.opposite();
    let mut next = board.clone();

    next.clear_square(mv.from);
    if mv.is_en_passant() {
        let captured_pawn = square_at(square_file(mv.to), square_rank(mv.from));
        next.clear_square(captured_pawn);
    } else if mv.is_capture() {
        next.clear_square(mv.to);
    }
    next.put(mv.to, Piece::new(mv.promotion.unwrap_or(mv.piece), mover));

    if mv.is_castle() {
        let rank = square_rank(mv.from);
        let (rook_from, rook_to) = if square_file(mv.to) == 6 {
            (square_at(7, rank), square_at(5, rank))
        } else {
            (square_at(0, rank), square_at(3, rank))
        };
        next.clear_square(rook_from);
        next.put(rook_to, Piece::new(PieceKind::Rook, mover));
    }

    next.castling_rights &= !(rights_lost_at(mv.from) | rights_lost_at(mv.to));

    next.en_passant_square = if mv.is_double_pawn_push() {
        Some((mv.from + mv.to) / 2)
    } else {
        None
    };

    if mv.piece == PieceKind::Pawn || mv.is_capture() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if mover == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy;
    next.recalc_occupancy();
    next
}

/// Castling rights that disappear once anything moves from or onto `square`.
/// Covers the king leaving its home square, a rook leaving its corner and a
/// rook being captured in its corner.
fn rights_lost_at(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_WHITE_QUEENSIDE,
        4 => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
        7 => CASTLE_WHITE_KINGSIDE,
        56 => CASTLE_BLACK_QUEENSIDE,
        60 => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
        63 => CASTLE_BLACK_KINGSIDE,
        _ => 0,
    }
}

/// Apply `mv` if it is one of `legal_moves(board)`.
pub fn apply_move(board: &Board, mv: &Move) -> ChessResult<Board> {
    if !legal_moves(board).contains(mv) {
        return Err(illegal(mv.from, mv.to));
    }
    Ok(make_move(board, *mv))
}

/// Resolve a user request against the legal moves and apply it.
///
/// A promotion request without a piece becomes a queen promotion under
/// [`PromotionPolicy::DefaultToQueen`] and fails with
/// [`ChessError::PromotionRequiredButMissing`] under
/// [`PromotionPolicy::Strict`].
pub fn apply_request(
    board: &Board,
    request: MoveRequest,
    policy: PromotionPolicy,
) -> ChessResult<(Move, Board)> {
    let mv = resolve_request(board, request, policy)?;
    debug!(
        mv = %mv,
        side = board.side_to_move().name(),
        "applying move"
    );
    Ok((mv, make_move(board, mv)))
}

/// Find the legal move matching `request`.
pub fn resolve_request(
    board: &Board,
    request: MoveRequest,
    policy: PromotionPolicy,
) -> ChessResult<Move> {
    let candidates: Vec<Move> = legal_moves(board)
        .into_iter()
        .filter(|mv| mv.from == request.from && mv.to == request.to)
        .collect();

    let Some(first) = candidates.first().copied() else {
        return Err(illegal(request.from, request.to));
    };

    if !first.reaches_promotion_rank() {
        return match request.promotion {
            None => Ok(first),
            Some(piece) => Err(ChessError::InvalidPromotion {
                piece: piece.letter().to_string(),
            }),
        };
    }

    let wanted = match (request.promotion, policy) {
        (Some(piece), _) => piece,
        (None, PromotionPolicy::DefaultToQueen) => PieceKind::Queen,
        (None, PromotionPolicy::Strict) => {
            return Err(ChessError::PromotionRequiredButMissing {
                square: square_label(request.to),
            })
        }
    };

    candidates
        .into_iter()
        .find(|mv| mv.promotion == Some(wanted))
        .ok_or_else(|| ChessError::InvalidPromotion {
            piece: wanted.letter().to_string(),
        })
}

fn illegal(from: Square, to: Square) -> ChessError {
    ChessError::IllegalMove {
        from: square_label(from),
        to: square_label(to),
    }
}
