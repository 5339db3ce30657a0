//! Long algebraic move text (`e2e4`, `e7e8q`) to [`MoveRequest`].
//!
//! Parsing is purely syntactic. Whether the move exists on a given board is
//! decided later by `apply_request`, which also fills in the special-move
//! flags from the generated move.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::PieceKind;
use crate::moves::chess_move::MoveRequest;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_move_request(text: &str) -> ChessResult<MoveRequest> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(ChessError::InvalidMoveText {
            text: text.to_owned(),
        });
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let mut request = MoveRequest::new(from, to);

    if let Some(letter) = text[4..].chars().next() {
        request = request.promoting_to(parse_promotion_letter(letter)?);
    }

    Ok(request)
}

/// Promotion piece from its letter, either case.
pub fn parse_promotion_letter(letter: char) -> ChessResult<PieceKind> {
    PieceKind::from_letter(letter)
        .filter(|kind| kind.is_promotion_target())
        .ok_or_else(|| ChessError::InvalidPromotion {
            piece: letter.to_string(),
        })
}
