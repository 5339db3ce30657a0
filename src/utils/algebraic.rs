//! Square conversions between indices and algebraic coordinates (`e4`).

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{square_at, square_file, square_rank, Square};

/// Convert an algebraic coordinate (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let &[file, rank] = square.as_bytes() else {
        return Err(ChessError::invalid_square(square));
    };

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::invalid_square(square));
    }

    Ok(square_at(file - b'a', rank - b'1'))
}

/// Convert a square index (`0..=63`) to an algebraic coordinate.
#[inline]
pub fn square_to_algebraic(square: Square) -> ChessResult<String> {
    if square > 63 {
        return Err(ChessError::invalid_square(square));
    }

    let file_char = char::from(b'a' + square_file(square));
    let rank_char = char::from(b'1' + square_rank(square));
    Ok(format!("{file_char}{rank_char}"))
}
