//! FEN-to-Board parser.
//!
//! Builds a fully populated board from a Forsyth-Edwards Notation string,
//! including piece bitboards, rights, clocks and occupancies, and rejects
//! strings that could not come from a playable game: a wrong king count, an
//! en-passant square no double step could have produced, or a side to move
//! that could capture the enemy king.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> ChessResult<Board> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let &[board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] =
        fields.as_slice()
    else {
        return Err(ChessError::invalid_fen(format!(
            "expected 6 fields, found {}",
            fields.len()
        )));
    };

    let mut board = Board::empty();

    parse_placement(board_part, &mut board)?;
    board.side_to_move = parse_side_to_move(side_part)?;
    board.castling_rights = parse_castling_rights(castling_part)?;
    board.en_passant_square = parse_en_passant_square(en_passant_part, board.side_to_move)?;
    board.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| ChessError::invalid_fen(format!("invalid halfmove clock: {halfmove_part}")))?;
    board.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| ChessError::invalid_fen(format!("invalid fullmove number: {fullmove_part}")))?;

    board.recalc_occupancy();

    for color in [Color::White, Color::Black] {
        let kings = board.pieces(color, PieceKind::King).count_ones();
        if kings != 1 {
            return Err(ChessError::invalid_fen(format!(
                "{} has {kings} kings",
                color.name()
            )));
        }
    }

    if let Some(square) = board.en_passant_square {
        validate_en_passant(&board, square, en_passant_part)?;
    }

    let waiting = board.side_to_move.opposite();
    if is_king_in_check(&board, waiting) {
        return Err(ChessError::invalid_fen(format!(
            "{} to move while {} is in check",
            board.side_to_move.name(),
            waiting.name()
        )));
    }

    Ok(board)
}

/// The pawn that just double-stepped must stand in front of the target, with
/// the target and the square it left both empty.
fn validate_en_passant(board: &Board, square: Square, en_passant_part: &str) -> ChessResult<()> {
    let mover = board.side_to_move.opposite();
    let (origin, landing) = match mover {
        Color::White => (square - 8, square + 8),
        Color::Black => (square + 8, square - 8),
    };

    let empty = |sq: Square| board.occupancy_all & (1u64 << sq) == 0;
    let pawn_landed = board.pieces(mover, PieceKind::Pawn) & (1u64 << landing) != 0;
    if !empty(square) || !empty(origin) || !pawn_landed {
        return Err(ChessError::invalid_fen(format!(
            "en-passant square {en_passant_part} has no {} pawn that just double-stepped",
            mover.name()
        )));
    }
    Ok(())
}

fn parse_placement(placement: &str, board: &mut Board) -> ChessResult<()> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::invalid_fen("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::invalid_fen(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as u8;
            } else {
                let piece = Piece::from_fen_char(ch).ok_or_else(|| {
                    ChessError::invalid_fen(format!("invalid piece character '{ch}'"))
                })?;
                if file >= 8 {
                    return Err(ChessError::invalid_fen(format!(
                        "rank {} has too many files",
                        rank + 1
                    )));
                }
                board.put(square_at(file, rank), piece);
                file += 1;
            }

            if file > 8 {
                return Err(ChessError::invalid_fen(format!(
                    "rank {} has too many files",
                    rank + 1
                )));
            }
        }

        if file != 8 {
            return Err(ChessError::invalid_fen(format!(
                "rank {} does not sum to 8 files",
                rank + 1
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ChessError::invalid_fen(format!(
            "invalid side-to-move field: {side_part}"
        ))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    castling_part.chars().try_fold(0, |rights, ch| {
        let bit = match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => {
                return Err(ChessError::invalid_fen(format!(
                    "invalid castling rights character: {ch}"
                )))
            }
        };
        Ok(rights | bit)
    })
}

fn parse_en_passant_square(
    en_passant_part: &str,
    side_to_move: Color,
) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| ChessError::invalid_fen(format!("invalid en-passant square: {en_passant_part}")))?;

    // The skipped square sits behind the pawn that just double-stepped.
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if square_rank(square) != expected_rank {
        return Err(ChessError::invalid_fen(format!(
            "en-passant square {en_passant_part} impossible with {} to move",
            side_to_move.name()
        )));
    }

    Ok(Some(square))
}
