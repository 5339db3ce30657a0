//! Canonical chess-rule constants.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value (plies without pawn move or capture) that ends the
/// game in a draw.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Occurrences of the same position that end the game in a draw.
pub const REPETITION_LIMIT: usize = 3;

/// Back-rank layout from the a-file to the h-file.
pub const BACK_RANK: [crate::game_state::chess_types::PieceKind; 8] = {
    use crate::game_state::chess_types::PieceKind::*;
    [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook]
};
