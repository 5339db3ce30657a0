//! Immutable board snapshot.
//!
//! `Board` stores one bitboard per color and piece kind plus the occupancy
//! caches derived from them, the side to move, castling rights, the
//! en-passant target and both move counters. Boards are never edited in
//! place by callers: every transition in `move_generation` clones the input
//! and returns a fresh value, so a board handed to a UI callback can never
//! change underneath it.

use crate::errors::ChessResult;
use crate::game_state::chess_rules::BACK_RANK;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::{generate_fen, generate_position_key};
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    // [color][piece_kind]
    pub(crate) pieces: [[u64; 6]; 2],

    pub(crate) occupancy_by_color: [u64; 2],
    pub(crate) occupancy_all: u64,

    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,

    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
}

impl Board {
    pub(crate) fn empty() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard initial position, White to move, full castling rights.
    pub fn new_game() -> Self {
        let mut board = Self::empty();
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            board.put(square_at(file, 0), Piece::new(*kind, Color::White));
            board.put(square_at(file, 1), Piece::new(PieceKind::Pawn, Color::White));
            board.put(square_at(file, 6), Piece::new(PieceKind::Pawn, Color::Black));
            board.put(square_at(file, 7), Piece::new(*kind, Color::Black));
        }
        board.castling_rights = CASTLE_ALL;
        board.recalc_occupancy();
        board
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    /// FEN without the move counters; equal keys mean the same position for
    /// repetition purposes.
    pub fn position_key(&self) -> String {
        generate_position_key(self)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Bitboard of one color's pieces of one kind.
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy_by_color[color.index()]
    }

    #[inline]
    pub fn occupancy_all(&self) -> u64 {
        self.occupancy_all
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        let color = if self.occupancy(Color::White) & mask != 0 {
            Color::White
        } else {
            Color::Black
        };
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.pieces(color, *kind) & mask != 0)
            .map(|kind| Piece::new(kind, color))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces(color, PieceKind::King);
        (kings != 0).then(|| kings.trailing_zeros() as Square)
    }

    // Placement helpers below leave the occupancy caches stale until
    // `recalc_occupancy` runs.

    pub(crate) fn put(&mut self, square: Square, piece: Piece) {
        self.pieces[piece.color.index()][piece.kind.index()] |= 1u64 << square;
    }

    pub(crate) fn clear_square(&mut self, square: Square) {
        let mask = !(1u64 << square);
        for side in self.pieces.iter_mut() {
            for bitboard in side.iter_mut() {
                *bitboard &= mask;
            }
        }
    }

    pub(crate) fn recalc_occupancy(&mut self) {
        for color in [Color::White, Color::Black] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[0] | self.occupancy_by_color[1];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new_game()
    }
}
