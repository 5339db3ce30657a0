//! Move records.
//!
//! A [`Move`] is always produced by the generator for a specific board and
//! carries everything needed to apply it without looking anything up: the
//! moving piece kind, an optional promotion and explicit special-move flags.
//! A [`MoveRequest`] is what a user asks for (squares plus an optional
//! promotion) and is resolved against the legal move list.

use std::fmt;
use std::ops::BitOr;

use crate::game_state::chess_types::{square_rank, PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const QUIET: MoveFlags = MoveFlags(0);
    pub const CAPTURE: MoveFlags = MoveFlags(1 << 0);
    pub const EN_PASSANT: MoveFlags = MoveFlags(1 << 1);
    pub const CASTLE_KINGSIDE: MoveFlags = MoveFlags(1 << 2);
    pub const CASTLE_QUEENSIDE: MoveFlags = MoveFlags(1 << 3);
    pub const DOUBLE_PAWN_PUSH: MoveFlags = MoveFlags(1 << 4);

    #[inline]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MoveFlags {
    type Output = MoveFlags;

    fn bitor(self, rhs: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Kind of the piece standing on `from` before the move.
    pub piece: PieceKind,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, piece: PieceKind, flags: MoveFlags) -> Self {
        Self {
            from,
            to,
            piece,
            promotion: None,
            flags,
        }
    }

    #[inline]
    pub const fn with_promotion(mut self, promotion: PieceKind) -> Self {
        self.promotion = Some(promotion);
        self
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_KINGSIDE)
            || self.flags.contains(MoveFlags::CASTLE_QUEENSIDE)
    }

    #[inline]
    pub const fn is_double_pawn_push(&self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PAWN_PUSH)
    }

    /// Pawn move onto the last rank, whether or not a piece was chosen.
    pub fn reaches_promotion_rank(&self) -> bool {
        self.piece == PieceKind::Pawn && matches!(square_rank(self.to), 0 | 7)
    }
}

/// Long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = square_to_algebraic(self.from).map_err(|_| fmt::Error)?;
        let to = square_to_algebraic(self.to).map_err(|_| fmt::Error)?;
        write!(f, "{from}{to}")?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter())?;
        }
        Ok(())
    }
}

/// A user's move intent before it is matched against the legal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub const fn promoting_to(mut self, piece: PieceKind) -> Self {
        self.promotion = Some(piece);
        self
    }
}

impl From<Move> for MoveRequest {
    fn from(mv: Move) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        }
    }
}

/// How to treat a pawn reaching the last rank without a chosen piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromotionPolicy {
    #[default]
    DefaultToQueen,
    Strict,
}
