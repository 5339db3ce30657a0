//! Error types shared across the crate.
//!
//! Each subsystem owns one enum: the rules engine returns [`ChessError`], the
//! signed-payload verifier returns [`AuthError`], the wire codec returns
//! [`RelayError`], and the game session wraps all of them in
//! [`SessionError`]. Every variant carries the offending square, field or
//! value so a front-end can render a specific message without re-parsing
//! strings.

use crate::game_state::chess_types::Square;

/// Failures raised by board parsing, notation parsing and move application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// The requested move is not in the legal move list of the board.
    #[error("illegal move {from}{to}")]
    IllegalMove { from: String, to: String },

    /// A pawn reached the last rank without a promotion piece while strict
    /// promotion is enabled.
    #[error("promotion piece required for move to {square}")]
    PromotionRequiredButMissing { square: String },

    /// The promotion piece is not one of knight, bishop, rook or queen.
    #[error("invalid promotion piece '{piece}'")]
    InvalidPromotion { piece: String },

    /// A square index or algebraic coordinate outside the board.
    #[error("invalid square '{square}'")]
    InvalidSquare { square: String },

    /// A long algebraic move string that is not `from to [promotion]`.
    #[error("invalid long algebraic move '{text}'")]
    InvalidMoveText { text: String },

    /// A FEN string that cannot describe a playable board.
    #[error("invalid FEN: {reason}")]
    InvalidFen { reason: String },
}

impl ChessError {
    pub(crate) fn invalid_fen(reason: impl Into<String>) -> Self {
        ChessError::InvalidFen {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_square(square: impl ToString) -> Self {
        ChessError::InvalidSquare {
            square: square.to_string(),
        }
    }
}

pub type ChessResult<T> = Result<T, ChessError>;

/// Failures raised while verifying a host-issued signed payload.
///
/// None of these are transient: a payload that failed once fails again with
/// the same inputs, so callers must surface them instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("malformed payload field '{field}': {reason}")]
    MalformedPayload { field: String, reason: &'static str },

    #[error("payload signature does not match")]
    SignatureMismatch,

    #[error("session expired: issued {age_secs}s ago, limit is {max_age_secs}s")]
    ExpiredSession { age_secs: i64, max_age_secs: i64 },
}

impl AuthError {
    pub(crate) fn malformed(field: impl Into<String>, reason: &'static str) -> Self {
        AuthError::MalformedPayload {
            field: field.into(),
            reason,
        }
    }

    /// Whether the caller may retry the same verification automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            AuthError::MalformedPayload { .. }
            | AuthError::SignatureMismatch
            | AuthError::ExpiredSession { .. } => false,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Failures raised by the inbound/outbound message codec.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    #[error("invalid field '{field}' in message: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: ChessError,
    },
}

pub type RelayResult<T> = Result<T, RelayError>;

/// The outbound channel refused a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("outbound send failed: {0}")]
pub struct SendError(pub String);

/// Failures surfaced by a running game session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Chess(#[from] ChessError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Send(#[from] SendError),

    #[error("game is over ({status})")]
    GameOver {
        status: crate::game_state::game_status::GameStatus,
    },
}

pub type SessionResult<T> = Result<T, SessionError>;

pub(crate) fn square_label(square: Square) -> String {
    crate::utils::algebraic::square_to_algebraic(square).unwrap_or_else(|_| square.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_failures_are_never_retryable() {
        let errors = [
            AuthError::malformed("auth_date", "missing"),
            AuthError::SignatureMismatch,
            AuthError::ExpiredSession {
                age_secs: 10,
                max_age_secs: 5,
            },
        ];
        assert!(errors.iter().all(|e| !e.is_retryable()));
    }

    #[test]
    fn illegal_move_message_names_squares() {
        let err = ChessError::IllegalMove {
            from: "e2".to_owned(),
            to: "e5".to_owned(),
        };
        assert_eq!(err.to_string(), "illegal move e2e5");
    }
}
