//! Wire codec between the engine and the integration channel.
//!
//! Outbound: an applied [`Move`] becomes `{"type":"move","from":"e2","to":"e4"}`
//! with optional `promotion` and `game_id`. Inbound: the front-end sends
//! either a move request or a `new_game` command.

use serde::{Deserialize, Serialize};

use crate::errors::{square_label, ChessError, RelayError, RelayResult};
use crate::moves::chess_move::{Move, MoveRequest};
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::long_algebraic::parse_promotion_letter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Move {
        from: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promotion: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        game_id: Option<String>,
    },
}

impl OutboundMessage {
    pub fn to_json(&self) -> RelayResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub fn encode(mv: &Move, game_id: Option<&str>) -> OutboundMessage {
    OutboundMessage::Move {
        from: square_label(mv.from),
        to: square_label(mv.to),
        promotion: mv.promotion.map(|kind| kind.letter().to_string()),
        game_id: game_id.map(str::to_owned),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    Move {
        from: String,
        to: String,
        #[serde(default)]
        promotion: Option<String>,
    },
    NewGame,
}

impl InboundMessage {
    /// Resolve the square and promotion strings of a move message.
    /// Returns `None` for commands that carry no move.
    pub fn to_request(&self) -> RelayResult<Option<MoveRequest>> {
        let InboundMessage::Move {
            from,
            to,
            promotion,
        } = self
        else {
            return Ok(None);
        };

        let mut request = MoveRequest::new(
            algebraic_to_square(from).map_err(invalid_field("from"))?,
            algebraic_to_square(to).map_err(invalid_field("to"))?,
        );

        if let Some(text) = promotion {
            let mut letters = text.chars();
            let kind = match (letters.next(), letters.next()) {
                (Some(letter), None) => parse_promotion_letter(letter),
                _ => Err(ChessError::InvalidPromotion {
                    piece: text.clone(),
                }),
            }
            .map_err(invalid_field("promotion"))?;
            request = request.promoting_to(kind);
        }

        Ok(Some(request))
    }
}

fn invalid_field(field: &'static str) -> impl FnOnce(ChessError) -> RelayError {
    move |source| RelayError::InvalidField { field, source }
}

pub fn decode_inbound(json: &str) -> RelayResult<InboundMessage> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::PieceKind;
    use crate::moves::chess_move::MoveFlags;

    #[test]
    fn encodes_plain_move_without_optional_fields() {
        let mv = Move::new(12, 28, PieceKind::Pawn, MoveFlags::DOUBLE_PAWN_PUSH);
        let json = encode(&mv, None).to_json().expect("encodes");
        assert_eq!(json, r#"{"type":"move","from":"e2","to":"e4"}"#);
    }

    #[test]
    fn encodes_promotion_and_game_id() {
        let mv = Move::new(52, 60, PieceKind::Pawn, MoveFlags::QUIET).with_promotion(PieceKind::Queen);
        let json = encode(&mv, Some("g-1")).to_json().expect("encodes");
        assert_eq!(
            json,
            r#"{"type":"move","from":"e7","to":"e8","promotion":"q","game_id":"g-1"}"#
        );
    }

    #[test]
    fn decodes_move_and_new_game() {
        let msg = decode_inbound(r#"{"type":"move","from":"a7","to":"a8","promotion":"N"}"#)
            .expect("decodes");
        assert_eq!(
            msg.to_request().expect("valid squares"),
            Some(MoveRequest::new(48, 56).promoting_to(PieceKind::Knight))
        );

        let msg = decode_inbound(r#"{"type":"new_game"}"#).expect("decodes");
        assert_eq!(msg, InboundMessage::NewGame);
        assert_eq!(msg.to_request().expect("no move"), None);
    }

    #[test]
    fn rejects_malformed_messages() {
        for json in [
            "",
            "{}",
            r#"{"type":"resign"}"#,
            r#"{"type":"move","from":"e2"}"#,
            r#"{"type":"move","from":2,"to":"e4"}"#,
        ] {
            assert!(
                matches!(decode_inbound(json), Err(RelayError::MalformedMessage(_))),
                "{json:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_fields_by_name() {
        let msg = decode_inbound(r#"{"type":"move","from":"z9","to":"e4"}"#).expect("decodes");
        assert!(matches!(
            msg.to_request(),
            Err(RelayError::InvalidField { field: "from", source: ChessError::InvalidSquare { .. } })
        ));

        let msg = decode_inbound(r#"{"type":"move","from":"e7","to":"e8","promotion":"qq"}"#)
            .expect("decodes");
        assert!(matches!(
            msg.to_request(),
            Err(RelayError::InvalidField { field: "promotion", .. })
        ));
    }
}
