//! One authenticated game: the verified session, the current game record and
//! the outbound channel moves are relayed on.
//!
//! Every inbound message goes through [`GameSession::handle_inbound`]. A move
//! is applied to a copy of the record, relayed, and only then committed, so a
//! rejected move or a failed send leaves the board as it was.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::auth::session::Session;
use crate::errors::{AuthError, SendError, SessionError, SessionResult};
use crate::game_state::board::Board;
use crate::game_state::game_record::GameRecord;
use crate::game_state::game_status::GameStatus;
use crate::moves::chess_move::{MoveRequest, PromotionPolicy};
use crate::relay::move_relay::{decode_inbound, encode, OutboundMessage};

/// One-way send capability for outbound move messages.
pub trait MoveSender {
    fn send(&mut self, message: &OutboundMessage) -> Result<(), SendError>;
}

impl<F> MoveSender for F
where
    F: FnMut(&OutboundMessage) -> Result<(), SendError>,
{
    fn send(&mut self, message: &OutboundMessage) -> Result<(), SendError> {
        self(message)
    }
}

pub struct GameSession {
    session: Session,
    game_id: Option<String>,
    policy: PromotionPolicy,
    record: GameRecord,
    sender: Box<dyn MoveSender>,
}

impl GameSession {
    pub fn new(
        session: Session,
        game_id: Option<String>,
        policy: PromotionPolicy,
        sender: Box<dyn MoveSender>,
    ) -> Self {
        info!(
            user_id = session.user().id,
            game_id = game_id.as_deref().unwrap_or("-"),
            "game session opened"
        );
        Self {
            session,
            game_id,
            policy,
            record: GameRecord::new(),
            sender,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn board(&self) -> &Board {
        self.record.board()
    }

    pub fn status(&self) -> GameStatus {
        self.record.status()
    }

    pub fn handle_inbound(&mut self, raw_json: &str) -> SessionResult<GameStatus> {
        self.handle_inbound_at(raw_json, Utc::now())
    }

    /// Decode and act on one front-end message, returning the status of the
    /// resulting position.
    pub fn handle_inbound_at(
        &mut self,
        raw_json: &str,
        now: DateTime<Utc>,
    ) -> SessionResult<GameStatus> {
        self.ensure_active(now)?;
        let message = decode_inbound(raw_json)?;
        match message.to_request()? {
            Some(request) => self.play_at(request, now),
            None => {
                self.new_game();
                Ok(self.status())
            }
        }
    }

    pub fn play(&mut self, request: MoveRequest) -> SessionResult<GameStatus> {
        self.play_at(request, Utc::now())
    }

    pub fn play_at(&mut self, request: MoveRequest, now: DateTime<Utc>) -> SessionResult<GameStatus> {
        self.ensure_active(now)?;

        let status = self.record.status();
        if status.is_terminal() {
            return Err(SessionError::GameOver { status });
        }

        let (mv, next) = self.record.advanced(request, self.policy)?;
        let message = encode(&mv, self.game_id());
        self.sender.send(&message)?;
        self.record = next;

        let status = self.record.status();
        debug!(
            user_id = self.session.user().id,
            mv = %mv,
            %status,
            "move relayed"
        );
        Ok(status)
    }

    pub fn new_game(&mut self) {
        debug!(user_id = self.session.user().id, "new game");
        self.record = GameRecord::new();
    }

    fn ensure_active(&self, now: DateTime<Utc>) -> SessionResult<()> {
        if self.session.is_expired(now) {
            return Err(AuthError::ExpiredSession {
                age_secs: self.session.age_secs(now),
                max_age_secs: self.session.max_age().num_seconds(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::Duration;

    use super::*;
    use crate::auth::session_verifier::VerifiedUser;
    use crate::errors::{ChessError, RelayError};
    use crate::game_state::chess_types::Color;

    const ISSUED: i64 = 1_700_000_000;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("timestamp in range")
    }

    fn session() -> Session {
        let user = VerifiedUser {
            id: 42,
            username: None,
            first_name: Some("Ann".to_owned()),
            auth_date: at(ISSUED),
        };
        Session::new(user, at(ISSUED), Duration::hours(1))
    }

    fn recording_session(
        policy: PromotionPolicy,
    ) -> (GameSession, Rc<RefCell<Vec<OutboundMessage>>>) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&sent);
        let sender = move |message: &OutboundMessage| -> Result<(), SendError> {
            sink.borrow_mut().push(message.clone());
            Ok(())
        };
        let game = GameSession::new(session(), Some("g-1".to_owned()), policy, Box::new(sender));
        (game, sent)
    }

    fn send_move(game: &mut GameSession, from: &str, to: &str) -> SessionResult<GameStatus> {
        let json = format!(r#"{{"type":"move","from":"{from}","to":"{to}"}}"#);
        game.handle_inbound_at(&json, at(ISSUED + 10))
    }

    #[test]
    fn accepted_move_is_relayed() {
        let (mut game, sent) = recording_session(PromotionPolicy::DefaultToQueen);
        assert_eq!(game.game_id(), Some("g-1"));
        let status = send_move(&mut game, "e2", "e4").expect("legal move");

        assert_eq!(status, GameStatus::Ongoing);
        assert_eq!(game.board().side_to_move(), Color::Black);
        assert_eq!(
            sent.borrow().as_slice(),
            [OutboundMessage::Move {
                from: "e2".to_owned(),
                to: "e4".to_owned(),
                promotion: None,
                game_id: Some("g-1".to_owned()),
            }]
        );
    }

    #[test]
    fn rejected_move_leaves_board_and_channel_alone() {
        let (mut game, sent) = recording_session(PromotionPolicy::DefaultToQueen);
        let before = game.board().clone();

        let err = send_move(&mut game, "e2", "e5").expect_err("illegal move");
        assert!(matches!(
            err,
            SessionError::Chess(ChessError::IllegalMove { .. })
        ));

        let err = game
            .handle_inbound_at("not json", at(ISSUED + 10))
            .expect_err("malformed message");
        assert!(matches!(
            err,
            SessionError::Relay(RelayError::MalformedMessage(_))
        ));

        assert_eq!(game.board(), &before);
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn failed_send_keeps_previous_board() {
        let sender = |_: &OutboundMessage| -> Result<(), SendError> {
            Err(SendError("channel closed".to_owned()))
        };
        let mut game = GameSession::new(
            session(),
            None,
            PromotionPolicy::DefaultToQueen,
            Box::new(sender),
        );

        let err = send_move(&mut game, "e2", "e4").expect_err("send fails");
        assert!(matches!(err, SessionError::Send(_)));
        assert_eq!(game.board(), &Board::new_game());
    }

    #[test]
    fn mate_ends_the_game() {
        let (mut game, sent) = recording_session(PromotionPolicy::DefaultToQueen);
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4")] {
            send_move(&mut game, from, to).expect("legal move");
        }
        let status = send_move(&mut game, "d8", "h4").expect("mating move");
        assert_eq!(status, GameStatus::Checkmate(Color::Black));
        assert_eq!(sent.borrow().len(), 4);

        let err = send_move(&mut game, "e1", "f2").expect_err("game is over");
        assert!(matches!(
            err,
            SessionError::GameOver {
                status: GameStatus::Checkmate(Color::Black)
            }
        ));
        assert_eq!(sent.borrow().len(), 4);
    }

    #[test]
    fn new_game_resets_the_record() {
        let (mut game, _) = recording_session(PromotionPolicy::DefaultToQueen);
        send_move(&mut game, "d2", "d4").expect("legal move");

        let status = game
            .handle_inbound_at(r#"{"type":"new_game"}"#, at(ISSUED + 10))
            .expect("new game");
        assert_eq!(status, GameStatus::Ongoing);
        assert_eq!(game.board(), &Board::new_game());
        assert!(game.record().moves().is_empty());
    }

    #[test]
    fn expired_session_refuses_messages() {
        let (mut game, sent) = recording_session(PromotionPolicy::DefaultToQueen);
        let err = game
            .handle_inbound_at(
                r#"{"type":"move","from":"e2","to":"e4"}"#,
                at(ISSUED + 3_601),
            )
            .expect_err("session expired");
        assert!(matches!(
            err,
            SessionError::Auth(AuthError::ExpiredSession {
                age_secs: 3_601,
                max_age_secs: 3_600
            })
        ));
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn strict_policy_requires_promotion_piece() {
        let (mut game, sent) = recording_session(PromotionPolicy::Strict);
        game.record = GameRecord::from_board(
            Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse"),
        );

        let err = send_move(&mut game, "a7", "a8").expect_err("piece required");
        assert!(matches!(
            err,
            SessionError::Chess(ChessError::PromotionRequiredButMissing { .. })
        ));

        game.handle_inbound_at(
            r#"{"type":"move","from":"a7","to":"a8","promotion":"r"}"#,
            at(ISSUED + 10),
        )
        .expect("explicit promotion");
        let sent = sent.borrow();
        assert!(matches!(
            sent.last(),
            Some(OutboundMessage::Move { promotion: Some(piece), .. }) if piece == "r"
        ));
    }
}
