//! Line-oriented console front-end.
//!
//! The first non-empty line is the raw `initData` payload. Once it verifies,
//! every following line is either a JSON message as the mini-app would send
//! it, a long algebraic move, or one of the inspection commands `fen`,
//! `board`, `moves` and `quit`. Outbound messages are written to `out` as
//! JSON lines, followed by a `status` line.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, Receiver};

use crate::auth::session::VerifyResponse;
use crate::auth::session_verifier::SessionVerifier;
use crate::config::AppConfig;
use crate::errors::{SendError, SessionResult};
use crate::game_state::game_status::GameStatus;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::relay::move_relay::OutboundMessage;
use crate::session::game_session::GameSession;
use crate::utils::long_algebraic::parse_move_request;
use crate::utils::render_board::render_board;

pub fn run_stdio_loop(config: &AppConfig) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_console(config, stdin.lock(), &mut stdout)
}

pub fn run_console(config: &AppConfig, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    let mut lines = input.lines();

    let init_data = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Ok(()),
        }
    };

    let verifier = SessionVerifier::new(&config.bot_token, config.max_age());
    let session = match verifier.establish(init_data.trim()) {
        Ok(session) => session,
        Err(err) => {
            write_json(out, &VerifyResponse::rejected())?;
            writeln!(out, "error {err}")?;
            out.flush()?;
            return Ok(());
        }
    };
    write_json(out, &VerifyResponse::from(session.user()))?;
    out.flush()?;

    let (outbound_tx, outbound_rx) = channel::<OutboundMessage>();
    let sender = move |message: &OutboundMessage| {
        outbound_tx
            .send(message.clone())
            .map_err(|err| SendError(err.to_string()))
    };
    let mut console = ConsoleState {
        game: GameSession::new(
            session,
            config.game_id.clone(),
            config.promotion_policy(),
            Box::new(sender),
        ),
        outbound: outbound_rx,
    };

    for line in lines {
        let line = line?;
        let should_quit = console.handle_command(&line, out)?;
        out.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

struct ConsoleState {
    game: GameSession,
    outbound: Receiver<OutboundMessage>,
}

impl ConsoleState {
    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        match trimmed {
            "quit" => return Ok(true),
            "fen" => writeln!(out, "{}", self.game.board().to_fen())?,
            "board" => writeln!(out, "{}", render_board(self.game.board()))?,
            "moves" => {
                let mut moves: Vec<String> = legal_moves(self.game.board())
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                moves.sort();
                writeln!(out, "moves {}", moves.join(" "))?;
            }
            _ if trimmed.starts_with('{') => {
                let result = self.game.handle_inbound(trimmed);
                self.report(result, out)?;
            }
            _ => {
                let result = parse_move_request(trimmed)
                    .map_err(Into::into)
                    .and_then(|request| self.game.play(request));
                self.report(result, out)?;
            }
        }

        Ok(false)
    }

    fn report(&mut self, result: SessionResult<GameStatus>, out: &mut impl Write) -> io::Result<()> {
        for message in self.outbound.try_iter() {
            write_json(out, &message)?;
        }
        match result {
            Ok(status) => writeln!(out, "status {status}"),
            Err(err) => writeln!(out, "error {err}"),
        }
    }
}

fn write_json(out: &mut impl Write, value: &impl serde::Serialize) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)
}
