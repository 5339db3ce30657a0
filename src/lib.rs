//! Crate root module declarations for the lvl_chess project.
//!
//! This file exposes the subsystems (board state, move generation, session
//! verification, the move relay codec, game sessions and the console
//! front-end) so the binary, benches and external tooling can import stable
//! module paths.

pub mod config;
pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_record;
    pub mod game_status;
}

pub mod moves {
    pub mod attack_tables;
    pub mod chess_move;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_pieces;
    pub mod perft;
    pub mod status_detection;
}

pub mod auth {
    pub mod session;
    pub mod session_verifier;
}

pub mod relay {
    pub mod move_relay;
}

pub mod session {
    pub mod game_session;
}

pub mod console {
    pub mod console_loop;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod logging;
    pub mod long_algebraic;
    pub mod render_board;
}
