//! Crate root module declarations for the Aspen chess engine core.
//!
//! Exposes the immutable bitboard position model, attack tables and move
//! generation, static evaluation, and the iterative-deepening search engine
//! with its background runner and reporting channel.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod position_fields;
}

pub mod tables {
    pub mod attack_tables;
    pub mod chess_context;
}

pub mod moves {
    pub mod chess_move;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_bishop;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_queen;
    pub mod legal_moves_rook;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod best_move_cache;
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod negamax;
    pub mod search_report;
    pub mod zobrist;
}

pub mod engines {
    pub mod search_parameters;
    pub mod search_engine;
    pub mod time_management;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod long_algebraic;
    pub mod render_game_state;
}
