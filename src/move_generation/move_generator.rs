use std::sync::Arc;

use thiserror::Error;

use crate::game_state::chess_types::Square;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::legal_successors;
use crate::moves::chess_move::ChessMove;
use crate::tables::chess_context::ChessContext;

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveGenerationError {
    #[error("no piece of the side to move on square {0}")]
    NoPieceOnSquare(Square),

    #[error("invalid game state: {0}")]
    InvalidState(String),
}

/// Which moves a generation pass emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    All,
    /// Captures and promotions only.
    Quiescence,
}

/// A legal move together with the position it produces.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub chess_move: ChessMove,
    pub game_after_move: GameState,
    pub gives_check: bool,
}

pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>>;

    fn generate_quiescence_moves(
        &self,
        game_state: &GameState,
    ) -> MoveGenResult<Vec<GeneratedMove>>;
}

/// Table-driven legal generator over a shared context.
#[derive(Debug, Clone)]
pub struct LegalMoveGenerator {
    context: Arc<ChessContext>,
}

impl LegalMoveGenerator {
    pub fn new(context: Arc<ChessContext>) -> Self {
        Self { context }
    }
}

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
        legal_successors(&self.context, game_state, GenerationMode::All)
    }

    fn generate_quiescence_moves(
        &self,
        game_state: &GameState,
    ) -> MoveGenResult<Vec<GeneratedMove>> {
        legal_successors(&self.context, game_state, GenerationMode::Quiescence)
    }
}
