use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::generate_slider_moves;
use crate::move_generation::move_generator::GenerationMode;
use crate::moves::chess_move::ChessMove;
use crate::tables::attack_tables::Direction;
use crate::tables::chess_context::ChessContext;

pub fn generate_rook_moves(
    context: &ChessContext,
    game_state: &GameState,
    mode: GenerationMode,
    out: &mut Vec<ChessMove>,
) {
    generate_slider_moves(context, game_state, PieceKind::Rook, &Direction::ROOK, mode, out);
}
