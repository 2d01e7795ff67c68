use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{push_jump_moves, target_filter};
use crate::move_generation::move_generator::GenerationMode;
use crate::moves::chess_move::ChessMove;
use crate::tables::chess_context::ChessContext;

pub fn generate_knight_moves(
    context: &ChessContext,
    game_state: &GameState,
    mode: GenerationMode,
    out: &mut Vec<ChessMove>,
) {
    let allowed = target_filter(game_state, mode);

    let mut knights = game_state.pieces_of(game_state.side_to_move, PieceKind::Knight);
    while knights != 0 {
        let from = knights.trailing_zeros() as Square;
        push_jump_moves(game_state, from, context.attacks.knight_mask(from) & allowed, out);
        knights &= knights - 1;
    }
}
