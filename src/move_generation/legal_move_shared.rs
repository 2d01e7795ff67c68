use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::move_generator::GenerationMode;
use crate::moves::chess_move::{ChessMove, FLAG_CAPTURE};
use crate::tables::attack_tables::Direction;
use crate::tables::chess_context::ChessContext;

/// Destination squares the side to move may consider for `mode`.
#[inline]
pub fn target_filter(game_state: &GameState, mode: GenerationMode) -> Bitboard {
    let side = game_state.side_to_move;
    match mode {
        GenerationMode::All => !game_state.occupancy_by_color[side.index()],
        GenerationMode::Quiescence => game_state.occupancy_by_color[side.opposite().index()],
    }
}

/// Emit one move per set bit of `targets`, flagging captures.
pub fn push_jump_moves(game_state: &GameState, from: Square, targets: Bitboard, out: &mut Vec<ChessMove>) {
    let enemy_occ = game_state.occupancy_by_color[game_state.side_to_move.opposite().index()];
    let mut bb = targets;
    while bb != 0 {
        let to = bb.trailing_zeros() as Square;
        let flags = if enemy_occ & square_bit(to) != 0 {
            FLAG_CAPTURE
        } else {
            0
        };
        out.push(ChessMove::new(from, to, flags));
        bb &= bb - 1;
    }
}

/// Walk each ray of every `piece` of the side to move, stopping at the first
/// occupied square and emitting it only when it holds an enemy piece.
pub fn generate_slider_moves(
    context: &ChessContext,
    game_state: &GameState,
    piece: PieceKind,
    directions: &[Direction],
    mode: GenerationMode,
    out: &mut Vec<ChessMove>,
) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];

    let mut sliders = game_state.pieces_of(side, piece);
    while sliders != 0 {
        let from = sliders.trailing_zeros() as Square;

        for &dir in directions {
            for &to in context.attacks.ray(from, dir).squares() {
                let to_mask = square_bit(to);
                if own_occ & to_mask != 0 {
                    break;
                }
                if enemy_occ & to_mask != 0 {
                    out.push(ChessMove::new(from, to, FLAG_CAPTURE));
                    break;
                }
                if mode == GenerationMode::All {
                    out.push(ChessMove::new(from, to, 0));
                }
            }
        }

        sliders &= sliders - 1;
    }
}
