//! Full legal move generation pipeline.
//!
//! Runs the per-piece pseudo-legal generators, applies each candidate, and
//! rejects those that leave the mover's own king attacked. The cheap
//! pseudo-check gate skips the full attack query for most moves.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::{is_in_check, is_in_pseudo_check};
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::move_generation::move_generator::{GeneratedMove, GenerationMode, MoveGenResult};
use crate::moves::chess_move::ChessMove;
use crate::tables::chess_context::ChessContext;

fn generate_with_mode(
    context: &ChessContext,
    game_state: &GameState,
    mode: GenerationMode,
) -> Vec<ChessMove> {
    let mut out = Vec::with_capacity(match mode {
        GenerationMode::All => 64,
        GenerationMode::Quiescence => 16,
    });

    generate_pawn_moves(context, game_state, mode, &mut out);
    generate_knight_moves(context, game_state, mode, &mut out);
    generate_bishop_moves(context, game_state, mode, &mut out);
    generate_rook_moves(context, game_state, mode, &mut out);
    generate_queen_moves(context, game_state, mode, &mut out);
    generate_king_moves(context, game_state, mode, &mut out);

    out
}

/// Every move obeying piece movement rules, ignoring own-king safety.
pub fn generate_pseudo_legal(context: &ChessContext, game_state: &GameState) -> Vec<ChessMove> {
    generate_with_mode(context, game_state, GenerationMode::All)
}

/// Pseudo-legal captures and promotions only.
pub fn generate_quiescence(context: &ChessContext, game_state: &GameState) -> Vec<ChessMove> {
    generate_with_mode(context, game_state, GenerationMode::Quiescence)
}

pub fn generate_legal(context: &ChessContext, game_state: &GameState) -> MoveGenResult<Vec<ChessMove>> {
    Ok(legal_successors(context, game_state, GenerationMode::All)?
        .into_iter()
        .map(|generated| generated.chess_move)
        .collect())
}

/// Legal moves for `mode` paired with their resulting positions.
pub fn legal_successors(
    context: &ChessContext,
    game_state: &GameState,
    mode: GenerationMode,
) -> MoveGenResult<Vec<GeneratedMove>> {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let pseudo = generate_with_mode(context, game_state, mode);

    let mut legal = Vec::with_capacity(pseudo.len());
    for mv in pseudo {
        let next = apply_move(context, game_state, mv)?;

        if is_in_pseudo_check(context, &next, enemy) && is_in_check(context, &next, side) {
            continue;
        }

        let gives_check =
            is_in_pseudo_check(context, &next, side) && is_in_check(context, &next, enemy);

        legal.push(GeneratedMove {
            chess_move: mv,
            game_after_move: next,
            gives_check,
        });
    }

    Ok(legal)
}
