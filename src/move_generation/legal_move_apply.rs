use crate::game_state::chess_rules::*;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::chess_move::ChessMove;
use crate::tables::chess_context::ChessContext;

/// Produce the successor of `game_state` after `mv`. The input is untouched.
pub fn apply_move(
    context: &ChessContext,
    game_state: &GameState,
    mv: ChessMove,
) -> MoveGenResult<GameState> {
    let from_mask = mv.from_mask();
    let to_mask = mv.to_mask();

    let moving_color = game_state.side_to_move;
    let enemy_color = moving_color.opposite();

    let moved_piece = match game_state.piece_on(mv.from) {
        Some((color, piece)) if color == moving_color => piece,
        _ => return Err(MoveGenerationError::NoPieceOnSquare(mv.from)),
    };
    let is_capture = game_state.occupancy_by_color[enemy_color.index()] & to_mask != 0
        || mv.is_en_passant();

    let mut next = game_state.clone();

    for color_pieces in &mut next.pieces {
        for bb in color_pieces.iter_mut() {
            *bb &= !(from_mask | to_mask);
        }
    }

    if mv.is_en_passant() {
        let capture_sq = match moving_color {
            Color::Light => mv.to.checked_sub(8),
            Color::Dark => mv.to.checked_add(8),
        }
        .ok_or_else(|| MoveGenerationError::InvalidState(format!("en-passant onto {}", mv.to)))?;
        next.pieces[enemy_color.index()][PieceKind::Pawn.index()] &= !square_bit(capture_sq);
    }

    let placed = match mv.promotion {
        Some(promo) if moved_piece == PieceKind::Pawn => promo,
        Some(_) => {
            return Err(MoveGenerationError::InvalidState(format!(
                "{moved_piece:?} cannot promote"
            )))
        }
        None => moved_piece,
    };
    next.pieces[moving_color.index()][placed.index()] |= to_mask;

    if mv.is_castle() && moved_piece == PieceKind::King {
        match (moving_color, mv.from, mv.to) {
            (Color::Light, 4, 6) => move_rook(&mut next, moving_color, 7, 5),
            (Color::Light, 4, 2) => move_rook(&mut next, moving_color, 0, 3),
            (Color::Dark, 60, 62) => move_rook(&mut next, moving_color, 63, 61),
            (Color::Dark, 60, 58) => move_rook(&mut next, moving_color, 56, 59),
            _ => {
                return Err(MoveGenerationError::InvalidState(format!(
                    "unknown castling move {mv}"
                )))
            }
        }
    }

    next.castling_rights &= !(rights_lost_at(mv.from) | rights_lost_at(mv.to));

    next.en_passant_targets = [0; 2];
    if mv.is_double_push() {
        next.en_passant_targets[enemy_color.index()] = square_bit((mv.from + mv.to) / 2);
    }

    if moved_piece == PieceKind::Pawn || is_capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Dark {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy_color;
    next.ply = next.ply.saturating_add(1);
    next.repetition_history.push(game_state.zobrist_key);

    next.refresh_derived(context);

    Ok(next)
}

fn move_rook(game_state: &mut GameState, color: Color, from: Square, to: Square) {
    let rooks = &mut game_state.pieces[color.index()][PieceKind::Rook.index()];
    *rooks &= !square_bit(from);
    *rooks |= square_bit(to);
}

/// Rights that vanish once `square` is vacated or captured onto.
const fn rights_lost_at(square: Square) -> CastlingRights {
    match square {
        LIGHT_KING_START => CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE,
        DARK_KING_START => CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE,
        LIGHT_ROOK_QUEENSIDE_START => CASTLE_LIGHT_QUEENSIDE,
        LIGHT_ROOK_KINGSIDE_START => CASTLE_LIGHT_KINGSIDE,
        DARK_ROOK_QUEENSIDE_START => CASTLE_DARK_QUEENSIDE,
        DARK_ROOK_KINGSIDE_START => CASTLE_DARK_KINGSIDE,
        _ => 0,
    }
}
