//! Attack and check queries over a position.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::tables::attack_tables::Direction;
use crate::tables::chess_context::ChessContext;

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.pieces_of(color, PieceKind::King);
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

/// True if `color`'s king is attacked by the opposite color.
#[inline]
pub fn is_in_check(context: &ChessContext, game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, color) else {
        return false;
    };
    is_under_attack(context, game_state, king_sq, color.opposite())
}

/// True if any piece of `attacker_color` attacks `square`.
///
/// Tests neighbor and pawn attacks first, then knight jumps, then scans each
/// slider ray from the target outward and stops at its first blocker.
pub fn is_under_attack(
    context: &ChessContext,
    game_state: &GameState,
    square: Square,
    attacker_color: Color,
) -> bool {
    let attacks = &context.attacks;

    let neighbors = attacks.king_mask(square);
    if neighbors & game_state.pieces_of(attacker_color, PieceKind::King) != 0 {
        return true;
    }

    // A pawn attacks `square` exactly when a defending pawn on `square` would attack it back.
    let pawn_sources = attacks.pawn_captures(attacker_color.opposite(), square) & neighbors;
    if pawn_sources & game_state.pieces_of(attacker_color, PieceKind::Pawn) != 0 {
        return true;
    }

    if attacks.knight_mask(square) & game_state.pieces_of(attacker_color, PieceKind::Knight) != 0 {
        return true;
    }

    let queens = game_state.pieces_of(attacker_color, PieceKind::Queen);
    let rooks_queens = game_state.pieces_of(attacker_color, PieceKind::Rook) | queens;
    let bishops_queens = game_state.pieces_of(attacker_color, PieceKind::Bishop) | queens;

    (attacks.rook_mask(square) & rooks_queens != 0
        && first_blocker_in(context, game_state, square, &Direction::ROOK, rooks_queens))
        || (attacks.bishop_mask(square) & bishops_queens != 0
            && first_blocker_in(context, game_state, square, &Direction::BISHOP, bishops_queens))
}

fn first_blocker_in(
    context: &ChessContext,
    game_state: &GameState,
    square: Square,
    directions: &[Direction],
    sliders: Bitboard,
) -> bool {
    for &dir in directions {
        let ray = context.attacks.ray(square, dir);
        if ray.mask() & sliders == 0 {
            continue;
        }
        for &target in ray.squares() {
            let bit = square_bit(target);
            if game_state.occupancy_all & bit != 0 {
                if sliders & bit != 0 {
                    return true;
                }
                break;
            }
        }
    }
    false
}

/// Cheap over-approximation of "the king of the side opposing
/// `attacker_color` is in check": slider lines are tested on an empty board.
///
/// Never reports false when the king really is in check, so it may gate a
/// full [`is_in_check`] call, but must not replace one.
pub fn is_in_pseudo_check(context: &ChessContext, game_state: &GameState, attacker_color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, attacker_color.opposite()) else {
        return false;
    };
    let attacks = &context.attacks;
    let enemy = |piece| game_state.pieces_of(attacker_color, piece);
    let queens = enemy(PieceKind::Queen);

    attacks.king_mask(king_sq) & (enemy(PieceKind::King) | enemy(PieceKind::Pawn)) != 0
        || attacks.knight_mask(king_sq) & enemy(PieceKind::Knight) != 0
        || attacks.rook_mask(king_sq) & (enemy(PieceKind::Rook) | queens) != 0
        || attacks.bishop_mask(king_sq) & (enemy(PieceKind::Bishop) | queens) != 0
}
