use crate::game_state::chess_rules::*;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_under_attack;
use crate::move_generation::legal_move_shared::{push_jump_moves, target_filter};
use crate::move_generation::move_generator::GenerationMode;
use crate::moves::chess_move::{ChessMove, FLAG_CASTLING};
use crate::tables::chess_context::ChessContext;

/// One castling option: required right, king path, rook origin, squares that
/// must be empty, and squares the king crosses or lands on.
struct CastlingLane {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    must_be_empty: Bitboard,
    must_be_safe: [Square; 2],
}

const LIGHT_LANES: [CastlingLane; 2] = [
    CastlingLane {
        right: CASTLE_LIGHT_KINGSIDE,
        king_from: LIGHT_KING_START,
        king_to: 6,
        rook_from: LIGHT_ROOK_KINGSIDE_START,
        must_be_empty: (1 << 5) | (1 << 6),
        must_be_safe: [5, 6],
    },
    CastlingLane {
        right: CASTLE_LIGHT_QUEENSIDE,
        king_from: LIGHT_KING_START,
        king_to: 2,
        rook_from: LIGHT_ROOK_QUEENSIDE_START,
        must_be_empty: (1 << 1) | (1 << 2) | (1 << 3),
        must_be_safe: [3, 2],
    },
];

const DARK_LANES: [CastlingLane; 2] = [
    CastlingLane {
        right: CASTLE_DARK_KINGSIDE,
        king_from: DARK_KING_START,
        king_to: 62,
        rook_from: DARK_ROOK_KINGSIDE_START,
        must_be_empty: (1 << 61) | (1 << 62),
        must_be_safe: [61, 62],
    },
    CastlingLane {
        right: CASTLE_DARK_QUEENSIDE,
        king_from: DARK_KING_START,
        king_to: 58,
        rook_from: DARK_ROOK_QUEENSIDE_START,
        must_be_empty: (1 << 57) | (1 << 58) | (1 << 59),
        must_be_safe: [59, 58],
    },
];

pub fn generate_king_moves(
    context: &ChessContext,
    game_state: &GameState,
    mode: GenerationMode,
    out: &mut Vec<ChessMove>,
) {
    let side = game_state.side_to_move;
    let king_bb = game_state.pieces_of(side, PieceKind::King);
    if king_bb == 0 {
        return;
    }

    let from = king_bb.trailing_zeros() as Square;
    let targets = context.attacks.king_mask(from) & target_filter(game_state, mode);
    push_jump_moves(game_state, from, targets, out);

    if mode == GenerationMode::All {
        generate_castling_moves(context, game_state, from, out);
    }
}

fn generate_castling_moves(
    context: &ChessContext,
    game_state: &GameState,
    king_from: Square,
    out: &mut Vec<ChessMove>,
) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let lanes = match side {
        Color::Light => &LIGHT_LANES,
        Color::Dark => &DARK_LANES,
    };

    if game_state.castling_rights & lanes[0].right == 0
        && game_state.castling_rights & lanes[1].right == 0
    {
        return;
    }

    // Cannot castle out of check.
    if is_under_attack(context, game_state, king_from, enemy) {
        return;
    }

    let rooks = game_state.pieces_of(side, PieceKind::Rook);
    for lane in lanes {
        if king_from != lane.king_from
            || game_state.castling_rights & lane.right == 0
            || rooks & square_bit(lane.rook_from) == 0
            || game_state.occupancy_all & lane.must_be_empty != 0
        {
            continue;
        }

        if lane
            .must_be_safe
            .iter()
            .any(|&sq| is_under_attack(context, game_state, sq, enemy))
        {
            continue;
        }

        out.push(ChessMove::new(lane.king_from, lane.king_to, FLAG_CASTLING));
    }
}
