use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::move_generator::GenerationMode;
use crate::moves::chess_move::{ChessMove, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT};
use crate::tables::chess_context::ChessContext;

pub fn generate_pawn_moves(
    context: &ChessContext,
    game_state: &GameState,
    mode: GenerationMode,
    out: &mut Vec<ChessMove>,
) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let ep_targets = game_state.en_passant_target_for(side);
    let empty = !game_state.occupancy_all;

    let (promotion_rank, start_rank) = match side {
        Color::Light => (7, 1),
        Color::Dark => (0, 6),
    };

    let mut pawns = game_state.pieces_of(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;

        // Forward pushes.
        if let Some(one_step) = forward(side, from, 8) {
            if square_bit(one_step) & empty != 0 {
                if rank_of(one_step) == promotion_rank {
                    push_promotions(from, one_step, 0, out);
                } else if mode == GenerationMode::All {
                    out.push(ChessMove::new(from, one_step, 0));

                    if rank_of(from) == start_rank {
                        if let Some(two_step) = forward(side, from, 16) {
                            if square_bit(two_step) & empty != 0 {
                                out.push(ChessMove::new(from, two_step, FLAG_DOUBLE_PAWN_PUSH));
                            }
                        }
                    }
                }
            }
        }

        // Diagonal captures and en passant.
        let attacks = context.attacks.pawn_captures(side, from);
        let mut captures = attacks & enemy_occ;
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            if rank_of(to) == promotion_rank {
                push_promotions(from, to, FLAG_CAPTURE, out);
            } else {
                out.push(ChessMove::new(from, to, FLAG_CAPTURE));
            }
            captures &= captures - 1;
        }

        let en_passant = attacks & ep_targets;
        if en_passant != 0 {
            let to = en_passant.trailing_zeros() as Square;
            out.push(ChessMove::new(from, to, FLAG_CAPTURE | FLAG_EN_PASSANT));
        }

        pawns &= pawns - 1;
    }
}

/// Square `step` ranks ahead of `from` for `side`, or `None` off the board.
fn forward(side: Color, from: Square, step: u8) -> Option<Square> {
    match side {
        Color::Light => from.checked_add(step).filter(|&sq| sq < 64),
        Color::Dark => from.checked_sub(step),
    }
}

fn push_promotions(from: Square, to: Square, flags: u8, out: &mut Vec<ChessMove>) {
    for piece in PieceKind::PROMOTIONS {
        out.push(ChessMove::promoting(from, to, flags, piece));
    }
}
