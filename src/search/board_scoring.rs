//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.
//! Every scorer is color-symmetric: mirroring the board and swapping colors
//! negates the light-relative score.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_in_pseudo_check;
use crate::tables::chess_context::ChessContext;

pub const DRAW_SCORE: i32 = 0;
/// Mate at height `h` scores `MATE_SCORE - h` for the winner.
pub const MATE_SCORE: i32 = 1 << 20;
/// Search-only window sentinel, never a final evaluation.
pub const INFINITY_SCORE: i32 = 1 << 24;
const MATE_BAND: i32 = 100;

#[inline]
pub const fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE_SCORE - MATE_BAND
}

/// Plies to mate encoded in a mate-band score.
#[inline]
pub const fn mate_distance(score: i32) -> Option<i32> {
    if is_mate_score(score) {
        Some(MATE_SCORE - score.abs())
    } else {
        None
    }
}

pub trait BoardScorer: Send + Sync {
    /// Light minus dark, in centipawns.
    fn score_light_relative(&self, context: &ChessContext, game_state: &GameState) -> i32;

    /// Score from the perspective of the side to move.
    fn score(&self, context: &ChessContext, game_state: &GameState) -> i32 {
        self.score_light_relative(context, game_state) * game_state.side_to_move.sign()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    fn material_balance(game_state: &GameState) -> i32 {
        PieceKind::ALL
            .iter()
            .map(|&piece| {
                let light = game_state.pieces_of(Color::Light, piece).count_ones() as i32;
                let dark = game_state.pieces_of(Color::Dark, piece).count_ones() as i32;
                (light - dark) * Self::piece_value(piece)
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score_light_relative(&self, _context: &ChessContext, game_state: &GameState) -> i32 {
        Self::material_balance(game_state)
    }
}

// Piece-square tables in board-diagram order: rank 8 first, file a first,
// from light's point of view.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
     0,  0,  5,  5,  5,  5,  0, -5,
   -10,  5,  5,  5,  5,  5,  0,-10,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];

const PASSED_PAWN_BONUS: [i32; 8] = [0, 5, 10, 20, 35, 60, 100, 0];
const DOUBLED_PAWN_PENALTY: i32 = 15;
const ISOLATED_PAWN_PENALTY: i32 = 12;
const TERRITORY_WEIGHT: i32 = 2;
const EXPOSED_KING_PENALTY: i32 = 10;

const LIGHT_HALF: Bitboard = 0x0000_0000_FFFF_FFFF;
const DARK_HALF: Bitboard = !LIGHT_HALF;

/// Material, piece-square tables, mobility and territory, pawn structure,
/// and a small king-exposure term from the pseudo-check signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalScorer;

impl PositionalScorer {
    #[inline]
    const fn table(piece: PieceKind) -> &'static [i32; 64] {
        match piece {
            PieceKind::Pawn => &PAWN_TABLE,
            PieceKind::Knight => &KNIGHT_TABLE,
            PieceKind::Bishop => &BISHOP_TABLE,
            PieceKind::Rook => &ROOK_TABLE,
            PieceKind::Queen => &QUEEN_TABLE,
            PieceKind::King => &KING_TABLE,
        }
    }

    #[inline]
    const fn mobility_weight(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Knight => 4,
            PieceKind::Bishop => 5,
            PieceKind::Rook => 2,
            PieceKind::Queen => 1,
            PieceKind::Pawn | PieceKind::King => 0,
        }
    }

    /// Everything except material, for one color.
    fn side_terms(context: &ChessContext, game_state: &GameState, color: Color) -> i32 {
        let attacks = &context.attacks;
        let own_occ = game_state.occupancy_by_color[color.index()];
        let mut score = 0;
        let mut controlled = 0u64;

        for piece in PieceKind::ALL {
            let table = Self::table(piece);
            let mut bb = game_state.pieces_of(color, piece);
            while bb != 0 {
                let sq = bb.trailing_zeros() as Square;
                let diagram_index = match color {
                    Color::Light => flip_square(sq),
                    Color::Dark => sq,
                };
                score += table[diagram_index as usize];

                let reach = match piece {
                    PieceKind::Knight => attacks.knight_mask(sq),
                    PieceKind::Bishop => attacks.bishop_attacks(sq, game_state.occupancy_all),
                    PieceKind::Rook => attacks.rook_attacks(sq, game_state.occupancy_all),
                    PieceKind::Queen => {
                        attacks.rook_attacks(sq, game_state.occupancy_all)
                            | attacks.bishop_attacks(sq, game_state.occupancy_all)
                    }
                    PieceKind::Pawn | PieceKind::King => 0,
                } & !own_occ;
                score += reach.count_ones() as i32 * Self::mobility_weight(piece);
                controlled |= reach;

                bb &= bb - 1;
            }
        }

        let enemy_half = match color {
            Color::Light => DARK_HALF,
            Color::Dark => LIGHT_HALF,
        };
        score += (controlled & enemy_half).count_ones() as i32 * TERRITORY_WEIGHT;

        score += Self::pawn_structure(game_state, color);

        if is_in_pseudo_check(context, game_state, color.opposite()) {
            score -= EXPOSED_KING_PENALTY;
        }

        score
    }

    fn pawn_structure(game_state: &GameState, color: Color) -> i32 {
        let own_pawns = game_state.pieces_of(color, PieceKind::Pawn);
        let enemy_pawns = game_state.pieces_of(color.opposite(), PieceKind::Pawn);
        let mut score = 0;

        for file in 0..8u8 {
            let file_mask = FILE_A << file;
            let count = (own_pawns & file_mask).count_ones() as i32;
            if count == 0 {
                continue;
            }
            if count > 1 {
                score -= (count - 1) * DOUBLED_PAWN_PENALTY;
            }
            if own_pawns & adjacent_files(file) == 0 {
                score -= count * ISOLATED_PAWN_PENALTY;
            }
        }

        let mut bb = own_pawns;
        while bb != 0 {
            let sq = bb.trailing_zeros() as Square;
            let lane = (FILE_A << file_of(sq)) | adjacent_files(file_of(sq));
            let ahead = lane & squares_ahead(color, sq);
            if enemy_pawns & ahead == 0 {
                let relative_rank = match color {
                    Color::Light => rank_of(sq),
                    Color::Dark => 7 - rank_of(sq),
                };
                score += PASSED_PAWN_BONUS[relative_rank as usize];
            }
            bb &= bb - 1;
        }

        score
    }
}

fn adjacent_files(file: u8) -> Bitboard {
    let file_mask = FILE_A << file;
    ((file_mask << 1) & !FILE_A) | ((file_mask >> 1) & !FILE_H)
}

/// Ranks strictly in front of `square` from `color`'s point of view.
fn squares_ahead(color: Color, square: Square) -> Bitboard {
    let rank = rank_of(square);
    match color {
        Color::Light if rank == 7 => 0,
        Color::Light => !0u64 << ((rank + 1) * 8),
        Color::Dark => !(!0u64 << (rank * 8)),
    }
}

impl BoardScorer for PositionalScorer {
    fn score_light_relative(&self, context: &ChessContext, game_state: &GameState) -> i32 {
        MaterialScorer::material_balance(game_state)
            + Self::side_terms(context, game_state, Color::Light)
            - Self::side_terms(context, game_state, Color::Dark)
    }
}
