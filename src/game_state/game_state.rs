//! Immutable bitboard position model.
//!
//! `GameState` stores twelve piece bitboards, occupancy caches, side to move,
//! castling rights, per-color en-passant targets, clocks, the Zobrist key, and
//! the ancestor-key history used for repetition detection. Successor states
//! are produced by `apply_move`; a state is never mutated after construction.

use crate::errors::PositionResult;
use crate::game_state::chess_rules::FIFTY_MOVE_HALFMOVES;
use crate::game_state::chess_types::*;
use crate::game_state::position_fields::PositionFields;
use crate::tables::chess_context::ChessContext;
use crate::utils::fen_generator::generate_fen;

const LIGHT_SQUARES: Bitboard = 0x55AA_55AA_55AA_55AA;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    /// `[color]`: squares that color's pawns may capture onto en passant.
    /// At most one bit is set across both entries.
    pub en_passant_targets: [u64; 2],

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,

    pub ply: u16,
    /// Keys of every ancestor position, oldest first.
    pub repetition_history: Vec<u64>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_targets: [0; 2],

            halfmove_clock: 0,
            fullmove_number: 1,

            zobrist_key: 0,

            ply: 0,
            repetition_history: Vec::new(),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting arrangement.
    pub fn new_game(context: &ChessContext) -> Self {
        let mut game_state = Self::new_empty();

        let light = Color::Light.index();
        let dark = Color::Dark.index();
        game_state.pieces[light] = [
            0x0000_0000_0000_FF00,
            0x0000_0000_0000_0042,
            0x0000_0000_0000_0024,
            0x0000_0000_0000_0081,
            0x0000_0000_0000_0008,
            0x0000_0000_0000_0010,
        ];
        for piece in PieceKind::ALL {
            game_state.pieces[dark][piece.index()] =
                game_state.pieces[light][piece.index()].swap_bytes();
        }
        game_state.castling_rights = CASTLE_ALL;

        game_state.refresh_derived(context);
        game_state
    }

    /// Build from the six already-separated description fields.
    pub fn from_fields(context: &ChessContext, fields: &PositionFields<'_>) -> PositionResult<Self> {
        fields.build(context)
    }

    /// Split a whitespace-separated six-field description and build from it.
    pub fn from_fen(context: &ChessContext, fen: &str) -> PositionResult<Self> {
        Self::from_fields(context, &PositionFields::split(fen)?)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    /// Recompute occupancy caches and the Zobrist key from the piece bitboards.
    pub(crate) fn refresh_derived(&mut self, context: &ChessContext) {
        for color in Color::ALL {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[0] | self.occupancy_by_color[1];
        self.zobrist_key = context.zobrist.compute_zobrist_key(self);
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, piece: PieceKind) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    pub fn piece_on(&self, square: Square) -> Option<(Color, PieceKind)> {
        let mask = square_bit(square);
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in Color::ALL {
            for piece in PieceKind::ALL {
                if self.pieces[color.index()][piece.index()] & mask != 0 {
                    return Some((color, piece));
                }
            }
        }
        None
    }

    /// Squares the side to move may capture onto en passant.
    #[inline]
    pub fn en_passant_target_for(&self, color: Color) -> Bitboard {
        self.en_passant_targets[color.index()]
    }

    /// True at the third occurrence of the current key in this line.
    ///
    /// Only 64-bit keys are compared, so two distinct positions sharing a key
    /// would be claimed as a repetition draw.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 3
    }

    /// Occurrences of the current key, counting this position.
    pub fn repetition_count(&self) -> usize {
        1 + self
            .repetition_history
            .iter()
            .filter(|&&key| key == self.zobrist_key)
            .count()
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_HALFMOVES
    }

    /// Bare kings, a single minor piece, or same-colored opposing bishops.
    pub fn has_insufficient_material(&self) -> bool {
        let heavy_or_pawns = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen]
            .iter()
            .any(|&p| self.pieces_of(Color::Light, p) | self.pieces_of(Color::Dark, p) != 0);
        if heavy_or_pawns {
            return false;
        }

        let knights = self.pieces_of(Color::Light, PieceKind::Knight)
            | self.pieces_of(Color::Dark, PieceKind::Knight);
        let light_bishops = self.pieces_of(Color::Light, PieceKind::Bishop);
        let dark_bishops = self.pieces_of(Color::Dark, PieceKind::Bishop);
        let minors = knights.count_ones() + light_bishops.count_ones() + dark_bishops.count_ones();

        if minors <= 1 {
            return true;
        }

        knights == 0
            && light_bishops.count_ones() == 1
            && dark_bishops.count_ones() == 1
            && ((light_bishops | dark_bishops) & LIGHT_SQUARES).count_ones() != 1
    }

    /// True when no two piece bitboards share a square.
    pub fn bitboards_are_disjoint(&self) -> bool {
        let mut seen = 0u64;
        for color in Color::ALL {
            for piece in PieceKind::ALL {
                let bb = self.pieces_of(color, piece);
                if seen & bb != 0 {
                    return false;
                }
                seen |= bb;
            }
        }
        seen == self.occupancy_all
    }

    /// Same position with ranks flipped, colors swapped, and the other side to move.
    ///
    /// Ancestry is dropped: the mirrored keys share nothing with the original line.
    pub fn mirrored(&self, context: &ChessContext) -> Self {
        let mut out = Self::new_empty();
        for color in Color::ALL {
            for piece in PieceKind::ALL {
                out.pieces[color.opposite().index()][piece.index()] =
                    self.pieces_of(color, piece).swap_bytes();
            }
        }
        out.side_to_move = self.side_to_move.opposite();
        out.castling_rights =
            ((self.castling_rights & 0b0011) << 2) | ((self.castling_rights >> 2) & 0b0011);
        out.en_passant_targets = [
            self.en_passant_targets[Color::Dark.index()].swap_bytes(),
            self.en_passant_targets[Color::Light.index()].swap_bytes(),
        ];
        out.halfmove_clock = self.halfmove_clock;
        out.fullmove_number = self.fullmove_number;
        out.refresh_derived(context);
        out
    }
}
