//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! The keys are drawn from a seeded `StdRng`, so hashes are deterministic across
//! runs, which is useful for testing and debugging.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::{chess_types::*, game_state::GameState};

/// One 64-bit key per (color, piece, square) plus side, castling, and en-passant terms.
#[derive(Debug, Clone)]
pub struct ZobristKeys {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristKeys {
    pub const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new() -> Self {
        Self::from_seed(Self::DEFAULT_SEED)
    }

    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut piece_square = [[[0u64; 64]; 6]; 2];
        for color in &mut piece_square {
            for piece in color {
                for key in piece {
                    *key = rng.gen();
                }
            }
        }

        let side_to_move = rng.gen();

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = rng.gen();
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.gen();
        }

        Self {
            piece_square,
            side_to_move,
            castling,
            en_passant_file,
        }
    }

    #[inline]
    pub fn piece_square_key(&self, color: Color, piece: PieceKind, square: Square) -> u64 {
        self.piece_square[color.index()][piece.index()][square as usize]
    }

    #[inline]
    pub fn castling_key(&self, castling_rights: CastlingRights) -> u64 {
        self.castling[(castling_rights & 0x0F) as usize]
    }

    #[inline]
    pub fn en_passant_file_key(&self, file: u8) -> u64 {
        self.en_passant_file[(file & 7) as usize]
    }

    /// Side-to-move toggle key (xor in when dark to move).
    #[inline]
    pub fn side_to_move_key(&self) -> u64 {
        self.side_to_move
    }

    /// Full position key: pieces, side to move, castling rights, en-passant targets.
    ///
    /// XOR composition makes the result independent of the move order that
    /// produced the position.
    pub fn compute_zobrist_key(&self, game_state: &GameState) -> u64 {
        let mut key = 0u64;

        for color in Color::ALL {
            for piece in PieceKind::ALL {
                let mut bb = game_state.pieces[color.index()][piece.index()];
                while bb != 0 {
                    let sq = bb.trailing_zeros() as Square;
                    key ^= self.piece_square_key(color, piece, sq);
                    bb &= bb - 1;
                }
            }
        }

        if game_state.side_to_move == Color::Dark {
            key ^= self.side_to_move_key();
        }

        key ^= self.castling_key(game_state.castling_rights);

        for targets in game_state.en_passant_targets {
            let mut bb = targets;
            while bb != 0 {
                key ^= self.en_passant_file_key(file_of(bb.trailing_zeros() as Square));
                bb &= bb - 1;
            }
        }

        key
    }
}
