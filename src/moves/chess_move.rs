//! Move value type.
//!
//! A move is a plain `Copy` value compared structurally: source and
//! destination squares, special-move flags, and an optional promotion piece.
//! The null move (`from == to == 0`, no flags) stands for "no move".

use std::fmt;

use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_to_algebraic;

pub type MoveFlags = u8;

pub const FLAG_CAPTURE: MoveFlags = 1 << 0;
pub const FLAG_EN_PASSANT: MoveFlags = 1 << 1;
pub const FLAG_CASTLING: MoveFlags = 1 << 2;
pub const FLAG_DOUBLE_PAWN_PUSH: MoveFlags = 1 << 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub flags: MoveFlags,
    pub promotion: Option<PieceKind>,
}

impl ChessMove {
    pub const NULL: ChessMove = ChessMove {
        from: 0,
        to: 0,
        flags: 0,
        promotion: None,
    };

    #[inline]
    pub const fn new(from: Square, to: Square, flags: MoveFlags) -> Self {
        Self {
            from,
            to,
            flags,
            promotion: None,
        }
    }

    #[inline]
    pub const fn promoting(from: Square, to: Square, flags: MoveFlags, piece: PieceKind) -> Self {
        Self {
            from,
            to,
            flags,
            promotion: Some(piece),
        }
    }

    #[inline]
    pub const fn from_mask(&self) -> Bitboard {
        square_bit(self.from)
    }

    #[inline]
    pub const fn to_mask(&self) -> Bitboard {
        square_bit(self.to)
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.from == 0 && self.to == 0
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.flags & FLAG_CAPTURE != 0
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        self.flags & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.flags & FLAG_CASTLING != 0
    }

    #[inline]
    pub const fn is_double_push(&self) -> bool {
        self.flags & FLAG_DOUBLE_PAWN_PUSH != 0
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Neither a capture nor a promotion.
    #[inline]
    pub const fn is_quiet(&self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// Coordinate text such as `e2e4` or `e7e8n`.
    pub fn to_long_algebraic(&self) -> String {
        let mut out = square_to_algebraic(self.from);
        out.push_str(&square_to_algebraic(self.to));
        if let Some(piece) = self.promotion {
            out.push(promotion_char(piece));
        }
        out
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        f.write_str(&self.to_long_algebraic())
    }
}

pub const fn promotion_char(piece: PieceKind) -> char {
    match piece {
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::Pawn => 'p',
        PieceKind::King => 'k',
    }
}

/// Render a line of moves separated by spaces.
pub fn format_line(moves: &[ChessMove]) -> String {
    moves
        .iter()
        .map(ChessMove::to_long_algebraic)
        .collect::<Vec<_>>()
        .join(" ")
}
