//! Precomputed attack geometry.
//!
//! Every square gets eight directional rays ordered nearest to farthest, so a
//! slider scan can stop at the first blocker, plus combined per-piece masks for
//! cheap pre-filtering, knight jumps, king rings, and pawn capture masks.

use crate::game_state::chess_types::*;

/// Sliding direction on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    East,
    West,
    North,
    South,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Rook-type directions: increasing file, decreasing file, increasing rank, decreasing rank.
    pub const ROOK: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    pub const BISHOP: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Direction::East => 0,
            Direction::West => 1,
            Direction::North => 2,
            Direction::South => 3,
            Direction::NorthEast => 4,
            Direction::NorthWest => 5,
            Direction::SouthEast => 6,
            Direction::SouthWest => 7,
        }
    }

    /// `(file_step, rank_step)`.
    #[inline]
    const fn steps(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
        }
    }
}

/// Squares reachable along one direction from a source square, nearest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ray {
    squares: [Square; 7],
    len: u8,
    mask: Bitboard,
}

impl Ray {
    const EMPTY: Ray = Ray {
        squares: [0; 7],
        len: 0,
        mask: 0,
    };

    #[inline]
    pub fn squares(&self) -> &[Square] {
        &self.squares[..self.len as usize]
    }

    #[inline]
    pub const fn mask(&self) -> Bitboard {
        self.mask
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Read-only lookup data built once and shared by every consumer.
#[derive(Debug, Clone)]
pub struct AttackTables {
    rays: [[Ray; 8]; 64],
    rook_masks: [Bitboard; 64],
    bishop_masks: [Bitboard; 64],
    knight_masks: [Bitboard; 64],
    king_masks: [Bitboard; 64],
    pawn_captures: [[Bitboard; 64]; 2],
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackTables {
    pub fn new() -> Self {
        let mut tables = Self {
            rays: [[Ray::EMPTY; 8]; 64],
            rook_masks: [0; 64],
            bishop_masks: [0; 64],
            knight_masks: [0; 64],
            king_masks: [0; 64],
            pawn_captures: [[0; 64]; 2],
        };

        for sq in 0..64u8 {
            let idx = sq as usize;
            for dir in Direction::ALL {
                tables.rays[idx][dir.index()] = trace_ray(sq, dir);
            }
            tables.rook_masks[idx] = Direction::ROOK
                .iter()
                .fold(0, |acc, dir| acc | tables.rays[idx][dir.index()].mask);
            tables.bishop_masks[idx] = Direction::BISHOP
                .iter()
                .fold(0, |acc, dir| acc | tables.rays[idx][dir.index()].mask);
            tables.knight_masks[idx] = jump_mask(
                sq,
                &[(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)],
            );
            tables.king_masks[idx] = jump_mask(
                sq,
                &[(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)],
            );
            tables.pawn_captures[Color::Light.index()][idx] = jump_mask(sq, &[(-1, 1), (1, 1)]);
            tables.pawn_captures[Color::Dark.index()][idx] = jump_mask(sq, &[(-1, -1), (1, -1)]);
        }

        tables
    }

    #[inline]
    pub fn ray(&self, square: Square, direction: Direction) -> &Ray {
        &self.rays[square as usize][direction.index()]
    }

    #[inline]
    pub fn knight_mask(&self, square: Square) -> Bitboard {
        self.knight_masks[square as usize]
    }

    #[inline]
    pub fn king_mask(&self, square: Square) -> Bitboard {
        self.king_masks[square as usize]
    }

    #[inline]
    pub fn rook_mask(&self, square: Square) -> Bitboard {
        self.rook_masks[square as usize]
    }

    #[inline]
    pub fn bishop_mask(&self, square: Square) -> Bitboard {
        self.bishop_masks[square as usize]
    }

    /// Squares a pawn of `color` standing on `square` attacks.
    #[inline]
    pub fn pawn_captures(&self, color: Color, square: Square) -> Bitboard {
        self.pawn_captures[color.index()][square as usize]
    }

    /// Attack set of a slider moving along `directions`, including the first
    /// blocker on each ray.
    pub fn sliding_attacks(
        &self,
        square: Square,
        directions: &[Direction],
        occupancy: Bitboard,
    ) -> Bitboard {
        let mut attacks = 0u64;
        for &dir in directions {
            let ray = self.ray(square, dir);
            if ray.mask & occupancy == 0 {
                attacks |= ray.mask;
                continue;
            }
            for &target in ray.squares() {
                attacks |= square_bit(target);
                if occupancy & square_bit(target) != 0 {
                    break;
                }
            }
        }
        attacks
    }

    #[inline]
    pub fn rook_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.sliding_attacks(square, &Direction::ROOK, occupancy)
    }

    #[inline]
    pub fn bishop_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.sliding_attacks(square, &Direction::BISHOP, occupancy)
    }
}

fn trace_ray(square: Square, direction: Direction) -> Ray {
    let (file_step, rank_step) = direction.steps();
    let mut ray = Ray::EMPTY;
    let mut file = file_of(square) as i32 + file_step;
    let mut rank = rank_of(square) as i32 + rank_step;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let target = (rank * 8 + file) as Square;
        ray.squares[ray.len as usize] = target;
        ray.len += 1;
        ray.mask |= square_bit(target);
        file += file_step;
        rank += rank_step;
    }

    ray
}

fn jump_mask(square: Square, offsets: &[(i32, i32)]) -> Bitboard {
    let file = file_of(square) as i32;
    let rank = rank_of(square) as i32;
    offsets
        .iter()
        .filter_map(|&(df, dr)| {
            let (f, r) = (file + df, rank + dr);
            ((0..8).contains(&f) && (0..8).contains(&r)).then(|| square_bit((r * 8 + f) as Square))
        })
        .fold(0, |acc, bit| acc | bit)
}
