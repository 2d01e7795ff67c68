//! Square conversions for long algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! square indices reused by position fields and move text.

use crate::errors::{PositionError, PositionResult};
use crate::game_state::chess_types::Square;

/// Convert a coordinate (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> PositionResult<Square> {
    let &[file, rank] = square.as_bytes() else {
        return Err(PositionError::InvalidSquare(square.to_owned()));
    };

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(PositionError::InvalidSquare(square.to_owned()));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert a square index (`0..=63`) to a coordinate (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let file_char = char::from(b'a' + (square & 7));
    let rank_char = char::from(b'1' + ((square >> 3) & 7));
    format!("{file_char}{rank_char}")
}
