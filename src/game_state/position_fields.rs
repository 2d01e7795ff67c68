//! Six-field position description.
//!
//! Takes the already-separated placement, side, castling, en-passant, and
//! clock fields and builds a fully-populated `GameState`: piece bitboards,
//! rights, per-color en-passant targets, clocks, occupancies, and the key.

use crate::errors::{PositionError, PositionResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::tables::chess_context::ChessContext;
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionFields<'a> {
    pub placement: &'a str,
    pub side_to_move: &'a str,
    pub castling: &'a str,
    pub en_passant: &'a str,
    pub halfmove_clock: &'a str,
    pub fullmove_number: &'a str,
}

impl<'a> PositionFields<'a> {
    /// Split whitespace-separated text into exactly six fields.
    pub fn split(text: &'a str) -> PositionResult<Self> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let [placement, side_to_move, castling, en_passant, halfmove_clock, fullmove_number] =
            parts[..]
        else {
            return Err(PositionError::FieldCount(parts.len()));
        };

        Ok(Self {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    pub fn build(&self, context: &ChessContext) -> PositionResult<GameState> {
        let mut game_state = GameState::new_empty();

        parse_placement(self.placement, &mut game_state)?;
        game_state.side_to_move = parse_side_to_move(self.side_to_move)?;
        game_state.castling_rights = parse_castling_rights(self.castling)?;
        game_state.en_passant_targets =
            parse_en_passant(self.en_passant, game_state.side_to_move)?;
        game_state.halfmove_clock =
            self.halfmove_clock
                .parse::<u16>()
                .map_err(|_| PositionError::InvalidClock {
                    field: "halfmove",
                    value: self.halfmove_clock.to_owned(),
                })?;
        game_state.fullmove_number =
            self.fullmove_number
                .parse::<u16>()
                .map_err(|_| PositionError::InvalidClock {
                    field: "fullmove",
                    value: self.fullmove_number.to_owned(),
                })?;

        for color in Color::ALL {
            let count = game_state.pieces_of(color, PieceKind::King).count_ones();
            if count != 1 {
                return Err(PositionError::KingCount { color, count });
            }
        }

        game_state.refresh_derived(context);
        Ok(game_state)
    }
}

fn parse_placement(placement: &str, game_state: &mut GameState) -> PositionResult<()> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(PositionError::InvalidPlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (text_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - text_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(PositionError::InvalidPlacement(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as usize;
                continue;
            }

            let (color, piece) = piece_from_char(ch).ok_or_else(|| {
                PositionError::InvalidPlacement(format!("invalid piece character '{ch}'"))
            })?;

            if file >= 8 {
                return Err(PositionError::InvalidPlacement(format!(
                    "rank {} has too many files",
                    board_rank + 1
                )));
            }

            let sq = (board_rank * 8 + file) as Square;
            game_state.pieces[color.index()][piece.index()] |= square_bit(sq);
            file += 1;
        }

        if file != 8 {
            return Err(PositionError::InvalidPlacement(format!(
                "rank {} does not sum to 8 files",
                board_rank + 1
            )));
        }
    }

    for color in Color::ALL {
        if game_state.pieces_of(color, PieceKind::Pawn) & (RANK_1 | RANK_8) != 0 {
            return Err(PositionError::InvalidPlacement(format!(
                "{color:?} pawn on the first or last rank"
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(side: &str) -> PositionResult<Color> {
    match side {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(PositionError::InvalidSideToMove(side.to_owned())),
    }
}

fn parse_castling_rights(castling: &str) -> PositionResult<CastlingRights> {
    if castling == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling.chars() {
        rights |= match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => return Err(PositionError::InvalidCastling(ch)),
        };
    }

    Ok(rights)
}

/// A rank-3 target follows a light double push and belongs to dark, and vice versa.
fn parse_en_passant(en_passant: &str, side_to_move: Color) -> PositionResult<[u64; 2]> {
    let mut targets = [0u64; 2];
    if en_passant == "-" {
        return Ok(targets);
    }

    let square = algebraic_to_square(en_passant)?;
    let capturer = match rank_of(square) {
        2 => Color::Dark,
        5 => Color::Light,
        _ => return Err(PositionError::InvalidEnPassant(en_passant.to_owned())),
    };
    if capturer != side_to_move {
        return Err(PositionError::InvalidEnPassant(format!(
            "{en_passant} with {side_to_move:?} to move"
        )));
    }

    targets[capturer.index()] = square_bit(square);
    Ok(targets)
}

fn piece_from_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else {
        Color::Dark
    };

    let piece = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, piece))
}

#[cfg(test)]
mod tests {
    use super::PositionFields;
    use crate::errors::PositionError;
    use crate::game_state::chess_types::*;
    use crate::tables::chess_context::ChessContext;

    #[test]
    fn builds_from_separated_fields() {
        let ctx = ChessContext::new();
        let fields = PositionFields {
            placement: "4k3/8/8/3pP3/8/8/8/4K3",
            side_to_move: "w",
            castling: "-",
            en_passant: "d6",
            halfmove_clock: "0",
            fullmove_number: "12",
        };
        let game = fields.build(&ctx).expect("fields should build");

        assert_eq!(game.side_to_move, Color::Light);
        assert_eq!(game.en_passant_target_for(Color::Light), square_bit(43));
        assert_eq!(game.en_passant_target_for(Color::Dark), 0);
        assert_eq!(game.fullmove_number, 12);
        assert_eq!(game.zobrist_key, ctx.zobrist.compute_zobrist_key(&game));
    }

    #[test]
    fn split_requires_six_fields() {
        assert_eq!(
            PositionFields::split("8/8/8/8/8/8/8/8 w - -"),
            Err(PositionError::FieldCount(4))
        );
        assert!(PositionFields::split("8/8/8/8/8/8/8/8 w - - 0 1").is_ok());
    }

    #[test]
    fn malformed_fields_are_rejected() {
        let ctx = ChessContext::new();
        let bad = [
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w KX - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - e4 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - e3 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - z 1",
            "4k3/8/8/8/8/8/8/4K2 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4X3 w - - 0 1",
            "8/8/8/8/8/8/8/4K3 w - - 0 1",
            "P3k3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/p3K3 b - - 0 1",
        ];
        for text in bad {
            let fields = PositionFields::split(text).expect("six fields");
            assert!(fields.build(&ctx).is_err(), "{text}");
        }
    }

    #[test]
    fn missing_king_reports_color() {
        let ctx = ChessContext::new();
        let fields = PositionFields::split("8/8/8/8/8/8/8/4K3 w - - 0 1").expect("six fields");
        assert_eq!(
            fields.build(&ctx),
            Err(PositionError::KingCount {
                color: Color::Dark,
                count: 0
            })
        );
    }
}
