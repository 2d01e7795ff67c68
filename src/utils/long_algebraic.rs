use crate::errors::{MoveParseError, MoveParseResult};
use crate::game_state::{chess_types::PieceKind, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::generate_legal;
use crate::moves::chess_move::ChessMove;
use crate::tables::chess_context::ChessContext;
use crate::utils::algebraic::algebraic_to_square;

/// Resolve coordinate text such as `e2e4` or `a7a8q` against the legal moves of
/// `game_state`, recovering the castle/en-passant/double-push flags.
pub fn parse_long_algebraic(
    context: &ChessContext,
    game_state: &GameState,
    long_algebraic: &str,
) -> MoveParseResult<ChessMove> {
    if !long_algebraic.is_ascii() || !(4..=5).contains(&long_algebraic.len()) {
        return Err(MoveParseError::Malformed(long_algebraic.to_owned()));
    }

    let from = algebraic_to_square(&long_algebraic[0..2])?;
    let to = algebraic_to_square(&long_algebraic[2..4])?;
    let promotion = long_algebraic[4..]
        .chars()
        .next()
        .map(char_to_promotion)
        .transpose()?;

    generate_legal(context, game_state)?
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
        .ok_or_else(|| MoveParseError::NotLegal(long_algebraic.to_owned()))
}

/// Parse and apply in one step.
pub fn apply_long_algebraic(
    context: &ChessContext,
    game_state: &GameState,
    long_algebraic: &str,
) -> MoveParseResult<GameState> {
    let mv = parse_long_algebraic(context, game_state, long_algebraic)?;
    Ok(apply_move(context, game_state, mv)?)
}

fn char_to_promotion(ch: char) -> MoveParseResult<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Ok(PieceKind::Knight),
        'b' => Ok(PieceKind::Bishop),
        'r' => Ok(PieceKind::Rook),
        'q' => Ok(PieceKind::Queen),
        _ => Err(MoveParseError::InvalidPromotion(ch)),
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_long_algebraic, parse_long_algebraic};
    use crate::errors::MoveParseError;
    use crate::game_state::game_state::GameState;
    use crate::tables::chess_context::ChessContext;

    #[test]
    fn parse_recovers_special_move_flags() {
        let ctx = ChessContext::new();
        let start = GameState::new_game(&ctx);
        let push = parse_long_algebraic(&ctx, &start, "e2e4").expect("move should parse");
        assert!(push.is_double_push());
        assert_eq!(push.to_long_algebraic(), "e2e4");

        let castle_state = GameState::from_fen(&ctx, "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");
        let castle = parse_long_algebraic(&ctx, &castle_state, "e1g1").expect("castle should parse");
        assert!(castle.is_castle());

        let ep_state = GameState::from_fen(&ctx, "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1")
            .expect("FEN should parse");
        let ep = parse_long_algebraic(&ctx, &ep_state, "e5d6").expect("en passant should parse");
        assert!(ep.is_en_passant());
    }

    #[test]
    fn promotion_text_round_trips() {
        let ctx = ChessContext::new();
        let game = GameState::from_fen(&ctx, "8/P7/8/8/8/8/8/k6K w - - 0 1").expect("FEN should parse");
        for text in ["a7a8q", "a7a8r", "a7a8b", "a7a8n"] {
            let mv = parse_long_algebraic(&ctx, &game, text).expect("promotion should parse");
            assert_eq!(mv.to_long_algebraic(), text);
        }
    }

    #[test]
    fn bad_text_is_rejected() {
        let ctx = ChessContext::new();
        let game = GameState::new_game(&ctx);
        assert!(matches!(
            parse_long_algebraic(&ctx, &game, "e2"),
            Err(MoveParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_long_algebraic(&ctx, &game, "e2e5"),
            Err(MoveParseError::NotLegal(_))
        ));
        assert!(matches!(
            parse_long_algebraic(&ctx, &game, "z2e4"),
            Err(MoveParseError::Square(_))
        ));
        assert!(matches!(
            apply_long_algebraic(&ctx, &game, "a7a8x"),
            Err(MoveParseError::InvalidPromotion('x'))
        ));
    }
}
