//! Exhaustive leaf counting for move-generator verification.

use std::sync::Arc;
use std::thread;

use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::{
    GeneratedMove, MoveGenResult, MoveGenerationError, MoveGenerator,
};
use crate::moves::chess_move::ChessMove;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Number of leaf positions reachable in exactly `depth` plies.
pub fn count_leaf_positions<G: MoveGenerator + ?Sized>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = generator.generate_legal_moves(game_state)?;
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut total = 0u64;
    for mv in moves {
        total += count_leaf_positions(generator, &mv.game_after_move, depth - 1)?;
    }
    Ok(total)
}

/// Leaf count per root move.
pub fn perft_divide<G: MoveGenerator + ?Sized>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<Vec<(ChessMove, u64)>> {
    let depth = depth.max(1);
    generator
        .generate_legal_moves(game_state)?
        .into_iter()
        .map(|mv| {
            let count = count_leaf_positions(generator, &mv.game_after_move, depth - 1)?;
            Ok((mv.chess_move, count))
        })
        .collect()
}

/// Leaf count with a breakdown of the move that reached each leaf.
pub fn perft<G: MoveGenerator + ?Sized>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for mv in generator.generate_legal_moves(game_state)? {
        perft_recurse(generator, &mv, depth, 1, &mut total)?;
    }
    Ok(total)
}

/// Same as [`perft`], one worker thread per root move.
pub fn perft_multi_threaded(
    generator: Arc<dyn MoveGenerator>,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return perft(generator.as_ref(), game_state, 0);
    }

    let root_moves = generator.generate_legal_moves(game_state)?;
    let mut handles = Vec::with_capacity(root_moves.len());

    for mv in root_moves {
        let generator_ref = Arc::clone(&generator);
        handles.push(thread::spawn(move || {
            let mut local = PerftCounts::default();
            perft_recurse(generator_ref.as_ref(), &mv, depth, 1, &mut local).map(|()| local)
        }));
    }

    let mut total = PerftCounts::default();
    for handle in handles {
        let local = handle.join().map_err(|_| {
            MoveGenerationError::InvalidState("perft worker thread panicked".to_owned())
        })??;
        total.merge(local);
    }

    Ok(total)
}

fn perft_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) -> MoveGenResult<()> {
    if current_depth == search_depth {
        let chess_move = mv.chess_move;
        counts.nodes += 1;
        counts.captures += u64::from(chess_move.is_capture());
        counts.en_passant += u64::from(chess_move.is_en_passant());
        counts.castles += u64::from(chess_move.is_castle());
        counts.promotions += u64::from(chess_move.is_promotion());

        if mv.gives_check {
            counts.checks += 1;
            if generator.generate_legal_moves(&mv.game_after_move)?.is_empty() {
                counts.checkmates += 1;
            }
        }

        return Ok(());
    }

    for child in generator.generate_legal_moves(&mv.game_after_move)? {
        perft_recurse(generator, &child, search_depth, current_depth + 1, counts)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Color;
    use crate::move_generation::move_generator::LegalMoveGenerator;
    use crate::moves::chess_move::{FLAG_CAPTURE, FLAG_CASTLING, FLAG_EN_PASSANT};
    use crate::tables::chess_context::ChessContext;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    struct MockMoveGenerator;

    impl MoveGenerator for MockMoveGenerator {
        fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
            Ok(match game_state.ply {
                0 => vec![
                    child(game_state, ChessMove::new(12, 28, FLAG_CAPTURE), false),
                    child(game_state, ChessMove::new(4, 6, FLAG_CASTLING), true),
                ],
                1 => vec![
                    child(game_state, ChessMove::new(28, 35, FLAG_CAPTURE | FLAG_EN_PASSANT), true),
                    child(game_state, ChessMove::new(1, 18, 0), false),
                ],
                _ => Vec::new(),
            })
        }

        fn generate_quiescence_moves(&self, _game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
            Ok(Vec::new())
        }
    }

    fn child(game_state: &GameState, chess_move: ChessMove, gives_check: bool) -> GeneratedMove {
        let mut game_after_move = game_state.clone();
        game_after_move.ply += 1;
        game_after_move.side_to_move = game_after_move.side_to_move.opposite();
        GeneratedMove {
            chess_move,
            game_after_move,
            gives_check,
        }
    }

    fn generator() -> (Arc<ChessContext>, LegalMoveGenerator) {
        let ctx = ChessContext::shared();
        (Arc::clone(&ctx), LegalMoveGenerator::new(ctx))
    }

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let counts = perft(&MockMoveGenerator, &GameState::new_empty(), 0).expect("perft should run");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn perft_depth_two_aggregates_leaf_metrics() {
        let counts = perft(&MockMoveGenerator, &GameState::new_empty(), 2).expect("perft should run");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 4,
                captures: 2,
                en_passant: 2,
                castles: 0,
                promotions: 0,
                checks: 2,
                checkmates: 2,
            }
        );
    }

    #[test]
    fn starting_position_leaf_counts() {
        let (ctx, gen) = generator();
        let game = GameState::new_game(&ctx);
        let expected = [1u64, 20, 400, 8_902, 197_281];
        for (depth, nodes) in expected.iter().enumerate() {
            assert_eq!(
                count_leaf_positions(&gen, &game, depth as u8).expect("perft should run"),
                *nodes,
                "depth {depth}"
            );
        }
    }

    #[test]
    fn kiwipete_breakdown_at_depth_two() {
        let (ctx, gen) = generator();
        let game = GameState::from_fen(&ctx, KIWIPETE).expect("FEN should parse");
        let counts = perft(&gen, &game, 2).expect("perft should run");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 2039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
                checks: 3,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn endgame_position_matches_reference_counts() {
        let (ctx, gen) = generator();
        let game = GameState::from_fen(&ctx, ENDGAME).expect("FEN should parse");
        let counts = perft(&gen, &game, 3).expect("perft should run");
        assert_eq!(counts.nodes, 2812);
        assert_eq!(counts.captures, 209);
        assert_eq!(counts.en_passant, 2);
        assert_eq!(counts.checks, 267);
        assert_eq!(count_leaf_positions(&gen, &game, 4).expect("perft should run"), 43_238);
    }

    #[test]
    fn divide_sums_to_total_and_threads_agree() {
        let (ctx, gen) = generator();
        let game = GameState::from_fen(&ctx, KIWIPETE).expect("FEN should parse");
        let divide = perft_divide(&gen, &game, 3).expect("divide should run");
        assert_eq!(divide.len(), 48);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 97_862);

        let shared: Arc<dyn MoveGenerator> = Arc::new(gen.clone());
        let threaded = perft_multi_threaded(shared, &game, 3).expect("perft should run");
        assert_eq!(threaded, perft(&gen, &game, 3).expect("perft should run"));
        assert_eq!(threaded.nodes, 97_862);
        assert_eq!(game.side_to_move, Color::Light);
    }
}
