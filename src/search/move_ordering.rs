//! Move ordering for the root and interior nodes.
//!
//! Root moves carry a static base promise and a dynamic promise learned from
//! the search. Interior nodes try the principal-variation move first, then the
//! cached best move, then the rest in generator order.

use crate::move_generation::move_generator::GeneratedMove;
use crate::moves::chess_move::ChessMove;

const CHECK_PROMISE: i32 = 5;
const TACTICAL_PROMISE: i32 = 3;
const CASTLE_PROMISE: i32 = 1;
const DOUBLE_PUSH_PROMISE: i32 = 1;

/// Static pre-score of a move before any search.
pub fn base_promise(generated: &GeneratedMove) -> i32 {
    let mv = generated.chess_move;
    let mut promise = 0;
    if generated.gives_check {
        promise += CHECK_PROMISE;
    }
    if mv.is_capture() || mv.is_promotion() {
        promise += TACTICAL_PROMISE;
    }
    if mv.is_castle() {
        promise += CASTLE_PROMISE;
    }
    if mv.is_double_push() {
        promise += DOUBLE_PUSH_PROMISE;
    }
    promise
}

/// A root move with its last searched score and its two promise components.
#[derive(Debug, Clone)]
pub struct EvaluatedMove {
    pub generated: GeneratedMove,
    pub score: i32,
    pub base_promise: i32,
    pub dynamic_promise: i32,
}

impl EvaluatedMove {
    pub fn new(generated: GeneratedMove) -> Self {
        let base_promise = base_promise(&generated);
        Self {
            generated,
            score: 0,
            base_promise,
            dynamic_promise: 0,
        }
    }

    #[inline]
    pub fn chess_move(&self) -> ChessMove {
        self.generated.chess_move
    }

    #[inline]
    pub fn promise(&self) -> i32 {
        self.base_promise + self.dynamic_promise
    }

    /// Credit a move that raised alpha or caused a cutoff.
    #[inline]
    pub fn reward(&mut self, amount: i32) {
        self.dynamic_promise = self.dynamic_promise.saturating_add(amount);
    }
}

/// Previous best move first, then descending promise. Stable, so equal
/// promises keep their relative order.
pub fn sort_root_moves(moves: &mut [EvaluatedMove], previous_best: Option<ChessMove>) {
    moves.sort_by_key(|em| {
        let is_previous_best = previous_best == Some(em.chess_move());
        (std::cmp::Reverse(is_previous_best), std::cmp::Reverse(em.promise()))
    });
}

/// Move `pv_move` to the front and `cache_move` right after it.
pub fn order_child_moves(
    moves: &mut Vec<GeneratedMove>,
    pv_move: Option<ChessMove>,
    cache_move: Option<ChessMove>,
) {
    let mut next_slot = 0;
    for hint in [pv_move, cache_move].into_iter().flatten() {
        let Some(index) = moves[next_slot..]
            .iter()
            .position(|generated| generated.chess_move == hint)
        else {
            continue;
        };
        let hinted = moves.remove(next_slot + index);
        moves.insert(next_slot, hinted);
        next_slot += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::move_generator::{LegalMoveGenerator, MoveGenerator};
    use crate::tables::chess_context::ChessContext;

    fn successors(fen: &str) -> Vec<GeneratedMove> {
        let ctx = ChessContext::shared();
        let game = GameState::from_fen(&ctx, fen).expect("FEN should parse");
        LegalMoveGenerator::new(ctx)
            .generate_legal_moves(&game)
            .expect("legal moves")
    }

    fn find(moves: &[GeneratedMove], text: &str) -> GeneratedMove {
        moves
            .iter()
            .find(|generated| generated.chess_move.to_long_algebraic() == text)
            .cloned()
            .expect("move should be legal")
    }

    #[test]
    fn base_promise_sums_move_features() {
        let moves = successors("r3k3/8/8/8/8/8/4P3/R3K2R w KQq - 0 1");
        assert_eq!(base_promise(&find(&moves, "a1a8")), TACTICAL_PROMISE + CHECK_PROMISE);
        assert_eq!(base_promise(&find(&moves, "e1g1")), CASTLE_PROMISE);
        assert_eq!(base_promise(&find(&moves, "e2e4")), DOUBLE_PUSH_PROMISE);
        assert_eq!(base_promise(&find(&moves, "e2e3")), 0);
    }

    #[test]
    fn root_sort_puts_previous_best_first_then_promise() {
        let moves = successors("r3k3/8/8/8/8/8/4P3/R3K2R w KQq - 0 1");
        let mut root: Vec<EvaluatedMove> = moves.into_iter().map(EvaluatedMove::new).collect();
        let quiet = find(
            &root.iter().map(|em| em.generated.clone()).collect::<Vec<_>>(),
            "h1h2",
        )
        .chess_move;

        sort_root_moves(&mut root, None);
        assert_eq!(root[0].chess_move().to_long_algebraic(), "a1a8");

        sort_root_moves(&mut root, Some(quiet));
        assert_eq!(root[0].chess_move(), quiet);
        assert_eq!(root[1].chess_move().to_long_algebraic(), "a1a8");
    }

    #[test]
    fn dynamic_promise_reorders_without_touching_base() {
        let moves = successors("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let mut root: Vec<EvaluatedMove> = moves.into_iter().map(EvaluatedMove::new).collect();
        let last = root.len() - 1;
        let base = root[last].base_promise;
        root[last].reward(10);
        let rewarded = root[last].chess_move();
        sort_root_moves(&mut root, None);
        assert_eq!(root[0].chess_move(), rewarded);
        assert_eq!(root[0].base_promise, base);
        assert_eq!(root[0].promise(), base + 10);
    }

    #[test]
    fn child_order_is_pv_then_cache_then_generator() {
        let mut moves = successors(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        let original: Vec<ChessMove> = moves.iter().map(|g| g.chess_move).collect();
        let pv = original[7];
        let cached = original[3];

        order_child_moves(&mut moves, Some(pv), Some(cached));
        let ordered: Vec<ChessMove> = moves.iter().map(|g| g.chess_move).collect();
        assert_eq!(ordered[0], pv);
        assert_eq!(ordered[1], cached);
        let rest: Vec<ChessMove> = original
            .iter()
            .copied()
            .filter(|mv| *mv != pv && *mv != cached)
            .collect();
        assert_eq!(&ordered[2..], rest.as_slice());
    }

    #[test]
    fn child_order_ignores_duplicate_and_missing_hints() {
        let mut moves = successors(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        let original: Vec<ChessMove> = moves.iter().map(|g| g.chess_move).collect();
        order_child_moves(&mut moves, Some(original[5]), Some(original[5]));
        assert_eq!(moves[0].chess_move, original[5]);
        assert_eq!(moves.len(), original.len());

        let mut untouched = successors(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        order_child_moves(&mut untouched, Some(ChessMove::new(0, 63, 0)), None);
        let after: Vec<ChessMove> = untouched.iter().map(|g| g.chess_move).collect();
        assert_eq!(after, original);
    }
}
