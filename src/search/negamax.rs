//! Negamax tree walk with principal-variation search and quiescence.
//!
//! Scores are fail-hard and relative to the side to move. A `None` score
//! means the walk was aborted by the stop flag or the deadline; callers must
//! unwind and discard whatever bounds they had reached.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerator};
use crate::moves::chess_move::ChessMove;
use crate::search::best_move_cache::BestMoveCache;
use crate::search::board_scoring::{BoardScorer, DRAW_SCORE, MATE_SCORE};
use crate::search::move_ordering::{order_child_moves, EvaluatedMove};
use crate::tables::chess_context::ChessContext;

/// Remaining depth at or below which a PV line is extended near the root.
const PV_EXTENSION_DEPTH: i32 = 2;
/// Heights at which the PV extension applies.
const PV_EXTENSION_HEIGHT: u8 = 2;

/// Cooperative abort state polled at every node.
#[derive(Debug)]
pub struct SearchControl<'a> {
    stop_flag: &'a AtomicBool,
    deadline: Option<Instant>,
    check_interval: u64,
    nodes: u64,
    deadline_passed: bool,
}

impl<'a> SearchControl<'a> {
    pub fn new(stop_flag: &'a AtomicBool, deadline: Option<Instant>, check_interval: u64) -> Self {
        Self {
            stop_flag,
            deadline,
            check_interval: check_interval.max(1),
            nodes: 0,
            deadline_passed: false,
        }
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    pub fn deadline_passed(&self) -> bool {
        self.deadline_passed
    }

    /// The stop flag is read every call; the clock only every `check_interval`
    /// nodes. A passed deadline raises the stop flag.
    pub fn should_abort(&mut self) -> bool {
        if self.stop_flag.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if self.nodes % self.check_interval == 0 && Instant::now() >= deadline {
                self.deadline_passed = true;
                self.stop_flag.store(true, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    #[inline]
    fn count_node(&mut self) {
        self.nodes += 1;
    }
}

/// Outcome of one root pass over the ordered root moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootOutcome {
    pub best_move: Option<ChessMove>,
    pub score: i32,
    pub principal_variation: Vec<ChessMove>,
}

/// Everything one tree walk reads or updates.
pub struct NodeSearch<'a, G: MoveGenerator + ?Sized, S: BoardScorer + ?Sized> {
    pub context: &'a ChessContext,
    pub generator: &'a G,
    pub scorer: &'a S,
    pub cache: &'a mut BestMoveCache,
    pub control: SearchControl<'a>,
    pub max_height: u8,
}

/// Score for a side to move with no legal moves at `height`.
pub fn terminal_score(context: &ChessContext, game_state: &GameState, height: u8) -> i32 {
    if is_in_check(context, game_state, game_state.side_to_move) {
        -(MATE_SCORE - i32::from(height))
    } else {
        DRAW_SCORE
    }
}

/// Repetition, fifty-move rule, or dead material.
#[inline]
pub fn is_draw_position(game_state: &GameState) -> bool {
    game_state.is_threefold_repetition()
        || game_state.is_fifty_move_draw()
        || game_state.has_insufficient_material()
}

#[inline]
fn cache_depth(depth: i32) -> u8 {
    depth.clamp(0, i32::from(u8::MAX)) as u8
}

impl<'a, G: MoveGenerator + ?Sized, S: BoardScorer + ?Sized> NodeSearch<'a, G, S> {
    /// +1 for promotions, checks, and PV moves near the root at shallow
    /// remaining depth. Never more than one ply in total.
    fn extension(generated: &GeneratedMove, follows_pv: bool, height: u8, depth: i32) -> i32 {
        let promotes = generated.chess_move.is_promotion();
        let shallow_pv = follows_pv && height < PV_EXTENSION_HEIGHT && depth <= PV_EXTENSION_DEPTH;
        i32::from(promotes || generated.gives_check || shallow_pv)
    }

    /// Late quiet moves lose a ply unless already extended.
    #[inline]
    fn reduction(generated: &GeneratedMove, move_index: usize, extension: i32) -> i32 {
        i32::from(move_index > 0 && extension == 0 && generated.chess_move.is_quiet())
    }

    /// Search one child, probing late moves with a null window first.
    /// Returns the score from the parent's point of view.
    fn search_child(
        &mut self,
        generated: &GeneratedMove,
        move_index: usize,
        depth: i32,
        height: u8,
        alpha: i32,
        beta: i32,
        child_prior_pv: &[ChessMove],
        follows_pv: bool,
        child_pv: &mut Vec<ChessMove>,
    ) -> MoveGenResult<Option<i32>> {
        let child = &generated.game_after_move;
        if is_draw_position(child) {
            child_pv.clear();
            self.control.count_node();
            return Ok(Some(DRAW_SCORE));
        }

        let extension = Self::extension(generated, follows_pv, height, depth);
        let full_depth = depth - 1 + extension;
        let next_height = height.saturating_add(1);

        if move_index == 0 {
            return Ok(self
                .negamax(child, full_depth, next_height, -beta, -alpha, child_prior_pv, child_pv)?
                .map(|score| -score));
        }

        let reduced_depth = full_depth - Self::reduction(generated, move_index, extension);
        let Some(probe) =
            self.negamax(child, reduced_depth, next_height, -alpha - 1, -alpha, &[], child_pv)?
        else {
            return Ok(None);
        };
        let probe = -probe;

        let reduced = reduced_depth < full_depth;
        if probe > alpha && (probe < beta || reduced) {
            return Ok(self
                .negamax(child, full_depth, next_height, -beta, -alpha, &[], child_pv)?
                .map(|score| -score));
        }
        Ok(Some(probe))
    }

    /// Interior node. `prior_pv` is the previous iteration's line from this
    /// node on, empty once the walk has left it.
    pub fn negamax(
        &mut self,
        game_state: &GameState,
        depth: i32,
        height: u8,
        mut alpha: i32,
        beta: i32,
        prior_pv: &[ChessMove],
        pv: &mut Vec<ChessMove>,
    ) -> MoveGenResult<Option<i32>> {
        pv.clear();
        if self.control.should_abort() {
            return Ok(None);
        }
        if depth <= 0 {
            return self.quiescence(game_state, height, alpha, beta);
        }
        self.control.count_node();

        if height >= self.max_height {
            return Ok(Some(self.scorer.score(self.context, game_state)));
        }

        let mut moves = self.generator.generate_legal_moves(game_state)?;
        if moves.is_empty() {
            return Ok(Some(terminal_score(self.context, game_state, height)));
        }

        let key = game_state.zobrist_key;
        let pv_move = prior_pv.first().copied();
        let cache_move = self.cache.probe(key).map(|entry| entry.best_move);
        order_child_moves(&mut moves, pv_move, cache_move);

        let mut best_move = None;
        let mut child_pv = Vec::new();

        for (move_index, generated) in moves.iter().enumerate() {
            let mv = generated.chess_move;
            let follows_pv = pv_move == Some(mv);
            let child_prior_pv: &[ChessMove] = if follows_pv { &prior_pv[1..] } else { &[] };

            let Some(score) = self.search_child(
                generated,
                move_index,
                depth,
                height,
                alpha,
                beta,
                child_prior_pv,
                follows_pv,
                &mut child_pv,
            )?
            else {
                return Ok(None);
            };

            if score >= beta {
                self.cache.record(key, cache_depth(depth), mv);
                return Ok(Some(beta));
            }
            if score > alpha {
                alpha = score;
                best_move = Some(mv);
                pv.clear();
                pv.push(mv);
                pv.extend_from_slice(&child_pv);
            }
        }

        if let Some(mv) = best_move {
            self.cache.record(key, cache_depth(depth), mv);
        }
        Ok(Some(alpha))
    }

    /// Captures and promotions only, with a stand-pat lower bound.
    pub fn quiescence(
        &mut self,
        game_state: &GameState,
        height: u8,
        mut alpha: i32,
        beta: i32,
    ) -> MoveGenResult<Option<i32>> {
        if self.control.should_abort() {
            return Ok(None);
        }
        self.control.count_node();

        let stand_pat = self.scorer.score(self.context, game_state);
        if height >= self.max_height {
            return Ok(Some(stand_pat));
        }
        if stand_pat >= beta {
            return Ok(Some(beta));
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        for generated in self.generator.generate_quiescence_moves(game_state)? {
            let child = &generated.game_after_move;
            let score = if is_draw_position(child) {
                DRAW_SCORE
            } else {
                let Some(score) =
                    self.quiescence(child, height.saturating_add(1), -beta, -alpha)?
                else {
                    return Ok(None);
                };
                -score
            };

            if score >= beta {
                return Ok(Some(beta));
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(Some(alpha))
    }

    /// One pass over the root moves inside `[alpha, beta]`.
    ///
    /// Each move's `score` is refreshed and moves that raise alpha or cut off
    /// earn `depth` dynamic promise.
    pub fn search_root(
        &mut self,
        game_state: &GameState,
        root_moves: &mut [EvaluatedMove],
        depth: i32,
        mut alpha: i32,
        beta: i32,
        prior_pv: &[ChessMove],
    ) -> MoveGenResult<Option<RootOutcome>> {
        if self.control.should_abort() {
            return Ok(None);
        }
        self.control.count_node();

        let key = game_state.zobrist_key;
        let pv_move = prior_pv.first().copied();
        let mut outcome = RootOutcome {
            best_move: None,
            score: alpha,
            principal_variation: Vec::new(),
        };
        let mut child_pv = Vec::new();

        for (move_index, root_move) in root_moves.iter_mut().enumerate() {
            let mv = root_move.chess_move();
            let follows_pv = pv_move == Some(mv);
            let child_prior_pv: &[ChessMove] = if follows_pv { &prior_pv[1..] } else { &[] };

            let Some(score) = self.search_child(
                &root_move.generated,
                move_index,
                depth,
                0,
                alpha,
                beta,
                child_prior_pv,
                follows_pv,
                &mut child_pv,
            )?
            else {
                return Ok(None);
            };
            root_move.score = score;

            if score >= beta {
                root_move.reward(depth);
                self.cache.record(key, cache_depth(depth), mv);
                outcome.best_move = Some(mv);
                outcome.score = beta;
                outcome.principal_variation.clear();
                outcome.principal_variation.push(mv);
                outcome.principal_variation.extend_from_slice(&child_pv);
                return Ok(Some(outcome));
            }
            if score > alpha {
                root_move.reward(depth);
                alpha = score;
                outcome.best_move = Some(mv);
                outcome.score = score;
                outcome.principal_variation.clear();
                outcome.principal_variation.push(mv);
                outcome.principal_variation.extend_from_slice(&child_pv);
            }
        }

        if let Some(mv) = outcome.best_move {
            self.cache.record(key, cache_depth(depth), mv);
        }
        Ok(Some(outcome))
    }
}
