//! Iterative deepening driver with aspiration windows.
//!
//! Each depth is searched inside a narrow window around the previous score
//! and repeated with the full window when it fails. Only fully completed
//! iterations update the best move; an aborted iteration is thrown away.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::engines::search_parameters::SearchParameters;
use crate::engines::time_management::TimeManager;
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerator};
use crate::moves::chess_move::ChessMove;
use crate::search::best_move_cache::BestMoveCache;
use crate::search::board_scoring::{is_mate_score, BoardScorer, INFINITY_SCORE};
use crate::search::move_ordering::{sort_root_moves, EvaluatedMove};
use crate::search::negamax::{NodeSearch, RootOutcome, SearchControl};
use crate::search::search_report::{
    AspirationReport, IterationReport, NullListener, SearchEvent, SearchListener, SearchSummary,
};
use crate::tables::chess_context::ChessContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Half-width of the aspiration window in centipawns.
    pub aspiration_window: i32,
    pub max_height: u8,
    /// Nodes between wall-clock checks.
    pub deadline_check_interval: u64,
    /// Depth cap for time-limited and infinite searches.
    pub max_depth: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            aspiration_window: 32,
            max_height: 96,
            deadline_check_interval: 1024,
            max_depth: 64,
        }
    }
}

/// Synchronous searcher that owns the best-move cache across searches.
pub struct Searcher<G: MoveGenerator, S: BoardScorer> {
    context: Arc<ChessContext>,
    generator: G,
    scorer: S,
    cache: BestMoveCache,
    config: SearchConfig,
}

impl<G: MoveGenerator, S: BoardScorer> Searcher<G, S> {
    pub fn new(context: Arc<ChessContext>, generator: G, scorer: S) -> Self {
        Self::with_config(context, generator, scorer, SearchConfig::default())
    }

    pub fn with_config(
        context: Arc<ChessContext>,
        generator: G,
        scorer: S,
        config: SearchConfig,
    ) -> Self {
        Self {
            context,
            generator,
            scorer,
            cache: BestMoveCache::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    #[inline]
    pub fn cache(&self) -> &BestMoveCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Depth-limited search with no listener and no external stop.
    pub fn search_depth(&mut self, game_state: &GameState, depth: u8) -> MoveGenResult<SearchSummary> {
        let stop_flag = AtomicBool::new(false);
        self.search(
            game_state,
            SearchParameters::Depth(depth),
            &stop_flag,
            &mut NullListener,
        )
    }

    /// Run a full search on the calling thread.
    ///
    /// Emits zero or more iteration and aspiration events, then exactly one
    /// `SearchComplete`, which is also returned. Raising `stop_flag` cancels
    /// the search; a passed hard deadline raises it too.
    pub fn search<L: SearchListener + ?Sized>(
        &mut self,
        game_state: &GameState,
        parameters: SearchParameters,
        stop_flag: &AtomicBool,
        listener: &mut L,
    ) -> MoveGenResult<SearchSummary> {
        let started_at = Instant::now();
        let time_manager = match parameters {
            SearchParameters::Time {
                available_ms,
                increment_ms,
            } => Some(TimeManager::new(available_ms, increment_ms)),
            SearchParameters::Depth(_) | SearchParameters::Infinite => None,
        };
        let max_depth = match parameters {
            SearchParameters::Depth(depth) => depth.max(1),
            SearchParameters::Time { .. } | SearchParameters::Infinite => self.config.max_depth,
        };
        let deadline = time_manager.map(|tm| started_at + tm.hard_limit());
        info!(?parameters, max_depth, fen = %game_state.to_fen(), "search started");

        let root_moves = self.generator.generate_legal_moves(game_state)?;
        if root_moves.is_empty() {
            info!("no legal move at the root");
            let summary = SearchSummary {
                best_move: None,
                score: 0,
                depth: 0,
                nodes: 0,
                elapsed: started_at.elapsed(),
                cancelled: false,
                cache_stats: self.cache.stats(),
            };
            listener.on_event(SearchEvent::SearchComplete(summary));
            return Ok(summary);
        }
        let mut root_moves: Vec<EvaluatedMove> =
            root_moves.into_iter().map(EvaluatedMove::new).collect();
        sort_root_moves(&mut root_moves, None);

        let mut node = NodeSearch {
            context: &self.context,
            generator: &self.generator,
            scorer: &self.scorer,
            cache: &mut self.cache,
            control: SearchControl::new(stop_flag, deadline, self.config.deadline_check_interval),
            max_height: self.config.max_height,
        };

        let mut best_move: Option<ChessMove> = None;
        let mut best_score = 0;
        let mut completed_depth = 0u8;
        let mut principal_variation: Vec<ChessMove> = Vec::new();
        let mut cancelled = false;

        for depth in 1..=max_depth {
            sort_root_moves(&mut root_moves, best_move);

            let Some(outcome) = search_with_aspiration(
                &mut node,
                game_state,
                &mut root_moves,
                depth,
                best_score,
                &principal_variation,
                self.config.aspiration_window,
                listener,
            )?
            else {
                cancelled = true;
                info!(
                    depth,
                    deadline = node.control.deadline_passed(),
                    "search cancelled, discarding iteration"
                );
                break;
            };

            let iteration_best = outcome
                .best_move
                .unwrap_or_else(|| root_moves[0].chess_move());
            let best_move_changed = depth > 1 && best_move != Some(iteration_best);
            let previous_score = (depth > 1).then_some(best_score);

            best_move = Some(iteration_best);
            best_score = outcome.score;
            completed_depth = depth;
            principal_variation = if outcome.principal_variation.is_empty() {
                vec![iteration_best]
            } else {
                outcome.principal_variation
            };

            let report = IterationReport {
                depth,
                principal_variation: principal_variation.clone(),
                score: best_score,
                elapsed: started_at.elapsed(),
                nodes: node.control.nodes(),
                best_move_changed,
            };
            debug!(
                depth,
                score = best_score,
                nodes = report.nodes,
                pv = %report.pv_text(),
                "iteration completed"
            );
            listener.on_event(SearchEvent::IterationCompleted(report));

            if is_mate_score(best_score) {
                debug!(score = best_score, "forced mate found");
                break;
            }
            if let Some(tm) = time_manager {
                if !tm.should_continue(
                    started_at.elapsed(),
                    best_move_changed,
                    best_score,
                    previous_score,
                ) {
                    trace!(depth, "time budget spent");
                    break;
                }
            }
        }

        // Stopped before depth 1 finished: fall back to the top-ordered move.
        let best_move = best_move.or_else(|| root_moves.first().map(EvaluatedMove::chess_move));
        let summary = SearchSummary {
            best_move,
            score: best_score,
            depth: completed_depth,
            nodes: node.control.nodes(),
            elapsed: started_at.elapsed(),
            cancelled,
            cache_stats: node.cache.stats(),
        };
        info!(
            best_move = %best_move.unwrap_or(ChessMove::NULL),
            depth = completed_depth,
            nodes = summary.nodes,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            nps = nodes_per_second(summary.nodes, summary.elapsed),
            cancelled,
            "search complete"
        );
        listener.on_event(SearchEvent::SearchComplete(summary));
        Ok(summary)
    }
}

/// Search one depth, widening to the full window after a failure.
fn search_with_aspiration<G, S, L>(
    node: &mut NodeSearch<'_, G, S>,
    game_state: &GameState,
    root_moves: &mut [EvaluatedMove],
    depth: u8,
    previous_score: i32,
    prior_pv: &[ChessMove],
    half_width: i32,
    listener: &mut L,
) -> MoveGenResult<Option<RootOutcome>>
where
    G: MoveGenerator + ?Sized,
    S: BoardScorer + ?Sized,
    L: SearchListener + ?Sized,
{
    let (mut alpha, mut beta) = if depth <= 1 {
        (-INFINITY_SCORE, INFINITY_SCORE)
    } else {
        (previous_score - half_width, previous_score + half_width)
    };

    loop {
        let Some(outcome) =
            node.search_root(game_state, root_moves, i32::from(depth), alpha, beta, prior_pv)?
        else {
            return Ok(None);
        };

        let full_window = alpha <= -INFINITY_SCORE && beta >= INFINITY_SCORE;
        if full_window {
            return Ok(Some(outcome));
        }

        let report = AspirationReport {
            depth,
            alpha,
            beta,
            score: outcome.score,
        };
        if outcome.score <= alpha {
            trace!(depth, alpha, beta, "aspiration failed low");
            listener.on_event(SearchEvent::FailedLow(report));
        } else if outcome.score >= beta {
            trace!(depth, alpha, beta, "aspiration failed high");
            listener.on_event(SearchEvent::FailedHigh(report));
        } else {
            return Ok(Some(outcome));
        }

        alpha = -INFINITY_SCORE;
        beta = INFINITY_SCORE;
    }
}

/// Throughput for a finished search.
#[inline]
pub fn nodes_per_second(nodes: u64, elapsed: Duration) -> u64 {
    let millis = elapsed.as_millis() as u64;
    if millis == 0 {
        0
    } else {
        nodes.saturating_mul(1000) / millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::move_generator::LegalMoveGenerator;
    use crate::search::board_scoring::{mate_distance, PositionalScorer, DRAW_SCORE, MATE_SCORE};
    use crate::utils::long_algebraic::apply_long_algebraic;
    use std::sync::atomic::Ordering;

    fn searcher() -> (Arc<ChessContext>, Searcher<LegalMoveGenerator, PositionalScorer>) {
        let context = ChessContext::shared();
        let searcher = Searcher::new(
            Arc::clone(&context),
            LegalMoveGenerator::new(Arc::clone(&context)),
            PositionalScorer,
        );
        (context, searcher)
    }

    fn collect(
        searcher: &mut Searcher<LegalMoveGenerator, PositionalScorer>,
        game: &GameState,
        parameters: SearchParameters,
        stop: &AtomicBool,
    ) -> (SearchSummary, Vec<SearchEvent>) {
        let mut events = Vec::new();
        let summary = searcher
            .search(game, parameters, stop, &mut |event: SearchEvent| events.push(event))
            .expect("search should succeed");
        (summary, events)
    }

    #[test]
    fn finds_mate_in_one() {
        let (ctx, mut searcher) = searcher();
        let game = GameState::from_fen(&ctx, "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1")
            .expect("FEN should parse");
        let summary = searcher.search_depth(&game, 3).expect("search should succeed");
        assert_eq!(
            summary.best_move.map(|mv| mv.to_long_algebraic()).as_deref(),
            Some("a1a8")
        );
        assert_eq!(summary.score, MATE_SCORE - 1);
        assert!(!summary.cancelled);
    }

    #[test]
    fn shorter_mate_scores_higher_than_longer_mate() {
        let (ctx, mut searcher) = searcher();
        let mate_in_one = GameState::from_fen(&ctx, "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1")
            .expect("FEN should parse");
        let mate_in_two = GameState::from_fen(&ctx, "7k/8/8/8/8/8/R7/1R4K1 w - - 0 1")
            .expect("FEN should parse");

        let short = searcher.search_depth(&mate_in_one, 4).expect("search").score;
        searcher.clear_cache();
        let long = searcher.search_depth(&mate_in_two, 4).expect("search").score;

        assert_eq!(mate_distance(short), Some(1));
        assert_eq!(mate_distance(long), Some(3));
        assert!(short > long);
        assert!(long > 39 * 900);
    }

    #[test]
    fn repetition_draw_outweighs_material_deficit() {
        let (ctx, mut searcher) = searcher();
        let mut game = GameState::from_fen(&ctx, "6k1/8/8/8/8/8/q7/6K1 w - - 0 1")
            .expect("FEN should parse");
        for text in ["g1h1", "a2b1", "h1h2", "b1a2", "h2h1", "a2b1", "h1h2", "b1a2"] {
            game = apply_long_algebraic(&ctx, &game, text).expect("move should be legal");
        }
        let repeat = apply_long_algebraic(&ctx, &game, "h2h1").expect("legal");
        assert!(repeat.is_threefold_repetition());

        let summary = searcher.search_depth(&game, 1).expect("search");
        assert_eq!(
            summary.best_move.map(|mv| mv.to_long_algebraic()).as_deref(),
            Some("h2h1")
        );
        assert_eq!(summary.score, DRAW_SCORE);
    }

    #[test]
    fn no_legal_move_completes_immediately_without_move() {
        let (ctx, mut searcher) = searcher();
        let stalemate = GameState::from_fen(&ctx, "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1")
            .expect("FEN should parse");
        let stop = AtomicBool::new(false);
        let (summary, events) = collect(&mut searcher, &stalemate, SearchParameters::Depth(4), &stop);
        assert_eq!(summary.best_move, None);
        assert_eq!(events, vec![SearchEvent::SearchComplete(summary)]);
    }

    #[test]
    fn reports_iterations_then_exactly_one_completion() {
        let (ctx, mut searcher) = searcher();
        let game = GameState::new_game(&ctx);
        let stop = AtomicBool::new(false);
        let (summary, events) = collect(&mut searcher, &game, SearchParameters::Depth(3), &stop);

        let completions = events.iter().filter(|e| e.is_completion()).count();
        assert_eq!(completions, 1);
        assert!(events.last().is_some_and(SearchEvent::is_completion));

        let depths: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::IterationCompleted(report) => Some(report.depth),
                _ => None,
            })
            .collect();
        assert_eq!(depths, [1, 2, 3]);
        assert_eq!(summary.depth, 3);
        assert!(summary.nodes > 0);

        let last_pv_head = events.iter().rev().find_map(|e| match e {
            SearchEvent::IterationCompleted(report) => report.best_move(),
            _ => None,
        });
        assert_eq!(summary.best_move, last_pv_head);
    }

    #[test]
    fn narrow_window_failure_is_researched_at_the_same_depth() {
        let ctx = ChessContext::shared();
        let config = SearchConfig {
            aspiration_window: 1,
            ..SearchConfig::default()
        };
        let mut searcher = Searcher::with_config(
            Arc::clone(&ctx),
            LegalMoveGenerator::new(Arc::clone(&ctx)),
            PositionalScorer,
            config,
        );
        let game = GameState::from_fen(
            &ctx,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let stop = AtomicBool::new(false);
        let (summary, events) = collect(&mut searcher, &game, SearchParameters::Depth(4), &stop);

        let mut failures = 0;
        for (index, event) in events.iter().enumerate() {
            let report = match event {
                SearchEvent::FailedLow(report) => {
                    assert!(report.score <= report.alpha);
                    report
                }
                SearchEvent::FailedHigh(report) => {
                    assert!(report.score >= report.beta);
                    report
                }
                _ => continue,
            };
            failures += 1;
            assert_eq!(report.beta - report.alpha, 2);
            match events.get(index + 1) {
                Some(SearchEvent::IterationCompleted(iteration)) => {
                    assert_eq!(iteration.depth, report.depth);
                }
                other => panic!("expected a completed re-search, got {other:?}"),
            }
        }
        assert!(failures > 0);

        let depths: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::IterationCompleted(report) => Some(report.depth),
                _ => None,
            })
            .collect();
        assert_eq!(depths, [1, 2, 3, 4]);
        assert_eq!(summary.depth, 4);
    }

    #[test]
    fn stop_before_start_still_reports_completion_with_a_move() {
        let (ctx, mut searcher) = searcher();
        let game = GameState::new_game(&ctx);
        let stop = AtomicBool::new(true);
        let (summary, events) = collect(&mut searcher, &game, SearchParameters::Infinite, &stop);
        assert!(summary.cancelled);
        assert_eq!(summary.depth, 0);
        assert!(summary.best_move.is_some());
        assert_eq!(events.len(), 1);
        assert!(events[0].is_completion());
    }

    #[test]
    fn cancellation_keeps_last_completed_iteration() {
        let (ctx, mut searcher) = searcher();
        let game = GameState::new_game(&ctx);
        let stop = AtomicBool::new(false);
        let mut last_completed: Option<ChessMove> = None;
        let mut listener = |event: SearchEvent| {
            if let SearchEvent::IterationCompleted(report) = event {
                last_completed = report.best_move();
                if report.depth == 2 {
                    stop.store(true, Ordering::Relaxed);
                }
            }
        };
        let summary = searcher
            .search(&game, SearchParameters::Infinite, &stop, &mut listener)
            .expect("search should succeed");
        assert!(summary.cancelled);
        assert_eq!(summary.depth, 2);
        assert_eq!(summary.best_move, last_completed);
    }

    #[test]
    fn tiny_clock_still_returns_a_move() {
        let (ctx, mut searcher) = searcher();
        let game = GameState::new_game(&ctx);
        let stop = AtomicBool::new(false);
        let (summary, events) = collect(
            &mut searcher,
            &game,
            SearchParameters::Time {
                available_ms: 5,
                increment_ms: 0,
            },
            &stop,
        );
        assert!(summary.best_move.is_some());
        assert_eq!(events.iter().filter(|e| e.is_completion()).count(), 1);
    }

    #[test]
    fn cache_is_reused_and_cleared() {
        let (ctx, mut searcher) = searcher();
        let game = GameState::new_game(&ctx);
        searcher.search_depth(&game, 2).expect("search");
        assert!(!searcher.cache().is_empty());
        searcher.clear_cache();
        assert!(searcher.cache().is_empty());
    }

    #[test]
    fn nodes_per_second_handles_zero_elapsed() {
        assert_eq!(nodes_per_second(500, Duration::ZERO), 0);
        assert_eq!(nodes_per_second(500, Duration::from_millis(250)), 2000);
    }
}
