//! Background search runner.
//!
//! `SearchEngine` moves a search onto a worker thread so the caller stays free
//! to `stop` it. Events reach the caller through a `SearchListener`. The
//! best-move cache lives inside the engine and survives between searches
//! until `clear_cache`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::engines::search_parameters::{SearchParameters, SearchStatus};
use crate::errors::{EngineError, EngineResult};
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::{LegalMoveGenerator, MoveGenerator};
use crate::search::best_move_cache::CacheStats;
use crate::search::board_scoring::{BoardScorer, PositionalScorer};
use crate::search::iterative_deepening::Searcher;
use crate::search::search_report::{SearchEvent, SearchListener, SearchSummary};
use crate::tables::chess_context::ChessContext;

pub struct SearchEngine<G = LegalMoveGenerator, S = PositionalScorer>
where
    G: MoveGenerator + 'static,
    S: BoardScorer + 'static,
{
    searcher: Arc<Mutex<Searcher<G, S>>>,
    status: Arc<Mutex<SearchStatus>>,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<EngineResult<()>>>,
}

impl SearchEngine {
    /// Engine with the table-driven generator and the positional scorer.
    pub fn new(context: Arc<ChessContext>) -> Self {
        let generator = LegalMoveGenerator::new(Arc::clone(&context));
        Self::with_searcher(Searcher::new(context, generator, PositionalScorer))
    }
}

impl<G, S> SearchEngine<G, S>
where
    G: MoveGenerator + 'static,
    S: BoardScorer + 'static,
{
    pub fn with_searcher(searcher: Searcher<G, S>) -> Self {
        Self {
            searcher: Arc::new(Mutex::new(searcher)),
            status: Arc::new(Mutex::new(SearchStatus::Idle)),
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    pub fn status(&self) -> SearchStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn is_searching(&self) -> bool {
        self.status() == SearchStatus::Searching
    }

    /// Begin searching `game_state` on a worker thread.
    ///
    /// Fails with `AlreadySearching` while a previous search is running.
    pub fn start<L>(
        &mut self,
        game_state: GameState,
        parameters: SearchParameters,
        mut listener: L,
    ) -> EngineResult<()>
    where
        L: SearchListener + Send + 'static,
    {
        if self.is_searching() {
            return Err(EngineError::AlreadySearching);
        }
        // A finished worker's outcome was already reported through its events.
        if let Err(err) = self.reap_worker() {
            warn!(%err, "previous search worker failed");
        }

        self.stop_flag = Arc::new(AtomicBool::new(false));
        self.set_status(SearchStatus::Searching);
        info!(?parameters, "starting background search");

        let searcher = Arc::clone(&self.searcher);
        let status = Arc::clone(&self.status);
        let stop_flag = Arc::clone(&self.stop_flag);

        let worker = thread::spawn(move || -> EngineResult<()> {
            let finish = |summary: &SearchSummary| {
                let final_status = if summary.cancelled {
                    SearchStatus::Cancelled
                } else {
                    SearchStatus::Completed
                };
                *status.lock().unwrap_or_else(PoisonError::into_inner) = final_status;
            };

            // The final status is written before the caller sees the completion.
            let outcome = {
                let mut searcher = searcher.lock().unwrap_or_else(PoisonError::into_inner);
                let mut forward = |event: SearchEvent| {
                    if let SearchEvent::SearchComplete(summary) = &event {
                        finish(summary);
                    }
                    listener.on_event(event);
                };
                searcher.search(&game_state, parameters, &stop_flag, &mut forward)
            };

            match outcome {
                Ok(_) => Ok(()),
                Err(err) => {
                    warn!(%err, "search aborted by move generation failure");
                    let summary = SearchSummary {
                        best_move: None,
                        score: 0,
                        depth: 0,
                        nodes: 0,
                        elapsed: Default::default(),
                        cancelled: true,
                        cache_stats: CacheStats::default(),
                    };
                    finish(&summary);
                    listener.on_event(SearchEvent::SearchComplete(summary));
                    Err(EngineError::from(err))
                }
            }
        });

        self.worker = Some(worker);
        Ok(())
    }

    /// Request cancellation and wait for the worker. The completion event has
    /// been delivered when this returns. A no-op when idle.
    pub fn stop(&mut self) -> EngineResult<()> {
        self.stop_flag.store(true, Ordering::Relaxed);
        self.reap_worker()
    }

    /// Block until the running search finishes on its own.
    pub fn wait(&mut self) -> EngineResult<()> {
        self.reap_worker()
    }

    /// Empty the best-move cache. Refused while a search is running.
    pub fn clear_cache(&mut self) -> EngineResult<()> {
        if self.is_searching() {
            return Err(EngineError::SearchInProgress);
        }
        self.reap_worker()?;
        self.searcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear_cache();
        Ok(())
    }

    /// Number of cached positions, or `None` while a search holds the cache.
    pub fn cached_positions(&self) -> Option<usize> {
        self.searcher.try_lock().ok().map(|searcher| searcher.cache().len())
    }

    fn set_status(&self, status: SearchStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    fn reap_worker(&mut self) -> EngineResult<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        match worker.join() {
            Ok(result) => result,
            Err(_) => {
                warn!("search worker panicked");
                self.set_status(SearchStatus::Cancelled);
                Err(EngineError::WorkerPanicked)
            }
        }
    }
}

impl<G, S> Drop for SearchEngine<G, S>
where
    G: MoveGenerator + 'static,
    S: BoardScorer + 'static,
{
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(%err, "search worker failed during shutdown");
        }
    }
}
