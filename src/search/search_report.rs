//! Events streamed from a running search to its caller.
//!
//! A search emits zero or more iteration and aspiration events followed by
//! exactly one `SearchComplete`, including when it is cancelled.

use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::trace;

use crate::moves::chess_move::{format_line, ChessMove};
use crate::search::best_move_cache::CacheStats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationReport {
    pub depth: u8,
    pub principal_variation: Vec<ChessMove>,
    /// Side-to-move relative, in centipawns or a mate band value.
    pub score: i32,
    pub elapsed: Duration,
    pub nodes: u64,
    /// Root best move differs from the previous iteration's.
    pub best_move_changed: bool,
}

impl IterationReport {
    #[inline]
    pub fn best_move(&self) -> Option<ChessMove> {
        self.principal_variation.first().copied()
    }

    pub fn pv_text(&self) -> String {
        format_line(&self.principal_variation)
    }
}

/// A root search landed outside its aspiration window and will be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspirationReport {
    pub depth: u8,
    pub alpha: i32,
    pub beta: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    /// `None` only when the root position has no legal move.
    pub best_move: Option<ChessMove>,
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub cancelled: bool,
    pub cache_stats: CacheStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    IterationCompleted(IterationReport),
    FailedHigh(AspirationReport),
    FailedLow(AspirationReport),
    SearchComplete(SearchSummary),
}

impl SearchEvent {
    #[inline]
    pub fn is_completion(&self) -> bool {
        matches!(self, SearchEvent::SearchComplete(_))
    }
}

/// Receiver of search events.
pub trait SearchListener {
    fn on_event(&mut self, event: SearchEvent);
}

impl<F> SearchListener for F
where
    F: FnMut(SearchEvent),
{
    fn on_event(&mut self, event: SearchEvent) {
        self(event)
    }
}

impl SearchListener for Sender<SearchEvent> {
    fn on_event(&mut self, event: SearchEvent) {
        if self.send(event).is_err() {
            trace!("search event dropped: receiver closed");
        }
    }
}

/// Listener that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullListener;

impl SearchListener for NullListener {
    fn on_event(&mut self, _event: SearchEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn summary() -> SearchSummary {
        SearchSummary {
            best_move: Some(ChessMove::new(12, 28, 0)),
            score: 25,
            depth: 3,
            nodes: 1000,
            elapsed: Duration::from_millis(5),
            cancelled: false,
            cache_stats: CacheStats::default(),
        }
    }

    #[test]
    fn closure_listener_collects_events() {
        let mut seen = Vec::new();
        {
            let mut listener = |event: SearchEvent| seen.push(event);
            listener.on_event(SearchEvent::SearchComplete(summary()));
        }
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_completion());
    }

    #[test]
    fn channel_listener_forwards_and_tolerates_closed_receiver() {
        let (mut tx, rx) = mpsc::channel();
        tx.on_event(SearchEvent::SearchComplete(summary()));
        assert_eq!(
            rx.recv().expect("event should arrive"),
            SearchEvent::SearchComplete(summary())
        );
        drop(rx);
        tx.on_event(SearchEvent::SearchComplete(summary()));
    }

    #[test]
    fn iteration_report_exposes_pv_head() {
        let report = IterationReport {
            depth: 2,
            principal_variation: vec![ChessMove::new(12, 28, 0), ChessMove::new(52, 36, 0)],
            score: 10,
            elapsed: Duration::ZERO,
            nodes: 42,
            best_move_changed: false,
        };
        assert_eq!(report.best_move(), Some(ChessMove::new(12, 28, 0)));
        assert_eq!(report.pv_text(), "e2e4 e7e5");
    }
}
