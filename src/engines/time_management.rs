//! Clock-based budgeting for time-limited searches.
//!
//! The hard limit is a fifth of the remaining clock and cancels the search
//! when it passes. Between iterations a soft budget decides whether another
//! depth is worth starting.

use std::time::Duration;

const SOFT_BUDGET_DIVISOR: u32 = 40;
const SCORE_DROP_MARGIN: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeManager {
    available: Duration,
    increment: Duration,
}

impl TimeManager {
    pub fn new(available_ms: u64, increment_ms: u64) -> Self {
        Self {
            available: Duration::from_millis(available_ms),
            increment: Duration::from_millis(increment_ms),
        }
    }

    /// `max(available / 5, 1ms)`.
    #[inline]
    pub fn hard_limit(&self) -> Duration {
        (self.available / 5).max(Duration::from_millis(1))
    }

    /// Target spend for this move given the latest iteration.
    ///
    /// Doubled when the root best move just changed and raised by half when the
    /// score is negative or fell noticeably since the previous iteration.
    pub fn soft_budget(
        &self,
        best_move_changed: bool,
        score: i32,
        previous_score: Option<i32>,
    ) -> Duration {
        let mut budget = self.available / SOFT_BUDGET_DIVISOR + self.increment;
        if best_move_changed {
            budget *= 2;
        }
        let dropping = previous_score.is_some_and(|prev| prev - score > SCORE_DROP_MARGIN);
        if score < 0 || dropping {
            budget = budget * 3 / 2;
        }
        budget.min(self.hard_limit())
    }

    /// Start another iteration only while under half the soft budget.
    pub fn should_continue(
        &self,
        elapsed: Duration,
        best_move_changed: bool,
        score: i32,
        previous_score: Option<i32>,
    ) -> bool {
        elapsed < self.soft_budget(best_move_changed, score, previous_score) / 2
    }
}
