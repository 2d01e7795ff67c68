//! Search limits and lifecycle states shared by the engine front ends.

/// Which budget bounds a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchParameters {
    /// Complete every iteration up to this depth.
    Depth(u8),
    /// Clock-driven search. Times are in milliseconds.
    Time { available_ms: u64, increment_ms: u64 },
    /// Run until stopped or a forced mate is found.
    Infinite,
}

impl Default for SearchParameters {
    fn default() -> Self {
        SearchParameters::Depth(4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Completed,
    Cancelled,
}

impl SearchStatus {
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, SearchStatus::Completed | SearchStatus::Cancelled)
    }
}
