//! Hash-keyed cache of the strongest move found per position.
//!
//! Entries are ordering hints only and never prune. A recorded entry is
//! replaced only by a result from a strictly deeper search of the same key.
//! There is no eviction: the cache grows until `clear` is called.
//!
//! Key equality is trusted. A colliding position can receive another
//! position's move as its hint; child ordering only promotes a hint that is
//! among the generated legal moves, so a collision costs ordering, not legality.

use std::collections::HashMap;

use crate::moves::chess_move::ChessMove;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub depth: u8,
    pub best_move: ChessMove,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone, Default)]
pub struct BestMoveCache {
    entries: HashMap<u64, CacheEntry>,
    stats: CacheStats,
}

impl BestMoveCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn probe(&mut self, key: u64) -> Option<CacheEntry> {
        self.stats.probes += 1;
        let hit = self.entries.get(&key).copied();
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Record `best_move` for `key` if absent or recorded at a shallower depth.
    /// Returns whether the entry was written.
    pub fn record(&mut self, key: u64, depth: u8, best_move: ChessMove) -> bool {
        if best_move.is_null() {
            return false;
        }
        match self.entries.get(&key) {
            Some(existing) if existing.depth >= depth => false,
            _ => {
                self.entries.insert(key, CacheEntry { depth, best_move });
                self.stats.stores += 1;
                true
            }
        }
    }
}
