//! Shared read-only context threaded through move generation and search.

use std::sync::Arc;

use crate::search::zobrist::ZobristKeys;
use crate::tables::attack_tables::AttackTables;

/// Attack tables and Zobrist keys, built once at startup.
///
/// Immutable after construction, so a single instance can be shared by
/// reference or behind an `Arc` with any number of searches.
#[derive(Debug, Clone, Default)]
pub struct ChessContext {
    pub attacks: AttackTables,
    pub zobrist: ZobristKeys,
}

impl ChessContext {
    pub fn new() -> Self {
        Self {
            attacks: AttackTables::new(),
            zobrist: ZobristKeys::new(),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}
