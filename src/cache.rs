//! Optional fitness memoization keyed by chromosome signature.
//!
//! Signatures are content-addressed, so entries are never invalidated:
//! two structurally identical chromosomes always map to the same fitness.

use std::collections::HashMap;

/// Memo table from structural signature to fitness.
#[derive(Debug, Default)]
pub struct EvalCache {
    map: HashMap<u64, f64>,
    hits: u64,
}

impl EvalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached fitness for a signature, counting a hit when present.
    pub fn lookup(&mut self, signature: u64) -> Option<f64> {
        let found = self.map.get(&signature).copied();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    /// Records a fitness value. Idempotent: identical signatures carry
    /// equal values, so last-write-wins is safe.
    pub fn store(&mut self, signature: u64, fitness: f64) {
        self.map.insert(signature, fitness);
    }

    /// Number of distinct signatures stored.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of successful lookups so far.
    pub fn hits(&self) -> u64 {
        self.hits
    }
}
