//! The fuzzy-match memoisation cache.
//!
//! Read-mostly: every exact or already-cached lookup only reads; the only
//! write happens after a fuzzy scan produces a fresh result (§4.5, step 4).
//! Backed by `moka`'s synchronous cache so concurrent writers converge
//! without the resolver having to hand-roll locking.
use moka::sync::Cache;

/// A previously computed (or pre-seeded) fuzzy-match result.
#[derive(Debug, Clone)]
pub struct CachedMatch {
    pub domain: String,
    pub matched_firm: String,
    pub score: f64,
}

/// Thin wrapper around `moka::sync::Cache` giving the resolver a
/// domain-specific, strongly-typed read/write surface.
pub struct FuzzyMatchCache {
    inner: Cache<String, CachedMatch>,
}

impl FuzzyMatchCache {
    pub fn new() -> Self {
        Self { inner: Cache::new(100_000) }
    }

    pub fn get(&self, key: &str) -> Option<CachedMatch> {
        self.inner.get(key)
    }

    /// Write-through insert. Idempotent: inserting the same key with the
    /// same value twice has no observable effect; concurrent inserts of
    /// different values for the same key converge last-writer-wins, which
    /// `moka` guarantees internally.
    pub fn insert(&self, key: String, value: CachedMatch) {
        self.inner.insert(key, value);
    }
}

impl Default for FuzzyMatchCache {
    fn default() -> Self {
        Self::new()
    }
}
