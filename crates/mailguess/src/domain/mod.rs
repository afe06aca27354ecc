//! Domain resolver: firm name → `(domain, matched_firm, score)` via exact
//! lookup, cache lookup, or fuzzy string similarity over the firm
//! directory.
pub mod cache;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::errors::{Error, Result};
use crate::text::normalize::to_lower;
use cache::{CachedMatch, FuzzyMatchCache};

/// Result of resolving a raw firm name to an email domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainMatch {
    pub domain: String,
    pub matched_firm: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
struct RawCanonicalFirm {
    domain: String,
}

#[derive(Debug, Deserialize)]
struct RawCachedMatch {
    domain: String,
    canonical_firm: String,
    match_score: f64,
}

fn load_msgpack<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    rmp_serde::from_read(reader).map_err(Error::from)
}

/// Canonical firm-name → email-domain directory. Keys are the lowercased
/// raw firm name with spaces and punctuation preserved (§3).
///
/// Exact lookups use the hash map; fuzzy scans iterate `ordered_keys`,
/// which is sorted ascending so the scan — and therefore which key wins a
/// similarity tie — is reproducible across runs. The source this was
/// distilled from breaks ties by raw hash-map iteration order, which is not
/// actually a contract on any platform; sorting the keys turns that
/// accidental behaviour into a real one without changing which *score*
/// wins (see DESIGN.md, Open Question c).
struct FirmDirectory {
    by_key: FxHashMap<String, String>,
    ordered_keys: Vec<String>,
}

impl FirmDirectory {
    fn load(path: &Path) -> Result<Self> {
        let raw: FxHashMap<String, RawCanonicalFirm> = load_msgpack(path)?;
        let by_key: FxHashMap<String, String> = raw.into_iter().map(|(k, v)| (k, v.domain)).collect();
        let mut ordered_keys: Vec<String> = by_key.keys().cloned().collect();
        ordered_keys.sort();
        Ok(Self { by_key, ordered_keys })
    }

    fn empty() -> Self {
        Self { by_key: FxHashMap::default(), ordered_keys: Vec::new() }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }
}

/// Resolves a raw firm name to an email domain, consulting the canonical
/// directory, the fuzzy-match cache, and finally a fuzzy similarity scan in
/// that order (§4.5).
pub struct DomainResolver {
    directory: FirmDirectory,
    cache: FuzzyMatchCache,
}

impl DomainResolver {
    /// Builds a resolver from the optional canonical-firms and
    /// pre-seeded-cache blobs. Either or both may be absent, in which case
    /// the resolver falls back further down its lookup chain (and, with
    /// both absent, never resolves anything — callers must then supply an
    /// explicit domain per query).
    pub fn load(canonical_firms_path: Option<&Path>, firm_match_cache_path: Option<&Path>) -> Result<Self> {
        let directory = match canonical_firms_path {
            Some(path) => FirmDirectory::load(path)?,
            None => FirmDirectory::empty(),
        };

        let cache = FuzzyMatchCache::new();
        if let Some(path) = firm_match_cache_path {
            let raw: FxHashMap<String, RawCachedMatch> = load_msgpack(path)?;
            for (key, entry) in raw {
                cache.insert(
                    key,
                    CachedMatch { domain: entry.domain, matched_firm: entry.canonical_firm, score: entry.match_score },
                );
            }
        }

        Ok(Self { directory, cache })
    }

    /// `resolve(raw_firm)` per §4.5: normalise, exact lookup, cache lookup,
    /// fuzzy scan with cache write-through.
    pub fn resolve(&self, raw_firm: &str) -> Option<DomainMatch> {
        let key = to_lower(raw_firm);

        if let Some(domain) = self.directory.get(&key) {
            return Some(DomainMatch { domain: domain.to_string(), matched_firm: key, score: 100.0 });
        }

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(firm = %key, "domain resolver cache hit");
            return Some(DomainMatch { domain: cached.domain, matched_firm: cached.matched_firm, score: cached.score });
        }

        if self.directory.ordered_keys.is_empty() {
            return None;
        }

        tracing::debug!(firm = %key, "domain resolver falling through to fuzzy match");
        let mut best_key: &str = &self.directory.ordered_keys[0];
        let mut best_score = 0.0_f64;
        for candidate in &self.directory.ordered_keys {
            let score = strsim::normalized_levenshtein(&key, candidate) * 100.0;
            if score >= best_score {
                best_score = score;
                best_key = candidate;
            }
        }

        let domain = self.directory.get(best_key).unwrap_or_default().to_string();
        let matched = DomainMatch { domain, matched_firm: best_key.to_string(), score: best_score };
        self.cache.insert(
            key,
            CachedMatch { domain: matched.domain.clone(), matched_firm: matched.matched_firm.clone(), score: matched.score },
        );
        Some(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_with(entries: &[(&str, &str)]) -> DomainResolver {
        let directory = FirmDirectory {
            by_key: entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ordered_keys: {
                let mut keys: Vec<String> = entries.iter().map(|(k, _)| k.to_string()).collect();
                keys.sort();
                keys
            },
        };
        DomainResolver { directory, cache: FuzzyMatchCache::new() }
    }

    #[test]
    fn exact_key_resolves_with_score_100() {
        let resolver = resolver_with(&[("blackstone", "blackstone.com")]);
        let m = resolver.resolve("Blackstone").unwrap();
        assert_eq!(m.domain, "blackstone.com");
        assert_eq!(m.score, 100.0);
    }

    #[test]
    fn fuzzy_match_falls_back_and_populates_cache() {
        let resolver = resolver_with(&[("blackstone", "blackstone.com"), ("blackrock", "blackrock.com")]);
        let m = resolver.resolve("blackstoen").unwrap();
        assert_eq!(m.domain, "blackstone.com");
        assert!(m.score < 100.0);

        let cached = resolver.cache.get("blackstoen").unwrap();
        assert_eq!(cached.domain, "blackstone.com");
    }

    #[test]
    fn resolver_is_idempotent_on_repeated_calls() {
        let resolver = resolver_with(&[("blackstone", "blackstone.com"), ("blackrock", "blackrock.com")]);
        let first = resolver.resolve("blackstoen").unwrap();
        let second = resolver.resolve("blackstoen").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_firm_with_empty_directory_returns_none() {
        let resolver = resolver_with(&[]);
        assert!(resolver.resolve("anyone").is_none());
    }
}
