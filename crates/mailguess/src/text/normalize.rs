//! Pure string-normalisation functions shared by the decomposer and the
//! feature extractor.
use unicode_normalization::UnicodeNormalization;

/// ASCII-only lowercasing; multi-byte sequences pass through untouched.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_uppercase() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Greedy left-to-right replacement of the fixed Germanic digraph table.
/// Bytes that don't match any pattern are copied through unchanged.
pub fn replace_german_chars(s: &str) -> String {
    const TABLE: &[(char, &str)] = &[
        ('ü', "ue"),
        ('ö', "oe"),
        ('ä', "ae"),
        ('ß', "ss"),
        ('ø', "o"),
        ('å', "aa"),
    ];

    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match TABLE.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Unicode NFKD decomposition followed by stripping every non-ASCII byte.
/// Falls back to returning `s` unchanged if normalisation somehow yields
/// nothing usable — this crate's Unicode backend cannot actually fail, but
/// the contract is kept so callers never have to special-case an error.
pub fn nfkd_normalize(s: &str) -> String {
    let decomposed: String = s.nfkd().collect();
    let ascii_only: String = decomposed.chars().filter(|c| c.is_ascii()).collect();
    if ascii_only.is_empty() && !s.is_empty() {
        s.to_string()
    } else {
        ascii_only
    }
}

/// Delimiter-based tokeniser: collapses runs of `delim` and drops
/// leading/trailing empty tokens.
pub fn split(s: &str, delim: char) -> Vec<String> {
    s.split(delim)
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect()
}
