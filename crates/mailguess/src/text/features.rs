//! The three boolean "investor features" derived straight from the raw
//! name, independent of decomposition.
use super::nickname_table::is_nickname;
use super::normalize::{nfkd_normalize, replace_german_chars, to_lower};

/// `has_german_char`, `has_nfkd_normalized`, and `has_nickname`, as defined
/// in the name-decomposition contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub has_german_char: bool,
    pub has_nfkd_normalized: bool,
    pub has_nickname: bool,
}

/// Derives [`Flags`] from the raw, not-yet-decomposed name.
///
/// `has_nfkd_normalized` is computed against the *German-substituted* lower
/// form rather than the bare lowercased input — a quirk carried over
/// deliberately (see DESIGN.md) since flipping it would reclassify any
/// purely-Germanic name as not needing NFKD.
pub fn extract_flags(raw: &str) -> Flags {
    let lowered = to_lower(raw);
    let germanised = replace_german_chars(&lowered);

    let has_german_char = germanised != lowered;
    let has_nfkd_normalized = nfkd_normalize(&germanised) != germanised;

    let has_nickname = lowered
        .split_whitespace()
        .next()
        .map(is_nickname)
        .unwrap_or(false);

    Flags { has_german_char, has_nfkd_normalized, has_nickname }
}
