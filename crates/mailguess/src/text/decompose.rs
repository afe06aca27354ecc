//! Name decomposition: splits a raw full name into first/middle/last token
//! vectors, honoring a fixed honorific/suffix stoplist and a surname-particle
//! heuristic.
use super::normalize::{nfkd_normalize, replace_german_chars, to_lower};

/// Honorifics and generational suffixes stripped from the leading/trailing
/// ends of the token list before first/middle/last partitioning.
const HONORIFIC_SUFFIX_SET: &[&str] = &[
    "jr", "sr", "ii", "iii", "iv", "v", "phd", "md", "esq", "dr", "mr", "mrs", "ms", "prof", "sir",
];

/// Surname particles. Multi-word entries (`"de la"`, `"de los"`) are matched
/// by pre-joining adjacent single-word particle tokens before this set is
/// consulted, so a literal multi-word match and a two-step single-word match
/// both work.
const SURNAME_PARTICLES: &[&str] = &[
    "santa", "san", "st", "von", "van", "de", "der", "dello", "vander", "del", "de la", "vom",
    "dela", "de los", "dos", "la", "los", "le", "du", "di", "da", "mac", "al", "abu", "bin", "ibn",
    "della",
];

/// A name split into its constituent components. Any component may be
/// empty; at least one is non-empty for any non-empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecomposedName {
    pub first_names: Vec<String>,
    pub middle_names: Vec<String>,
    pub last_names: Vec<String>,
}

impl DecomposedName {
    /// Token vector for a given group, used by the local-part resolver.
    pub fn names_of(&self, group: super::NameGroup) -> &[String] {
        match group {
            super::NameGroup::First => &self.first_names,
            super::NameGroup::Middle => &self.middle_names,
            super::NameGroup::Last => &self.last_names,
        }
    }

    pub fn has_multiple_firsts(&self) -> bool {
        self.first_names.len() > 1
    }

    pub fn has_middle(&self) -> bool {
        !self.middle_names.is_empty()
    }

    pub fn has_multiple_middles(&self) -> bool {
        self.middle_names.len() > 1
    }

    pub fn has_multiple_lasts(&self) -> bool {
        self.last_names.len() > 1
    }
}

/// Cleans `raw` per steps 1-5 of the decomposition contract: trim, lowercase,
/// German substitution, NFKD+ASCII strip, trailing-punctuation drop,
/// paste-noise removal, whitespace collapse.
fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    let lowered = to_lower(trimmed);
    let germanised = replace_german_chars(&lowered);
    let ascii = nfkd_normalize(&germanised);

    let no_trailing_punct = ascii.trim_end_matches(|c| ".,;:!?}]".contains(c));
    let no_paste_noise: String = no_trailing_punct.chars().filter(|c| !"\"'<>".contains(*c)).collect();

    no_paste_noise.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_honorific_or_suffix(token: &str) -> bool {
    HONORIFIC_SUFFIX_SET.contains(&token)
}

/// Splits a raw full name into first/middle/last components.
pub fn decompose(raw: &str) -> DecomposedName {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return DecomposedName::default();
    }

    let mut tokens: Vec<&str> = cleaned.split(' ').filter(|t| !t.is_empty()).collect();

    while tokens.first().is_some_and(|t| is_honorific_or_suffix(t)) {
        tokens.remove(0);
    }
    while tokens.last().is_some_and(|t| is_honorific_or_suffix(t)) {
        tokens.pop();
    }

    if tokens.is_empty() {
        return DecomposedName::default();
    }

    let first_names: Vec<String> = if tokens[0].contains('-') {
        tokens[0].split('-').filter(|p| !p.is_empty()).map(str::to_string).collect()
    } else {
        vec![tokens[0].to_string()]
    };
    let rest = &tokens[1..];

    if rest.is_empty() {
        return DecomposedName {
            first_names,
            middle_names: Vec::new(),
            last_names: Vec::new(),
        };
    }

    if let Some(particle_at) = find_particle_start(rest) {
        let middle_names = rest[..particle_at].iter().map(|t| t.to_string()).collect();
        let last_names = rest[particle_at..].iter().map(|t| t.to_string()).collect();
        return DecomposedName { first_names, middle_names, last_names };
    }

    let (middle, last) = rest.split_at(rest.len() - 1);
    DecomposedName {
        first_names,
        middle_names: middle.iter().map(|t| t.to_string()).collect(),
        last_names: vec![last[0].to_string()],
    }
}

/// Scans `rest` left-to-right for the first token that starts a surname
/// particle (checking the two-word form first so `"de la cruz"` matches
/// `"de la"` rather than the bare `"de"`), returning its index. `None` if no
/// particle is found.
fn find_particle_start(rest: &[&str]) -> Option<usize> {
    for i in 0..rest.len() {
        if i + 1 < rest.len() {
            let two_word = format!("{} {}", rest[i], rest[i + 1]);
            if SURNAME_PARTICLES.contains(&two_word.as_str()) {
                return Some(i);
            }
        }
        if SURNAME_PARTICLES.contains(&rest[i]) {
            return Some(i);
        }
    }
    None
}
