//! Template-token parser.
//!
//! Token strings found inside a candidate template's `token_seq` come in
//! three shapes: a bare single-character separator, an "initial" shorthand
//! (`f_0`, `m_1`, `l_0`), or a full component descriptor
//! (`first_nfkd_0`, `last_surp_original_2`, …). See [`parse_token`].
use crate::errors::{Error, Result};
use crate::text::NameGroup;

/// A single element of a candidate template's rendering recipe.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateToken {
    /// A literal string inserted verbatim between rendered name components.
    Separator(String),
    /// A reference into one of the decomposed name's component vectors.
    Name(NameToken),
}

/// The non-separator token shape: "take name component `group[index]`,
/// rendered according to these flags".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NameToken {
    pub group: Option<NameGroup>,
    pub index: usize,
    pub use_original: bool,
    pub use_nfkd: bool,
    pub use_translit: bool,
    pub use_nickname: bool,
    pub use_surname_particle: bool,
    pub use_initial: bool,
}

const SEPARATORS: &[&str] = &[".", "_", "-"];

fn group_from_initial_prefix(prefix: &str) -> Option<NameGroup> {
    match prefix {
        "f" => Some(NameGroup::First),
        "m" => Some(NameGroup::Middle),
        "l" => Some(NameGroup::Last),
        _ => None,
    }
}

fn group_from_full_prefix(prefix: &str) -> Option<NameGroup> {
    match prefix {
        "first" => Some(NameGroup::First),
        "middle" => Some(NameGroup::Middle),
        "last" => Some(NameGroup::Last),
        _ => None,
    }
}

fn apply_flag(token: &mut NameToken, flag: &str) -> Result<()> {
    match flag {
        "original" => token.use_original = true,
        "nfkd" => token.use_nfkd = true,
        "translit" => token.use_translit = true,
        "nickname" => token.use_nickname = true,
        "surp" => token.use_surname_particle = true,
        other => return Err(Error::ConfigurationError(format!("unknown template-token flag: {other}"))),
    }
    Ok(())
}

/// Parses one token string per the shapes documented on this module.
pub fn parse_token(raw: &str) -> Result<TemplateToken> {
    if SEPARATORS.contains(&raw) {
        return Ok(TemplateToken::Separator(raw.to_string()));
    }

    let parts: Vec<&str> = raw.split('_').collect();

    if parts.len() == 2 {
        if let Some(group) = group_from_initial_prefix(parts[0]) {
            let index = parts[1]
                .parse::<usize>()
                .map_err(|_| Error::ConfigurationError(format!("non-numeric index in token {raw:?}")))?;
            return Ok(TemplateToken::Name(NameToken {
                group: Some(group),
                index,
                use_initial: true,
                ..Default::default()
            }));
        }
    }

    if parts.len() >= 2 {
        if let Some(group) = group_from_full_prefix(parts[0]) {
            let (flag_segments, index_segment) = parts[1..].split_at(parts.len() - 2);
            let index = index_segment[0]
                .parse::<usize>()
                .map_err(|_| Error::ConfigurationError(format!("non-numeric index in token {raw:?}")))?;

            let mut token = NameToken { group: Some(group), index, ..Default::default() };
            for flag in flag_segments {
                apply_flag(&mut token, flag)?;
            }
            return Ok(TemplateToken::Name(token));
        }
    }

    Err(Error::ConfigurationError(format!("unparsable template token: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_separators() {
        assert_eq!(parse_token(".").unwrap(), TemplateToken::Separator(".".into()));
        assert_eq!(parse_token("_").unwrap(), TemplateToken::Separator("_".into()));
        assert_eq!(parse_token("-").unwrap(), TemplateToken::Separator("-".into()));
    }

    #[test]
    fn parses_initial_shorthand() {
        let tok = parse_token("f_0").unwrap();
        match tok {
            TemplateToken::Name(n) => {
                assert_eq!(n.group, Some(NameGroup::First));
                assert_eq!(n.index, 0);
                assert!(n.use_initial);
            }
            _ => panic!("expected a name token"),
        }
    }

    #[test]
    fn parses_full_component_with_flags() {
        let tok = parse_token("last_surp_original_2").unwrap();
        match tok {
            TemplateToken::Name(n) => {
                assert_eq!(n.group, Some(NameGroup::Last));
                assert_eq!(n.index, 2);
                assert!(n.use_surname_particle);
                assert!(n.use_original);
                assert!(!n.use_initial);
            }
            _ => panic!("expected a name token"),
        }
    }

    #[test]
    fn parses_full_component_without_flags() {
        let tok = parse_token("middle_0").unwrap();
        match tok {
            TemplateToken::Name(n) => {
                assert_eq!(n.group, Some(NameGroup::Middle));
                assert_eq!(n.index, 0);
            }
            _ => panic!("expected a name token"),
        }
    }

    #[test]
    fn unknown_flag_is_a_fatal_parse_error() {
        assert!(parse_token("first_bogus_0").is_err());
    }

    #[test]
    fn non_numeric_index_is_a_fatal_parse_error() {
        assert!(parse_token("first_nfkd_abc").is_err());
    }

    #[test]
    fn unknown_group_is_a_fatal_parse_error() {
        assert!(parse_token("middlex_0").is_err());
    }
}
