//! Renders a template's token sequence against a decomposed name into an
//! email local-part.
use crate::templates::token::{NameToken, TemplateToken};
use crate::text::DecomposedName;

/// Concatenates the rendering of every token in `token_seq`. Returns `None`
/// ("not applicable") the moment a name token indexes past the end of its
/// component vector — the caller drops that template and moves on.
pub fn render(name: &DecomposedName, token_seq: &[TemplateToken]) -> Option<String> {
    let mut out = String::new();
    for token in token_seq {
        match token {
            TemplateToken::Separator(sep) => out.push_str(sep),
            TemplateToken::Name(name_token) => out.push_str(&render_name_token(name, name_token)?),
        }
    }
    Some(out)
}

fn render_name_token(name: &DecomposedName, token: &NameToken) -> Option<String> {
    let group = token.group?;
    let values = name.names_of(group);
    let value = values.get(token.index)?;

    let rendered = if token.use_initial {
        value.chars().next().map(|c| c.to_ascii_lowercase().to_string())?
    } else {
        value.to_ascii_lowercase()
    };
    Some(rendered)
}
