//! Normalisation, decomposition, and the investor feature flags — the
//! string-handling layer everything else in this crate builds on.
pub mod decompose;
pub mod features;
pub mod nickname_table;
pub mod normalize;

pub use decompose::{decompose, DecomposedName};
pub use features::{extract_flags, Flags};

/// Which component of a decomposed name a template token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameGroup {
    First,
    Middle,
    Last,
}
