//! Error types for the email prediction engine.
//!
//! Only three variants ever reach a caller. Everything else the engine can
//! fail at internally — an unrenderable template, a flaky verification
//! endpoint, a Unicode library hiccup — is absorbed upstream and shows up
//! as a missing row or a missing optional field, never as an `Err`.
use thiserror::Error as ThisError;

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the engine.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Bad or unreadable input at engine construction time: a missing
    /// metadata/model file, malformed MessagePack, or an unparsable
    /// template-token string. Always fatal — raised once, never at query
    /// time.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// Bad input at the call site: a feature-matrix size mismatch, or an
    /// unknown name-component group.
    #[error("argument error: {0}")]
    ArgumentError(String),

    /// `predict` was called with no explicit domain and no domain resolver
    /// configured (or the resolver could not find a match).
    #[error("no domain available for firm {0:?}")]
    MissingDomain(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::ConfigurationError(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Error::ConfigurationError(format!("MessagePack decode failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_displays_message() {
        let err = Error::ConfigurationError("missing file".to_string());
        assert_eq!(err.to_string(), "configuration error: missing file");
    }

    #[test]
    fn missing_domain_displays_firm_name() {
        let err = Error::MissingDomain("Acme Corp".to_string());
        assert!(err.to_string().contains("Acme Corp"));
    }

    #[test]
    fn io_error_converts_to_configuration_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }
}
