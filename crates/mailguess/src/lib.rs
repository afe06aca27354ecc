//! # mailguess
//!
//! Low-latency inference engine that predicts the most likely work-email
//! addresses for a person at a named organisation.
//!
//! Given a raw full name, a firm name, and optionally a known email
//! domain, [`PredictionEngine::predict`] decomposes the name, builds a
//! fixed-width feature matrix per candidate email template, scores every
//! candidate with a gradient-boosted model, and returns a ranked list of
//! [`EmailPredictionResult`] rows.
//!
//! ## Modules
//!
//! - [`text`] — string normalisation, name decomposition, investor flags
//! - [`templates`] — candidate-template metadata store and token parser
//! - [`domain`] — firm → email-domain resolution with a fuzzy-match cache
//! - [`feature_matrix`] — the fixed 27-column feature schema
//! - [`predict`] — the LightGBM- and CatBoost-equivalent scoring backends
//! - [`localpart`] — template token-sequence rendering
//! - [`hooks`] — optional verification/enrichment post-ranking hooks
//! - [`engine`] — orchestrates the above into `predict(...)`
//! - [`config`] — engine construction settings
//! - [`errors`] — unified error handling
//!
//! ## Quick start
//!
//! ```no_run
//! use mailguess::config::EngineConfig;
//! use mailguess::engine::PredictionEngine;
//!
//! # async fn run() -> mailguess::Result<()> {
//! let config = EngineConfig::new("standard.msgpack", "complex.msgpack", "firm_usage.msgpack")
//!     .with_canonical_firms("canonical_firms.msgpack")
//!     .with_lightgbm_model("model.txt");
//! let engine = PredictionEngine::new(config)?;
//!
//! let predictions = engine.predict("John Smith", "Acme Corp", Some(3), Some("acme.com")).await?;
//! for p in predictions {
//!     println!("{} ({:.3})", p.email, p.score);
//! }
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod feature_matrix;
pub mod hooks;
pub mod localpart;
pub mod predict;
pub mod templates;
pub mod text;

#[cfg(feature = "python")]
pub mod python;

pub use config::EngineConfig;
pub use engine::{EmailPredictionResult, PredictionEngine};
pub use errors::{Error, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_defined() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_defined() {
        assert_eq!(NAME, "mailguess");
    }
}
