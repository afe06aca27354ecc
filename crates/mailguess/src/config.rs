//! Engine configuration.
//!
//! Mirrors the builder-style construction the rest of this codebase favors:
//! required fields go through [`EngineConfig::new`], everything optional is
//! layered on with `with_*` methods, and [`EngineConfig::from_env`] wires it
//! up from a `.env` file (via `dotenvy`) for local development and tests.
use std::path::{Path, PathBuf};

/// Metadata and model file locations plus optional third-party settings
/// needed to construct a [`crate::engine::PredictionEngine`].
///
/// File paths are validated once, at engine construction — never at query
/// time.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Standard-class candidate-template blob (MessagePack).
    pub standard_templates_path: PathBuf,
    /// Complex-class candidate-template blob (MessagePack).
    pub complex_templates_path: PathBuf,
    /// Firm → template usage blob (MessagePack).
    pub firm_usage_path: PathBuf,
    /// Canonical firm → domain directory (MessagePack). Optional: without
    /// it the engine has no directory lookup and relies entirely on an
    /// explicit `domain` argument per call.
    pub canonical_firms_path: Option<PathBuf>,
    /// Pre-seeded fuzzy-match cache (MessagePack). Optional.
    pub firm_match_cache_path: Option<PathBuf>,

    /// LightGBM text model path, required iff the LightGBM backend is used.
    pub lightgbm_model_path: Option<PathBuf>,
    /// CatBoost `.cbm` model path, required iff the CatBoost backend is used.
    pub catboost_model_path: Option<PathBuf>,
    /// Path to the `libcatboostmodel` shared library. If unset and a
    /// CatBoost model path is configured, the engine falls back to
    /// [`crate::predict::catboost::default_library_candidates`].
    pub catboost_library_path: Option<PathBuf>,

    /// Base URL and API key for the optional verification hook.
    pub verification_base_url: Option<String>,
    pub verification_api_key: Option<String>,
    /// Base URL and API key for the optional enrichment hook.
    pub enrichment_base_url: Option<String>,
    pub enrichment_api_key: Option<String>,

    /// Default `top_k` when a caller doesn't specify one.
    pub default_top_k: usize,
}

impl EngineConfig {
    /// Starts a config with only the three required metadata blobs set.
    pub fn new(
        standard_templates_path: impl Into<PathBuf>,
        complex_templates_path: impl Into<PathBuf>,
        firm_usage_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            standard_templates_path: standard_templates_path.into(),
            complex_templates_path: complex_templates_path.into(),
            firm_usage_path: firm_usage_path.into(),
            canonical_firms_path: None,
            firm_match_cache_path: None,
            lightgbm_model_path: None,
            catboost_model_path: None,
            catboost_library_path: None,
            verification_base_url: None,
            verification_api_key: None,
            enrichment_base_url: None,
            enrichment_api_key: None,
            default_top_k: 3,
        }
    }

    pub fn with_canonical_firms(mut self, path: impl Into<PathBuf>) -> Self {
        self.canonical_firms_path = Some(path.into());
        self
    }

    pub fn with_firm_match_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.firm_match_cache_path = Some(path.into());
        self
    }

    pub fn with_lightgbm_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.lightgbm_model_path = Some(path.into());
        self
    }

    pub fn with_catboost_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.catboost_model_path = Some(path.into());
        self
    }

    pub fn with_catboost_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.catboost_library_path = Some(path.into());
        self
    }

    pub fn with_verification(mut self, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.verification_base_url = Some(base_url.into());
        self.verification_api_key = Some(api_key.into());
        self
    }

    pub fn with_enrichment(mut self, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.enrichment_base_url = Some(base_url.into());
        self.enrichment_api_key = Some(api_key.into());
        self
    }

    pub fn with_default_top_k(mut self, top_k: usize) -> Self {
        self.default_top_k = top_k;
        self
    }

    /// Builds a config from environment variables, loading a local `.env`
    /// first if one is present. Recognised variables:
    /// `MAILGUESS_STANDARD_TEMPLATES`, `MAILGUESS_COMPLEX_TEMPLATES`,
    /// `MAILGUESS_FIRM_USAGE` (required), `MAILGUESS_CANONICAL_FIRMS`,
    /// `MAILGUESS_FIRM_MATCH_CACHE`, `MAILGUESS_LIGHTGBM_MODEL`,
    /// `MAILGUESS_CATBOOST_MODEL`, `MAILGUESS_VERIFICATION_BASE_URL`,
    /// `MAILGUESS_VERIFICATION_API_KEY`, `MAILGUESS_ENRICHMENT_BASE_URL`,
    /// `MAILGUESS_ENRICHMENT_API_KEY`, `MAILGUESS_DEFAULT_TOP_K`.
    pub fn from_env() -> crate::errors::Result<Self> {
        let _ = dotenvy::dotenv();

        let required = |key: &str| -> crate::errors::Result<String> {
            std::env::var(key)
                .map_err(|_| crate::errors::Error::ConfigurationError(format!("missing env var {key}")))
        };

        let mut cfg = Self::new(
            required("MAILGUESS_STANDARD_TEMPLATES")?,
            required("MAILGUESS_COMPLEX_TEMPLATES")?,
            required("MAILGUESS_FIRM_USAGE")?,
        );

        if let Ok(v) = std::env::var("MAILGUESS_CANONICAL_FIRMS") {
            cfg = cfg.with_canonical_firms(v);
        }
        if let Ok(v) = std::env::var("MAILGUESS_FIRM_MATCH_CACHE") {
            cfg = cfg.with_firm_match_cache(v);
        }
        if let Ok(v) = std::env::var("MAILGUESS_LIGHTGBM_MODEL") {
            cfg = cfg.with_lightgbm_model(v);
        }
        if let Ok(v) = std::env::var("MAILGUESS_CATBOOST_MODEL") {
            cfg = cfg.with_catboost_model(v);
        }
        if let Ok(v) = std::env::var("MAILGUESS_CATBOOST_LIBRARY") {
            cfg = cfg.with_catboost_library(v);
        }
        if let (Ok(url), Ok(key)) = (
            std::env::var("MAILGUESS_VERIFICATION_BASE_URL"),
            std::env::var("MAILGUESS_VERIFICATION_API_KEY"),
        ) {
            cfg = cfg.with_verification(url, key);
        }
        if let (Ok(url), Ok(key)) = (
            std::env::var("MAILGUESS_ENRICHMENT_BASE_URL"),
            std::env::var("MAILGUESS_ENRICHMENT_API_KEY"),
        ) {
            cfg = cfg.with_enrichment(url, key);
        }
        if let Ok(v) = std::env::var("MAILGUESS_DEFAULT_TOP_K") {
            if let Ok(n) = v.parse::<usize>() {
                cfg = cfg.with_default_top_k(n);
            }
        }

        Ok(cfg)
    }

    /// Checks that every path set on this config actually exists on disk.
    /// Called once by [`crate::engine::PredictionEngine::new`]; a missing
    /// required file is a [`crate::errors::Error::ConfigurationError`].
    pub(crate) fn validate(&self) -> crate::errors::Result<()> {
        let require_exists = |path: &Path| -> crate::errors::Result<()> {
            if path.is_file() {
                Ok(())
            } else {
                Err(crate::errors::Error::ConfigurationError(format!(
                    "file not found: {}",
                    path.display()
                )))
            }
        };

        require_exists(&self.standard_templates_path)?;
        require_exists(&self.complex_templates_path)?;
        require_exists(&self.firm_usage_path)?;

        if let Some(p) = &self.canonical_firms_path {
            require_exists(p)?;
        }
        if let Some(p) = &self.firm_match_cache_path {
            require_exists(p)?;
        }
        if self.lightgbm_model_path.is_none() && self.catboost_model_path.is_none() {
            return Err(crate::errors::Error::ConfigurationError(
                "at least one of lightgbm_model_path or catboost_model_path must be set".into(),
            ));
        }
        if let Some(p) = &self.lightgbm_model_path {
            require_exists(p)?;
        }
        if let Some(p) = &self.catboost_model_path {
            require_exists(p)?;
        }
        if let Some(p) = &self.catboost_library_path {
            require_exists(p)?;
        }

        Ok(())
    }
}
