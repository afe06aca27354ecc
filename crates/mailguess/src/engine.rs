//! Prediction engine: orchestrates decomposition, feature extraction,
//! scoring, domain resolution, and local-part rendering into ranked
//! `EmailPredictionResult` rows (§4.10).
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domain::DomainResolver;
use crate::errors::{Error, Result};
use crate::feature_matrix::build_matrix;
use crate::hooks::{EnrichmentResult, SharedEnrichmentHook, SharedVerificationHook, VerificationResult};
use crate::localpart;
use crate::predict::catboost::{default_library_candidates, CatBoostBackend};
use crate::predict::lightgbm::LightGbmBackend;
use crate::predict::ModelBackend;
use crate::templates::{TemplateClass, TemplateStore};
use crate::text::normalize::to_lower;
use crate::text::{decompose, extract_flags};

/// One ranked candidate email, the engine's return type.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailPredictionResult {
    /// Always exactly one `@`: rendered local-part, then the resolved
    /// domain.
    pub email: String,
    pub score: f64,
    pub template_id: i32,
    pub verification: Option<VerificationResult>,
    pub enrichment: Option<EnrichmentResult>,
}

fn resolve_backend(config: &EngineConfig) -> Result<Box<dyn ModelBackend>> {
    if let Some(model_path) = &config.catboost_model_path {
        let library_path = match &config.catboost_library_path {
            Some(p) => p.clone(),
            None => default_library_candidates()
                .into_iter()
                .find(|p| p.is_file())
                .ok_or_else(|| Error::ConfigurationError("no libcatboostmodel found in default search paths".to_string()))?,
        };
        return Ok(Box::new(CatBoostBackend::load(&library_path, model_path)?));
    }

    if let Some(model_path) = &config.lightgbm_model_path {
        return Ok(Box::new(LightGbmBackend::load(model_path)?));
    }

    Err(Error::ConfigurationError(
        "no scoring backend configured: set lightgbm_model_path or catboost_model_path".to_string(),
    ))
}

/// The low-latency `(name, firm, domain?) -> ranked emails` pipeline.
/// Template-metadata store, firm directory, and the scoring backend are
/// built once here and shared read-only afterward; see DESIGN.md for the
/// concurrency rationale.
pub struct PredictionEngine {
    store: TemplateStore,
    domain_resolver: Option<DomainResolver>,
    backend: Box<dyn ModelBackend>,
    verification_hook: Option<SharedVerificationHook>,
    enrichment_hook: Option<SharedEnrichmentHook>,
    default_top_k: usize,
}

impl PredictionEngine {
    /// Validates `config`, loads every metadata/model file it names, and
    /// builds the scoring backend. All failure here is a
    /// [`Error::ConfigurationError`], raised once and never again.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let store = TemplateStore::load(&config.standard_templates_path, &config.complex_templates_path, &config.firm_usage_path)?;

        let domain_resolver = if config.canonical_firms_path.is_some() || config.firm_match_cache_path.is_some() {
            Some(DomainResolver::load(config.canonical_firms_path.as_deref(), config.firm_match_cache_path.as_deref())?)
        } else {
            None
        };

        let backend = resolve_backend(&config)?;

        let verification_hook: Option<SharedVerificationHook> =
            match (&config.verification_base_url, &config.verification_api_key) {
                (Some(url), Some(key)) => {
                    Some(Arc::new(crate::hooks::HttpVerificationClient::new(url.clone(), key.clone())))
                }
                _ => None,
            };

        let enrichment_hook: Option<SharedEnrichmentHook> =
            match (&config.enrichment_base_url, &config.enrichment_api_key) {
                (Some(url), Some(key)) => Some(Arc::new(crate::hooks::HttpEnrichmentClient::new(url.clone(), key.clone()))),
                _ => None,
            };

        Ok(Self {
            store,
            domain_resolver,
            backend,
            verification_hook,
            enrichment_hook,
            default_top_k: config.default_top_k,
        })
    }

    /// Gives tests and callers visibility into what was loaded at startup,
    /// without exposing the store itself.
    pub fn template_counts(&self) -> (usize, usize) {
        self.store.stats()
    }

    /// `predict(investor_name, firm_name, top_k, domain?)` — the engine's
    /// one public operation, running the eight steps of §4.10 in order.
    pub async fn predict(
        &self,
        investor_name: &str,
        firm_name: &str,
        top_k: Option<usize>,
        domain: Option<&str>,
    ) -> Result<Vec<EmailPredictionResult>> {
        // 1. Resolve the domain.
        let resolved_domain = match domain {
            Some(d) => d.to_string(),
            None => {
                let resolved = self.domain_resolver.as_ref().and_then(|r| r.resolve(firm_name));
                match resolved {
                    Some(m) => m.domain,
                    None => return Err(Error::MissingDomain(firm_name.to_string())),
                }
            }
        };

        // 2. Decompose the name and extract the investor flags.
        let decomposed = decompose(investor_name);
        let flags = extract_flags(investor_name);

        // 3. Select standard vs complex.
        let class = if decomposed.has_middle()
            || decomposed.has_multiple_firsts()
            || decomposed.has_multiple_lasts()
            || flags.has_german_char
            || flags.has_nfkd_normalized
        {
            TemplateClass::Complex
        } else {
            TemplateClass::Standard
        };
        tracing::trace!(?class, investor_name, firm_name, "selected template class");

        // 4. Build the feature matrix for the selected class.
        let firm_key = to_lower(firm_name);
        let templates = self.store.templates(class);
        let matrix = build_matrix(&decomposed, &flags, &firm_key, &self.store, class);

        // 5. Score every row and take the top K.
        let k = top_k.unwrap_or(self.default_top_k);
        let predictions = self.backend.predict_top_templates(&matrix, templates, k)?;

        // 6 & 7. Render local-parts and attach the resolved domain; drop
        // any template that turns out not to apply to this name.
        let mut results = Vec::with_capacity(predictions.len());
        for prediction in predictions {
            let template = &templates[prediction.index];
            if let Some(local_part) = localpart::render(&decomposed, &template.token_seq) {
                results.push(EmailPredictionResult {
                    email: format!("{local_part}@{resolved_domain}"),
                    score: prediction.score,
                    template_id: prediction.template_id,
                    verification: None,
                    enrichment: None,
                });
            }
        }

        // 8. Optional post-hooks. Verification runs once per surviving
        // email; enrichment runs once, for whichever email scored best.
        // Neither failure mode propagates — a missing hook result just
        // leaves the corresponding field `None`.
        if let Some(hook) = &self.verification_hook {
            for result in results.iter_mut() {
                result.verification = hook.verify(&result.email).await;
            }
        }

        if let Some(hook) = &self.enrichment_hook {
            if let Some(best) = results
                .iter_mut()
                .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
            {
                best.enrichment = hook.enrich(&best.email).await;
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::token::TemplateToken;
    use crate::templates::CandidateTemplate;

    struct FixedScoreBackend {
        scores: Vec<f64>,
    }

    impl ModelBackend for FixedScoreBackend {
        fn predict_top_templates(
            &self,
            flat_matrix: &[f32],
            templates: &[CandidateTemplate],
            top_k: usize,
        ) -> Result<Vec<crate::predict::TemplatePrediction>> {
            crate::predict::validate_matrix_shape(flat_matrix, templates)?;
            Ok(crate::predict::select_top_k(&self.scores, templates, top_k))
        }
    }

    fn template(id: i32, tokens: Vec<TemplateToken>) -> CandidateTemplate {
        CandidateTemplate {
            template_id: id,
            token_seq: tokens,
            support_count: 1,
            coverage_pct: 0.5,
            in_mined_rules: false,
            max_rule_confidence: 0.0,
            avg_rule_confidence: 0.0,
            uses_middle_name: false,
            uses_multiple_firsts: false,
            uses_multiple_middles: false,
            uses_multiple_lasts: false,
        }
    }

    fn engine_with(standard: Vec<CandidateTemplate>, scores: Vec<f64>) -> PredictionEngine {
        let store = TemplateStore::load_for_test(standard, vec![], Default::default(), Default::default());
        PredictionEngine {
            store,
            domain_resolver: None,
            backend: Box::new(FixedScoreBackend { scores }),
            verification_hook: None,
            enrichment_hook: None,
            default_top_k: 3,
        }
    }

    #[tokio::test]
    async fn predict_renders_top_template_with_explicit_domain() {
        use crate::templates::token::NameToken;
        use crate::text::NameGroup;

        let tokens = vec![
            TemplateToken::Name(NameToken { group: Some(NameGroup::First), index: 0, ..Default::default() }),
            TemplateToken::Separator(".".into()),
            TemplateToken::Name(NameToken { group: Some(NameGroup::Last), index: 0, ..Default::default() }),
        ];
        let engine = engine_with(vec![template(1, tokens)], vec![0.9]);

        let results = engine.predict("John Smith", "cvc", Some(3), Some("cvc.com")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].email, "john.smith@cvc.com");
        assert_eq!(results[0].template_id, 1);
    }

    #[tokio::test]
    async fn predict_errors_with_missing_domain_and_no_resolver() {
        let engine = engine_with(vec![], vec![]);
        let result = engine.predict("Alice Beth Carter", "ClashFirm", Some(3), None).await;
        assert!(matches!(result, Err(Error::MissingDomain(_))));
    }

    #[tokio::test]
    async fn predict_drops_templates_that_do_not_apply() {
        use crate::templates::token::NameToken;
        use crate::text::NameGroup;

        // Indexes a middle name that "John Smith" doesn't have.
        let tokens = vec![TemplateToken::Name(NameToken { group: Some(NameGroup::Middle), index: 0, ..Default::default() })];
        let engine = engine_with(vec![template(1, tokens)], vec![0.9]);

        let results = engine.predict("John Smith", "cvc", Some(3), Some("cvc.com")).await.unwrap();
        assert!(results.is_empty());
    }
}
