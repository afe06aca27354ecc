//! Template predictor: polymorphic over the two gradient-boosted backends.
//!
//! Source modelled this as a compile-time CRTP hierarchy; here it's a
//! capability trait (`ModelBackend`) satisfied by two independent structs,
//! dispatched through a trait object rather than an inheritance tree.
pub mod catboost;
pub mod catboost_sys;
pub mod lightgbm;

use crate::errors::{Error, Result};
use crate::feature_matrix::FEATURE_COUNT;
use crate::templates::CandidateTemplate;

/// One scored candidate template, ranked and ready for local-part
/// rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePrediction {
    /// Row index into the scored matrix (equivalently, position within the
    /// ascending-`template_id`-ordered template slice).
    pub index: usize,
    pub score: f64,
    pub template_id: i32,
    /// Cheap back-reference to the originating row, for callers that want
    /// to look the template back up without re-searching by id.
    pub metadata_ref: usize,
}

/// Capability satisfied by each scoring backend (CatBoost-equivalent,
/// LightGBM-equivalent).
pub trait ModelBackend: Send + Sync {
    /// Scores every row of `flat_matrix` (row-major, `templates.len() *
    /// 27` entries) and returns the top `top_k` by score descending, ties
    /// broken by ascending `index`. `top_k` is clamped to
    /// `min(top_k, templates.len())`.
    fn predict_top_templates(
        &self,
        flat_matrix: &[f32],
        templates: &[CandidateTemplate],
        top_k: usize,
    ) -> Result<Vec<TemplatePrediction>>;
}

/// Checks the precondition every backend must enforce before scoring:
/// `flat_matrix.len() == templates.len() * FEATURE_COUNT`.
pub(crate) fn validate_matrix_shape(flat_matrix: &[f32], templates: &[CandidateTemplate]) -> Result<()> {
    let expected = templates.len() * FEATURE_COUNT;
    if flat_matrix.len() != expected {
        return Err(Error::ArgumentError(format!(
            "feature matrix has {} entries, expected {} ({} templates × {} columns)",
            flat_matrix.len(),
            expected,
            templates.len(),
            FEATURE_COUNT
        )));
    }
    Ok(())
}

/// Shared top-K selection used by both backends once they've produced one
/// raw score per row: a partial selection by score descending, ties broken
/// by ascending row index (equivalently ascending `template_id`, since rows
/// are laid out in that order).
pub(crate) fn select_top_k(scores: &[f64], templates: &[CandidateTemplate], top_k: usize) -> Vec<TemplatePrediction> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    let k = top_k.min(indices.len());

    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    indices
        .into_iter()
        .take(k)
        .map(|i| TemplatePrediction { index: i, score: scores[i], template_id: templates[i].template_id, metadata_ref: i })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::token::TemplateToken;

    fn template(id: i32) -> CandidateTemplate {
        CandidateTemplate {
            template_id: id,
            token_seq: vec![TemplateToken::Separator(".".into())],
            support_count: 0,
            coverage_pct: 0.0,
            in_mined_rules: false,
            max_rule_confidence: 0.0,
            avg_rule_confidence: 0.0,
            uses_middle_name: false,
            uses_multiple_firsts: false,
            uses_multiple_middles: false,
            uses_multiple_lasts: false,
        }
    }

    #[test]
    fn select_top_k_orders_by_descending_score() {
        let templates = vec![template(10), template(20), template(30)];
        let scores = vec![0.1, 0.9, 0.5];
        let top = select_top_k(&scores, &templates, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].template_id, 20);
        assert_eq!(top[1].template_id, 30);
    }

    #[test]
    fn select_top_k_breaks_ties_by_ascending_index() {
        let templates = vec![template(10), template(20)];
        let scores = vec![0.5, 0.5];
        let top = select_top_k(&scores, &templates, 2);
        assert_eq!(top[0].template_id, 10);
        assert_eq!(top[1].template_id, 20);
    }

    #[test]
    fn select_top_k_clamps_to_available_rows() {
        let templates = vec![template(1)];
        let scores = vec![0.3];
        let top = select_top_k(&scores, &templates, 5);
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn validate_matrix_shape_rejects_mismatch() {
        let templates = vec![template(1), template(2)];
        let flat = vec![0.0_f32; 10];
        assert!(validate_matrix_shape(&flat, &templates).is_err());
    }
}
