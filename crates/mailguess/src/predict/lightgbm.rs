//! LightGBM-equivalent predictor backend.
use std::path::Path;

use lightgbm3::Booster;

use crate::errors::{Error, Result};
use crate::feature_matrix::FEATURE_COUNT;
use crate::templates::CandidateTemplate;

use super::{select_top_k, validate_matrix_shape, ModelBackend, TemplatePrediction};

/// Wraps a loaded LightGBM booster. Scores are produced with the boosted
/// forest's row-major predict entry point: normal (non-raw) prediction,
/// starting at iteration 0, using every iteration in the model — no
/// early-stopping cutoff is applied here.
pub struct LightGbmBackend {
    booster: Booster,
}

impl LightGbmBackend {
    pub fn load(model_path: &Path) -> Result<Self> {
        let path_str = model_path
            .to_str()
            .ok_or_else(|| Error::ConfigurationError("model path is not valid UTF-8".to_string()))?;
        let booster = Booster::from_file(path_str)
            .map_err(|e| Error::ConfigurationError(format!("failed to load LightGBM model: {e}")))?;
        Ok(Self { booster })
    }
}

impl ModelBackend for LightGbmBackend {
    fn predict_top_templates(
        &self,
        flat_matrix: &[f32],
        templates: &[CandidateTemplate],
        top_k: usize,
    ) -> Result<Vec<TemplatePrediction>> {
        validate_matrix_shape(flat_matrix, templates)?;

        if templates.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<f64> = flat_matrix.iter().map(|&v| v as f64).collect();
        let predictions = self
            .booster
            .predict(rows, FEATURE_COUNT as i32, true)
            .map_err(|e| Error::ArgumentError(format!("LightGBM prediction failed: {e}")))?;

        let scores: Vec<f64> = predictions.into_iter().map(|row| row.into_iter().next().unwrap_or(0.0)).collect();

        Ok(select_top_k(&scores, templates, top_k))
    }
}
