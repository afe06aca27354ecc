//! CatBoost-equivalent predictor backend, bound directly to the vendor's C
//! API (see [`super::catboost_sys`]).
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::feature_matrix::FEATURE_COUNT;
use crate::templates::CandidateTemplate;

use super::catboost_sys::{CatBoostLibrary, ModelCalcerHandle};
use super::{select_top_k, validate_matrix_shape, ModelBackend, TemplatePrediction};

/// Holds a loaded CatBoost model handle alongside the dynamic library it
/// came from. Read-only after construction: once `load` returns, every
/// subsequent call only reads through the handle, so sharing it across
/// threads behind an `Arc` is safe.
pub struct CatBoostBackend {
    library: CatBoostLibrary,
    handle: *mut ModelCalcerHandle,
}

// Safety: CatBoost model handles are immutable after `LoadFullModelFromFile`
// returns; the vendor library documents `CalcModelPredictionFlat` as safe
// to call concurrently from multiple threads against the same handle.
unsafe impl Send for CatBoostBackend {}
unsafe impl Sync for CatBoostBackend {}

impl CatBoostBackend {
    /// Loads `libcatboostmodel` from `library_path` and the trained model
    /// from `model_path`.
    pub fn load(library_path: &Path, model_path: &Path) -> Result<Self> {
        let library = unsafe { CatBoostLibrary::open(library_path)? };
        let handle = library.create_handle()?;
        library.load_full_model_from_file(handle, model_path)?;
        Ok(Self { library, handle })
    }
}

impl Drop for CatBoostBackend {
    fn drop(&mut self) {
        self.library.delete_handle(self.handle);
    }
}

impl ModelBackend for CatBoostBackend {
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

        let row_pointers: Vec<*const f32> = flat_matrix.chunks(FEATURE_COUNT).map(|row| row.as_ptr()).collect();
        let mut result = vec![0.0_f64; templates.len()];
        self.library.calc_prediction_flat(self.handle, &row_pointers, FEATURE_COUNT, &mut result)?;

        Ok(select_top_k(&result, templates, top_k))
    }
}

/// Default search locations for the CatBoost shared library, tried in
/// order when a caller doesn't supply one explicitly via configuration.
pub fn default_library_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/local/lib/libcatboostmodel.so"),
        PathBuf::from("/usr/lib/libcatboostmodel.so"),
        PathBuf::from("libcatboostmodel.so"),
    ]
}
