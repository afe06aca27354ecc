//! Python bindings via PyO3, mirroring the sync-wrapper-over-async-runtime
//! pattern used elsewhere in this codebase for bridging a blocking FFI
//! call surface onto async internals.
#![cfg(feature = "python")]

use std::sync::{Arc, OnceLock};

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use tokio::runtime::Runtime;

use crate::config::EngineConfig;
use crate::engine::{EmailPredictionResult, PredictionEngine};
use crate::text::{decompose, extract_flags};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| Runtime::new().expect("failed to create Tokio runtime"))
}

fn to_py_err(e: crate::errors::Error) -> PyErr {
    match e {
        crate::errors::Error::MissingDomain(_) => PyValueError::new_err(e.to_string()),
        crate::errors::Error::ArgumentError(_) => PyValueError::new_err(e.to_string()),
        crate::errors::Error::ConfigurationError(_) => PyRuntimeError::new_err(e.to_string()),
    }
}

fn result_to_dict(py: Python<'_>, result: &EmailPredictionResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("email", &result.email)?;
    dict.set_item("score", result.score)?;
    dict.set_item("template_id", result.template_id)?;
    dict.set_item("verified", result.verification.as_ref().map(|v| v.deliverable))?;
    Ok(dict.into())
}

/// Python wrapper for [`PredictionEngine`].
#[pyclass(name = "Engine")]
struct PyEngine {
    inner: Arc<PredictionEngine>,
}

#[pymethods]
impl PyEngine {
    #[new]
    #[pyo3(signature = (standard_templates, complex_templates, firm_usage, lightgbm_model=None, catboost_model=None, canonical_firms=None))]
    fn new(
        standard_templates: String,
        complex_templates: String,
        firm_usage: String,
        lightgbm_model: Option<String>,
        catboost_model: Option<String>,
        canonical_firms: Option<String>,
    ) -> PyResult<Self> {
        let mut config = EngineConfig::new(standard_templates, complex_templates, firm_usage);
        if let Some(p) = lightgbm_model {
            config = config.with_lightgbm_model(p);
        }
        if let Some(p) = catboost_model {
            config = config.with_catboost_model(p);
        }
        if let Some(p) = canonical_firms {
            config = config.with_canonical_firms(p);
        }

        let inner = PredictionEngine::new(config).map_err(to_py_err)?;
        Ok(Self { inner: Arc::new(inner) })
    }

    /// Predicts up to `top_k` ranked candidate emails for `name` at `firm`.
    #[pyo3(signature = (name, firm, top_k=3, domain=None))]
    fn predict(&self, py: Python<'_>, name: &str, firm: &str, top_k: usize, domain: Option<&str>) -> PyResult<Vec<Py<PyDict>>> {
        let inner = Arc::clone(&self.inner);
        let name = name.to_string();
        let firm = firm.to_string();
        let domain = domain.map(str::to_string);

        let results = py.allow_threads(|| {
            runtime().block_on(async move { inner.predict(&name, &firm, Some(top_k), domain.as_deref()).await })
        });

        results.map_err(to_py_err)?.iter().map(|r| result_to_dict(py, r)).collect()
    }
}

/// Decomposes a raw name and reports the three investor flags, without
/// needing a constructed [`PyEngine`] (useful for inspecting how a name
/// will be treated before running a full prediction).
#[pyfunction]
fn normalize_name(py: Python<'_>, name: &str) -> PyResult<Py<PyDict>> {
    let decomposed = decompose(name);
    let flags = extract_flags(name);

    let dict = PyDict::new(py);
    dict.set_item("first_names", decomposed.first_names)?;
    dict.set_item("middle_names", decomposed.middle_names)?;
    dict.set_item("last_names", decomposed.last_names)?;
    dict.set_item("has_german_char", flags.has_german_char)?;
    dict.set_item("has_nfkd_normalized", flags.has_nfkd_normalized)?;
    dict.set_item("has_nickname", flags.has_nickname)?;
    Ok(dict.into())
}

#[pymodule]
fn mailguess(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyEngine>()?;
    m.add_function(wrap_pyfunction!(normalize_name, m)?)?;
    m.add("__version__", crate::VERSION)?;
    Ok(())
}
