//! Raw bindings to the official CatBoost C API (`libcatboostmodel`),
//! loaded dynamically at runtime with `libloading`.
//!
//! There is no maintained `catboost` crate on crates.io; the vendor ships a
//! real, stable C ABI (`catboost/libs/model_interface/c_api.h`) instead, so
//! this binds that directly rather than inventing a dependency. Only the
//! handful of entry points the flat-float prediction path needs are
//! declared here.
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::path::Path;

use libloading::{Library, Symbol};

use crate::errors::{Error, Result};

/// Opaque handle to a loaded CatBoost model, owned by the C library.
pub type ModelCalcerHandle = c_void;

type ModelCalcerCreateFn = unsafe extern "C" fn() -> *mut ModelCalcerHandle;
type ModelCalcerDeleteFn = unsafe extern "C" fn(*mut ModelCalcerHandle);
type LoadFullModelFromFileFn = unsafe extern "C" fn(*mut ModelCalcerHandle, *const c_char) -> bool;
type GetErrorStringFn = unsafe extern "C" fn() -> *const c_char;
type CalcModelPredictionFlatFn = unsafe extern "C" fn(
    handle: *mut ModelCalcerHandle,
    doc_count: usize,
    float_features: *const *const f32,
    float_features_size: usize,
    result: *mut f64,
    result_size: usize,
) -> bool;

/// Dynamically-loaded handle to `libcatboostmodel`'s symbols. Each call
/// re-resolves its symbol rather than caching a `Symbol<'_>` across calls,
/// trading a little lookup overhead for not having to fight the borrow
/// checker over the library's lifetime.
pub struct CatBoostLibrary {
    lib: Library,
}

impl CatBoostLibrary {
    /// Loads `libcatboostmodel.{so,dylib,dll}` from `path`.
    ///
    /// # Safety
    /// Dynamic library loading runs arbitrary code from the shared object
    /// at load time; `path` must point to a trusted CatBoost runtime.
    pub unsafe fn open(path: &Path) -> Result<Self> {
        let lib = Library::new(path)
            .map_err(|e| Error::ConfigurationError(format!("failed to load libcatboostmodel: {e}")))?;
        Ok(Self { lib })
    }

    unsafe fn symbol<T>(&self, name: &[u8]) -> Result<Symbol<'_, T>> {
        self.lib
            .get(name)
            .map_err(|e| Error::ConfigurationError(format!("missing CatBoost symbol {:?}: {e}", CStr::from_bytes_with_nul_unchecked(name))))
    }

    fn last_error(&self) -> String {
        unsafe {
            match self.symbol::<GetErrorStringFn>(b"GetErrorString\0") {
                Ok(f) => {
                    let ptr = f();
                    if ptr.is_null() {
                        "unknown CatBoost error".to_string()
                    } else {
                        CStr::from_ptr(ptr).to_string_lossy().into_owned()
                    }
                }
                Err(_) => "unknown CatBoost error".to_string(),
            }
        }
    }

    pub fn create_handle(&self) -> Result<*mut ModelCalcerHandle> {
        unsafe {
            let f = self.symbol::<ModelCalcerCreateFn>(b"ModelCalcerCreate\0")?;
            let handle = f();
            if handle.is_null() {
                Err(Error::ConfigurationError("ModelCalcerCreate returned a null handle".to_string()))
            } else {
                Ok(handle)
            }
        }
    }

    pub fn delete_handle(&self, handle: *mut ModelCalcerHandle) {
        unsafe {
            if let Ok(f) = self.symbol::<ModelCalcerDeleteFn>(b"ModelCalcerDelete\0") {
                f(handle);
            }
        }
    }

    pub fn load_full_model_from_file(&self, handle: *mut ModelCalcerHandle, model_path: &Path) -> Result<()> {
        let c_path = CString::new(model_path.to_string_lossy().into_owned())
            .map_err(|e| Error::ConfigurationError(format!("model path contains a NUL byte: {e}")))?;
        unsafe {
            let f = self.symbol::<LoadFullModelFromFileFn>(b"LoadFullModelFromFile\0")?;
            if f(handle, c_path.as_ptr()) {
                Ok(())
            } else {
                Err(Error::ConfigurationError(format!("failed to load CatBoost model: {}", self.last_error())))
            }
        }
    }

    /// Calls `CalcModelPredictionFlat`: one float-pointer per document
    /// (row), each pointing at that row's contiguous feature block.
    /// `result` must already be sized to `doc_count`.
    pub fn calc_prediction_flat(
        &self,
        handle: *mut ModelCalcerHandle,
        row_pointers: &[*const f32],
        float_features_size: usize,
        result: &mut [f64],
    ) -> Result<()> {
        unsafe {
            let f = self.symbol::<CalcModelPredictionFlatFn>(b"CalcModelPredictionFlat\0")?;
            let ok = f(
                handle,
                row_pointers.len(),
                row_pointers.as_ptr(),
                float_features_size,
                result.as_mut_ptr(),
                result.len(),
            );
            if ok {
                Ok(())
            } else {
                Err(Error::ArgumentError(format!("CatBoost prediction failed: {}", self.last_error())))
            }
        }
    }
}
