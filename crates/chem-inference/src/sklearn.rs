use pyo3::ffi::c_str;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};
use serde::Deserialize;
use std::ffi::CString;
use std::path::Path;
use std::sync::OnceLock;

use crate::classifier::Classifier;
use crate::InferenceError;

static SKLEARN_MODULE: OnceLock<Py<PyModule>> = OnceLock::new();

pub fn init_python() -> PyResult<()> {
    Python::attach(|py| {
        let code = CString::new(include_str!("../python/sklearn_wrapper.py"))?;
        let module = PyModule::from_code(py, code.as_c_str(), c_str!("sklearn_wrapper.py"), c_str!("sklearn_wrapper"))?;
        SKLEARN_MODULE.set(module.unbind()).ok();
        Ok(())
    })
}

fn get_module(py: Python<'_>) -> PyResult<Py<PyModule>> {
    if SKLEARN_MODULE.get().is_none() {
        init_python()?;
    }
    SKLEARN_MODULE.get()
                  .map(|module| module.clone_ref(py))
                  .ok_or_else(|| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>("sklearn_wrapper no inicializado"))
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    n_features: usize,
    feature_names: Option<Vec<String>>,
    classes: Vec<i64>,
}

/// Estimador de scikit-learn serializado con pickle/joblib.
pub struct SklearnModel {
    model: Py<PyAny>,
    n_features: usize,
    feature_names: Option<Vec<String>>,
    classes: [i64; 2],
}

impl SklearnModel {
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        Python::attach(|py| {
            let module = get_module(py)?;
            let result = module.bind(py).getattr("load_model")?.call1((path.to_string_lossy().into_owned(),))?;
            let (model, info): (Bound<'_, PyAny>, Bound<'_, PyDict>) = result.extract()?;
            let json_str: String = py.import("json")?.call_method1("dumps", (info,))?.extract()?;
            let info: ModelInfo = serde_json::from_str(&json_str)?;
            let classes: [i64; 2] = info.classes
                                        .try_into()
                                        .map_err(|c| InferenceError::InvalidModel(format!("clases no binarias: {c:?}")))?;
            Ok(Self { model: model.unbind(),
                      n_features: info.n_features,
                      feature_names: info.feature_names,
                      classes })
        })
    }
}

impl Classifier for SklearnModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn classes(&self) -> [i64; 2] {
        self.classes
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        if let Some(index) = features.iter().position(|x| x.is_nan()) {
            return Err(InferenceError::UndefinedFeature { index,
                                                          name: format!("#{index}") });
        }
        Python::attach(|py| {
            let module = get_module(py)?;
            let proba: Vec<f64> =
                module.bind(py).getattr("predict_proba")?.call1((self.model.bind(py), features.to_vec()))?.extract()?;
            match proba.as_slice() {
                [p0, p1] => Ok([*p0, *p1]),
                other => Err(InferenceError::InvalidModel(format!("predict_proba devolvió {} valores", other.len()))),
            }
        })
    }
}

/// Columnas de entrenamiento guardadas con pickle/joblib.
pub fn load_feature_columns(path: &Path) -> Result<Vec<String>, InferenceError> {
    Python::attach(|py| {
        let module = get_module(py)?;
        let columns: Vec<String> =
            module.bind(py).getattr("load_feature_columns")?.call1((path.to_string_lossy().into_owned(),))?.extract()?;
        Ok(columns)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "requiere Python con scikit-learn y un modelo serializado"]
    fn test_load_pickled_model() {
        let path = std::env::var("SKLEARN_TEST_MODEL").expect("ruta del modelo de prueba");
        let model = SklearnModel::load(Path::new(&path)).expect("Fallo al cargar el modelo");
        let proba = model.predict_proba(&vec![0.0; model.n_features()]).expect("predict_proba");
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-9);
    }
}
