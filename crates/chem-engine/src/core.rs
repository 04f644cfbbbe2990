use pyo3::ffi::c_str;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};
use std::ffi::CString;
use std::sync::OnceLock;

use crate::descriptors::DescriptorValues;

static RDKIT_MODULE: OnceLock<Py<PyModule>> = OnceLock::new();

pub fn init_python() -> PyResult<()> {
    Python::attach(|py| {
        let code = CString::new(include_str!("../python/rdkit_wrapper.py"))?;
        let module = PyModule::from_code(py, code.as_c_str(), c_str!("rdkit_wrapper.py"), c_str!("rdkit_wrapper"))?;
        RDKIT_MODULE.set(module.unbind()).ok();
        Ok(())
    })
}

fn get_module(py: Python<'_>) -> PyResult<Py<PyModule>> {
    RDKIT_MODULE.get().map(|module| module.clone_ref(py)).ok_or_else(|| {
                                                             PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(
            "init_python() debe llamarse antes de get_descriptors()"
        )
                                                         })
}

/// Descriptores calculados por RDKit; `None` si RDKit no acepta el SMILES.
pub fn get_descriptors(smiles: &str) -> PyResult<Option<DescriptorValues>> {
    Python::attach(|py| {
        let rdkit_py = get_module(py)?;
        let rdkit = rdkit_py.bind(py);
        let binding = rdkit.getattr("descriptors")?.call1((smiles,))?;
        if binding.is_none() {
            return Ok(None);
        }
        let info = binding.downcast::<PyDict>()?;
        let json_str: String = py.import("json")?.call_method1("dumps", (info,))?.extract()?;
        let values: DescriptorValues = serde_json::from_str(&json_str).map_err(|e| {
                                           PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("Error de deserialización: {}", e))
                                       })?;
        Ok(Some(values))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "requiere Python con RDKit instalado"]
    fn test_get_descriptors() {
        init_python().expect("Fallo al inicializar Python/RDKit");
        let values = get_descriptors("CCO").expect("Fallo al llamar a RDKit").expect("etanol es válido");
        assert_eq!(values.num_heavy_atoms, 3);
        assert!((values.mol_wt - 46.07).abs() < 0.1);
        assert!(get_descriptors("not_a_smiles").expect("llamada a RDKit").is_none());
    }
}
