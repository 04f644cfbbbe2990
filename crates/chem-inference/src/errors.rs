use chem_domain::DomainError;
#[cfg(feature = "sklearn")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    /// El vector o el modelo no coinciden con el esquema de columnas.
    #[error("Desajuste de esquema: {0}")]
    SchemaMismatch(String),

    #[error("El descriptor {name} (columna {index}) es NaN y el modelo no admite valores faltantes")]
    UndefinedFeature { index: usize, name: String },

    #[error("Modelo inválido: {0}")]
    InvalidModel(String),

    #[error("Formato de artefacto no soportado: {0}")]
    UnsupportedFormat(String),

    #[error("Error leyendo {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Esquema inválido: {0}")]
    Schema(#[from] DomainError),

    #[cfg(feature = "sklearn")]
    #[error("Error de Python/scikit-learn: {0}")]
    Python(#[from] PyErr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_descriptive() {
        let err = InferenceError::UndefinedFeature { index: 3,
                                                     name: "MaxPartialCharge".into() };
        assert_eq!(err.to_string(),
                   "El descriptor MaxPartialCharge (columna 3) es NaN y el modelo no admite valores faltantes");
        let err: InferenceError = DomainError::ValidationError("x".into()).into();
        assert!(matches!(err, InferenceError::Schema(_)));
    }
}
