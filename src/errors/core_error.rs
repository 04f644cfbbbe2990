use chem_domain::DomainError;
use chem_inference::InferenceError;
use thiserror::Error;

/// Errores de arranque del predictor; todos son fatales.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error interno: {0}")]
    Internal(String),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error cargando artefactos: {0}")]
    Artifact(#[from] InferenceError),
    #[error("Error del dominio: {0}")]
    Domain(#[from] DomainError),
}
