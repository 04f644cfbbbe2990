// errors.rs
use chemengine::EngineError;
use thiserror::Error;

/// Error del dominio: entrada inválida, esquema inconsistente o fallos externos.
#[derive(Debug, Error)]
pub enum DomainError {
    /// El SMILES no se pudo interpretar o la molécula no es químicamente válida.
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Error de validación: {0}")]
    ValidationError(String),

    #[error("Error externo: {0}")]
    ExternalError(String),

    #[error("Error de serialización: {0}")]
    SerializationError(String),
}

// Los errores de parseo/saneamiento son culpa de la entrada; el resto, del backend
impl From<EngineError> for DomainError {
    fn from(e: EngineError) -> Self {
        if e.is_invalid_input() {
            DomainError::InvalidInput(e.to_string())
        } else {
            DomainError::ExternalError(e.to_string())
        }
    }
}

// Implementación de conversión desde serde_json::Error a DomainError
impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::ExternalError(e.to_string())
    }
}
