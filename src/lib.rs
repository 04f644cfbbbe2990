//! Sertraline Predictor
//!
//! Librería del predictor de actividad tipo sertralina:
//! - `config`: rutas de artefactos y backend desde el entorno.
//! - `predictor`: carga única de modelo y esquema, y el ciclo de predicción.
//! - `shell`: sesión interactiva sobre cualquier `BufRead`/`Write`.

pub mod config;
pub mod errors;
pub mod predictor;
pub mod shell;

pub use config::{AppConfig, BackendKind};
pub use errors::CoreError;
pub use predictor::{Analysis, Predictor};
