//! Configuración del predictor a partir de variables de entorno (.env).
//!
//! - `PREDICTOR_MODEL_PATH`: artefacto del modelo (por defecto `best_model.json`).
//! - `PREDICTOR_SCHEMA_PATH`: lista de columnas (por defecto `feature_columns.json`).
//! - `PREDICTOR_BACKEND`: `native` o `rdkit`.
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::core_error::CoreError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_MODEL_PATH: &str = "best_model.json";
pub const DEFAULT_SCHEMA_PATH: &str = "feature_columns.json";

/// Motor de descriptores a usar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Native,
    Rdkit,
}

impl FromStr for BackendKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "" => Ok(BackendKind::Native),
            "rdkit" => Ok(BackendKind::Rdkit),
            other => Err(CoreError::Config(format!("PREDICTOR_BACKEND desconocido: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub schema_path: PathBuf,
    pub backend: BackendKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { model_path: PathBuf::from(DEFAULT_MODEL_PATH),
               schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
               backend: BackendKind::Native }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración con una función de búsqueda arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let model_path = lookup("PREDICTOR_MODEL_PATH").map(PathBuf::from)
                                                       .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));
        let schema_path = lookup("PREDICTOR_SCHEMA_PATH").map(PathBuf::from)
                                                         .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH));
        let backend = match lookup("PREDICTOR_BACKEND") {
            Some(value) => value.parse()?,
            None => BackendKind::Native,
        };
        Ok(Self { model_path,
                  schema_path,
                  backend })
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
