//! Carga de artefactos en disco: modelo y lista de columnas.
//!
//! `.json` se interpreta de forma nativa. `.pkl`/`.joblib` necesita la
//! feature `sklearn` (Python + scikit-learn).
use std::path::Path;

use chem_domain::FeatureSchema;
use sha2::{Digest, Sha256};

use crate::classifier::Classifier;
use crate::model::ModelArtifact;
use crate::InferenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Pickle,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(ArtifactFormat::Json),
            Some("pkl" | "pickle" | "joblib") => Ok(ArtifactFormat::Pickle),
            _ => Err(InferenceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Modelo listo para usarse junto con la huella de su fichero.
pub struct LoadedModel {
    pub classifier: Box<dyn Classifier>,
    pub format: ArtifactFormat,
    /// SHA-256 en hexadecimal del fichero leído.
    pub digest: String,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
         .field("format", &self.format)
         .field("digest", &self.digest)
         .field("n_features", &self.classifier.n_features())
         .finish()
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn read(path: &Path) -> Result<Vec<u8>, InferenceError> {
    std::fs::read(path).map_err(|source| InferenceError::Io { path: path.display().to_string(),
                                                              source })
}

pub fn load_model(path: &Path) -> Result<LoadedModel, InferenceError> {
    let format = ArtifactFormat::from_path(path)?;
    let bytes = read(path)?;
    let digest = sha256_hex(&bytes);
    let classifier: Box<dyn Classifier> = match format {
        ArtifactFormat::Json => Box::new(ModelArtifact::from_json_slice(&bytes)?),
        ArtifactFormat::Pickle => load_pickled_model(path)?,
    };
    log::info!("modelo cargado desde {} ({} columnas, sha256 {digest})",
               path.display(),
               classifier.n_features());
    Ok(LoadedModel { classifier,
                     format,
                     digest })
}

pub fn load_schema(path: &Path) -> Result<FeatureSchema, InferenceError> {
    let format = ArtifactFormat::from_path(path)?;
    let bytes = read(path)?;
    let schema = match format {
        ArtifactFormat::Json => {
            let text = std::str::from_utf8(&bytes).map_err(|e| {
                                                      InferenceError::InvalidModel(format!("{}: {e}", path.display()))
                                                  })?;
            FeatureSchema::from_json_str(text)?
        }
        ArtifactFormat::Pickle => load_pickled_schema(path)?,
    };
    log::info!("esquema cargado desde {} ({} columnas, sha256 {})",
               path.display(),
               schema.len(),
               sha256_hex(&bytes));
    Ok(schema)
}

#[cfg(feature = "sklearn")]
fn load_pickled_model(path: &Path) -> Result<Box<dyn Classifier>, InferenceError> {
    Ok(Box::new(crate::sklearn::SklearnModel::load(path)?))
}

#[cfg(not(feature = "sklearn"))]
fn load_pickled_model(path: &Path) -> Result<Box<dyn Classifier>, InferenceError> {
    Err(InferenceError::UnsupportedFormat(format!("{} (compila con la feature `sklearn`)", path.display())))
}

#[cfg(feature = "sklearn")]
fn load_pickled_schema(path: &Path) -> Result<FeatureSchema, InferenceError> {
    let columns = crate::sklearn::load_feature_columns(path)?;
    Ok(FeatureSchema::from_names(columns.as_slice())?)
}

#[cfg(not(feature = "sklearn"))]
fn load_pickled_schema(path: &Path) -> Result<FeatureSchema, InferenceError> {
    Err(InferenceError::UnsupportedFormat(format!("{} (compila con la feature `sklearn`)", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_input() {
        assert_eq!(sha256_hex(b""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ArtifactFormat::from_path(Path::new("best_model.pkl")).unwrap(), ArtifactFormat::Pickle);
        assert_eq!(ArtifactFormat::from_path(Path::new("model.JSON")).unwrap(), ArtifactFormat::Json);
        assert!(ArtifactFormat::from_path(Path::new("model.onnx")).is_err());
        assert!(ArtifactFormat::from_path(Path::new("model")).is_err());
    }

    #[cfg(not(feature = "sklearn"))]
    #[test]
    fn pickles_need_the_sklearn_feature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_model.pkl");
        std::fs::write(&path, b"\x80\x04").unwrap();
        assert!(matches!(load_model(&path), Err(InferenceError::UnsupportedFormat(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_model(Path::new("/nonexistent/best_model.json")).unwrap_err();
        assert!(matches!(err, InferenceError::Io { .. }));
    }
}
