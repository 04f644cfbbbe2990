//! Inferencia sobre vectores de descriptores con clasificadores binarios
//! pre-entrenados.
pub mod artifact;
pub mod classifier;
pub mod engine;
pub mod errors;
pub mod model;
#[cfg(feature = "sklearn")]
pub mod sklearn;

pub use artifact::{load_model, load_schema, sha256_hex, ArtifactFormat, LoadedModel};
pub use classifier::Classifier;
pub use engine::{InferenceEngine, PredictionResult};
pub use errors::InferenceError;
pub use model::{Estimator, ModelArtifact};
