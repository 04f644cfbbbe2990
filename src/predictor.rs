//! Servicio del predictor: artefactos cargados una vez al arrancar y ciclo
//! SMILES → descriptores → predicción.
use chem_domain::{DescriptorExtractor, DescriptorVector, DomainError, FeatureSchema};
use chem_inference::{load_model, load_schema, InferenceEngine, InferenceError, PredictionResult};
use chemengine::ChemEngine;

use crate::config::{AppConfig, BackendKind};
use crate::errors::CoreError;

/// Resultado de analizar un SMILES enviado por el usuario.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// El texto no es un SMILES válido; no hay vector.
    Invalid { reason: String },
    Valid(DescriptorVector),
}

pub struct Predictor {
    extractor: DescriptorExtractor,
    engine: InferenceEngine,
    model_digest: Option<String>,
}

fn build_engine(backend: BackendKind) -> Result<ChemEngine, CoreError> {
    match backend {
        BackendKind::Native => Ok(ChemEngine::native()),
        #[cfg(feature = "rdkit")]
        BackendKind::Rdkit => Ok(ChemEngine::rdkit().map_err(DomainError::from)?),
        #[cfg(not(feature = "rdkit"))]
        BackendKind::Rdkit => Err(CoreError::Config("el backend rdkit requiere compilar con la feature `rdkit`".into())),
    }
}

impl Predictor {
    /// Carga esquema y modelo según la configuración.
    ///
    /// # Errors
    ///
    /// Cualquier fallo (fichero ausente, artefacto corrupto, esquema que no
    /// coincide con el modelo) es fatal: no se acepta ninguna entrada.
    pub fn load(config: &AppConfig) -> Result<Self, CoreError> {
        let schema = load_schema(&config.schema_path)?;
        let loaded = load_model(&config.model_path)?;
        let chem = build_engine(config.backend)?;
        log::info!("predictor listo: backend {}, {} columnas", chem.backend_name(), schema.len());
        let engine = InferenceEngine::new(loaded.classifier, schema.clone())?;
        let mut predictor = Self::new(DescriptorExtractor::new(chem, schema), engine)?;
        predictor.model_digest = Some(loaded.digest);
        Ok(predictor)
    }

    pub fn new(extractor: DescriptorExtractor, engine: InferenceEngine) -> Result<Self, CoreError> {
        if extractor.schema() != engine.schema() {
            return Err(InferenceError::SchemaMismatch("el extractor y el modelo usan esquemas distintos".into()).into());
        }
        Ok(Self { extractor,
                  engine,
                  model_digest: None })
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.engine.schema()
    }

    pub fn backend_name(&self) -> &'static str {
        self.extractor.backend_name()
    }

    /// SHA-256 del artefacto del modelo, si se cargó desde disco.
    pub fn model_digest(&self) -> Option<&str> {
        self.model_digest.as_deref()
    }

    /// Valida el SMILES y extrae sus descriptores.
    ///
    /// Sólo los fallos del backend (no de la entrada) se devuelven como error.
    pub fn analyze(&self, smiles: &str) -> Result<Analysis, DomainError> {
        match self.extractor.extract(smiles) {
            Ok(vector) => Ok(Analysis::Valid(vector)),
            Err(DomainError::InvalidInput(reason)) => {
                log::debug!("SMILES rechazado: {reason}");
                Ok(Analysis::Invalid { reason })
            }
            Err(other) => Err(other),
        }
    }

    pub fn predict(&self, vector: &DescriptorVector) -> Result<PredictionResult, InferenceError> {
        self.engine.predict(vector)
    }
}

#[cfg(test)]
mod tests {
    use chem_inference::{Estimator, ModelArtifact};

    use super::*;

    fn predictor(names: &[&str]) -> Predictor {
        let schema = FeatureSchema::from_names(names).unwrap();
        let lr = serde_json::json!({"kind": "logistic_regression",
                                    "coefficients": vec![0.0; names.len()],
                                    "intercept": 0.0});
        let model = ModelArtifact { format_version: 1,
                                    classes: [0, 1],
                                    n_features: names.len(),
                                    feature_names: None,
                                    scaler: None,
                                    estimator: serde_json::from_value::<Estimator>(lr).unwrap() };
        let engine = InferenceEngine::new(Box::new(model), schema.clone()).unwrap();
        Predictor::new(DescriptorExtractor::native(schema), engine).unwrap()
    }

    #[test]
    fn invalid_smiles_is_not_an_error() {
        let p = predictor(&["MolWt"]);
        assert!(matches!(p.analyze("not_a_smiles").unwrap(), Analysis::Invalid { .. }));
        assert!(matches!(p.analyze("CCO").unwrap(), Analysis::Valid(_)));
    }

    #[test]
    fn zero_model_ties_to_first_class() {
        let p = predictor(&["MolWt", "LogP"]);
        let Analysis::Valid(vector) = p.analyze("CCO").unwrap() else {
            panic!("etanol debería ser válido");
        };
        let result = p.predict(&vector).unwrap();
        assert_eq!(result.positive_probability(), 0.5);
        assert!(!result.is_positive());
    }

    #[test]
    fn extractor_and_engine_must_share_schema() {
        let schema = FeatureSchema::from_names(&["MolWt"]).unwrap();
        let other = FeatureSchema::from_names(&["LogP"]).unwrap();
        let model: ModelArtifact = serde_json::from_value(serde_json::json!({
            "format_version": 1, "n_features": 1,
            "estimator": {"kind": "logistic_regression", "coefficients": [1.0], "intercept": 0.0}
        })).unwrap();
        let engine = InferenceEngine::new(Box::new(model), schema).unwrap();
        assert!(Predictor::new(DescriptorExtractor::native(other), engine).is_err());
    }

    #[cfg(not(feature = "rdkit"))]
    #[test]
    fn rdkit_backend_needs_the_feature() {
        assert!(matches!(build_engine(BackendKind::Rdkit), Err(CoreError::Config(_))));
    }
}
