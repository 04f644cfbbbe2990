use chem_domain::{DescriptorVector, FeatureSchema};
use serde::Serialize;

use crate::classifier::Classifier;
use crate::InferenceError;

/// Resultado de clasificar un vector de descriptores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: i64,
    /// Probabilidades en el orden de `classes`.
    pub probabilities: [f64; 2],
    pub classes: [i64; 2],
}

impl PredictionResult {
    /// La segunda clase del modelo es la actividad tipo sertralina.
    pub fn is_positive(&self) -> bool {
        self.label == self.classes[1]
    }

    pub fn positive_probability(&self) -> f64 {
        self.probabilities[1]
    }
}

/// Clasificador ligado al esquema de columnas con el que se entrenó.
pub struct InferenceEngine {
    model: Box<dyn Classifier>,
    schema: FeatureSchema,
}

impl InferenceEngine {
    /// # Errors
    ///
    /// `SchemaMismatch` si el modelo espera otro número de columnas o, cuando
    /// guarda sus nombres, otros nombres u otro orden.
    pub fn new(model: Box<dyn Classifier>, schema: FeatureSchema) -> Result<Self, InferenceError> {
        if model.n_features() != schema.len() {
            return Err(InferenceError::SchemaMismatch(format!("el modelo espera {} columnas y el esquema tiene {}",
                                                              model.n_features(),
                                                              schema.len())));
        }
        if let Some(trained) = model.feature_names() {
            let expected = schema.as_strs();
            if let Some(pos) = trained.iter().zip(&expected).position(|(a, b)| a.as_str() != *b) {
                return Err(InferenceError::SchemaMismatch(format!("columna {pos}: el modelo usa {} y el esquema {}",
                                                                  trained[pos],
                                                                  expected[pos])));
            }
        }
        Ok(Self { model, schema })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn classes(&self) -> [i64; 2] {
        self.model.classes()
    }

    pub fn predict(&self, vector: &DescriptorVector) -> Result<PredictionResult, InferenceError> {
        if !vector.matches_schema(&self.schema) {
            let got: Vec<&str> = vector.names().map(|n| n.as_str()).collect();
            return Err(InferenceError::SchemaMismatch(format!("vector con columnas {got:?}, se esperaban {:?}",
                                                              self.schema.as_strs())));
        }
        let features = vector.to_features();
        let probabilities = self.model.predict_proba(&features).map_err(|e| self.name_feature(e))?;
        let label = self.model.predict_label(&features).map_err(|e| self.name_feature(e))?;
        let classes = self.model.classes();
        log::debug!("predicción {label} (p = {:.4})", probabilities[1]);
        Ok(PredictionResult { label,
                              probabilities,
                              classes })
    }

    fn name_feature(&self, err: InferenceError) -> InferenceError {
        match err {
            InferenceError::UndefinedFeature { index, .. } if index < self.schema.len() => {
                InferenceError::UndefinedFeature { index,
                                                   name: self.schema.names()[index].to_string() }
            }
            other => other,
        }
    }
}
