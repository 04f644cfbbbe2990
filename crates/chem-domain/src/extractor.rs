use chemengine::ChemEngine;

use crate::{DescriptorVector, DomainError, FeatureSchema};

/// Convierte un SMILES en el vector de descriptores que espera el modelo.
pub struct DescriptorExtractor {
    engine: ChemEngine,
    schema: FeatureSchema,
}

impl DescriptorExtractor {
    pub fn new(engine: ChemEngine, schema: FeatureSchema) -> Self {
        Self { engine, schema }
    }

    pub fn native(schema: FeatureSchema) -> Self {
        Self::new(ChemEngine::native(), schema)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn backend_name(&self) -> &'static str {
        self.engine.backend_name()
    }

    /// Calcula los descriptores y los ordena según el esquema.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidInput` si el SMILES no es válido; no se devuelve
    /// ningún resultado parcial.
    pub fn extract(&self, smiles: &str) -> Result<DescriptorVector, DomainError> {
        let smiles = smiles.trim();
        let values = self.engine.descriptors(smiles)?;
        let vector = DescriptorVector::from_values(&values, &self.schema);
        let undefined = vector.iter().filter(|(_, v)| v.is_nan()).count();
        if undefined > 0 {
            log::debug!("{smiles}: {undefined} descriptores indefinidos (NaN)");
        }
        Ok(vector)
    }
}
