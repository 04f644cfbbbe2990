use chemengine::DescriptorValues;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{DescriptorName, FeatureSchema};

/// Valores de descriptores dispuestos en el orden del esquema.
///
/// Los valores pueden ser `NaN` (carga parcial indefinida).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DescriptorVector {
    values: IndexMap<DescriptorName, f64>,
}

impl DescriptorVector {
    pub fn from_values(values: &DescriptorValues, schema: &FeatureSchema) -> Self {
        Self { values: schema.names().iter().map(|name| (*name, name.value_in(values))).collect() }
    }

    /// Construye un vector a partir de pares ya ordenados.
    pub fn from_pairs<I: IntoIterator<Item = (DescriptorName, f64)>>(pairs: I) -> Self {
        Self { values: pairs.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: DescriptorName) -> Option<f64> {
        self.values.get(&name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = DescriptorName> + '_ {
        self.values.keys().copied()
    }

    /// Valores en orden, listos para el clasificador.
    pub fn to_features(&self) -> Vec<f64> {
        self.values.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DescriptorName, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// `true` si los nombres coinciden con el esquema en número y orden.
    pub fn matches_schema(&self, schema: &FeatureSchema) -> bool {
        self.len() == schema.len() && self.names().zip(schema.names()).all(|(a, b)| a == *b)
    }
}
