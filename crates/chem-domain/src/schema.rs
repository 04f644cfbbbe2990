use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{DescriptorName, DomainError};

/// Lista ordenada de descriptores que espera el modelo.
///
/// Puede ser un subconjunto o una permutación de los 21 descriptores, pero
/// nunca vacía, con duplicados ni con nombres desconocidos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<DescriptorName>,
}

impl FeatureSchema {
    pub fn new(names: Vec<DescriptorName>) -> Result<Self, DomainError> {
        if names.is_empty() {
            return Err(DomainError::ValidationError("el esquema de columnas está vacío".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|n| !seen.insert(**n)) {
            return Err(DomainError::ValidationError(format!("columna duplicada en el esquema: {dup}")));
        }
        Ok(Self { names })
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, DomainError> {
        let parsed = names.iter().map(|n| n.as_ref().parse()).collect::<Result<Vec<DescriptorName>, _>>()?;
        Self::new(parsed)
    }

    /// Los 21 descriptores en orden canónico.
    pub fn canonical() -> Self {
        Self { names: DescriptorName::ALL.to_vec() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DomainError> {
        let text = fs::read_to_string(path).map_err(|e| {
                                                 DomainError::ExternalError(format!("no se pudo leer {}: {e}", path.display()))
                                             })?;
        Self::from_json_str(&text)
    }

    pub fn names(&self) -> &[DescriptorName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: DescriptorName) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }

    pub fn as_strs(&self) -> Vec<&'static str> {
        self.names.iter().map(DescriptorName::as_str).collect()
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = DomainError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_names(&value)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.names.iter().map(|n| n.as_str().to_string()).collect()
    }
}
