//! Motor químico: lectura de SMILES, saneamiento del grafo molecular y
//! cálculo de los descriptores que consume el predictor.
//!
//! El backend nativo no necesita Python. Con la feature `rdkit` se puede
//! delegar el cálculo en RDKit a través de `pyo3`.
#[cfg(feature = "rdkit")]
pub mod core;
pub mod descriptors;
pub mod elements;
pub mod molecule;
pub mod rings;
pub mod smiles;

pub use descriptors::{DescriptorValues, DESCRIPTOR_NAMES};
pub use molecule::Molecule;
#[cfg(feature = "rdkit")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("SMILES inválido en la posición {position}: {reason}")]
    Parse { position: usize, reason: String },
    #[error("Molécula químicamente inválida: {0}")]
    Sanitize(String),
    #[error("RDKit rechazó el SMILES")]
    Rejected,
    #[cfg(feature = "rdkit")]
    #[error("Error inicializando Python/RDKit: {0}")]
    Init(PyErr),
    #[cfg(feature = "rdkit")]
    #[error("Error obteniendo descriptores de RDKit: {0}")]
    Backend(PyErr),
}

impl EngineError {
    /// `true` cuando el fallo se debe al texto de entrada y no al backend.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, EngineError::Parse { .. } | EngineError::Sanitize(_) | EngineError::Rejected)
    }
}

/// Capacidad de calcular descriptores a partir de un SMILES.
pub trait DescriptorBackend {
    fn name(&self) -> &'static str;
    fn descriptors(&self, smiles: &str) -> Result<DescriptorValues, EngineError>;
}

/// Implementación en Rust puro.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

impl DescriptorBackend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn descriptors(&self, smiles: &str) -> Result<DescriptorValues, EngineError> {
        let molecule = Molecule::from_smiles(smiles)?;
        Ok(DescriptorValues::compute(&molecule))
    }
}

#[cfg(feature = "rdkit")]
pub struct RdkitBackend {
    _private: (),
}

#[cfg(feature = "rdkit")]
impl RdkitBackend {
    pub fn init() -> Result<Self, EngineError> {
        core::init_python().map_err(EngineError::Init)?;
        Ok(Self { _private: () })
    }
}

#[cfg(feature = "rdkit")]
impl DescriptorBackend for RdkitBackend {
    fn name(&self) -> &'static str {
        "rdkit"
    }

    fn descriptors(&self, smiles: &str) -> Result<DescriptorValues, EngineError> {
        core::get_descriptors(smiles).map_err(EngineError::Backend)?.ok_or(EngineError::Rejected)
    }
}

pub struct ChemEngine {
    backend: Box<dyn DescriptorBackend>,
}

impl ChemEngine {
    pub fn native() -> Self {
        Self::with_backend(Box::new(NativeBackend))
    }

    #[cfg(feature = "rdkit")]
    pub fn rdkit() -> Result<Self, EngineError> {
        Ok(Self::with_backend(Box::new(RdkitBackend::init()?)))
    }

    pub fn with_backend(backend: Box<dyn DescriptorBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn descriptors(&self, smiles: &str) -> Result<DescriptorValues, EngineError> {
        let values = self.backend.descriptors(smiles)?;
        log::debug!("descriptores calculados con {} para {smiles}", self.backend.name());
        Ok(values)
    }
}

impl Default for ChemEngine {
    fn default() -> Self {
        Self::native()
    }
}
