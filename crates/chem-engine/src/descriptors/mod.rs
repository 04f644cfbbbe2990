//! Cálculo de los 21 descriptores moleculares que consume el clasificador.
pub mod charges;
pub mod crippen;
pub mod physchem;
pub mod topology;

use serde::{Deserialize, Deserializer, Serialize};

use crate::molecule::Molecule;

/// Nombres canónicos, en el orden en que se calculan.
pub const DESCRIPTOR_NAMES: [&str; 21] = ["MolWt",
                                          "LogP",
                                          "NumHDonors",
                                          "NumHAcceptors",
                                          "NumRotatableBonds",
                                          "TPSA",
                                          "NumAromaticRings",
                                          "NumAliphaticRings",
                                          "NumHeavyAtoms",
                                          "RingCount",
                                          "FractionCsp3",
                                          "MolMR",
                                          "BertzCT",
                                          "Chi0v",
                                          "Chi1v",
                                          "Kappa1",
                                          "Kappa2",
                                          "Kappa3",
                                          "NumSaturatedRings",
                                          "MaxPartialCharge",
                                          "MinPartialCharge"];

/// `null` en JSON representa una carga parcial indefinida.
fn nan_when_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where D: Deserializer<'de>
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptorValues {
    #[serde(rename = "MolWt")]
    pub mol_wt: f64,
    #[serde(rename = "LogP")]
    pub log_p: f64,
    #[serde(rename = "NumHDonors")]
    pub num_h_donors: u32,
    #[serde(rename = "NumHAcceptors")]
    pub num_h_acceptors: u32,
    #[serde(rename = "NumRotatableBonds")]
    pub num_rotatable_bonds: u32,
    #[serde(rename = "TPSA")]
    pub tpsa: f64,
    #[serde(rename = "NumAromaticRings")]
    pub num_aromatic_rings: u32,
    #[serde(rename = "NumAliphaticRings")]
    pub num_aliphatic_rings: u32,
    #[serde(rename = "NumHeavyAtoms")]
    pub num_heavy_atoms: u32,
    #[serde(rename = "RingCount")]
    pub ring_count: u32,
    #[serde(rename = "FractionCsp3")]
    pub fraction_csp3: f64,
    #[serde(rename = "MolMR")]
    pub mol_mr: f64,
    #[serde(rename = "BertzCT")]
    pub bertz_ct: f64,
    #[serde(rename = "Chi0v")]
    pub chi0v: f64,
    #[serde(rename = "Chi1v")]
    pub chi1v: f64,
    #[serde(rename = "Kappa1")]
    pub kappa1: f64,
    #[serde(rename = "Kappa2")]
    pub kappa2: f64,
    #[serde(rename = "Kappa3")]
    pub kappa3: f64,
    #[serde(rename = "NumSaturatedRings")]
    pub num_saturated_rings: u32,
    #[serde(rename = "MaxPartialCharge", deserialize_with = "nan_when_null")]
    pub max_partial_charge: f64,
    #[serde(rename = "MinPartialCharge", deserialize_with = "nan_when_null")]
    pub min_partial_charge: f64,
}

impl DescriptorValues {
    /// Calcula todos los descriptores de una molécula ya saneada.
    pub fn compute(mol: &Molecule) -> Self {
        let (log_p, mol_mr) = crippen::logp_mr(mol);
        let (aromatic, aliphatic, saturated, rings) = physchem::ring_counts(mol);
        let (kappa1, kappa2, kappa3) = topology::kappas(mol);
        let (max_partial_charge, min_partial_charge) = charges::partial_charge_extremes(mol);
        Self { mol_wt: physchem::mol_wt(mol),
               log_p,
               num_h_donors: physchem::h_donors(mol) as u32,
               num_h_acceptors: physchem::h_acceptors(mol) as u32,
               num_rotatable_bonds: physchem::rotatable_bonds(mol) as u32,
               tpsa: physchem::tpsa(mol),
               num_aromatic_rings: aromatic as u32,
               num_aliphatic_rings: aliphatic as u32,
               num_heavy_atoms: physchem::heavy_atoms(mol) as u32,
               ring_count: rings as u32,
               fraction_csp3: physchem::fraction_csp3(mol),
               mol_mr,
               bertz_ct: topology::bertz_ct(mol),
               chi0v: topology::chi0v(mol),
               chi1v: topology::chi1v(mol),
               kappa1,
               kappa2,
               kappa3,
               num_saturated_rings: saturated as u32,
               max_partial_charge,
               min_partial_charge }
    }

    /// Pares (nombre canónico, valor) en el orden de [`DESCRIPTOR_NAMES`].
    pub fn entries(&self) -> [(&'static str, f64); 21] {
        let values = [self.mol_wt,
                      self.log_p,
                      f64::from(self.num_h_donors),
                      f64::from(self.num_h_acceptors),
                      f64::from(self.num_rotatable_bonds),
                      self.tpsa,
                      f64::from(self.num_aromatic_rings),
                      f64::from(self.num_aliphatic_rings),
                      f64::from(self.num_heavy_atoms),
                      f64::from(self.ring_count),
                      self.fraction_csp3,
                      self.mol_mr,
                      self.bertz_ct,
                      self.chi0v,
                      self.chi1v,
                      self.kappa1,
                      self.kappa2,
                      self.kappa3,
                      f64::from(self.num_saturated_rings),
                      self.max_partial_charge,
                      self.min_partial_charge];
        let mut out = [("", 0.0); 21];
        for (slot, (name, value)) in out.iter_mut().zip(DESCRIPTOR_NAMES.iter().zip(values)) {
            *slot = (*name, value);
        }
        out
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries().into_iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}
