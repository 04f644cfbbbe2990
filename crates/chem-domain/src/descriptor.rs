use std::fmt;
use std::str::FromStr;

use chemengine::DescriptorValues;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Nombre canónico de cada descriptor (columna del modelo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DescriptorName {
    MolWt,
    LogP,
    NumHDonors,
    NumHAcceptors,
    NumRotatableBonds,
    #[serde(rename = "TPSA")]
    Tpsa,
    NumAromaticRings,
    NumAliphaticRings,
    NumHeavyAtoms,
    RingCount,
    FractionCsp3,
    #[serde(rename = "MolMR")]
    MolMr,
    #[serde(rename = "BertzCT")]
    BertzCt,
    Chi0v,
    Chi1v,
    Kappa1,
    Kappa2,
    Kappa3,
    NumSaturatedRings,
    MaxPartialCharge,
    MinPartialCharge,
}

impl DescriptorName {
    pub const ALL: [DescriptorName; 21] = [DescriptorName::MolWt,
                                           DescriptorName::LogP,
                                           DescriptorName::NumHDonors,
                                           DescriptorName::NumHAcceptors,
                                           DescriptorName::NumRotatableBonds,
                                           DescriptorName::Tpsa,
                                           DescriptorName::NumAromaticRings,
                                           DescriptorName::NumAliphaticRings,
                                           DescriptorName::NumHeavyAtoms,
                                           DescriptorName::RingCount,
                                           DescriptorName::FractionCsp3,
                                           DescriptorName::MolMr,
                                           DescriptorName::BertzCt,
                                           DescriptorName::Chi0v,
                                           DescriptorName::Chi1v,
                                           DescriptorName::Kappa1,
                                           DescriptorName::Kappa2,
                                           DescriptorName::Kappa3,
                                           DescriptorName::NumSaturatedRings,
                                           DescriptorName::MaxPartialCharge,
                                           DescriptorName::MinPartialCharge];

    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorName::MolWt => "MolWt",
            DescriptorName::LogP => "LogP",
            DescriptorName::NumHDonors => "NumHDonors",
            DescriptorName::NumHAcceptors => "NumHAcceptors",
            DescriptorName::NumRotatableBonds => "NumRotatableBonds",
            DescriptorName::Tpsa => "TPSA",
            DescriptorName::NumAromaticRings => "NumAromaticRings",
            DescriptorName::NumAliphaticRings => "NumAliphaticRings",
            DescriptorName::NumHeavyAtoms => "NumHeavyAtoms",
            DescriptorName::RingCount => "RingCount",
            DescriptorName::FractionCsp3 => "FractionCsp3",
            DescriptorName::MolMr => "MolMR",
            DescriptorName::BertzCt => "BertzCT",
            DescriptorName::Chi0v => "Chi0v",
            DescriptorName::Chi1v => "Chi1v",
            DescriptorName::Kappa1 => "Kappa1",
            DescriptorName::Kappa2 => "Kappa2",
            DescriptorName::Kappa3 => "Kappa3",
            DescriptorName::NumSaturatedRings => "NumSaturatedRings",
            DescriptorName::MaxPartialCharge => "MaxPartialCharge",
            DescriptorName::MinPartialCharge => "MinPartialCharge",
        }
    }

    /// Valor de este descriptor dentro del registro calculado por el motor.
    pub fn value_in(&self, values: &DescriptorValues) -> f64 {
        match self {
            DescriptorName::MolWt => values.mol_wt,
            DescriptorName::LogP => values.log_p,
            DescriptorName::NumHDonors => f64::from(values.num_h_donors),
            DescriptorName::NumHAcceptors => f64::from(values.num_h_acceptors),
            DescriptorName::NumRotatableBonds => f64::from(values.num_rotatable_bonds),
            DescriptorName::Tpsa => values.tpsa,
            DescriptorName::NumAromaticRings => f64::from(values.num_aromatic_rings),
            DescriptorName::NumAliphaticRings => f64::from(values.num_aliphatic_rings),
            DescriptorName::NumHeavyAtoms => f64::from(values.num_heavy_atoms),
            DescriptorName::RingCount => f64::from(values.ring_count),
            DescriptorName::FractionCsp3 => values.fraction_csp3,
            DescriptorName::MolMr => values.mol_mr,
            DescriptorName::BertzCt => values.bertz_ct,
            DescriptorName::Chi0v => values.chi0v,
            DescriptorName::Chi1v => values.chi1v,
            DescriptorName::Kappa1 => values.kappa1,
            DescriptorName::Kappa2 => values.kappa2,
            DescriptorName::Kappa3 => values.kappa3,
            DescriptorName::NumSaturatedRings => f64::from(values.num_saturated_rings),
            DescriptorName::MaxPartialCharge => values.max_partial_charge,
            DescriptorName::MinPartialCharge => values.min_partial_charge,
        }
    }
}

impl FromStr for DescriptorName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DescriptorName::ALL.iter()
                           .copied()
                           .find(|name| name.as_str() == s)
                           .ok_or_else(|| DomainError::ValidationError(format!("descriptor desconocido: {s}")))
    }
}

impl fmt::Display for DescriptorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
