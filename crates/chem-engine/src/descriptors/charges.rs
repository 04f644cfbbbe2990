//! Cargas parciales de Gasteiger-Marsili (PEOE).
//!
//! Los hidrógenos implícitos se expanden como nodos propios para la
//! iteración. Si algún átomo no tiene parámetros, todas las cargas son `NaN`.
use crate::molecule::{Hybridization, Molecule};

const ITERATIONS: usize = 12;
const DAMP: f64 = 0.5;
const DAMP_SCALE: f64 = 0.5;
/// Electronegatividad del catión H+.
const IONX_H: f64 = 20.02;

/// Parámetros (a, b, c) de `χ = a + b·q + c·q²`.
type Params = (f64, f64, f64);

const HYDROGEN: Params = (7.17, 6.24, -0.56);

fn params(z: u8, hybridization: Hybridization) -> Option<Params> {
    let sp3 = |z: u8| -> Option<Params> {
        match z {
            6 => Some((7.98, 9.18, 1.88)),
            7 => Some((11.54, 10.82, 1.36)),
            8 => Some((14.18, 12.92, 1.39)),
            9 => Some((14.66, 13.85, 2.31)),
            15 => Some((8.90, 8.24, 0.96)),
            16 => Some((10.14, 9.13, 1.38)),
            17 => Some((11.00, 9.69, 1.35)),
            35 => Some((10.08, 8.47, 1.16)),
            53 => Some((9.90, 7.96, 0.96)),
            _ => None,
        }
    };
    let specific = match (z, hybridization) {
        (1, _) => Some(HYDROGEN),
        (6, Hybridization::Sp2) => Some((8.79, 9.32, 1.51)),
        (6, Hybridization::Sp) => Some((10.39, 9.45, 0.73)),
        (7, Hybridization::Sp2) => Some((12.87, 11.15, 0.85)),
        (7, Hybridization::Sp) => Some((17.68, 12.70, -0.27)),
        (8, Hybridization::Sp2) => Some((17.07, 13.79, 0.47)),
        (16, Hybridization::Sp2) => Some((10.88, 9.49, 1.33)),
        _ => None,
    };
    specific.or_else(|| sp3(z))
}

struct Node {
    params: Params,
    ion_x: f64,
    charge: f64,
    neighbors: Vec<usize>,
}

/// Cargas de Gasteiger de los átomos explícitos de la molécula.
pub fn gasteiger(mol: &Molecule) -> Vec<f64> {
    let n = mol.atom_count();
    let mut nodes: Vec<Node> = Vec::with_capacity(n);
    for (i, atom) in mol.atoms().iter().enumerate() {
        let Some(p) = params(atom.atomic_number(), atom.hybridization) else {
            log::debug!("sin parámetros de Gasteiger para {} ({:?})", atom.element.symbol, atom.hybridization);
            return vec![f64::NAN; n];
        };
        let ion_x = if atom.atomic_number() == 1 { IONX_H } else { p.0 + p.1 + p.2 };
        nodes.push(Node { params: p,
                          ion_x,
                          charge: f64::from(atom.charge),
                          neighbors: mol.neighbors(i).iter().map(|&(j, _)| j).collect() });
    }
    for (i, atom) in mol.atoms().iter().enumerate() {
        for _ in 0..atom.hydrogens {
            let h = nodes.len();
            nodes.push(Node { params: HYDROGEN,
                              ion_x: IONX_H,
                              charge: 0.0,
                              neighbors: vec![i] });
            nodes[i].neighbors.push(h);
        }
    }

    let mut damp = DAMP;
    for _ in 0..ITERATIONS {
        let energy: Vec<f64> = nodes.iter()
                                    .map(|node| {
                                        let (a, b, c) = node.params;
                                        a + node.charge * (b + c * node.charge)
                                    })
                                    .collect();
        let deltas: Vec<f64> = nodes.iter()
                                    .enumerate()
                                    .map(|(i, node)| {
                                        node.neighbors
                                            .iter()
                                            .map(|&j| {
                                                let dx = energy[j] - energy[i];
                                                let denom = if dx < 0.0 { nodes[j].ion_x } else { node.ion_x };
                                                dx / denom
                                            })
                                            .sum::<f64>()
                                    })
                                    .collect();
        for (node, dq) in nodes.iter_mut().zip(deltas) {
            node.charge += damp * dq;
        }
        damp *= DAMP_SCALE;
    }

    nodes.into_iter().take(n).map(|node| node.charge).collect()
}

/// `(max, min)` de las cargas parciales; `NaN` si alguna está indefinida.
pub fn partial_charge_extremes(mol: &Molecule) -> (f64, f64) {
    let charges = gasteiger(mol);
    if charges.is_empty() || charges.iter().any(|c| c.is_nan()) {
        return (f64::NAN, f64::NAN);
    }
    let max = charges.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = charges.iter().copied().fold(f64::INFINITY, f64::min);
    (max, min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ethanol_charges_are_finite_and_polarised() {
        let mol = Molecule::from_smiles("CCO").unwrap();
        let charges = gasteiger(&mol);
        assert_eq!(charges.len(), 3);
        assert!(charges.iter().all(|c| c.is_finite()));
        // el oxígeno es el átomo más negativo
        assert!(charges[2] < charges[0] && charges[2] < charges[1]);
        let (max, min) = partial_charge_extremes(&mol);
        assert_eq!(min, charges[2]);
        assert!(max > 0.0);
    }

    #[test]
    fn symmetric_molecule_has_symmetric_charges() {
        let mol = Molecule::from_smiles("OCCO").unwrap();
        let charges = gasteiger(&mol);
        assert!((charges[0] - charges[3]).abs() < 1e-12);
        assert!((charges[1] - charges[2]).abs() < 1e-12);
    }

    #[test]
    fn missing_parameters_give_nan() {
        let mol = Molecule::from_smiles("[Na+].[Cl-]").unwrap();
        let (max, min) = partial_charge_extremes(&mol);
        assert!(max.is_nan() && min.is_nan());
    }

    #[test]
    fn formal_charges_seed_the_iteration() {
        let cation = Molecule::from_smiles("C[NH3+]").unwrap();
        let neutral = Molecule::from_smiles("CN").unwrap();
        assert!(gasteiger(&cation)[1] > gasteiger(&neutral)[1]);
    }
}
