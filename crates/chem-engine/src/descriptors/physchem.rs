//! Descriptores fisicoquímicos: peso molecular, reglas de Lipinski, enlaces
//! rotables, TPSA, recuentos de anillos y fracción sp3.
use crate::elements;
use crate::molecule::{BondOrder, Hybridization, Molecule};

pub fn mol_wt(mol: &Molecule) -> f64 {
    let h = elements::hydrogen().weight;
    mol.atoms()
       .iter()
       .map(|a| a.isotope.map_or(a.element.weight, f64::from) + f64::from(a.hydrogens) * h)
       .sum()
}

pub fn heavy_atoms(mol: &Molecule) -> usize {
    mol.heavy_atom_count()
}

/// Donadores de H: N-H (neutro v3 o catión v4), O/S-H alifáticos neutros y `[nH]`.
pub fn h_donors(mol: &Molecule) -> usize {
    (0..mol.atom_count()).filter(|&i| {
                              let a = &mol.atoms()[i];
                              let valence = mol.total_valence(i);
                              match a.atomic_number() {
                                  7 if a.hydrogens > 0 && !a.aromatic => {
                                      valence == 3 || (a.charge == 1 && valence == 4)
                                  }
                                  7 => a.aromatic && a.hydrogens == 1 && a.charge == 0,
                                  8 | 16 => !a.aromatic && a.hydrogens == 1 && a.charge == 0,
                                  _ => false,
                              }
                          })
                          .count()
}

fn double_bonded_to_heteroatom(mol: &Molecule, atom: usize, ring_bonds: bool) -> bool {
    mol.neighbors(atom).iter().any(|&(j, b)| {
                                  let bond = &mol.bonds()[b];
                                  bond.order == BondOrder::Double
                                  && (ring_bonds || !bond.in_ring)
                                  && matches!(mol.atoms()[j].atomic_number(), 7 | 8 | 15 | 16)
                              })
}

/// Aceptores de H según los patrones de Lipinski.
pub fn h_acceptors(mol: &Molecule) -> usize {
    (0..mol.atom_count()).filter(|&i| {
                              let a = &mol.atoms()[i];
                              let valence = mol.total_valence(i);
                              match a.atomic_number() {
                                  8 | 16 if a.aromatic => a.charge == 0,
                                  8 | 16 if a.charge < 0 => true,
                                  8 | 16 if valence == 2 && a.hydrogens == 0 => true,
                                  8 | 16 if valence == 2 && a.hydrogens == 1 => {
                                      mol.neighbors(i).iter().any(|&(j, b)| {
                                                                 mol.bonds()[b].order == BondOrder::Single
                                                                 && !double_bonded_to_heteroatom(mol, j, true)
                                                             })
                                  }
                                  7 if a.aromatic => a.hydrogens == 0 && a.charge == 0,
                                  7 if valence == 3 => !mol.neighbors(i).iter().any(|&(j, b)| {
                                                                                 mol.bonds()[b].order == BondOrder::Single
                                                                                 && double_bonded_to_heteroatom(mol, j, false)
                                                                             }),
                                  9 => true,
                                  _ => false,
                              }
                          })
                          .count()
}

/// Carbonilo/tiocarbonilo (C de grado 3 con `=N|O|S`) unido por enlace no
/// anular a N, O o S no terminal; esos átomos no cuentan para rotables.
fn amide_like(mol: &Molecule, atom: usize) -> bool {
    let is_carbonyl = |c: usize| {
        let a = &mol.atoms()[c];
        a.atomic_number() == 6
        && !a.aromatic
        && mol.degree(c) == 3
        && mol.neighbors(c).iter().any(|&(k, b)| {
                                      mol.bonds()[b].order == BondOrder::Double && matches!(mol.atoms()[k].atomic_number(), 7 | 8 | 16)
                                  })
    };
    let is_hetero = |x: usize| {
        let a = &mol.atoms()[x];
        match a.atomic_number() {
            7 => true,
            8 => !a.aromatic,
            16 => !a.aromatic && mol.degree(x) != 1,
            _ => false,
        }
    };
    mol.neighbors(atom).iter().any(|&(j, b)| {
                                  let bond = &mol.bonds()[b];
                                  bond.order == BondOrder::Single
                                  && !bond.in_ring
                                  && ((is_carbonyl(atom) && is_hetero(j)) || (is_hetero(atom) && is_carbonyl(j)))
                              })
}

/// CX3 con tres halógenos iguales o carbono cuaternario con tres metilos.
fn bulky_terminal(mol: &Molecule, atom: usize) -> bool {
    let a = &mol.atoms()[atom];
    if a.atomic_number() != 6 || a.aromatic {
        return false;
    }
    for halogen in [9, 17, 35] {
        let count = mol.neighbors(atom).iter().filter(|&&(j, _)| mol.atoms()[j].atomic_number() == halogen).count();
        if count >= 3 {
            return true;
        }
    }
    let methyls = mol.neighbors(atom)
                     .iter()
                     .filter(|&&(j, _)| {
                         let n = &mol.atoms()[j];
                         n.atomic_number() == 6 && !n.aromatic && n.hydrogens == 3
                     })
                     .count();
    methyls >= 3
}

/// Enlaces rotables (definición estricta).
pub fn rotatable_bonds(mol: &Molecule) -> usize {
    let eligible = |i: usize, amide_check: bool| {
        mol.degree(i) > 1
        && !mol.neighbors(i).iter().any(|&(_, b)| mol.bonds()[b].order == BondOrder::Triple)
        && !bulky_terminal(mol, i)
        && !(amide_check && amide_like(mol, i))
    };
    mol.bonds()
       .iter()
       .filter(|b| b.order == BondOrder::Single && !b.in_ring)
       .filter(|b| {
           let (a, c) = (b.a, b.b);
           (eligible(a, true) && eligible(c, false)) || (eligible(c, true) && eligible(a, false))
       })
       .count()
}

fn in_three_ring(mol: &Molecule, atom: usize) -> bool {
    mol.rings().iter().any(|r| r.len() == 3 && r.contains_atom(atom))
}

/// Superficie polar topológica de Ertl (sólo N y O).
pub fn tpsa(mol: &Molecule) -> f64 {
    (0..mol.atom_count()).map(|i| polar_contribution(mol, i)).sum()
}

fn polar_contribution(mol: &Molecule, i: usize) -> f64 {
    let atom = &mol.atoms()[i];
    let z = atom.atomic_number();
    if z != 7 && z != 8 {
        return 0.0;
    }
    let nbrs = mol.neighbors(i).iter().filter(|&&(j, _)| mol.atoms()[j].is_heavy()).count();
    let h = atom.hydrogens as usize;
    let chg = atom.charge;
    let [single, double, triple, arom] = mol.bond_order_counts(i);
    let ring3 = in_three_ring(mol, i);

    let tabulated = if z == 7 {
        match (nbrs, h, chg) {
            (1, 0, 0) if triple == 1 => Some(23.79),
            (1, 1, 0) if double == 1 => Some(23.85),
            (1, 2, 0) if single == 1 => Some(26.02),
            (1, 2, 1) if double == 1 => Some(25.59),
            (1, 3, 1) if single == 1 => Some(27.64),
            (2, 0, 0) if single == 1 && double == 1 => Some(12.36),
            (2, 0, 0) if triple == 1 && double == 1 => Some(13.6),
            (2, 1, 0) if single == 2 && ring3 => Some(21.94),
            (2, 1, 0) if single == 2 => Some(12.03),
            (2, 0, 1) if triple == 1 && single == 1 => Some(4.36),
            (2, 1, 1) if double == 1 && single == 1 => Some(13.97),
            (2, 2, 1) if single == 2 => Some(16.61),
            (2, 0, 0) if arom == 2 => Some(12.89),
            (2, 1, 0) if arom == 2 => Some(15.79),
            (2, 1, 1) if arom == 2 => Some(14.14),
            (3, 0, 0) if single == 3 && ring3 => Some(3.01),
            (3, 0, 0) if single == 3 => Some(3.24),
            (3, 0, 0) if single == 1 && double == 2 => Some(11.68),
            (3, 0, 1) if single == 2 && double == 1 => Some(3.01),
            (3, 1, 1) if single == 3 => Some(4.44),
            (3, 0, 0) if arom == 3 => Some(4.41),
            (3, 0, 0) if single == 1 && arom == 2 => Some(4.93),
            (3, 0, 0) if double == 1 && arom == 2 => Some(8.39),
            (3, 0, 1) if arom == 3 => Some(4.10),
            (3, 0, 1) if single == 1 && arom == 2 => Some(3.88),
            (4, 0, 1) if single == 4 => Some(0.0),
            _ => None,
        }
    } else {
        match (nbrs, h, chg) {
            (1, 0, 0) if double == 1 => Some(17.07),
            (1, 1, 0) if single == 1 => Some(20.23),
            (1, 0, -1) if single == 1 => Some(23.06),
            (2, 0, 0) if single == 2 && ring3 => Some(12.53),
            (2, 0, 0) if single == 2 => Some(9.23),
            (2, 0, 0) if arom == 2 => Some(13.14),
            _ => None,
        }
    };

    tabulated.unwrap_or_else(|| {
                 let (base, per_nbr) = if z == 7 { (30.5, 8.2) } else { (28.5, 8.6) };
                 (base - per_nbr * nbrs as f64 + 1.5 * h as f64).max(0.0)
             })
}

/// `(aromáticos, alifáticos, saturados, total)` sobre el SSSR.
pub fn ring_counts(mol: &Molecule) -> (usize, usize, usize, usize) {
    let mut aromatic = 0;
    let mut aliphatic = 0;
    let mut saturated = 0;
    for ring in mol.rings() {
        let orders: Vec<BondOrder> = ring.bonds.iter().map(|&b| mol.bonds()[b].order).collect();
        if orders.iter().all(|o| *o == BondOrder::Aromatic) {
            aromatic += 1;
        } else {
            aliphatic += 1;
            if orders.iter().all(|o| *o == BondOrder::Single) {
                saturated += 1;
            }
        }
    }
    (aromatic, aliphatic, saturated, mol.rings().len())
}

pub fn fraction_csp3(mol: &Molecule) -> f64 {
    let carbons: Vec<_> = mol.atoms().iter().filter(|a| a.atomic_number() == 6).collect();
    if carbons.is_empty() {
        return 0.0;
    }
    let sp3 = carbons.iter().filter(|a| a.hybridization == Hybridization::Sp3).count();
    sp3 as f64 / carbons.len() as f64
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const CAFFEINE: &str = "CN1C=NC2=C1C(=O)N(C(=O)N2C)C";

    fn mol(smiles: &str) -> Molecule {
        Molecule::from_smiles(smiles).unwrap()
    }

    #[test]
    fn ethanol_lipinski() {
        let m = mol("CCO");
        assert_abs_diff_eq!(mol_wt(&m), 46.069, epsilon = 1e-3);
        assert_eq!(h_donors(&m), 1);
        assert_eq!(h_acceptors(&m), 1);
        assert_eq!(rotatable_bonds(&m), 0);
        assert_abs_diff_eq!(tpsa(&m), 20.23, epsilon = 1e-9);
    }

    #[test]
    fn caffeine_polar_surface_and_rings() {
        let m = mol(CAFFEINE);
        assert_abs_diff_eq!(tpsa(&m), 61.82, epsilon = 1e-6);
        assert_eq!(h_donors(&m), 0);
        assert_eq!(h_acceptors(&m), 6);
        assert_eq!(ring_counts(&m), (2, 0, 0, 2));
        assert_eq!(heavy_atoms(&m), 14);
        assert_abs_diff_eq!(mol_wt(&m), 194.194, epsilon = 1e-2);
    }

    #[test]
    fn rotatable_bonds_strict() {
        assert_eq!(rotatable_bonds(&mol("CCCC")), 1);
        assert_eq!(rotatable_bonds(&mol("c1ccccc1CC")), 1);
        // amida: el enlace C(=O)-N no rota
        assert_eq!(rotatable_bonds(&mol("CC(=O)NC")), 0);
        assert_eq!(rotatable_bonds(&mol("CC#CC")), 0);
    }

    #[test]
    fn saturated_and_aliphatic_rings() {
        assert_eq!(ring_counts(&mol("C1CCCCC1")), (0, 1, 1, 1));
        assert_eq!(ring_counts(&mol("C1=CCCCC1")), (0, 1, 0, 1));
        assert_eq!(ring_counts(&mol("c1ccc2c(c1)CCCC2")), (1, 1, 0, 2));
    }

    #[test]
    fn fraction_sp3() {
        assert_abs_diff_eq!(fraction_csp3(&mol("CCO")), 1.0);
        assert_abs_diff_eq!(fraction_csp3(&mol("c1ccccc1C")), 1.0 / 7.0);
        assert_abs_diff_eq!(fraction_csp3(&mol("O")), 0.0);
    }

    #[test]
    fn isotopes_use_mass_number() {
        assert_abs_diff_eq!(mol_wt(&mol("[13CH4]")), 13.0 + 4.0 * 1.008, epsilon = 1e-9);
    }
}
