//! Wildman-Crippen LogP y refractividad molar (MR).
//!
//! Cada átomo pesado y cada hidrógeno recibe un tipo atómico; el valor final
//! es la suma de las contribuciones del tipo. Los tipos siguen la tabla
//! publicada por Wildman y Crippen (1999), en el mismo orden de prioridad: el
//! primer patrón que encaja gana.
use crate::molecule::{BondOrder, Molecule};

/// (tipo, logp, mr)
const CONTRIBUTIONS: &[(&str, f64, f64)] = &[("C1", 0.1441, 2.503),
                                             ("C2", 0.0, 2.433),
                                             ("C3", -0.2035, 2.753),
                                             ("C4", -0.2051, 2.731),
                                             ("C5", -0.2783, 5.007),
                                             ("C6", 0.1551, 3.513),
                                             ("C7", 0.0017, 3.888),
                                             ("C8", 0.08452, 2.464),
                                             ("C9", -0.1444, 2.412),
                                             ("C10", -0.0516, 2.488),
                                             ("C11", 0.1193, 2.582),
                                             ("C12", -0.0967, 2.576),
                                             ("C13", -0.5443, 4.041),
                                             ("C14", 0.0, 3.257),
                                             ("C15", 0.245, 3.564),
                                             ("C16", 0.198, 3.18),
                                             ("C17", 0.0, 3.104),
                                             ("C18", 0.1581, 3.35),
                                             ("C19", 0.2955, 4.346),
                                             ("C20", 0.2713, 3.904),
                                             ("C21", 0.136, 3.509),
                                             ("C22", 0.4619, 3.067),
                                             ("C23", 0.5437, 3.853),
                                             ("C24", 0.1893, 2.673),
                                             ("C25", -0.8186, 3.135),
                                             ("C26", 0.264, 4.305),
                                             ("C27", 0.2148, 2.693),
                                             ("CS", 0.08129, 3.243),
                                             ("H1", 0.123, 1.057),
                                             ("H2", -0.2677, 1.395),
                                             ("H3", 0.2142, 0.9627),
                                             ("H4", 0.298, 1.805),
                                             ("HS", 0.1125, 1.112),
                                             ("N1", -1.019, 2.262),
                                             ("N2", -0.7096, 2.173),
                                             ("N3", -1.027, 2.827),
                                             ("N4", -0.5188, 3.0),
                                             ("N5", 0.08387, 1.757),
                                             ("N6", 0.1836, 2.428),
                                             ("N7", -0.3187, 1.839),
                                             ("N8", -0.4458, 2.819),
                                             ("N9", 0.01508, 1.725),
                                             ("N10", -1.95, 0.0),
                                             ("N11", -0.3239, 2.202),
                                             ("N12", -1.119, 0.0),
                                             ("N13", -0.3396, 0.2604),
                                             ("N14", 0.2887, 3.359),
                                             ("NS", -0.4806, 2.134),
                                             ("O1", 0.1552, 1.08),
                                             ("O2", -0.2893, 0.8238),
                                             ("O3", -0.0684, 1.085),
                                             ("O4", -0.4195, 1.182),
                                             ("O5", 0.0335, 3.367),
                                             ("O6", -0.3339, 0.7774),
                                             ("O7", -1.189, 0.0),
                                             ("O8", 0.1788, 3.135),
                                             ("O9", -0.1526, 0.0),
                                             ("O10", 0.1129, 0.2215),
                                             ("O11", 0.4833, 0.389),
                                             ("O12", -1.326, 0.0),
                                             ("OS", -0.1188, 0.6865),
                                             ("F", 0.4202, 1.108),
                                             ("Cl", 0.6895, 5.853),
                                             ("Br", 0.8456, 8.927),
                                             ("I", 0.8857, 14.02),
                                             ("P", 0.8612, 6.92),
                                             ("S1", 0.6482, 7.591),
                                             ("S2", -0.0024, 7.365),
                                             ("S3", 0.6237, 6.691)];

fn contribution(kind: &str) -> (f64, f64) {
    CONTRIBUTIONS.iter().find(|(k, ..)| *k == kind).map_or((0.0, 0.0), |&(_, logp, mr)| (logp, mr))
}

/// Devuelve `(logp, mr)`.
pub fn logp_mr(mol: &Molecule) -> (f64, f64) {
    let typer = Typer { mol };
    let mut logp = 0.0;
    let mut mr = 0.0;
    for (i, atom) in mol.atoms().iter().enumerate() {
        let kind = typer.heavy_type(i);
        let (l, m) = contribution(kind);
        logp += l;
        mr += m;
        if atom.hydrogens > 0 {
            let (l, m) = contribution(typer.hydrogen_type(i));
            logp += l * f64::from(atom.hydrogens);
            mr += m * f64::from(atom.hydrogens);
        }
    }
    (logp, mr)
}

const HALOGENS: [u8; 4] = [9, 17, 35, 53];

struct Typer<'a> {
    mol: &'a Molecule,
}

impl Typer<'_> {
    fn z(&self, i: usize) -> u8 {
        self.mol.atoms()[i].atomic_number()
    }

    fn aromatic(&self, i: usize) -> bool {
        self.mol.atoms()[i].aromatic
    }

    fn h(&self, i: usize) -> u8 {
        self.mol.atoms()[i].hydrogens
    }

    /// Conectividad total (vecinos explícitos + hidrógenos), el `X` de SMARTS.
    fn x(&self, i: usize) -> usize {
        self.mol.degree(i) + self.h(i) as usize
    }

    fn nbrs(&self, i: usize) -> impl Iterator<Item = (usize, BondOrder)> + '_ {
        self.mol.neighbors(i).iter().map(|&(j, b)| (j, self.mol.bonds()[b].order))
    }

    fn heavy_aliphatic(&self, j: usize) -> bool {
        self.z(j) > 1 && !self.aromatic(j)
    }

    fn aliphatic_is(&self, j: usize, zs: &[u8]) -> bool {
        !self.aromatic(j) && zs.contains(&self.z(j))
    }

    /// `[N,O,P,S,F,Cl,Br,I]` en SMARTS: heteroátomos alifáticos.
    fn hetero(&self, j: usize) -> bool {
        self.aliphatic_is(j, &[7, 8, 15, 16]) || HALOGENS.contains(&self.z(j))
    }

    fn heavy_type(&self, i: usize) -> &'static str {
        match self.z(i) {
            1 => self.hydrogen_atom_type(i),
            6 if self.aromatic(i) => self.aromatic_carbon(i),
            6 => self.aliphatic_carbon(i),
            7 => self.nitrogen(i),
            8 => self.oxygen(i),
            9 => "F",
            17 => "Cl",
            35 => "Br",
            53 => "I",
            15 => "P",
            16 if self.aromatic(i) => "S3",
            16 if self.mol.atoms()[i].charge == 0 => "S1",
            16 => "S2",
            _ => "",
        }
    }

    fn aliphatic_carbon(&self, i: usize) -> &'static str {
        let h = self.h(i);
        let x = self.x(i);
        let single_c = self.nbrs(i).filter(|&(j, o)| o == BondOrder::Single && self.aliphatic_is(j, &[6])).count();
        let heavy: Vec<(usize, BondOrder)> = self.nbrs(i).filter(|&(j, _)| self.z(j) > 1).collect();
        let all_aliphatic = heavy.iter().all(|&(j, _)| !self.aromatic(j));
        let any_hetero = heavy.iter().any(|&(j, o)| o == BondOrder::Single && self.hetero(j));
        let any_aromatic = heavy.iter().any(|&(j, _)| self.aromatic(j));
        let double_to = |pred: &dyn Fn(usize) -> bool| heavy.iter().any(|&(j, o)| o == BondOrder::Double && pred(j));

        match h {
            4 => return "C1",
            3 if single_c >= 1 => return "C1",
            2 if single_c >= 2 => return "C1",
            1 if single_c >= 3 => return "C2",
            0 if single_c >= 4 => return "C2",
            _ => {}
        }
        if (h == 3 && any_hetero) || (x == 4 && h <= 2 && any_hetero && all_aliphatic && heavy.len() >= 2) {
            return if h >= 2 { "C3" } else { "C4" };
        }
        if double_to(&|j| !self.aromatic(j) && self.z(j) != 6) {
            return "C5";
        }
        if double_to(&|j| self.aliphatic_is(j, &[6])) && all_aliphatic {
            return "C6";
        }
        if x == 2 && heavy.iter().any(|&(j, o)| o == BondOrder::Triple && !self.aromatic(j)) {
            return "C7";
        }
        if x == 4 && any_aromatic {
            let carbon_neighbour = heavy.iter().any(|&(j, _)| self.aromatic(j) && self.z(j) == 6);
            return match h {
                3 if carbon_neighbour => "C8",
                3 => "C9",
                2 => "C10",
                1 => "C11",
                _ => "C12",
            };
        }
        if double_to(&|j| self.aliphatic_is(j, &[6])) || double_to(&|j| self.aromatic(j) && self.z(j) == 6) {
            return "C26";
        }
        let unusual = |j: usize| !self.aromatic(j) && self.z(j) > 1 && ![6, 7, 8, 15, 16, 9, 17, 35, 53].contains(&self.z(j));
        if x == 4 && heavy.iter().any(|&(j, _)| unusual(j)) {
            return "C27";
        }
        "CS"
    }

    fn aromatic_carbon(&self, i: usize) -> &'static str {
        let h = self.h(i);
        let heavy: Vec<(usize, BondOrder)> = self.nbrs(i).filter(|&(j, _)| self.z(j) > 1).collect();
        let unusual = |j: usize| !self.aromatic(j) && ![6, 7, 8, 16, 9, 17, 35, 53].contains(&self.z(j));
        if h == 0 && heavy.iter().any(|&(j, o)| o == BondOrder::Single && unusual(j)) {
            return "C13";
        }
        for (z, kind) in [(9, "C14"), (17, "C15"), (35, "C16"), (53, "C17")] {
            if heavy.iter().any(|&(j, _)| self.z(j) == z) {
                return kind;
            }
        }
        if h == 1 {
            return "C18";
        }
        let ring_bonds = heavy.iter().filter(|&&(j, o)| o == BondOrder::Aromatic && self.aromatic(j)).count();
        if ring_bonds >= 3 {
            return "C19";
        }
        if ring_bonds == 2 {
            for &(j, o) in heavy.iter().filter(|&&(_, o)| o != BondOrder::Aromatic) {
                let kind = match (o, self.aromatic(j), self.z(j)) {
                    (BondOrder::Single, true, _) => "C20",
                    (BondOrder::Single, false, 6) => "C21",
                    (BondOrder::Single, false, 7) => "C22",
                    (BondOrder::Single, false, 8) => "C23",
                    (BondOrder::Single, false, 16) => "C24",
                    (BondOrder::Double, false, 6 | 7 | 8) => "C25",
                    _ => continue,
                };
                return kind;
            }
        }
        "CS"
    }

    fn nitrogen(&self, i: usize) -> &'static str {
        let atom = &self.mol.atoms()[i];
        let h = self.h(i);
        if atom.aromatic {
            return match atom.charge {
                0 => "N11",
                c if c > 0 => "N12",
                _ => "NS",
            };
        }
        let heavy: Vec<(usize, BondOrder)> = self.nbrs(i).filter(|&(j, _)| self.z(j) > 1).collect();
        let single_aliphatic = heavy.iter().filter(|&&(j, o)| o == BondOrder::Single && self.heavy_aliphatic(j)).count();
        let any_aromatic = heavy.iter().any(|&(j, _)| self.aromatic(j));
        let has_double = heavy.iter().any(|&(_, o)| o == BondOrder::Double);
        let has_triple = heavy.iter().any(|&(j, o)| o == BondOrder::Triple && !self.aromatic(j));

        match atom.charge {
            0 => match h {
                2 if single_aliphatic >= 1 => "N1",
                1 if single_aliphatic >= 2 => "N2",
                2 if any_aromatic => "N3",
                1 if any_aromatic && heavy.len() >= 2 => "N4",
                1 if has_double => "N5",
                0 if has_double && heavy.len() >= 2 => "N6",
                0 if single_aliphatic >= 3 => "N7",
                0 if any_aromatic && heavy.len() >= 3 => "N8",
                _ if has_triple => "N9",
                _ => "NS",
            },
            c if c > 0 => {
                if (1..=3).contains(&h) {
                    "N10"
                } else if h == 0 && (single_aliphatic >= 4 || (has_double && heavy.len() >= 3) || heavy.iter().filter(|(_, o)| *o == BondOrder::Double).count() == 2) {
                    "N13"
                } else if has_triple {
                    "N14"
                } else {
                    "NS"
                }
            }
            _ => "N14",
        }
    }

    fn oxygen(&self, i: usize) -> &'static str {
        let atom = &self.mol.atoms()[i];
        if atom.aromatic {
            return "O1";
        }
        if atom.hydrogens >= 1 {
            return "O2";
        }
        let heavy: Vec<(usize, BondOrder)> = self.nbrs(i).filter(|&(j, _)| self.z(j) > 1).collect();
        if heavy.len() == 2 {
            let aromatic = heavy.iter().filter(|&&(j, _)| self.aromatic(j)).count();
            return if aromatic == 0 { "O3" } else { "O4" };
        }
        let Some(&(j, order)) = heavy.first() else {
            return "OS";
        };
        let zj = self.z(j);
        if order == BondOrder::Double && matches!(zj, 7 | 8) {
            return "O5";
        }
        if atom.charge < 0 && order == BondOrder::Single {
            match zj {
                7 => return "O5",
                16 => return "O6",
                6 => {}
                _ => return "O7",
            }
        }
        if order == BondOrder::Double && zj == 6 {
            if self.aromatic(j) {
                return "O8";
            }
            return self.carbonyl_oxygen(i, j);
        }
        if atom.charge < 0 && zj == 6 && self.nbrs(j).any(|(k, o)| k != i && o == BondOrder::Double && self.z(k) == 8) {
            return "O12";
        }
        "OS"
    }

    /// Oxígeno carbonílico `O=C` con el carbono `c` alifático.
    fn carbonyl_oxygen(&self, o: usize, c: usize) -> &'static str {
        let others: Vec<(usize, BondOrder)> = self.nbrs(c).filter(|&(j, _)| j != o && self.z(j) > 1).collect();
        let hc = self.h(c);
        let aliphatic_c = others.iter().filter(|&&(j, _)| self.aliphatic_is(j, &[6])).count();
        let aromatic_c = others.iter().filter(|&&(j, _)| self.aromatic(j) && self.z(j) == 6).count();
        let aliphatic_heavy = others.iter().filter(|&&(j, _)| self.heavy_aliphatic(j)).count();
        let aromatic_heavy = others.iter().filter(|&&(j, _)| self.aromatic(j)).count();
        let non_carbon = others.iter().filter(|&&(j, _)| self.z(j) != 6).count();

        if (hc == 1 && aliphatic_c >= 1)
           || (aliphatic_c >= 1 && aliphatic_heavy >= 2)
           || (hc == 1 && others.iter().any(|&(j, _)| self.aliphatic_is(j, &[7, 8])))
           || hc == 2
           || others.iter().any(|&(j, o)| o == BondOrder::Double && self.z(j) == 8)
        {
            return "O9";
        }
        if (hc == 1 && aromatic_c >= 1)
           || ((aliphatic_c + aromatic_c) >= 1 && aromatic_heavy >= 1 && others.len() >= 2)
           || (aromatic_c >= 1 && aliphatic_heavy >= 1)
        {
            return "O10";
        }
        if non_carbon >= 2 {
            return "O11";
        }
        "OS"
    }

    fn hydrogen_atom_type(&self, i: usize) -> &'static str {
        match self.nbrs(i).next() {
            Some((j, _)) => self.hydrogen_on(j, Some(i)),
            None => "HS",
        }
    }

    fn hydrogen_type(&self, heavy: usize) -> &'static str {
        self.hydrogen_on(heavy, None)
    }

    /// Tipo de un hidrógeno unido a `heavy`; `skip` excluye el propio H si es explícito.
    fn hydrogen_on(&self, heavy: usize, skip: Option<usize>) -> &'static str {
        match self.z(heavy) {
            1 | 6 => "H1",
            7 => "H3",
            8 => {
                let Some((j, _)) = self.nbrs(heavy).find(|&(j, _)| Some(j) != skip && self.z(j) > 1) else {
                    return "HS";
                };
                let zj = self.z(j);
                let aliphatic_c = zj == 6 && !self.aromatic(j);
                if (aliphatic_c && self.x(j) == 4) || (zj == 6 && self.aromatic(j)) || !matches!(zj, 6 | 7 | 8 | 16) {
                    "H2"
                } else if zj == 7 {
                    "H3"
                } else if (aliphatic_c
                           && self.nbrs(j).any(|(k, o)| k != heavy && o == BondOrder::Double && matches!(self.z(k), 6 | 7 | 8 | 16)))
                          || matches!(zj, 8 | 16)
                {
                    "H4"
                } else {
                    "HS"
                }
            }
            _ => "H2",
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn crippen(smiles: &str) -> (f64, f64) {
        logp_mr(&Molecule::from_smiles(smiles).unwrap())
    }

    #[test]
    fn ethanol_contributions() {
        let (logp, mr) = crippen("CCO");
        assert_abs_diff_eq!(logp, -0.0014, epsilon = 1e-4);
        assert_abs_diff_eq!(mr, 12.7598, epsilon = 1e-4);
    }

    #[test]
    fn caffeine_logp() {
        let (logp, _) = crippen("CN1C=NC2=C1C(=O)N(C(=O)N2C)C");
        assert_abs_diff_eq!(logp, -1.0293, epsilon = 1e-4);
    }

    #[test]
    fn benzene_logp() {
        // 6 x (C18 + H1)
        let (logp, mr) = crippen("c1ccccc1");
        assert_abs_diff_eq!(logp, 6.0 * (0.1581 + 0.123), epsilon = 1e-9);
        assert_abs_diff_eq!(mr, 6.0 * (3.35 + 1.057), epsilon = 1e-9);
    }

    #[test]
    fn carboxylic_acid_hydrogen_is_acidic() {
        let mol = Molecule::from_smiles("CC(=O)O").unwrap();
        let typer = Typer { mol: &mol };
        assert_eq!(typer.hydrogen_type(3), "H4");
        assert_eq!(typer.heavy_type(2), "O9");
        assert_eq!(typer.heavy_type(3), "O2");
    }
}
