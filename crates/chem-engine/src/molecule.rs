//! Grafo molecular con hidrógenos suprimidos.
//!
//! `Molecule::from_smiles` hace todo el saneamiento que necesitan los
//! descriptores: fusiona hidrógenos explícitos, kekuliza los sistemas
//! aromáticos escritos en minúscula, asigna hidrógenos implícitos, valida
//! valencias, percibe anillos (SSSR) y aromaticidad (Hückel 4n+2, incluidos
//! pares de anillos fusionados) y asigna hibridación.
use std::collections::BTreeSet;

use crate::elements::{self, Element};
use crate::rings::{self, Ring};
use crate::smiles::{self, BondSymbol, ParsedSmiles};
use crate::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    fn valence(self) -> u32 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hybridization {
    Sp,
    Sp2,
    Sp3,
    /// Hidrógenos explícitos y metales.
    Other,
}

#[derive(Debug, Clone)]
pub struct Atom {
    pub element: &'static Element,
    pub charge: i8,
    pub isotope: Option<u16>,
    /// Hidrógenos totales (implícitos + explícitos fusionados).
    pub hydrogens: u8,
    pub aromatic: bool,
    pub in_ring: bool,
    pub hybridization: Hybridization,
}

impl Atom {
    pub fn atomic_number(&self) -> u8 {
        self.element.atomic_number
    }

    pub fn is_heavy(&self) -> bool {
        self.element.atomic_number > 1
    }
}

#[derive(Debug, Clone)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    /// Orden tras la percepción de aromaticidad.
    pub order: BondOrder,
    /// Orden en la estructura de Kekulé (nunca `Aromatic`).
    pub kekule: BondOrder,
    pub in_ring: bool,
}

impl Bond {
    pub fn other(&self, atom: usize) -> usize {
        if self.a == atom {
            self.b
        } else {
            self.a
        }
    }
}

#[derive(Debug, Clone)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, usize)>>,
    rings: Vec<Ring>,
}

impl Molecule {
    /// Construye y sanea una molécula a partir de un SMILES.
    ///
    /// # Errors
    ///
    /// `EngineError::Parse` si el texto no es SMILES válido y
    /// `EngineError::Sanitize` si la estructura es químicamente inválida
    /// (valencias, aromáticos que no se pueden kekulizar, etc.).
    pub fn from_smiles(smiles: &str) -> Result<Self, EngineError> {
        let parsed = smiles::parse(smiles)?;
        Draft::from_parsed(parsed).sanitize()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Vecinos de un átomo como pares (átomo vecino, índice de enlace).
    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.is_heavy()).count()
    }

    /// Valencia total: suma de órdenes de Kekulé más hidrógenos.
    pub fn total_valence(&self, atom: usize) -> u32 {
        let bonds: u32 = self.adjacency[atom].iter().map(|&(_, b)| self.bonds[b].kekule.valence()).sum();
        bonds + u32::from(self.atoms[atom].hydrogens)
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.adjacency[a].iter().find(|(n, _)| *n == b).map(|&(_, idx)| &self.bonds[idx])
    }

    /// Cuenta los enlaces de un átomo por orden (sencillo, doble, triple, aromático).
    pub fn bond_order_counts(&self, atom: usize) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for &(_, b) in &self.adjacency[atom] {
            let slot = match self.bonds[b].order {
                BondOrder::Single => 0,
                BondOrder::Double => 1,
                BondOrder::Triple => 2,
                BondOrder::Aromatic => 3,
            };
            counts[slot] += 1;
        }
        counts
    }

    fn has_multiple_bond(&self, atom: usize) -> bool {
        self.atoms[atom].aromatic
        || self.adjacency[atom].iter().any(|&(_, b)| self.bonds[b].kekule != BondOrder::Single)
    }

    fn pi_electrons(&self, i: usize) -> Option<u8> {
        let atom = &self.atoms[i];
        let mut ring_double = 0;
        let mut exo_double = None;
        for &(j, b) in &self.adjacency[i] {
            match self.bonds[b].kekule {
                BondOrder::Double if self.bonds[b].in_ring => ring_double += 1,
                BondOrder::Double => exo_double = Some(j),
                BondOrder::Triple => return None,
                _ => {}
            }
        }
        match (ring_double, exo_double) {
            (1, None) => return Some(1),
            (0, Some(j)) => {
                let partner = self.atoms[j].atomic_number();
                return (atom.atomic_number() == 6 && matches!(partner, 7 | 8 | 16)).then_some(0);
            }
            (0, None) => {}
            _ => return None,
        }
        let connections = self.degree(i) + atom.hydrogens as usize;
        match (atom.atomic_number(), atom.charge) {
            (6, -1) => Some(2),
            (6, 1) => Some(0),
            (5, 0) if connections == 3 => Some(0),
            (7 | 15, 0) if connections == 3 => Some(2),
            (7 | 15, -1) if connections == 2 => Some(2),
            (8 | 16 | 34 | 52, 0) if connections == 2 => Some(2),
            _ => None,
        }
    }

    fn perceive_aromaticity(&mut self) {
        for atom in &mut self.atoms {
            atom.aromatic = false;
        }
        for bond in &mut self.bonds {
            bond.order = bond.kekule;
        }
        let electrons: Vec<Option<u8>> =
            (0..self.atoms.len()).map(|i| if self.atoms[i].in_ring { self.pi_electrons(i) } else { None }).collect();
        let huckel = |atoms: &mut dyn Iterator<Item = usize>| -> bool {
            let mut total = 0u32;
            for a in atoms {
                match electrons[a] {
                    Some(e) => total += u32::from(e),
                    None => return false,
                }
            }
            total % 4 == 2
        };

        let mut aromatic: Vec<bool> = self.rings.iter().map(|r| huckel(&mut r.atoms.iter().copied())).collect();
        for r1 in 0..self.rings.len() {
            for r2 in (r1 + 1)..self.rings.len() {
                if (aromatic[r1] && aromatic[r2]) || !self.rings[r1].shares_bond_with(&self.rings[r2]) {
                    continue;
                }
                let union: BTreeSet<usize> =
                    self.rings[r1].atoms.iter().chain(self.rings[r2].atoms.iter()).copied().collect();
                if huckel(&mut union.into_iter()) {
                    aromatic[r1] = true;
                    aromatic[r2] = true;
                }
            }
        }

        for (ring, _) in self.rings.iter().zip(&aromatic).filter(|(_, is_arom)| **is_arom) {
            for &a in &ring.atoms {
                self.atoms[a].aromatic = true;
            }
            for &b in &ring.bonds {
                self.bonds[b].order = BondOrder::Aromatic;
            }
        }
    }

    fn assign_hybridization(&mut self) {
        for i in 0..self.atoms.len() {
            let atom = &self.atoms[i];
            let z = atom.atomic_number();
            let mut doubles = 0;
            let mut triples = 0;
            for &(_, b) in &self.adjacency[i] {
                match self.bonds[b].kekule {
                    BondOrder::Double => doubles += 1,
                    BondOrder::Triple => triples += 1,
                    _ => {}
                }
            }
            let has_lone_pair = match z {
                7 => atom.charge == 0 && self.degree(i) + (atom.hydrogens as usize) <= 3,
                8 | 16 => atom.charge <= 0,
                _ => false,
            };
            let conjugated = self.adjacency[i].iter().any(|&(j, _)| self.has_multiple_bond(j));
            let hybridization = if z == 1 || atom.element.valences.is_empty() {
                Hybridization::Other
            } else if atom.aromatic {
                Hybridization::Sp2
            } else if triples > 0 || doubles >= 2 {
                Hybridization::Sp
            } else if doubles == 1 || (z == 6 && atom.charge == 1) || (has_lone_pair && conjugated) {
                Hybridization::Sp2
            } else {
                Hybridization::Sp3
            };
            self.atoms[i].hybridization = hybridization;
        }
    }
}

struct DraftAtom {
    element: &'static Element,
    charge: i8,
    isotope: Option<u16>,
    aromatic: bool,
    bracket_h: Option<u8>,
    merged_h: u32,
}

struct DraftBond {
    a: usize,
    b: usize,
    order: BondOrder,
}

struct Draft {
    atoms: Vec<DraftAtom>,
    bonds: Vec<DraftBond>,
}

impl Draft {
    fn from_parsed(parsed: ParsedSmiles) -> Self {
        let atoms: Vec<DraftAtom> = parsed.atoms
                                          .iter()
                                          .map(|p| DraftAtom { element: p.element,
                                                               charge: p.bracket.map_or(0, |b| b.charge),
                                                               isotope: p.bracket.and_then(|b| b.isotope),
                                                               aromatic: p.aromatic,
                                                               bracket_h: p.bracket.map(|b| b.hydrogens),
                                                               merged_h: 0 })
                                          .collect();
        let bonds: Vec<DraftBond> = parsed.bonds
                                          .iter()
                                          .map(|pb| {
                                              let order = match pb.symbol {
                                                  Some(BondSymbol::Single) => BondOrder::Single,
                                                  Some(BondSymbol::Double) => BondOrder::Double,
                                                  Some(BondSymbol::Triple) => BondOrder::Triple,
                                                  Some(BondSymbol::Aromatic) => BondOrder::Aromatic,
                                                  None if atoms[pb.a].aromatic && atoms[pb.b].aromatic => BondOrder::Aromatic,
                                                  None => BondOrder::Single,
                                              };
                                              DraftBond { a: pb.a,
                                                          b: pb.b,
                                                          order }
                                          })
                                          .collect();
        let mut draft = Draft { atoms, bonds };
        draft.merge_hydrogens();
        draft
    }

    /// Convierte `[H]` terminales (sin isótopo ni carga) en recuentos de H
    /// del átomo pesado vecino.
    fn merge_hydrogens(&mut self) {
        let mut degree = vec![0usize; self.atoms.len()];
        for b in &self.bonds {
            degree[b.a] += 1;
            degree[b.b] += 1;
        }
        let mut removed = vec![false; self.atoms.len()];
        for bond in &self.bonds {
            for (h, heavy) in [(bond.a, bond.b), (bond.b, bond.a)] {
                let candidate = &self.atoms[h];
                if candidate.element.atomic_number == 1
                   && candidate.isotope.is_none()
                   && candidate.charge == 0
                   && candidate.bracket_h.unwrap_or(0) == 0
                   && degree[h] == 1
                   && bond.order == BondOrder::Single
                   && self.atoms[heavy].element.atomic_number > 1
                {
                    removed[h] = true;
                }
            }
        }
        if !removed.iter().any(|r| *r) {
            return;
        }
        for bond in &self.bonds {
            if removed[bond.a] {
                self.atoms[bond.b].merged_h += 1;
            } else if removed[bond.b] {
                self.atoms[bond.a].merged_h += 1;
            }
        }
        let mut remap = vec![usize::MAX; self.atoms.len()];
        let mut next = 0;
        for (old, gone) in removed.iter().enumerate() {
            if !gone {
                remap[old] = next;
                next += 1;
            }
        }
        let atoms = std::mem::take(&mut self.atoms);
        self.atoms = atoms.into_iter().zip(&removed).filter(|(_, gone)| !**gone).map(|(a, _)| a).collect();
        let bonds = std::mem::take(&mut self.bonds);
        self.bonds = bonds.into_iter()
                          .filter(|b| !removed[b.a] && !removed[b.b])
                          .map(|b| DraftBond { a: remap[b.a],
                                               b: remap[b.b],
                                               order: b.order })
                          .collect();
    }

    fn sanitize(mut self) -> Result<Molecule, EngineError> {
        let n = self.atoms.len();
        let pairs: Vec<(usize, usize)> = self.bonds.iter().map(|b| (b.a, b.b)).collect();
        let rings = rings::find_sssr(n, &pairs);
        let mut atom_in_ring = vec![false; n];
        let mut bond_in_ring = vec![false; self.bonds.len()];
        for ring in &rings {
            ring.atoms.iter().for_each(|&a| atom_in_ring[a] = true);
            ring.bonds.iter().for_each(|&b| bond_in_ring[b] = true);
        }

        if let Some(i) = (0..n).find(|&i| self.atoms[i].aromatic && !atom_in_ring[i]) {
            return Err(EngineError::Sanitize(format!("átomo aromático fuera de anillo (índice {i})")));
        }
        for (idx, bond) in self.bonds.iter_mut().enumerate() {
            if bond.order == BondOrder::Aromatic && !bond_in_ring[idx] {
                bond.order = BondOrder::Single;
            }
        }

        let mut adjacency = vec![Vec::new(); n];
        for (idx, b) in self.bonds.iter().enumerate() {
            adjacency[b.a].push((b.b, idx));
            adjacency[b.b].push((b.a, idx));
        }

        let kekule = self.kekulize(&adjacency)?;
        let hydrogens = self.assign_hydrogens(&adjacency, &kekule)?;

        let atoms = self.atoms
                        .iter()
                        .zip(hydrogens)
                        .enumerate()
                        .map(|(i, (a, h))| Atom { element: a.element,
                                                  charge: a.charge,
                                                  isotope: a.isotope,
                                                  hydrogens: h,
                                                  aromatic: false,
                                                  in_ring: atom_in_ring[i],
                                                  hybridization: Hybridization::Other })
                        .collect();
        let bonds = self.bonds
                        .iter()
                        .zip(kekule)
                        .enumerate()
                        .map(|(idx, (b, k))| Bond { a: b.a,
                                                    b: b.b,
                                                    order: k,
                                                    kekule: k,
                                                    in_ring: bond_in_ring[idx] })
                        .collect();
        let mut molecule = Molecule { atoms,
                                      bonds,
                                      adjacency,
                                      rings };
        molecule.perceive_aromaticity();
        molecule.assign_hybridization();
        Ok(molecule)
    }

    /// Valencia ya comprometida por enlaces no aromáticos e hidrógenos.
    fn fixed_valence(&self, i: usize, adjacency: &[Vec<(usize, usize)>]) -> u32 {
        let bonds: u32 = adjacency[i].iter()
                                    .filter(|&&(_, b)| self.bonds[b].order != BondOrder::Aromatic)
                                    .map(|&(_, b)| self.bonds[b].order.valence())
                                    .sum();
        bonds + self.atoms[i].merged_h + u32::from(self.atoms[i].bracket_h.unwrap_or(0))
    }

    fn kekulize(&self, adjacency: &[Vec<(usize, usize)>]) -> Result<Vec<BondOrder>, EngineError> {
        let mut orders: Vec<BondOrder> = self.bonds
                                             .iter()
                                             .map(|b| if b.order == BondOrder::Aromatic { BondOrder::Single } else { b.order })
                                             .collect();
        let n = self.atoms.len();
        let mut needs = vec![false; n];
        for (i, need) in needs.iter_mut().enumerate() {
            let aromatic_bonds =
                adjacency[i].iter().filter(|&&(_, b)| self.bonds[b].order == BondOrder::Aromatic).count() as u32;
            if aromatic_bonds == 0 {
                continue;
            }
            let used = self.fixed_valence(i, adjacency) + aromatic_bonds;
            let atom = &self.atoms[i];
            *need = elements::allowed_valences(atom.element, atom.charge).and_then(|vals| vals.iter().find(|&&v| u32::from(v) >= used))
                                                                         .is_some_and(|&v| u32::from(v) > used);
        }
        if !needs.iter().any(|n| *n) {
            return Ok(orders);
        }

        let mut matcher = Matcher { bonds: &self.bonds,
                                    adjacency,
                                    needs: &needs,
                                    matched: vec![false; n],
                                    chosen: Vec::new() };
        if !matcher.solve() {
            return Err(EngineError::Sanitize("no se pudo kekulizar el sistema aromático".into()));
        }
        for b in matcher.chosen {
            orders[b] = BondOrder::Double;
        }
        Ok(orders)
    }

    fn assign_hydrogens(&self, adjacency: &[Vec<(usize, usize)>], kekule: &[BondOrder]) -> Result<Vec<u8>, EngineError> {
        let mut out = Vec::with_capacity(self.atoms.len());
        for (i, atom) in self.atoms.iter().enumerate() {
            let bond_sum: u32 = adjacency[i].iter().map(|&(_, b)| kekule[b].valence()).sum();
            let explicit = bond_sum + atom.merged_h;
            let allowed = elements::allowed_valences(atom.element, atom.charge);
            let total_h = match atom.bracket_h {
                Some(h) => {
                    let valence = explicit + u32::from(h);
                    if let Some(max) = allowed.and_then(|v| v.iter().max()) {
                        if valence > u32::from(*max) {
                            return Err(valence_error(atom.element, valence, i));
                        }
                    }
                    u32::from(h) + atom.merged_h
                }
                None => match allowed {
                    Some(vals) => {
                        let target = vals.iter()
                                         .map(|&v| u32::from(v))
                                         .find(|&v| v >= explicit)
                                         .ok_or_else(|| valence_error(atom.element, explicit, i))?;
                        target - explicit + atom.merged_h
                    }
                    None => atom.merged_h,
                },
            };
            let total_h = u8::try_from(total_h).map_err(|_| {
                                                   EngineError::Sanitize(format!("demasiados hidrógenos en el átomo {i}"))
                                               })?;
            out.push(total_h);
        }
        Ok(out)
    }
}

fn valence_error(element: &Element, valence: u32, atom: usize) -> EngineError {
    EngineError::Sanitize(format!("valencia explícita {valence} no permitida para {} (átomo {atom})", element.symbol))
}

/// Emparejamiento perfecto por retroceso sobre los átomos que necesitan un
/// doble enlace. Siempre se expande el átomo con menos opciones.
struct Matcher<'a> {
    bonds: &'a [DraftBond],
    adjacency: &'a [Vec<(usize, usize)>],
    needs: &'a [bool],
    matched: Vec<bool>,
    chosen: Vec<usize>,
}

impl Matcher<'_> {
    fn options(&self, atom: usize) -> Vec<(usize, usize)> {
        self.adjacency[atom].iter()
                            .filter(|&&(j, b)| self.bonds[b].order == BondOrder::Aromatic && self.needs[j] && !self.matched[j])
                            .copied()
                            .collect()
    }

    fn solve(&mut self) -> bool {
        let mut best: Option<(usize, Vec<(usize, usize)>)> = None;
        for atom in 0..self.needs.len() {
            if !self.needs[atom] || self.matched[atom] {
                continue;
            }
            let options = self.options(atom);
            if options.is_empty() {
                return false;
            }
            if best.as_ref().map_or(true, |(_, o)| options.len() < o.len()) {
                best = Some((atom, options));
            }
        }
        let Some((atom, options)) = best else {
            return true;
        };
        self.matched[atom] = true;
        for (partner, bond) in options {
            self.matched[partner] = true;
            self.chosen.push(bond);
            if self.solve() {
                return true;
            }
            self.chosen.pop();
            self.matched[partner] = false;
        }
        self.matched[atom] = false;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mol(smiles: &str) -> Molecule {
        Molecule::from_smiles(smiles).unwrap_or_else(|e| panic!("{smiles}: {e}"))
    }

    #[test]
    fn ethanol_hydrogens() {
        let m = mol("CCO");
        let hs: Vec<u8> = m.atoms().iter().map(|a| a.hydrogens).collect();
        assert_eq!(hs, vec![3, 2, 1]);
        assert!(m.rings().is_empty());
        assert_eq!(m.atoms()[0].hybridization, Hybridization::Sp3);
    }

    #[test]
    fn benzene_is_kekulized_and_aromatic() {
        for smiles in ["c1ccccc1", "C1=CC=CC=C1"] {
            let m = mol(smiles);
            assert!(m.atoms().iter().all(|a| a.aromatic && a.hydrogens == 1));
            assert!(m.bonds().iter().all(|b| b.order == BondOrder::Aromatic));
            let doubles = m.bonds().iter().filter(|b| b.kekule == BondOrder::Double).count();
            assert_eq!(doubles, 3);
        }
    }

    #[test]
    fn pyrrole_needs_explicit_hydrogen() {
        let m = mol("c1cc[nH]c1");
        assert!(m.atoms().iter().all(|a| a.aromatic));
        assert!(Molecule::from_smiles("c1ccnc1").is_err());
    }

    #[test]
    fn caffeine_rings_become_aromatic() {
        let m = mol("CN1C=NC2=C1C(=O)N(C(=O)N2C)C");
        assert_eq!(m.rings().len(), 2);
        let aromatic_n = m.atoms().iter().filter(|a| a.atomic_number() == 7 && a.aromatic).count();
        assert_eq!(aromatic_n, 4);
    }

    #[test]
    fn cyclohexane_is_not_aromatic() {
        let m = mol("C1CCCCC1");
        assert_eq!(m.rings().len(), 1);
        assert!(m.atoms().iter().all(|a| !a.aromatic && a.hydrogens == 2));
    }

    #[test]
    fn explicit_hydrogens_are_merged() {
        let m = mol("[H]C([H])([H])[H]");
        assert_eq!(m.atom_count(), 1);
        assert_eq!(m.atoms()[0].hydrogens, 4);
    }

    #[test]
    fn charged_atoms_keep_their_hydrogens() {
        let m = mol("C[NH3+]");
        assert_eq!(m.atoms()[1].charge, 1);
        assert_eq!(m.atoms()[1].hydrogens, 3);
        let nitro = mol("C[N+](=O)[O-]");
        assert_eq!(nitro.atoms()[1].hydrogens, 0);
    }

    #[test]
    fn rejects_chemically_invalid_structures() {
        for bad in ["C(C)(C)(C)(C)C", "CN(=O)=O", "c1cccc1", "cC", "[NH4]"] {
            assert!(Molecule::from_smiles(bad).is_err(), "se esperaba error para {bad}");
        }
    }
}
