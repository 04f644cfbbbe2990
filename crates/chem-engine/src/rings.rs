//! Percepción de anillos: SSSR (smallest set of smallest rings).
//!
//! Se generan los ciclos candidatos de Horton (un árbol BFS por átomo más una
//! arista que lo cierra), se ordenan por tamaño y se eligen de forma voraz
//! los linealmente independientes sobre GF(2) hasta alcanzar el número
//! ciclomático `m - n + c`.
use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    /// Índices de átomo ordenados.
    pub atoms: Vec<usize>,
    /// Índices de enlace ordenados.
    pub bonds: Vec<usize>,
}

impl Ring {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains_atom(&self, atom: usize) -> bool {
        self.atoms.binary_search(&atom).is_ok()
    }

    pub fn contains_bond(&self, bond: usize) -> bool {
        self.bonds.binary_search(&bond).is_ok()
    }

    pub fn shares_bond_with(&self, other: &Ring) -> bool {
        self.bonds.iter().any(|b| other.contains_bond(*b))
    }
}

fn adjacency(n_atoms: usize, bonds: &[(usize, usize)]) -> Vec<Vec<(usize, usize)>> {
    let mut adj = vec![Vec::new(); n_atoms];
    for (idx, &(a, b)) in bonds.iter().enumerate() {
        adj[a].push((b, idx));
        adj[b].push((a, idx));
    }
    adj
}

fn count_components(adj: &[Vec<(usize, usize)>]) -> usize {
    let mut seen = vec![false; adj.len()];
    let mut count = 0;
    for start in 0..adj.len() {
        if seen[start] {
            continue;
        }
        count += 1;
        seen[start] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(curr) = queue.pop_front() {
            for &(next, _) in &adj[curr] {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
    }
    count
}

struct BfsTree {
    dist: Vec<usize>,
    parent: Vec<Option<(usize, usize)>>,
}

impl BfsTree {
    fn build(root: usize, adj: &[Vec<(usize, usize)>]) -> Self {
        let mut dist = vec![usize::MAX; adj.len()];
        let mut parent = vec![None; adj.len()];
        dist[root] = 0;
        let mut queue = VecDeque::from([root]);
        while let Some(curr) = queue.pop_front() {
            for &(next, bond) in &adj[curr] {
                if dist[next] == usize::MAX {
                    dist[next] = dist[curr] + 1;
                    parent[next] = Some((curr, bond));
                    queue.push_back(next);
                }
            }
        }
        Self { dist, parent }
    }

    /// Camino desde `atom` hasta la raíz: (átomos sin la raíz, enlaces).
    fn path_to_root(&self, mut atom: usize) -> (Vec<usize>, Vec<usize>) {
        let mut atoms = Vec::new();
        let mut bonds = Vec::new();
        while let Some((prev, bond)) = self.parent[atom] {
            atoms.push(atom);
            bonds.push(bond);
            atom = prev;
        }
        (atoms, bonds)
    }
}

fn bitset(bonds: &[usize], n_bonds: usize) -> Vec<u64> {
    let mut bits = vec![0u64; n_bonds.div_ceil(64)];
    for &b in bonds {
        bits[b / 64] |= 1 << (b % 64);
    }
    bits
}

fn first_bit(bits: &[u64]) -> Option<usize> {
    bits.iter().enumerate().find(|(_, w)| **w != 0).map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
}

fn has_bit(bits: &[u64], bit: usize) -> bool {
    bits[bit / 64] & (1 << (bit % 64)) != 0
}

/// Calcula el SSSR de un grafo dado por su número de átomos y sus enlaces.
pub fn find_sssr(n_atoms: usize, bonds: &[(usize, usize)]) -> Vec<Ring> {
    let adj = adjacency(n_atoms, bonds);
    let components = count_components(&adj);
    let cyclomatic = (bonds.len() + components).saturating_sub(n_atoms);
    if cyclomatic == 0 {
        return Vec::new();
    }

    let mut candidates: BTreeSet<Vec<usize>> = BTreeSet::new();
    for root in 0..n_atoms {
        let tree = BfsTree::build(root, &adj);
        for (idx, &(x, y)) in bonds.iter().enumerate() {
            if tree.dist[x] == usize::MAX || tree.dist[y] == usize::MAX {
                continue;
            }
            if tree.parent[x].map(|(_, b)| b) == Some(idx) || tree.parent[y].map(|(_, b)| b) == Some(idx) {
                continue;
            }
            let (atoms_x, mut cycle) = tree.path_to_root(x);
            let (atoms_y, bonds_y) = tree.path_to_root(y);
            if atoms_x.iter().any(|a| atoms_y.contains(a)) {
                continue;
            }
            cycle.extend(bonds_y);
            cycle.push(idx);
            cycle.sort_unstable();
            candidates.insert(cycle);
        }
    }

    let mut ordered: Vec<Vec<usize>> = candidates.into_iter().collect();
    ordered.sort_by_key(Vec::len);

    let mut basis: Vec<(usize, Vec<u64>)> = Vec::new();
    let mut rings = Vec::new();
    for cycle in ordered {
        if rings.len() == cyclomatic {
            break;
        }
        let mut bits = bitset(&cycle, bonds.len());
        for (pivot, row) in &basis {
            if has_bit(&bits, *pivot) {
                bits.iter_mut().zip(row).for_each(|(w, r)| *w ^= r);
            }
        }
        if let Some(pivot) = first_bit(&bits) {
            basis.push((pivot, bits));
            let atoms: BTreeSet<usize> = cycle.iter().flat_map(|&b| [bonds[b].0, bonds[b].1]).collect();
            rings.push(Ring { atoms: atoms.into_iter().collect(),
                              bonds: cycle });
        }
    }
    rings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(n: usize) -> Vec<(usize, usize)> {
        (0..n).map(|i| (i, (i + 1) % n)).collect()
    }

    #[test]
    fn acyclic_graph_has_no_rings() {
        assert!(find_sssr(3, &[(0, 1), (1, 2)]).is_empty());
    }

    #[test]
    fn single_six_ring() {
        let rings = find_sssr(6, &cycle(6));
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 6);
    }

    #[test]
    fn naphthalene_skeleton_gives_two_six_rings() {
        let mut bonds = cycle(6);
        bonds.extend([(0, 6), (6, 7), (7, 8), (8, 9), (9, 1)]);
        let rings = find_sssr(10, &bonds);
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|r| r.len() == 6));
        assert!(rings[0].shares_bond_with(&rings[1]));
    }

    #[test]
    fn disconnected_rings_are_counted() {
        let mut bonds = cycle(3);
        bonds.extend([(3, 4), (4, 5), (5, 6), (6, 3)]);
        let rings = find_sssr(7, &bonds);
        assert_eq!(rings.iter().map(Ring::len).collect::<Vec<_>>(), vec![3, 4]);
    }
}
