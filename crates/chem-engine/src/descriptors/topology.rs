//! Índices topológicos: complejidad de Bertz, conectividad de Kier-Hall y
//! kappa de Hall-Kier.
use std::collections::BTreeMap;

use crate::molecule::{Hybridization, Molecule};

const CARBON_RADIUS: f64 = 0.77;

fn info_entropy(counts: &[f64]) -> f64 {
    let total: f64 = counts.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    counts.iter()
          .filter(|c| **c > 0.0)
          .map(|c| {
              let p = c / total;
              -p * p.log2()
          })
          .sum()
}

/// Matriz de distancias con pesos `1 / orden de enlace` (aromático = 1/1.5).
fn weighted_distances(mol: &Molecule) -> Vec<Vec<f64>> {
    let n = mol.atom_count();
    let mut dist = vec![vec![1e8; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    for bond in mol.bonds() {
        let w = 1.0 / bond.order.as_f64();
        dist[bond.a][bond.b] = w;
        dist[bond.b][bond.a] = w;
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let via = dist[i][k] + dist[k][j];
                if via < dist[i][j] {
                    dist[i][j] = via;
                }
            }
        }
    }
    dist
}

/// Clases de simetría: átomos con la misma fila ordenada de distancias
/// (a 4 decimales) comparten clase.
fn symmetry_classes(mol: &Molecule) -> Vec<usize> {
    let mut seen: Vec<Vec<String>> = Vec::new();
    weighted_distances(mol).into_iter()
                           .map(|mut row| {
                               row.sort_by(f64::total_cmp);
                               let key: Vec<String> = row.iter().map(|d| format!("{d:.4}")).collect();
                               match seen.iter().position(|k| *k == key) {
                                   Some(idx) => idx + 1,
                                   None => {
                                       seen.push(key);
                                       seen.len()
                                   }
                               }
                           })
                           .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Connection {
    Bond(usize, usize),
    Angle(usize, usize, usize),
}

pub fn bertz_ct(mol: &Molecule) -> f64 {
    let n = mol.atom_count();
    if n < 2 {
        return 0.0;
    }
    let classes = symmetry_classes(mol);
    let mut atom_types: BTreeMap<u8, f64> = BTreeMap::new();
    let mut connections: BTreeMap<Connection, f64> = BTreeMap::new();

    for hinge in 0..n {
        *atom_types.entry(mol.atoms()[hinge].atomic_number()).or_default() += 1.0;
        let hinge_class = classes[hinge];
        let nbrs = mol.neighbors(hinge);
        for (pos, &(ni, bi)) in nbrs.iter().enumerate() {
            let ni_class = classes[ni];
            let order_i = mol.bonds()[bi].order.as_f64();
            if order_i > 1.0 && ni > hinge {
                let key = Connection::Bond(hinge_class.min(ni_class), hinge_class.max(ni_class));
                *connections.entry(key).or_default() += order_i * (order_i - 1.0) / 2.0;
            }
            for &(nj, bj) in &nbrs[pos + 1..] {
                let nj_class = classes[nj];
                let order_j = mol.bonds()[bj].order.as_f64();
                let key = Connection::Angle(ni_class.min(nj_class), hinge_class, ni_class.max(nj_class));
                *connections.entry(key).or_default() += order_i * order_j;
            }
        }
    }

    let mut values: Vec<f64> = connections.into_values().collect();
    if values.is_empty() {
        values.push(1.0);
    }
    let total: f64 = values.iter().sum();
    let connection_ie = total * (info_entropy(&values) + total.log2());
    let types: Vec<f64> = atom_types.into_values().collect();
    let atom_type_ie = n as f64 * info_entropy(&types);
    atom_type_ie + connection_ie
}

/// δv de Kier-Hall; los elementos más allá del neón se escalan por sus
/// electrones internos.
fn valence_delta(mol: &Molecule, i: usize) -> f64 {
    let atom = &mol.atoms()[i];
    let z = f64::from(atom.atomic_number());
    if atom.atomic_number() <= 1 {
        return 0.0;
    }
    let zv = f64::from(atom.element.outer_electrons) - f64::from(atom.charge);
    let dv = zv - f64::from(atom.hydrogens);
    if atom.atomic_number() > 10 {
        dv / (z - zv - 1.0)
    } else {
        dv
    }
}

fn inverse_sqrt(d: f64) -> f64 {
    if d > 0.0 {
        1.0 / d.sqrt()
    } else {
        0.0
    }
}

pub fn chi0v(mol: &Molecule) -> f64 {
    (0..mol.atom_count()).filter(|&i| mol.atoms()[i].is_heavy()).map(|i| inverse_sqrt(valence_delta(mol, i))).fold(0.0, |acc, x| acc + x)
}

pub fn chi1v(mol: &Molecule) -> f64 {
    mol.bonds()
       .iter()
       .filter(|b| mol.atoms()[b.a].is_heavy() && mol.atoms()[b.b].is_heavy())
       .map(|b| inverse_sqrt(valence_delta(mol, b.a) * valence_delta(mol, b.b)))
       .fold(0.0, |acc, x| acc + x)
}

/// Alfa de Hall-Kier por átomo, indexada por hibridación (sp, sp2, sp3).
fn atom_alpha(mol: &Molecule, i: usize) -> f64 {
    let atom = &mol.atoms()[i];
    let table: &[Option<f64>] = match atom.element.symbol {
        "C" => &[Some(-0.22), Some(-0.13), Some(0.0)],
        "N" => &[Some(-0.29), Some(-0.2), Some(-0.04)],
        "O" => &[None, Some(-0.2), Some(-0.04)],
        "F" => &[None, None, Some(-0.07)],
        "Cl" => &[None, None, Some(0.29)],
        "Br" => &[None, None, Some(0.48)],
        "I" => &[None, None, Some(0.73)],
        "P" => &[None, Some(0.3), Some(0.43)],
        "S" => &[None, Some(0.22), Some(0.35)],
        "H" => &[Some(0.0), Some(0.0), Some(0.0)],
        _ => return atom.element.covalent_radius / CARBON_RADIUS - 1.0,
    };
    let last = table.last().copied().flatten().unwrap_or(0.0);
    let slot = match atom.hybridization {
        Hybridization::Sp => 0,
        Hybridization::Sp2 => 1,
        Hybridization::Sp3 | Hybridization::Other => 2,
    };
    table.get(slot).copied().flatten().unwrap_or(last)
}

pub fn hall_kier_alpha(mol: &Molecule) -> f64 {
    (0..mol.atom_count()).map(|i| atom_alpha(mol, i)).sum()
}

/// Número de caminos simples (sin repetir átomos) con `length` enlaces.
fn count_paths(mol: &Molecule, length: usize) -> usize {
    fn walk(mol: &Molecule, atom: usize, remaining: usize, visited: &mut [bool]) -> usize {
        if remaining == 0 {
            return 1;
        }
        let mut total = 0;
        for &(next, _) in mol.neighbors(atom) {
            if !visited[next] && mol.atoms()[next].is_heavy() {
                visited[next] = true;
                total += walk(mol, next, remaining - 1, visited);
                visited[next] = false;
            }
        }
        total
    }

    let mut visited = vec![false; mol.atom_count()];
    let mut directed = 0;
    for start in (0..mol.atom_count()).filter(|&i| mol.atoms()[i].is_heavy()) {
        visited[start] = true;
        directed += walk(mol, start, length, &mut visited);
        visited[start] = false;
    }
    directed / 2
}

/// `(kappa1, kappa2, kappa3)`.
pub fn kappas(mol: &Molecule) -> (f64, f64, f64) {
    let alpha = hall_kier_alpha(mol);
    let heavy = mol.heavy_atom_count();
    let a = heavy as f64 + alpha;
    let shape = |paths: usize, numerator: f64| {
        let denom = paths as f64 + alpha;
        if denom == 0.0 {
            0.0
        } else {
            numerator / (denom * denom)
        }
    };
    let p1 = mol.bonds().iter().filter(|b| mol.atoms()[b.a].is_heavy() && mol.atoms()[b.b].is_heavy()).count();
    let kappa1 = shape(p1, a * (a - 1.0).powi(2));
    let kappa2 = shape(count_paths(mol, 2), (a - 1.0) * (a - 2.0).powi(2));
    let numerator3 = if heavy % 2 == 1 {
        (a - 1.0) * (a - 3.0).powi(2)
    } else {
        (a - 3.0) * (a - 2.0).powi(2)
    };
    let kappa3 = shape(count_paths(mol, 3), numerator3);
    (kappa1, kappa2, kappa3)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn mol(smiles: &str) -> Molecule {
        Molecule::from_smiles(smiles).unwrap()
    }

    #[test]
    fn ethanol_topology() {
        let m = mol("CCO");
        assert_abs_diff_eq!(bertz_ct(&m), 2.7549, epsilon = 1e-4);
        assert_abs_diff_eq!(chi0v(&m), 2.1543, epsilon = 1e-4);
        assert_abs_diff_eq!(chi1v(&m), 1.0233, epsilon = 1e-4);
        let (k1, k2, k3) = kappas(&m);
        assert_abs_diff_eq!(k1, 2.96, epsilon = 1e-9);
        assert_abs_diff_eq!(k2, 1.96, epsilon = 1e-9);
        // sin caminos de longitud 3: el denominador es alfa
        assert_abs_diff_eq!(k3, 1.96, epsilon = 1e-9);
    }

    #[test]
    fn single_atom_has_zero_complexity() {
        let m = mol("C");
        assert_eq!(bertz_ct(&m), 0.0);
        let chi = chi1v(&m);
        assert_eq!(chi, 0.0);
        assert!(chi.is_sign_positive());
    }

    #[test]
    fn path_counts() {
        let m = mol("CCCC");
        assert_eq!(count_paths(&m, 1), 3);
        assert_eq!(count_paths(&m, 2), 2);
        assert_eq!(count_paths(&m, 3), 1);
        let ring = mol("C1CCCCC1");
        assert_eq!(count_paths(&ring, 3), 6);
    }
}
