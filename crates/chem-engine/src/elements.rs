//! Tabla periódica reducida usada por el lector de SMILES y los descriptores.
//!
//! Los pesos atómicos son los promedios estándar (los mismos que usa RDKit),
//! `outer_electrons` alimenta los índices de conectividad de Kier-Hall y
//! `valences` define las valencias permitidas para hidrógenos implícitos.

#[derive(Debug, PartialEq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    pub weight: f64,
    pub outer_electrons: u8,
    /// Radio covalente (Å), usado como respaldo en el alfa de Hall-Kier.
    pub covalent_radius: f64,
    pub valences: &'static [u8],
}

macro_rules! element {
    ($z:expr, $sym:expr, $w:expr, $outer:expr, $rcov:expr, [$($v:expr),*]) => {
        Element { atomic_number: $z,
                  symbol: $sym,
                  weight: $w,
                  outer_electrons: $outer,
                  covalent_radius: $rcov,
                  valences: &[$($v),*] }
    };
}

static ELEMENTS: &[Element] = &[element!(1, "H", 1.008, 1, 0.23, [1]),
                                element!(2, "He", 4.003, 2, 0.93, []),
                                element!(3, "Li", 6.941, 1, 0.68, [1]),
                                element!(4, "Be", 9.012, 2, 0.35, [2]),
                                element!(5, "B", 10.812, 3, 0.88, [3]),
                                element!(6, "C", 12.011, 4, 0.77, [4]),
                                element!(7, "N", 14.007, 5, 0.70, [3]),
                                element!(8, "O", 15.999, 6, 0.66, [2]),
                                element!(9, "F", 18.998, 7, 0.64, [1]),
                                element!(10, "Ne", 20.18, 8, 1.12, []),
                                element!(11, "Na", 22.99, 1, 0.97, [1]),
                                element!(12, "Mg", 24.305, 2, 1.10, [2]),
                                element!(13, "Al", 26.982, 3, 1.35, [3]),
                                element!(14, "Si", 28.086, 4, 1.17, [4]),
                                element!(15, "P", 30.974, 5, 1.10, [3, 5, 7]),
                                element!(16, "S", 32.065, 6, 1.04, [2, 4, 6]),
                                element!(17, "Cl", 35.453, 7, 0.99, [1]),
                                element!(18, "Ar", 39.948, 8, 1.57, []),
                                element!(19, "K", 39.098, 1, 1.33, [1]),
                                element!(20, "Ca", 40.078, 2, 0.99, [2]),
                                element!(22, "Ti", 47.867, 4, 1.47, []),
                                element!(24, "Cr", 51.996, 6, 1.35, []),
                                element!(25, "Mn", 54.938, 7, 1.35, []),
                                element!(26, "Fe", 55.845, 8, 1.34, []),
                                element!(27, "Co", 58.933, 9, 1.33, []),
                                element!(28, "Ni", 58.693, 10, 1.50, []),
                                element!(29, "Cu", 63.546, 11, 1.52, []),
                                element!(30, "Zn", 65.39, 2, 1.45, []),
                                element!(32, "Ge", 72.61, 4, 1.22, [4]),
                                element!(33, "As", 74.922, 5, 1.21, [3, 5]),
                                element!(34, "Se", 78.96, 6, 1.22, [2, 4, 6]),
                                element!(35, "Br", 79.904, 7, 1.21, [1]),
                                element!(37, "Rb", 85.468, 1, 1.47, [1]),
                                element!(38, "Sr", 87.62, 2, 1.12, [2]),
                                element!(46, "Pd", 106.42, 10, 1.50, []),
                                element!(47, "Ag", 107.868, 11, 1.59, []),
                                element!(50, "Sn", 118.71, 4, 1.46, []),
                                element!(51, "Sb", 121.76, 5, 1.46, []),
                                element!(52, "Te", 127.6, 6, 1.47, [2, 4, 6]),
                                element!(53, "I", 126.904, 7, 1.40, [1, 3, 5]),
                                element!(55, "Cs", 132.905, 1, 1.67, [1]),
                                element!(56, "Ba", 137.327, 2, 1.34, [2]),
                                element!(78, "Pt", 195.078, 10, 1.50, []),
                                element!(79, "Au", 196.967, 11, 1.50, []),
                                element!(80, "Hg", 200.59, 2, 1.70, []),
                                element!(83, "Bi", 208.98, 5, 1.54, [])];

pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

pub fn by_atomic_number(z: u8) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.atomic_number == z)
}

pub fn hydrogen() -> &'static Element {
    &ELEMENTS[0]
}

/// Valencias permitidas para un elemento con carga formal.
///
/// Para los no metales se usa la regla isoelectrónica: `N+` se comporta como
/// `C`, `O-` como `F`, etc. `None` significa "sin comprobación" (metales).
pub fn allowed_valences(element: &Element, charge: i8) -> Option<&'static [u8]> {
    if charge == 0 {
        return Some(element.valences).filter(|v| !v.is_empty());
    }
    let p_block = matches!(element.atomic_number, 5..=9 | 14..=17 | 32..=35 | 51..=53);
    if !p_block {
        return None;
    }
    let shifted = element.atomic_number as i16 - charge as i16;
    if !(1..=118).contains(&shifted) {
        return None;
    }
    by_atomic_number(shifted as u8).map(|e| e.valences).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_symbol_and_number() {
        let cl = by_symbol("Cl").expect("Cl");
        assert_eq!(cl.atomic_number, 17);
        assert_eq!(by_atomic_number(6).map(|e| e.symbol), Some("C"));
        assert!(by_symbol("Xx").is_none());
        assert_eq!(hydrogen().symbol, "H");
    }

    #[test]
    fn isoelectronic_valences() {
        let n = by_symbol("N").unwrap();
        assert_eq!(allowed_valences(n, 0), Some(&[3u8][..]));
        assert_eq!(allowed_valences(n, 1), Some(&[4u8][..]));
        let o = by_symbol("O").unwrap();
        assert_eq!(allowed_valences(o, -1), Some(&[1u8][..]));
        let na = by_symbol("Na").unwrap();
        assert_eq!(allowed_valences(na, 1), None);
    }
}
