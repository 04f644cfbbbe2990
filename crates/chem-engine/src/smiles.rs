//! Lector de SMILES (subconjunto de OpenSMILES).
//!
//! Produce átomos y enlaces "crudos": sin hidrógenos implícitos, sin
//! kekulización ni percepción de anillos. Eso lo resuelve `molecule`.
//! Soporta subconjunto orgánico, átomos entre corchetes (isótopo,
//! quiralidad, hidrógenos, carga, clase), ramas, cierres de anillo (`1`,
//! `%12`) y componentes desconectados (`.`). La estereoquímica se lee y se
//! descarta.
use std::collections::BTreeMap;

use crate::elements::{self, Element};
use crate::EngineError;

/// Límites de OpenSMILES para `[CH4]` y `[Fe+3]`.
const MAX_BRACKET_HYDROGENS: u32 = 9;
const MAX_BRACKET_CHARGE: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondSymbol {
    Single,
    Double,
    Triple,
    Aromatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BracketAtom {
    pub isotope: Option<u16>,
    pub hydrogens: u8,
    pub charge: i8,
}

#[derive(Debug, Clone)]
pub struct ParsedAtom {
    pub element: &'static Element,
    pub aromatic: bool,
    /// `None` para átomos del subconjunto orgánico (hidrógenos implícitos).
    pub bracket: Option<BracketAtom>,
}

#[derive(Debug, Clone)]
pub struct ParsedBond {
    pub a: usize,
    pub b: usize,
    /// `None` cuando el enlace es implícito en el texto.
    pub symbol: Option<BondSymbol>,
}

#[derive(Debug, Default)]
pub struct ParsedSmiles {
    pub atoms: Vec<ParsedAtom>,
    pub bonds: Vec<ParsedBond>,
}

/// Lee un SMILES. Todo lo que sigue al primer espacio se ignora (título).
pub fn parse(input: &str) -> Result<ParsedSmiles, EngineError> {
    let text = input.split_whitespace().next().unwrap_or("");
    if text.is_empty() {
        return Err(EngineError::Parse { position: 0,
                                        reason: "SMILES vacío".into() });
    }
    if !text.is_ascii() {
        return Err(EngineError::Parse { position: 0,
                                        reason: "caracteres no ASCII".into() });
    }
    Parser { src: text.as_bytes(),
             pos: 0,
             out: ParsedSmiles::default(),
             prev: None,
             pending: None,
             branches: Vec::new(),
             rings: BTreeMap::new() }.run()
}

struct OpenRing {
    atom: usize,
    symbol: Option<BondSymbol>,
    position: usize,
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    out: ParsedSmiles,
    prev: Option<usize>,
    pending: Option<BondSymbol>,
    branches: Vec<usize>,
    rings: BTreeMap<u16, OpenRing>,
}

impl Parser<'_> {
    fn run(mut self) -> Result<ParsedSmiles, EngineError> {
        while let Some(&c) = self.src.get(self.pos) {
            match c {
                b'(' => {
                    let prev = self.prev.ok_or_else(|| self.error("rama sin átomo previo"))?;
                    if self.pending.is_some() {
                        return Err(self.error("enlace antes de abrir rama"));
                    }
                    self.branches.push(prev);
                    self.pos += 1;
                }
                b')' => {
                    if self.pending.is_some() {
                        return Err(self.error("enlace colgante antes de cerrar rama"));
                    }
                    let restored = self.branches.pop().ok_or_else(|| self.error("paréntesis sin abrir"))?;
                    self.prev = Some(restored);
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => {
                    if self.prev.is_none() {
                        return Err(self.error("enlace sin átomo previo"));
                    }
                    if self.pending.is_some() {
                        return Err(self.error("dos enlaces consecutivos"));
                    }
                    self.pending = Some(match c {
                                            b'=' => BondSymbol::Double,
                                            b'#' => BondSymbol::Triple,
                                            b':' => BondSymbol::Aromatic,
                                            _ => BondSymbol::Single,
                                        });
                    self.pos += 1;
                }
                b'.' => {
                    if self.pending.is_some() || self.prev.is_none() {
                        return Err(self.error("separador '.' mal ubicado"));
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.add_atom(atom);
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.add_atom(atom);
                }
            }
        }
        if self.pending.is_some() {
            return Err(self.error("enlace colgante al final"));
        }
        if !self.branches.is_empty() {
            return Err(self.error("rama sin cerrar"));
        }
        if let Some((label, open)) = self.rings.iter().next() {
            return Err(EngineError::Parse { position: open.position,
                                            reason: format!("cierre de anillo {label} sin pareja") });
        }
        if self.out.atoms.is_empty() {
            return Err(self.error("SMILES sin átomos"));
        }
        Ok(self.out)
    }

    fn error(&self, reason: &str) -> EngineError {
        EngineError::Parse { position: self.pos,
                             reason: reason.to_string() }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn add_atom(&mut self, atom: ParsedAtom) {
        let idx = self.out.atoms.len();
        self.out.atoms.push(atom);
        if let Some(prev) = self.prev {
            self.out.bonds.push(ParsedBond { a: prev,
                                             b: idx,
                                             symbol: self.pending.take() });
        }
        self.prev = Some(idx);
    }

    fn has_bond(&self, a: usize, b: usize) -> bool {
        self.out.bonds.iter().any(|bd| (bd.a == a && bd.b == b) || (bd.a == b && bd.b == a))
    }

    fn ring_closure(&mut self) -> Result<(), EngineError> {
        let start = self.pos;
        let prev = self.prev.ok_or_else(|| self.error("cierre de anillo sin átomo previo"))?;
        let label = if self.peek() == Some(b'%') {
            self.pos += 1;
            let digits = self.src.get(self.pos..self.pos + 2).filter(|d| d.iter().all(u8::is_ascii_digit));
            let digits = digits.ok_or_else(|| self.error("'%' debe ir seguido de dos dígitos"))?;
            self.pos += 2;
            u16::from(digits[0] - b'0') * 10 + u16::from(digits[1] - b'0')
        } else {
            let d = u16::from(self.src[self.pos] - b'0');
            self.pos += 1;
            d
        };
        let symbol = self.pending.take();
        match self.rings.remove(&label) {
            Some(open) => {
                if open.atom == prev {
                    return Err(EngineError::Parse { position: start,
                                                    reason: "anillo cerrado sobre el mismo átomo".into() });
                }
                let resolved = match (open.symbol, symbol) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(EngineError::Parse { position: start,
                                                        reason: format!("órdenes de enlace en conflicto en el anillo {label}") })
                    }
                    (a, b) => a.or(b),
                };
                if self.has_bond(open.atom, prev) {
                    return Err(EngineError::Parse { position: start,
                                                    reason: "enlace duplicado por cierre de anillo".into() });
                }
                self.out.bonds.push(ParsedBond { a: open.atom,
                                                 b: prev,
                                                 symbol: resolved });
            }
            None => {
                self.rings.insert(label,
                                  OpenRing { atom: prev,
                                             symbol,
                                             position: start });
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<ParsedAtom, EngineError> {
        let rest = &self.src[self.pos..];
        let (symbol, aromatic, len) = match rest {
            [b'C', b'l', ..] => ("Cl", false, 2),
            [b'B', b'r', ..] => ("Br", false, 2),
            [b'B', ..] => ("B", false, 1),
            [b'C', ..] => ("C", false, 1),
            [b'N', ..] => ("N", false, 1),
            [b'O', ..] => ("O", false, 1),
            [b'P', ..] => ("P", false, 1),
            [b'S', ..] => ("S", false, 1),
            [b'F', ..] => ("F", false, 1),
            [b'I', ..] => ("I", false, 1),
            [b'b', ..] => ("B", true, 1),
            [b'c', ..] => ("C", true, 1),
            [b'n', ..] => ("N", true, 1),
            [b'o', ..] => ("O", true, 1),
            [b'p', ..] => ("P", true, 1),
            [b's', ..] => ("S", true, 1),
            _ => {
                let found = rest.first().map(|&c| c as char).unwrap_or(' ');
                return Err(self.error(&format!("símbolo no reconocido '{found}'")));
            }
        };
        self.pos += len;
        let element = elements::by_symbol(symbol).ok_or_else(|| self.error("elemento desconocido"))?;
        Ok(ParsedAtom { element,
                        aromatic,
                        bracket: None })
    }

    /// Número decimal sin signo; `None` si no hay dígitos.
    fn read_number(&mut self) -> Result<Option<u32>, EngineError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        std::str::from_utf8(&self.src[start..self.pos]).ok()
                                                       .and_then(|digits| digits.parse().ok())
                                                       .map(Some)
                                                       .ok_or_else(|| EngineError::Parse { position: start,
                                                                                           reason: "número fuera de rango".to_string() })
    }

    fn bracket_atom(&mut self) -> Result<ParsedAtom, EngineError> {
        self.pos += 1; // '['
        let isotope = match self.read_number()? {
            Some(n) => Some(u16::try_from(n).map_err(|_| self.error("isótopo fuera de rango"))?),
            None => None,
        };

        let (element, aromatic) = self.bracket_symbol()?;

        // Quiralidad: @, @@, @TH1, @SP2, @TB10, @OH25...
        if self.peek() == Some(b'@') {
            self.pos += 1;
            if self.peek() == Some(b'@') {
                self.pos += 1;
            } else if let Some(class) = self.src.get(self.pos..self.pos + 2) {
                if matches!(class, b"TH" | b"AL" | b"SP" | b"TB" | b"OH") {
                    self.pos += 2;
                    self.read_number()?;
                }
            }
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            hydrogens = match self.read_number()? {
                Some(n) if n <= MAX_BRACKET_HYDROGENS => n as u8,
                Some(_) => return Err(self.error("demasiados hidrógenos")),
                None => 1,
            };
        }

        let mut charge = 0i8;
        if let Some(sign @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let unit: i8 = if sign == b'+' { 1 } else { -1 };
            let magnitude = match self.read_number()? {
                Some(n) => n,
                None => {
                    let mut n = 1u32;
                    while self.peek() == Some(sign) && n <= MAX_BRACKET_CHARGE {
                        self.pos += 1;
                        n += 1;
                    }
                    n
                }
            };
            if magnitude > MAX_BRACKET_CHARGE {
                return Err(self.error("carga fuera de rango"));
            }
            charge = unit * magnitude as i8;
        }

        if self.peek() == Some(b':') {
            self.pos += 1;
            if self.read_number()?.is_none() {
                return Err(self.error("clase de átomo sin número"));
            }
        }

        if self.peek() != Some(b']') {
            return Err(self.error("átomo entre corchetes mal formado"));
        }
        self.pos += 1;
        Ok(ParsedAtom { element,
                        aromatic,
                        bracket: Some(BracketAtom { isotope,
                                                    hydrogens,
                                                    charge }) })
    }

    fn bracket_symbol(&mut self) -> Result<(&'static Element, bool), EngineError> {
        let rest = &self.src[self.pos..];
        // Aromáticos de dos letras primero (se, as, te).
        for (text, symbol) in [(&b"se"[..], "Se"), (&b"as"[..], "As"), (&b"te"[..], "Te")] {
            if rest.starts_with(text) {
                self.pos += 2;
                return Ok((elements::by_symbol(symbol).ok_or_else(|| self.error("elemento desconocido"))?, true));
            }
        }
        match rest.first().copied() {
            Some(c @ (b'b' | b'c' | b'n' | b'o' | b'p' | b's')) => {
                self.pos += 1;
                let upper = (c.to_ascii_uppercase() as char).to_string();
                let element = elements::by_symbol(&upper).ok_or_else(|| self.error("elemento desconocido"))?;
                Ok((element, true))
            }
            Some(c) if c.is_ascii_uppercase() => {
                if let Some(&next) = rest.get(1).filter(|n| n.is_ascii_lowercase()) {
                    let two = format!("{}{}", c as char, next as char);
                    if let Some(element) = elements::by_symbol(&two) {
                        self.pos += 2;
                        return Ok((element, false));
                    }
                }
                let one = (c as char).to_string();
                let element = elements::by_symbol(&one).ok_or_else(|| self.error(&format!("elemento desconocido '{one}'")))?;
                self.pos += 1;
                Ok((element, false))
            }
            _ => Err(self.error("falta el símbolo del elemento")),
        }
    }
}
