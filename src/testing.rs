//! Test fixtures: a small SMILES reader standing in for the graph builder
//! and ring detector, and helpers that build detector-style groups.

use crate::*;
use anyhow::{anyhow, bail, Context, Result};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

struct Parsed {
    element: Element,
    aromatic: bool,
    /// Explicit hydrogen count from a bracket atom.
    hydrogens: Option<u8>,
    charge: i8,
}

/// Read a SMILES string. Atom ids follow the order of appearance.
///
/// Supports the organic subset with implicit hydrogens, bracket atoms with
/// hydrogen counts and charges, `-=#:` bonds, branches, `.` and ring
/// closures (`1`-`9`, `%nn`). Each ring closure yields the shortest ring
/// through the bonds read so far.
pub fn smiles(input: &str) -> Result<Molecule> {
    smiles_helper(input).with_context(|| format!("failed to read SMILES {input}"))
}

fn smiles_helper(input: &str) -> Result<Molecule> {
    let chars: Vec<char> = input.chars().collect();
    let mut atoms: Vec<Parsed> = Vec::new();
    let mut bonds: Vec<(AtomId, AtomId, BondOrder)> = Vec::new();
    let mut rings: Vec<Vec<AtomId>> = Vec::new();
    let mut current: Option<AtomId> = None;
    let mut pending: Option<BondOrder> = None;
    let mut branches: Vec<AtomId> = Vec::new();
    let mut open: BTreeMap<u32, (AtomId, Option<BondOrder>)> = BTreeMap::new();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' => {
                branches.push(current.ok_or_else(|| anyhow!("branch at {i} without an atom"))?);
                i += 1;
            }
            ')' => {
                current = Some(branches.pop().ok_or_else(|| anyhow!("unmatched ')' at {i}"))?);
                i += 1;
            }
            '-' | '=' | '#' | ':' => {
                pending = Some(match c {
                    '-' => BondOrder::Single,
                    '=' => BondOrder::Double,
                    '#' => BondOrder::Triple,
                    _ => BondOrder::Aromatic,
                });
                i += 1;
            }
            '.' => {
                current = None;
                i += 1;
            }
            '0'..='9' | '%' => {
                let (label, width) = if c == '%' {
                    let digits: String = chars.iter().skip(i + 1).take(2).collect();
                    (digits.parse::<u32>().with_context(|| format!("ring label at {i}"))?, 3)
                } else {
                    (c.to_digit(10).unwrap_or_default(), 1)
                };
                let here = current.ok_or_else(|| anyhow!("ring closure at {i} without an atom"))?;
                match open.remove(&label) {
                    Some((start, opening_order)) => {
                        let order = pending
                            .take()
                            .or(opening_order)
                            .unwrap_or_else(|| implicit_order(&atoms, start, here));
                        if let Some(ring) = shortest_path(&bonds, start, here) {
                            let members: BTreeSet<AtomId> = ring.iter().copied().collect();
                            if !rings.iter().any(|r| r.iter().copied().collect::<BTreeSet<_>>() == members) {
                                rings.push(ring);
                            }
                        }
                        bonds.push((start, here, order));
                    }
                    None => {
                        open.insert(label, (here, pending.take()));
                    }
                }
                i += width;
            }
            '[' => {
                let end = chars[i..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .map(|offset| i + offset)
                    .ok_or_else(|| anyhow!("unclosed bracket at {i}"))?;
                let content: String = chars[i + 1..end].iter().collect();
                let atom = bracket_atom(&content)?;
                current = Some(add_atom(&mut atoms, &mut bonds, atom, current, pending.take()));
                i = end + 1;
            }
            _ => {
                let (element, aromatic, width) = organic_atom(&chars[i..])
                    .ok_or_else(|| anyhow!("unexpected '{c}' at {i}"))?;
                let atom = Parsed {
                    element,
                    aromatic,
                    hydrogens: None,
                    charge: 0,
                };
                current = Some(add_atom(&mut atoms, &mut bonds, atom, current, pending.take()));
                i += width;
            }
        }
    }
    if let Some(label) = open.keys().next() {
        bail!("ring {label} was never closed");
    }
    if !branches.is_empty() {
        bail!("unclosed branch");
    }

    let ring_atoms: BTreeSet<AtomId> = rings.iter().flatten().copied().collect();
    let built: Vec<Atom> = atoms
        .iter()
        .enumerate()
        .map(|(index, parsed)| {
            let id = index as AtomId;
            let hydrogens = parsed
                .hydrogens
                .unwrap_or_else(|| implicit_hydrogens(parsed, id, &bonds));
            Atom::new(id, parsed.element)
                .with_charge(parsed.charge)
                .with_hydrogens(hydrogens)
                .aromatic(parsed.aromatic)
                .in_ring(ring_atoms.contains(&id))
        })
        .collect();
    let bonds = bonds
        .into_iter()
        .map(|(a, b, order)| Bond::new(a, b, order))
        .collect();
    Ok(Molecule::new(built, bonds)?.with_rings(rings)?)
}

fn add_atom(
    atoms: &mut Vec<Parsed>,
    bonds: &mut Vec<(AtomId, AtomId, BondOrder)>,
    atom: Parsed,
    previous: Option<AtomId>,
    order: Option<BondOrder>,
) -> AtomId {
    let id = atoms.len() as AtomId;
    atoms.push(atom);
    if let Some(previous) = previous {
        let order = order.unwrap_or_else(|| implicit_order(atoms, previous, id));
        bonds.push((previous, id, order));
    }
    id
}

fn implicit_order(atoms: &[Parsed], a: AtomId, b: AtomId) -> BondOrder {
    let aromatic = |id: AtomId| atoms.get(id as usize).is_some_and(|atom| atom.aromatic);
    if aromatic(a) && aromatic(b) {
        BondOrder::Aromatic
    } else {
        BondOrder::Single
    }
}

/// Organic-subset symbol at the start of `rest`: element, aromatic flag and
/// characters consumed.
fn organic_atom(rest: &[char]) -> Option<(Element, bool, usize)> {
    let two: String = rest.iter().take(2).collect();
    if two == "Cl" || two == "Br" {
        return Some((Element::from_symbol(&two).ok()?, false, 2));
    }
    let c = *rest.first()?;
    match c {
        'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' => {
            Some((Element::from_symbol(&c.to_string()).ok()?, false, 1))
        }
        'b' | 'c' | 'n' | 'o' | 'p' | 's' => Some((Element::from_symbol(&c.to_string()).ok()?, true, 1)),
        _ => None,
    }
}

/// Bracket atom content such as `nH`, `N+`, `O-`, `NH3+`, `Se`.
fn bracket_atom(content: &str) -> Result<Parsed> {
    let chars: Vec<char> = content.chars().skip_while(|c| c.is_ascii_digit()).collect();
    let first = *chars.first().ok_or_else(|| anyhow!("empty bracket atom"))?;
    let mut i = 1;
    let mut symbol = first.to_string();
    if let Some(&second) = chars.get(1) {
        let candidate = format!("{first}{second}");
        if second.is_ascii_lowercase() && Element::from_symbol(&candidate).is_ok() {
            symbol = candidate;
            i = 2;
        }
    }
    let element = Element::from_symbol(&symbol).with_context(|| format!("bracket atom [{content}]"))?;
    let aromatic = first.is_ascii_lowercase();

    let mut hydrogens = 0;
    if chars.get(i) == Some(&'H') {
        i += 1;
        let digits: String = chars[i..].iter().take_while(|c| c.is_ascii_digit()).collect();
        i += digits.len();
        hydrogens = if digits.is_empty() { 1 } else { digits.parse()? };
    }

    let mut charge: i8 = 0;
    while let Some(&sign) = chars.get(i) {
        let unit = match sign {
            '+' => 1,
            '-' => -1,
            _ => bail!("unexpected '{sign}' in [{content}]"),
        };
        i += 1;
        let digits: String = chars[i..].iter().take_while(|c| c.is_ascii_digit()).collect();
        i += digits.len();
        charge += unit * if digits.is_empty() { 1 } else { digits.parse::<i8>()? };
    }

    Ok(Parsed {
        element,
        aromatic,
        hydrogens: Some(hydrogens),
        charge,
    })
}

fn implicit_hydrogens(atom: &Parsed, id: AtomId, bonds: &[(AtomId, AtomId, BondOrder)]) -> u8 {
    let valences: &[u32] = match atom.element {
        Element::B => &[3],
        Element::C => &[4],
        Element::N | Element::P => &[3, 5],
        Element::O => &[2],
        Element::S => &[2, 4, 6],
        Element::F | Element::Cl | Element::Br | Element::I => &[1],
        _ => &[],
    };
    let mut used: u32 = bonds
        .iter()
        .filter(|(a, b, _)| *a == id || *b == id)
        .map(|(_, _, order)| match order {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        })
        .sum();
    if atom.aromatic {
        used += 1;
    }
    let valence = valences
        .iter()
        .copied()
        .find(|&v| v >= used)
        .or_else(|| valences.last().copied())
        .unwrap_or(0);
    valence.saturating_sub(used) as u8
}

/// Shortest path from `from` to `to` over `bonds`, inclusive of both ends.
fn shortest_path(bonds: &[(AtomId, AtomId, BondOrder)], from: AtomId, to: AtomId) -> Option<Vec<AtomId>> {
    let mut adjacency: BTreeMap<AtomId, BTreeSet<AtomId>> = BTreeMap::new();
    for &(a, b, _) in bonds {
        adjacency.entry(a).or_default().insert(b);
        adjacency.entry(b).or_default().insert(a);
    }
    let mut parent: BTreeMap<AtomId, AtomId> = BTreeMap::new();
    let mut queue = VecDeque::from([from]);
    let mut seen = BTreeSet::from([from]);
    while let Some(atom) = queue.pop_front() {
        if atom == to {
            let mut path = vec![to];
            let mut at = to;
            while let Some(&previous) = parent.get(&at) {
                path.push(previous);
                at = previous;
            }
            path.reverse();
            return Some(path);
        }
        for &next in adjacency.get(&atom).into_iter().flatten() {
            if seen.insert(next) {
                parent.insert(next, atom);
                queue.push_back(next);
            }
        }
    }
    None
}

/// A detector-style group over `atoms`, first atom the anchor.
pub fn group(kind: &str, atoms: &[AtomId]) -> RawFunctionalGroup {
    RawFunctionalGroup::new(kind).with_atoms(atoms.iter().copied())
}

/// Ingest groups against the builtin priority table, dropping any that
/// reference no existing atom.
pub fn ingest(molecule: &Molecule, raw: Vec<RawFunctionalGroup>) -> Vec<FunctionalGroup> {
    raw.into_iter()
        .filter_map(|raw| FunctionalGroup::ingest(raw, molecule, PriorityTable::builtin()).group)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_hydrogens_and_rings() {
        let mol = smiles("CC(=O)O").unwrap();
        assert_eq!(mol.hydrogens(0), 3);
        assert_eq!(mol.hydrogens(1), 0);
        assert_eq!(mol.hydrogens(3), 1);
        assert!(mol.rings().is_empty());

        let naphthalene = smiles("c1ccc2ccccc2c1").unwrap();
        assert_eq!(naphthalene.rings().len(), 2);
        assert!(naphthalene.rings().iter().all(|ring| ring.len() == 6));
        assert_eq!(naphthalene.hydrogens(0), 1);
        assert_eq!(naphthalene.hydrogens(3), 0);
        assert_eq!(naphthalene.bond_order(3, 8), Some(BondOrder::Aromatic));
    }

    #[test]
    fn test_bracket_atoms() {
        let mol = smiles("CC[N+](=O)[O-]").unwrap();
        assert_eq!(mol.atom(2).unwrap().charge, 1);
        assert_eq!(mol.atom(4).unwrap().charge, -1);
        assert_eq!(mol.hydrogens(4), 0);

        let imidazole = smiles("c1cnc[nH]1").unwrap();
        assert_eq!(imidazole.hydrogens(4), 1);
        assert_eq!(imidazole.hydrogens(2), 0);
        assert!(imidazole.atom(4).unwrap().aromatic);
        assert!(smiles("C1CC").is_err());
        assert!(smiles("C[Xx]").is_err());
    }
}
