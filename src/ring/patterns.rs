use super::rotations;
use crate::{AtomId, BondOrder, Element, Molecule};
use lazy_static::lazy_static;

/// A named heterocycle whose retained name fixes the position of every
/// heteroatom. Rings matching a pattern are pinned to it rather than
/// optimised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingPattern {
    pub name: &'static str,
    /// Element at each position, starting from position 1.
    pub elements: Vec<Element>,
    /// 0-based position that must carry an exocyclic `=O` (lactams).
    pub carbonyl_at: Option<usize>,
    /// Among equivalent placements, prefer the one with an N-H at
    /// position 1.
    pub indicated_hydrogen: bool,
}

fn pattern(name: &'static str, elements: &[Element]) -> RingPattern {
    RingPattern {
        name,
        elements: elements.to_vec(),
        carbonyl_at: None,
        indicated_hydrogen: false,
    }
}

lazy_static! {
    static ref RING_PATTERNS: Vec<RingPattern> = {
        use Element::{C, N, O, S};
        vec![
            RingPattern {
                carbonyl_at: Some(1),
                ..pattern("pyrrolidin-2-one", &[N, C, C, C, C])
            },
            RingPattern {
                carbonyl_at: Some(1),
                ..pattern("piperidin-2-one", &[N, C, C, C, C, C])
            },
            pattern("1,3-thiazole", &[S, C, N, C, C]),
            pattern("1,3-oxazole", &[O, C, N, C, C]),
            RingPattern {
                indicated_hydrogen: true,
                ..pattern("imidazole", &[N, C, N, C, C])
            },
            pattern("1,2-thiazole", &[S, N, C, C, C]),
            pattern("1,2-oxazole", &[O, N, C, C, C]),
            RingPattern {
                indicated_hydrogen: true,
                ..pattern("pyrazole", &[N, N, C, C, C])
            },
            pattern("1,3-thiazine", &[N, C, S, C, C, C]),
            pattern("1,2,4-triazine", &[N, N, C, N, C, C]),
        ]
    };
}

pub fn ring_patterns() -> &'static [RingPattern] {
    &RING_PATTERNS
}

impl RingPattern {
    /// Orderings of `cycle` that place every atom where the pattern wants
    /// it.
    pub fn placements(&self, cycle: &[AtomId], molecule: &Molecule) -> Vec<Vec<AtomId>> {
        if cycle.len() != self.elements.len() {
            return Vec::new();
        }
        rotations(cycle)
            .into_iter()
            .filter(|order| {
                order
                    .iter()
                    .zip(&self.elements)
                    .all(|(&id, &element)| molecule.is_element(id, element))
            })
            .filter(|order| match self.carbonyl_at {
                Some(i) => has_exocyclic_oxo(molecule, order[i], cycle),
                None => true,
            })
            .collect()
    }
}

fn has_exocyclic_oxo(molecule: &Molecule, atom: AtomId, cycle: &[AtomId]) -> bool {
    molecule.bonds_of(atom).into_iter().any(|(other, order)| {
        order == BondOrder::Double && !cycle.contains(&other) && molecule.is_element(other, Element::O)
    })
}

/// The first pattern `cycle` matches, with every placement it allows.
pub fn match_pattern(cycle: &[AtomId], molecule: &Molecule) -> Option<(&'static RingPattern, Vec<Vec<AtomId>>)> {
    ring_patterns().iter().find_map(|pattern| {
        let placements = pattern.placements(cycle, molecule);
        (!placements.is_empty()).then_some((pattern, placements))
    })
}
