use super::{detect_groups, Chain};
use crate::{
    compare_locant_lists, AtomId, Decision, Element, FunctionalGroup, Molecule, PriorityTable,
    Tracer,
};
use std::cmp::Ordering;
use std::collections::{BTreeSet, VecDeque};

/// Substituents with at least this many heavy atoms count as complex.
const COMPLEX_SUBSTITUENT: usize = 5;

/// Locant sets that decide chain numbering, in order of precedence:
/// multiple bonds, then skeletal heteroatoms, then substituents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityLocants {
    pub unsaturation: Vec<u32>,
    pub heteroatoms: Vec<u32>,
    pub substituents: Vec<u32>,
}

impl PriorityLocants {
    pub fn of(chain: &Chain, molecule: &Molecule) -> Self {
        let members: BTreeSet<AtomId> = chain.atoms().iter().copied().collect();
        let mut locants = PriorityLocants::default();
        for (i, &atom) in chain.atoms().iter().enumerate() {
            let position = i as u32 + 1;
            if let Some(&next) = chain.atoms().get(i + 1) {
                if molecule
                    .bond_order(atom, next)
                    .is_some_and(|order| order.is_unsaturated())
                {
                    locants.unsaturation.push(position);
                }
            }
            if !molecule.element(atom).is_some_and(|e| e.is_carbon()) {
                locants.heteroatoms.push(position);
            }
            for other in molecule.neighbors(atom) {
                if !members.contains(&other) && !molecule.is_element(other, Element::H) {
                    locants.substituents.push(position);
                }
            }
        }
        locants
    }

    /// `Less` when `self` gives the lower locants.
    pub fn compare(&self, other: &Self) -> Ordering {
        compare_locant_lists(&self.unsaturation, &other.unsaturation)
            .then_with(|| compare_locant_lists(&self.heteroatoms, &other.heteroatoms))
            .then_with(|| compare_locant_lists(&self.substituents, &other.substituents))
    }

    pub fn is_better(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }
}

/// A chain in one numbering direction together with everything needed to
/// compare it against another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientedChain {
    pub chain: Chain,
    /// Positions of the groups that decide numbering first: principal
    /// groups when any sit on the chain, otherwise the chain's most senior
    /// detected groups.
    pub group_positions: Vec<u32>,
    pub locants: PriorityLocants,
    complex_at_one: usize,
}

impl OrientedChain {
    pub fn evaluate(
        chain: Chain,
        molecule: &Molecule,
        groups: &[FunctionalGroup],
        table: &PriorityTable,
    ) -> Self {
        let group_positions = functional_group_positions(&chain, molecule, groups, table);
        let locants = PriorityLocants::of(&chain, molecule);
        let complex_at_one = complex_substituents_at_one(&chain, molecule);
        Self {
            chain,
            group_positions,
            locants,
            complex_at_one,
        }
    }

    /// Full comparison ending in the raw id fallback, which only exists to
    /// make the outcome reproducible.
    pub fn compare(&self, other: &Self) -> (Ordering, &'static str) {
        match self.compare_locants(other) {
            (Ordering::Equal, _) => (
                self.chain.atoms().cmp(other.chain.atoms()),
                "atom id fallback",
            ),
            decided => decided,
        }
    }

    /// Comparison by chemically meaningful criteria only.
    pub fn compare_locants(&self, other: &Self) -> (Ordering, &'static str) {
        let ordering = compare_locant_lists(&self.group_positions, &other.group_positions);
        if ordering != Ordering::Equal {
            return (ordering, "functional group locants");
        }
        let ordering = self.locants.compare(&other.locants);
        if ordering != Ordering::Equal {
            return (ordering, "priority locants");
        }

        let ordering = other
            .locants
            .heteroatoms
            .len()
            .cmp(&self.locants.heteroatoms.len());
        if ordering != Ordering::Equal {
            return (ordering, "more heteroatoms");
        }
        let ordering = self
            .locants
            .substituents
            .len()
            .cmp(&other.locants.substituents.len());
        if ordering != Ordering::Equal {
            return (ordering, "fewer substituents");
        }
        let ordering = other.complex_at_one.cmp(&self.complex_at_one);
        if ordering != Ordering::Equal {
            return (ordering, "complex substituent at position 1");
        }
        let sum = |l: &PriorityLocants| l.substituents.iter().sum::<u32>();
        let ordering = sum(&self.locants).cmp(&sum(&other.locants));
        if ordering != Ordering::Equal {
            return (ordering, "lower substituent locant sum");
        }
        (Ordering::Equal, "tied")
    }
}

/// Number `chain` in whichever direction gives the lower locants.
pub fn orient(
    chain: &Chain,
    molecule: &Molecule,
    groups: &[FunctionalGroup],
    table: &PriorityTable,
    tracer: &dyn Tracer,
) -> OrientedChain {
    let forward = OrientedChain::evaluate(chain.clone(), molecule, groups, table);
    let reverse = OrientedChain::evaluate(chain.reversed(), molecule, groups, table);
    let (ordering, reason) = reverse.compare(&forward);
    let reversed = ordering == Ordering::Less;
    tracer.record(Decision::OrientationChosen { reversed, reason });
    if reversed {
        reverse
    } else {
        forward
    }
}

/// Whether `group` sits on the chain: one of its atoms is a member, or its
/// anchor is bonded to a member.
pub fn group_position(chain: &Chain, molecule: &Molecule, group: &FunctionalGroup) -> Option<u32> {
    if let Some(position) = chain.position(group.anchor()) {
        return Some(position);
    }
    if let Some(position) = group.atoms().iter().find_map(|id| chain.position(*id)) {
        return Some(position);
    }
    molecule
        .neighbors(group.anchor())
        .into_iter()
        .filter_map(|n| chain.position(n))
        .min()
}

fn functional_group_positions(
    chain: &Chain,
    molecule: &Molecule,
    groups: &[FunctionalGroup],
    table: &PriorityTable,
) -> Vec<u32> {
    let mut positions: Vec<u32> = groups
        .iter()
        .filter(|group| group.is_principal())
        .filter_map(|group| group_position(chain, molecule, group))
        .collect();
    if positions.is_empty() {
        let detected = detect_groups(chain, molecule, table);
        if let Some(best) = detected.iter().map(|d| table.class_rank(d.class)).min() {
            positions = detected
                .iter()
                .filter(|d| table.class_rank(d.class) == best)
                .filter_map(|d| chain.position(d.atom))
                .collect();
        }
    }
    positions.sort_unstable();
    positions
}

fn complex_substituents_at_one(chain: &Chain, molecule: &Molecule) -> usize {
    let members: BTreeSet<AtomId> = chain.atoms().iter().copied().collect();
    molecule
        .neighbors(chain.first())
        .into_iter()
        .filter(|n| !members.contains(n))
        .filter(|n| branch_size(molecule, *n, &members) >= COMPLEX_SUBSTITUENT)
        .count()
}

/// Heavy atoms reachable from `start` without crossing the chain.
fn branch_size(molecule: &Molecule, start: AtomId, chain: &BTreeSet<AtomId>) -> usize {
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(atom) = queue.pop_front() {
        for next in molecule.neighbors(atom) {
            if chain.contains(&next) || molecule.is_element(next, Element::H) {
                continue;
            }
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len()
}
