//! Von Baeyer numbering of bridged polycycles.
//!
//! A bridged system is described by its main ring, the main bridge across
//! it and any secondary bridges. Positions run around the main ring from
//! main bridgehead 1 (the longer segment first), continue along the main
//! bridge from the end nearer bridgehead 1, then along each secondary
//! bridge from the end nearer the highest-numbered bridgehead.
//!
//! Once assigned, the numbering may only be moved by cyclic shifts and
//! reversals of the main ring that leave every bridgehead locant where it
//! was.

use super::{sequential, RingNumberer, RingNumberingState, RingSystem};
use crate::{compare_locant_lists, AtomId, Decision, SearchBudget};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// A path of zero or more atoms joining two bridgeheads. `atoms` runs from
/// `ends.0` towards `ends.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bridge {
    pub ends: (AtomId, AtomId),
    pub atoms: Vec<AtomId>,
}

impl Bridge {
    pub fn new(ends: (AtomId, AtomId), atoms: Vec<AtomId>) -> Self {
        Self { ends, atoms }
    }

    fn reversed_atoms(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.atoms.iter().rev().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VonBaeyerNumbering {
    main_ring: Vec<AtomId>,
    main_bridge: Bridge,
    secondary: Vec<Bridge>,
    positions: BTreeMap<AtomId, u32>,
}

impl VonBaeyerNumbering {
    /// `main_ring[0]` is position 1 and must be one end of `main_bridge`.
    pub fn new(main_ring: Vec<AtomId>, main_bridge: Bridge, secondary: Vec<Bridge>) -> Self {
        let mut numbering = Self {
            main_ring,
            main_bridge,
            secondary,
            positions: BTreeMap::new(),
        };
        numbering.positions = numbering.compute_positions();
        numbering
    }

    fn compute_positions(&self) -> BTreeMap<AtomId, u32> {
        let mut positions = BTreeMap::new();
        let mut next = 1;
        let mut place = |positions: &mut BTreeMap<AtomId, u32>, id: AtomId| {
            positions.entry(id).or_insert_with(|| {
                let position = next;
                next += 1;
                position
            });
        };

        for &id in &self.main_ring {
            place(&mut positions, id);
        }

        let (a, b) = self.main_bridge.ends;
        if positions.get(&a) <= positions.get(&b) {
            for &id in &self.main_bridge.atoms {
                place(&mut positions, id);
            }
        } else {
            for id in self.main_bridge.reversed_atoms() {
                place(&mut positions, id);
            }
        }

        for bridge in &self.secondary {
            let (a, b) = bridge.ends;
            if positions.get(&a) >= positions.get(&b) {
                for &id in &bridge.atoms {
                    place(&mut positions, id);
                }
            } else {
                for id in bridge.reversed_atoms() {
                    place(&mut positions, id);
                }
            }
        }
        positions
    }

    pub fn position(&self, id: AtomId) -> Option<u32> {
        self.positions.get(&id).copied()
    }

    pub fn positions(&self) -> &BTreeMap<AtomId, u32> {
        &self.positions
    }

    pub fn main_ring(&self) -> &[AtomId] {
        &self.main_ring
    }

    pub fn main_bridge(&self) -> &Bridge {
        &self.main_bridge
    }

    pub fn secondary_bridges(&self) -> &[Bridge] {
        &self.secondary
    }

    /// Atoms in position order.
    pub fn ordered(&self) -> Vec<AtomId> {
        let mut atoms: Vec<(u32, AtomId)> = self.positions.iter().map(|(&id, &p)| (p, id)).collect();
        atoms.sort_unstable();
        atoms.into_iter().map(|(_, id)| id).collect()
    }

    fn end_locants(&self, bridge: &Bridge) -> (u32, u32) {
        let a = self.position(bridge.ends.0).unwrap_or(0);
        let b = self.position(bridge.ends.1).unwrap_or(0);
        (a.min(b), a.max(b))
    }

    pub fn main_bridgehead_locants(&self) -> (u32, u32) {
        self.end_locants(&self.main_bridge)
    }

    /// Bridgehead locant pair of every secondary bridge, sorted.
    pub fn bridge_locants(&self) -> Vec<(u32, u32)> {
        let mut pairs: Vec<(u32, u32)> = self.secondary.iter().map(|b| self.end_locants(b)).collect();
        pairs.sort_unstable();
        pairs
    }

    /// The same structure with position 1 moved to `main_ring[shift]`,
    /// running backwards around the main ring when `reversed`.
    pub fn transformed(&self, shift: usize, reversed: bool) -> Self {
        Self::new(
            super::rotation(&self.main_ring, shift, reversed),
            self.main_bridge.clone(),
            self.secondary.clone(),
        )
    }

    /// True when `other` keeps every bridgehead at the locant it has here.
    pub fn preserves_bridges(&self, other: &Self) -> bool {
        self.main_bridgehead_locants() == other.main_bridgehead_locants()
            && self.bridge_locants() == other.bridge_locants()
    }
}

pub(super) fn number(ring: RingSystem, numberer: &RingNumberer) -> RingSystem {
    let tracer = numberer.tracer;
    let numbering = match ring.von_baeyer().cloned() {
        Some(supplied) => Some(supplied),
        None => assign(&ring, numberer),
    };

    let Some(numbering) = numbering.filter(|n| n.positions().len() == ring.len()) else {
        tracer.record(Decision::Fallback {
            context: "von Baeyer numbering",
            detail: "no main ring and bridge cover the system".to_string(),
        });
        let labels = sequential(ring.len());
        let order = ring.atoms().to_vec();
        return ring
            .numbered(order, labels)
            .advance(RingNumberingState::Applied, tracer);
    };

    let ring = ring.advance(RingNumberingState::DirectionResolved, tracer);
    let best = optimize_shifts(&numbering, numberer);
    let order = best.ordered();
    let labels = sequential(order.len());
    ring.advance(RingNumberingState::LocantOptimized, tracer)
        .with_von_baeyer(best)
        .numbered(order, labels)
        .advance(RingNumberingState::Applied, tracer)
}

/// Try every cyclic shift and reversal of the main ring. A transform is
/// only considered if it keeps all bridgehead locants; among those the
/// lowest heteroatom locants win, then principal groups, then multiple
/// bonds, then the lowest complete locant set.
pub fn optimize_shifts(original: &VonBaeyerNumbering, numberer: &RingNumberer) -> VonBaeyerNumbering {
    let score = |numbering: &VonBaeyerNumbering| {
        let order = numbering.ordered();
        numberer.evaluate(&order, &sequential(order.len()))
    };

    let mut best = original.clone();
    let mut best_score = score(original);
    for shift in 0..original.main_ring.len() {
        for reversed in [false, true] {
            if shift == 0 && !reversed {
                continue;
            }
            let candidate = original.transformed(shift, reversed);
            let accepted = original.preserves_bridges(&candidate);
            numberer.tracer.record(Decision::ShiftConsidered {
                shift,
                reversed,
                accepted,
            });
            if !accepted {
                continue;
            }
            let candidate_score = score(&candidate);
            let ordering = compare_locant_lists(&candidate_score.heteroatoms, &best_score.heteroatoms)
                .then_with(|| compare_locant_lists(&candidate_score.principal, &best_score.principal))
                .then_with(|| compare_locant_lists(&candidate_score.unsaturation, &best_score.unsaturation))
                .then_with(|| compare_locant_lists(&candidate_score.complete(), &best_score.complete()));
            if ordering == Ordering::Less {
                best = candidate;
                best_score = candidate_score;
            }
        }
    }
    best
}

type Adjacency = BTreeMap<AtomId, Vec<AtomId>>;

fn adjacency(ring: &RingSystem) -> Adjacency {
    let mut adjacency: Adjacency = ring.atoms().iter().map(|&id| (id, Vec::new())).collect();
    for bond in ring.bonds() {
        adjacency.entry(bond.a).or_default().push(bond.b);
        adjacency.entry(bond.b).or_default().push(bond.a);
    }
    for next in adjacency.values_mut() {
        next.sort_unstable();
        next.dedup();
    }
    adjacency
}

/// Derive a numbering from the ring graph: largest main ring, largest
/// main bridge dividing it as symmetrically as possible, then the
/// arrangement with the lowest secondary bridgehead locants, then
/// heteroatom, principal-group, multiple-bond and substituent locants.
pub(super) fn assign(ring: &RingSystem, numberer: &RingNumberer) -> Option<VonBaeyerNumbering> {
    let adjacency = adjacency(ring);
    let mut search = PathSearch {
        adjacency: &adjacency,
        budget: SearchBudget::new(numberer.config.max_search_steps),
    };
    let cap = numberer.config.max_von_baeyer_candidates;

    let mut candidates = Vec::new();
    'cycles: for cycle in search.largest_cycles() {
        for (u, bridge, v) in main_bridges(&cycle, &mut search) {
            for numbering in arrangements(&cycle, u, &bridge, v, &mut search) {
                candidates.push(numbering);
                if candidates.len() >= cap {
                    break 'cycles;
                }
            }
        }
    }
    if search.budget.exhausted() {
        numberer.tracer.record(Decision::BudgetExhausted {
            search: "von Baeyer",
            steps: search.budget.used(),
        });
    }

    candidates
        .into_iter()
        .map(|numbering| {
            let order = numbering.ordered();
            let locants = numberer.evaluate(&order, &sequential(order.len()));
            let bridgeheads: Vec<u32> = numbering
                .bridge_locants()
                .into_iter()
                .flat_map(|(a, b)| [a, b])
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            (numbering, order, bridgeheads, locants)
        })
        .min_by(|(_, oa, ba, la), (_, ob, bb, lb)| {
            compare_locant_lists(ba, bb)
                .then_with(|| compare_locant_lists(&la.heteroatoms, &lb.heteroatoms))
                .then_with(|| compare_locant_lists(&la.principal, &lb.principal))
                .then_with(|| compare_locant_lists(&la.unsaturation, &lb.unsaturation))
                .then_with(|| compare_locant_lists(&la.substituents, &lb.substituents))
                .then_with(|| oa.cmp(ob))
        })
        .map(|(numbering, ..)| numbering)
}

/// Longest bridges across `cycle`, keeping the most symmetric division.
fn main_bridges(cycle: &[AtomId], search: &mut PathSearch) -> Vec<(AtomId, Vec<AtomId>, AtomId)> {
    let members: BTreeSet<AtomId> = cycle.iter().copied().collect();
    let mut bridges = search.longest_bridges(&members);
    if bridges.is_empty() {
        let m = cycle.len();
        for i in 0..m {
            for j in i + 2..m {
                if (i, j) != (0, m - 1) && search.adjacency[&cycle[i]].contains(&cycle[j]) {
                    bridges.push((cycle[i], Vec::new(), cycle[j]));
                }
            }
        }
    }

    let index = |id: AtomId| cycle.iter().position(|&a| a == id).unwrap_or(0);
    let asymmetry = |(u, _, v): &(AtomId, Vec<AtomId>, AtomId)| {
        let m = cycle.len();
        let one_side = (index(*v) + m - index(*u)) % m - 1;
        let other_side = m - 2 - one_side;
        one_side.abs_diff(other_side)
    };
    let Some(most_symmetric) = bridges.iter().map(asymmetry).min() else {
        return Vec::new();
    };
    bridges.retain(|bridge| asymmetry(bridge) == most_symmetric);
    bridges
}

/// Every way to start the main ring at a main bridgehead and run the
/// longer segment first, with secondary bridges laid out greedily.
fn arrangements(
    cycle: &[AtomId],
    u: AtomId,
    bridge: &[AtomId],
    v: AtomId,
    search: &mut PathSearch,
) -> Vec<VonBaeyerNumbering> {
    let mut result = Vec::new();
    for (first, second) in [(u, v), (v, u)] {
        let Some(start) = cycle.iter().position(|&a| a == first) else {
            continue;
        };
        for reversed in [false, true] {
            let main_ring = super::rotation(cycle, start, reversed);
            let Some(k) = main_ring.iter().position(|&a| a == second) else {
                continue;
            };
            if k - 1 < main_ring.len() - k - 1 {
                continue;
            }
            let main_bridge = Bridge::new((u, v), bridge.to_vec());
            let partial = VonBaeyerNumbering::new(main_ring, main_bridge, Vec::new());
            let secondary = secondary_bridges(&partial, search);
            result.push(VonBaeyerNumbering::new(
                partial.main_ring,
                partial.main_bridge,
                secondary,
            ));
        }
    }
    result
}

/// Bridges over atoms not yet numbered, longest first, each joining the
/// lowest available bridgehead locants. Ring bonds left uncovered at the
/// end become zero-atom bridges.
fn secondary_bridges(partial: &VonBaeyerNumbering, search: &mut PathSearch) -> Vec<Bridge> {
    let mut numbering = partial.clone();
    let mut secondary = Vec::new();
    loop {
        let numbered: BTreeSet<AtomId> = numbering.positions().keys().copied().collect();
        let free: BTreeSet<AtomId> = search
            .adjacency
            .keys()
            .copied()
            .filter(|id| !numbered.contains(id))
            .collect();
        if free.is_empty() {
            break;
        }
        let best = search
            .longest_bridges(&numbered)
            .into_iter()
            .min_by_key(|(a, _, b)| {
                let (pa, pb) = (numbering.position(*a), numbering.position(*b));
                (pa.min(pb), pa.max(pb))
            });
        let Some((a, atoms, b)) = best else {
            break;
        };
        secondary.push(Bridge::new((a, b), atoms));
        numbering = VonBaeyerNumbering::new(
            numbering.main_ring.clone(),
            numbering.main_bridge.clone(),
            secondary.clone(),
        );
    }

    let covered = covered_bonds(&numbering);
    for (&a, next) in search.adjacency {
        for &b in next {
            if a < b && !covered.contains(&(a, b)) {
                secondary.push(Bridge::new((a, b), Vec::new()));
            }
        }
    }
    secondary
}

fn covered_bonds(numbering: &VonBaeyerNumbering) -> BTreeSet<(AtomId, AtomId)> {
    let mut covered = BTreeSet::new();
    let mut cover = |path: &[AtomId]| {
        for pair in path.windows(2) {
            covered.insert((pair[0].min(pair[1]), pair[0].max(pair[1])));
        }
    };
    let ring = &numbering.main_ring;
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        cover(ring);
        cover(&[last, first]);
    }
    for bridge in std::iter::once(&numbering.main_bridge).chain(&numbering.secondary) {
        let path: Vec<AtomId> = std::iter::once(bridge.ends.0)
            .chain(bridge.atoms.iter().copied())
            .chain(std::iter::once(bridge.ends.1))
            .collect();
        cover(&path);
    }
    covered
}

/// Bounded depth-first path search within one ring system.
struct PathSearch<'a> {
    adjacency: &'a Adjacency,
    budget: SearchBudget,
}

impl PathSearch<'_> {
    /// Simple cycles of maximal length, each listed once.
    fn largest_cycles(&mut self) -> Vec<Vec<AtomId>> {
        let mut cycles = Vec::new();
        let starts: Vec<AtomId> = self.adjacency.keys().copied().collect();
        for start in starts {
            let mut path = vec![start];
            self.extend_cycle(start, &mut path, &mut cycles);
        }
        let longest = cycles.iter().map(Vec::len).max().unwrap_or(0);
        cycles.retain(|cycle| cycle.len() == longest);
        cycles
    }

    fn extend_cycle(&mut self, start: AtomId, path: &mut Vec<AtomId>, cycles: &mut Vec<Vec<AtomId>>) {
        if !self.budget.step() {
            return;
        }
        let Some(&current) = path.last() else {
            return;
        };
        for &next in &self.adjacency[&current] {
            if next == start && path.len() >= 3 && path[1] < current {
                cycles.push(path.clone());
            } else if next > start && !path.contains(&next) {
                path.push(next);
                self.extend_cycle(start, path, cycles);
                path.pop();
            }
        }
    }

    /// Longest paths from one atom of `ends` to a different atom of `ends`
    /// whose interior avoids `ends`. Paths with an empty interior are not
    /// reported.
    fn longest_bridges(&mut self, ends: &BTreeSet<AtomId>) -> Vec<(AtomId, Vec<AtomId>, AtomId)> {
        let mut found = Vec::new();
        for &start in ends {
            let mut interior = Vec::new();
            self.extend_bridge(start, start, ends, &mut interior, &mut found);
        }
        let longest = found.iter().map(|(_, atoms, _)| atoms.len()).max().unwrap_or(0);
        found.retain(|(_, atoms, _)| atoms.len() == longest);
        found
    }

    fn extend_bridge(
        &mut self,
        start: AtomId,
        current: AtomId,
        ends: &BTreeSet<AtomId>,
        interior: &mut Vec<AtomId>,
        found: &mut Vec<(AtomId, Vec<AtomId>, AtomId)>,
    ) {
        if !self.budget.step() {
            return;
        }
        for &next in &self.adjacency[&current] {
            if ends.contains(&next) {
                if !interior.is_empty() && next > start {
                    found.push((start, interior.clone(), next));
                }
            } else if !interior.contains(&next) {
                interior.push(next);
                self.extend_bridge(start, next, ends, interior, found);
                interior.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::{
        perceive_ring_systems, Atom, Bond, BondOrder, Element, Molecule, NullTracer, NumberingConfig,
        RecordingTracer, RingKind,
    };

    fn system(mol: &Molecule) -> RingSystem {
        let atoms: BTreeSet<AtomId> = mol.rings().iter().flatten().copied().collect();
        let bonds = super::super::bonds_within(mol, &atoms);
        RingSystem::new(atoms.into_iter().collect(), mol.rings().to_vec(), bonds, RingKind::Bridged)
    }

    fn locant(ring: &RingSystem, id: AtomId) -> u32 {
        ring.locant_of(id).map(|l| l.number()).unwrap()
    }

    /// tricyclo[3.3.1.0(2,7)]nonane with an oxygen at position 4. Atom id
    /// `p - 1` sits at position `p` of the supplied numbering.
    fn tricyclic() -> (Molecule, VonBaeyerNumbering) {
        let atoms = (0..9)
            .map(|id| Atom::new(id, if id == 3 { Element::O } else { Element::C }))
            .collect();
        let mut bonds: Vec<Bond> = (0..8).map(|i| Bond::new(i, (i + 1) % 8, BondOrder::Single)).collect();
        bonds.push(Bond::new(0, 8, BondOrder::Single));
        bonds.push(Bond::new(8, 4, BondOrder::Single));
        bonds.push(Bond::new(1, 6, BondOrder::Single));
        let mol = Molecule::new(atoms, bonds)
            .unwrap()
            .with_rings(vec![vec![0, 1, 6, 7], vec![1, 2, 3, 4, 5, 6], vec![0, 8, 4, 5, 6, 7]])
            .unwrap();
        let numbering = VonBaeyerNumbering::new(
            (0..8).collect(),
            Bridge::new((0, 4), vec![8]),
            vec![Bridge::new((1, 6), Vec::new())],
        );
        (mol, numbering)
    }

    #[test]
    fn test_bicyclo_2_2_1() {
        let mol = smiles("C1CC2CCC1C2").unwrap();
        let config = NumberingConfig::default();
        let ring = perceive_ring_systems(&mol).remove(0);
        let ring = RingNumberer::new(&mol, &[], &config, &NullTracer).apply(ring);
        assert_eq!(locant(&ring, 6), 7);
        let mut bridgeheads = vec![locant(&ring, 2), locant(&ring, 5)];
        bridgeheads.sort();
        assert_eq!(bridgeheads, vec![1, 4]);
        assert_eq!(ring.von_baeyer().unwrap().main_bridgehead_locants(), (1, 4));
    }

    #[test]
    fn test_bicyclo_3_2_1_longer_segment_first() {
        let mol = smiles("C1CC2CCC(C1)C2").unwrap();
        let config = NumberingConfig::default();
        let ring = RingNumberer::new(&mol, &[], &config, &NullTracer).apply(system(&mol));
        assert_eq!(locant(&ring, 7), 8);
        let mut bridgeheads = vec![locant(&ring, 2), locant(&ring, 5)];
        bridgeheads.sort();
        assert_eq!(bridgeheads, vec![1, 5]);
        let mut short_side = vec![locant(&ring, 3), locant(&ring, 4)];
        short_side.sort();
        assert_eq!(short_side, vec![6, 7]);
    }

    #[test]
    fn test_shift_that_moves_bridge_is_rejected() {
        let (mol, numbering) = tricyclic();
        let config = NumberingConfig::default();
        let tracer = RecordingTracer::new();
        let numberer = RingNumberer::new(&mol, &[], &config, &tracer);
        let ring = numberer.apply(system(&mol).with_von_baeyer(numbering.clone()));

        // Starting at position 5 and running backwards would put the
        // oxygen at 2, but moves the secondary bridge to (4,7).
        let lower = numbering.transformed(4, true);
        assert_eq!(lower.position(3), Some(2));
        assert_eq!(lower.bridge_locants(), vec![(4, 7)]);
        assert!(tracer.decisions().contains(&Decision::ShiftConsidered {
            shift: 4,
            reversed: true,
            accepted: false,
        }));

        let applied = ring.von_baeyer().unwrap();
        assert_eq!(applied.bridge_locants(), vec![(2, 7)]);
        assert_eq!(locant(&ring, 3), 4);
        assert_eq!(applied, &numbering);
    }

    #[test]
    fn test_accepted_transforms_keep_bridges() {
        let (mol, supplied) = tricyclic();
        let config = NumberingConfig::default();
        let numberer = RingNumberer::new(&mol, &[], &config, &NullTracer);
        let assigned = assign(&system(&mol), &numberer).unwrap();
        assert_eq!(assigned.positions().len(), 9);
        assert_eq!(assigned.bridge_locants().len(), 1);

        for original in [supplied, assigned] {
            for shift in 0..original.main_ring().len() {
                for reversed in [false, true] {
                    let candidate = original.transformed(shift, reversed);
                    if original.preserves_bridges(&candidate) {
                        assert_eq!(candidate.bridge_locants(), original.bridge_locants());
                    }
                }
            }
            let best = optimize_shifts(&original, &numberer);
            assert_eq!(best.bridge_locants(), original.bridge_locants());
            assert_eq!(best.main_bridgehead_locants(), original.main_bridgehead_locants());
        }
    }

    #[test]
    fn test_supplied_numbering_improved_by_reversal() {
        // 2-methylbicyclo[2.2.1]heptane supplied with the methyl at 6
        let mol = smiles("CC1CC2CCC1C2").unwrap();
        let supplied = VonBaeyerNumbering::new(vec![6, 5, 4, 3, 2, 1], Bridge::new((6, 3), vec![7]), Vec::new());
        assert_eq!(supplied.position(1), Some(6));

        let config = NumberingConfig::default();
        let numberer = RingNumberer::new(&mol, &[], &config, &NullTracer);
        let ring = numberer.apply(system(&mol).with_von_baeyer(supplied));
        assert_eq!(locant(&ring, 1), 2);
        assert_eq!(locant(&ring, 7), 7);
        assert_eq!(ring.von_baeyer().unwrap().main_bridgehead_locants(), (1, 4));
    }

    #[test]
    fn test_double_bond_takes_lowest_locants() {
        // bicyclo[2.2.1]hept-2-ene, written so atom order favours hept-5-ene
        let mol = smiles("C1CC2CC1C=C2").unwrap();
        let config = NumberingConfig::default();
        let ring = perceive_ring_systems(&mol).remove(0);
        let ring = RingNumberer::new(&mol, &[], &config, &NullTracer).apply(ring);
        let mut alkene = vec![locant(&ring, 5), locant(&ring, 6)];
        alkene.sort();
        assert_eq!(alkene, vec![2, 3]);
        assert_eq!(locant(&ring, 3), 7);
        assert_eq!(ring.von_baeyer().unwrap().main_bridgehead_locants(), (1, 4));
    }

    #[test]
    fn test_reversal_lowers_supplied_double_bond() {
        let mol = smiles("C1CC2CC1C=C2").unwrap();
        // hept-5-ene: bridgeheads 2 and 4, bridge 3, double bond on 5 and 6
        let supplied = VonBaeyerNumbering::new(vec![2, 1, 0, 4, 5, 6], Bridge::new((2, 4), vec![3]), Vec::new());
        assert_eq!(supplied.position(5), Some(5));

        let config = NumberingConfig::default();
        let numberer = RingNumberer::new(&mol, &[], &config, &NullTracer);
        let best = optimize_shifts(&supplied, &numberer);
        let mut alkene = vec![best.position(5).unwrap(), best.position(6).unwrap()];
        alkene.sort();
        assert_eq!(alkene, vec![2, 3]);
        assert_eq!(best.main_bridgehead_locants(), (1, 4));
    }

    #[test]
    fn test_main_bridge_runs_from_bridgehead_one() {
        let numbering = VonBaeyerNumbering::new(
            vec![0, 1, 2, 3, 4, 5, 6],
            Bridge::new((4, 0), vec![8, 7]),
            Vec::new(),
        );
        assert_eq!(numbering.position(7), Some(8));
        assert_eq!(numbering.position(8), Some(9));
        assert_eq!(numbering.ordered(), vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
