//! Ring parents: ring-system perception and the numbering state machine.
//!
//! Numbering moves a [`RingSystem`] through
//! [`RingNumberingState`]s in one direction only. Once a system reaches
//! [`RingNumberingState::Applied`] further numbering requests return it
//! untouched.

mod fused;
mod monocycle;
mod patterns;
mod perception;
mod von_baeyer;

pub use patterns::*;
pub use perception::*;
pub use von_baeyer::*;

use crate::{
    AtomId, Bond, Decision, Element, FunctionalGroup, Locant, Molecule, NumberingConfig, Tracer,
};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RingNumberingState {
    Unnumbered,
    HeteroatomPositioned,
    DirectionResolved,
    LocantOptimized,
    Applied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingKind {
    Monocycle,
    /// Ortho-fused aromatic rings, numbered around the periphery.
    Fused,
    /// Bridged (or saturated fused) polycycles, numbered by von Baeyer rules.
    Bridged,
    /// Rings joined at single atoms.
    Spiro,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSystem {
    /// Member atoms. Traversal order for a monocycle before numbering;
    /// numbering order afterwards.
    atoms: Vec<AtomId>,
    /// Locant of each entry of `atoms`, filled in by numbering.
    locants: Vec<Locant>,
    rings: Vec<Vec<AtomId>>,
    bonds: Vec<Bond>,
    kind: RingKind,
    von_baeyer: Option<VonBaeyerNumbering>,
    state: RingNumberingState,
}

impl RingSystem {
    pub fn new(atoms: Vec<AtomId>, rings: Vec<Vec<AtomId>>, bonds: Vec<Bond>, kind: RingKind) -> Self {
        Self {
            atoms,
            locants: Vec::new(),
            rings,
            bonds,
            kind,
            von_baeyer: None,
            state: RingNumberingState::Unnumbered,
        }
    }

    /// A single ring given in traversal order.
    pub fn monocycle(molecule: &Molecule, cycle: Vec<AtomId>) -> Self {
        let members: BTreeSet<AtomId> = cycle.iter().copied().collect();
        let bonds = bonds_within(molecule, &members);
        Self::new(cycle.clone(), vec![cycle], bonds, RingKind::Monocycle)
    }

    /// Attach a von Baeyer numbering supplied by the ring detector. The
    /// numbering pass then only optimises it.
    pub fn with_von_baeyer(mut self, numbering: VonBaeyerNumbering) -> Self {
        self.von_baeyer = Some(numbering);
        self
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn locants(&self) -> &[Locant] {
        &self.locants
    }

    pub fn rings(&self) -> &[Vec<AtomId>] {
        &self.rings
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn kind(&self) -> RingKind {
        self.kind
    }

    pub fn von_baeyer(&self) -> Option<&VonBaeyerNumbering> {
        self.von_baeyer.as_ref()
    }

    pub fn state(&self) -> RingNumberingState {
        self.state
    }

    pub fn is_applied(&self) -> bool {
        self.state == RingNumberingState::Applied
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, id: AtomId) -> bool {
        self.atoms.contains(&id)
    }

    pub fn locant_of(&self, id: AtomId) -> Option<Locant> {
        let index = self.atoms.iter().position(|&a| a == id)?;
        self.locants.get(index).copied()
    }

    pub fn heteroatom_count(&self, molecule: &Molecule) -> usize {
        self.atoms
            .iter()
            .filter(|id| molecule.element(**id).is_some_and(|e| e.is_heteroatom()))
            .count()
    }

    /// Move forward to `to`, tracing every intermediate state. Requests to
    /// move backwards are ignored.
    fn advance(mut self, to: RingNumberingState, tracer: &dyn Tracer) -> Self {
        use RingNumberingState::*;
        for next in [HeteroatomPositioned, DirectionResolved, LocantOptimized, Applied] {
            if next > to {
                break;
            }
            if next > self.state {
                tracer.record(Decision::RingTransition {
                    from: self.state,
                    to: next,
                });
                self.state = next;
            }
        }
        self
    }

    /// Fix the numbering: `order[i]` receives `labels[i]`.
    fn numbered(self, order: Vec<AtomId>, labels: Vec<Locant>) -> Self {
        Self {
            atoms: order,
            locants: labels,
            ..self
        }
    }
}

fn bonds_within(molecule: &Molecule, members: &BTreeSet<AtomId>) -> Vec<Bond> {
    molecule
        .bonds()
        .into_iter()
        .filter(|bond| members.contains(&bond.a) && members.contains(&bond.b))
        .collect()
}

fn sequential(len: usize) -> Vec<Locant> {
    (1..=len as u32).map(Locant::new).collect()
}

/// Everything ring numbering consults besides the ring itself.
pub struct RingNumberer<'a> {
    pub molecule: &'a Molecule,
    pub groups: &'a [FunctionalGroup],
    pub config: &'a NumberingConfig,
    pub tracer: &'a dyn Tracer,
}

impl<'a> RingNumberer<'a> {
    pub fn new(
        molecule: &'a Molecule,
        groups: &'a [FunctionalGroup],
        config: &'a NumberingConfig,
        tracer: &'a dyn Tracer,
    ) -> Self {
        Self {
            molecule,
            groups,
            config,
            tracer,
        }
    }

    /// Number `ring` according to its kind. Already numbered systems are
    /// returned unchanged.
    pub fn apply(&self, ring: RingSystem) -> RingSystem {
        if ring.is_applied() {
            return ring;
        }
        match ring.kind {
            RingKind::Monocycle => monocycle::number(ring, self),
            RingKind::Fused => fused::number(ring, self),
            RingKind::Bridged => von_baeyer::number(ring, self),
            RingKind::Spiro => {
                self.tracer.record(Decision::Fallback {
                    context: "ring numbering",
                    detail: "spiro systems are numbered in perception order".to_string(),
                });
                let labels = sequential(ring.len());
                let order = ring.atoms.clone();
                ring.numbered(order, labels)
                    .advance(RingNumberingState::Applied, self.tracer)
            }
        }
    }

    /// Score an ordering of ring atoms labelled with `labels`.
    fn evaluate(&self, order: &[AtomId], labels: &[Locant]) -> RingLocants {
        let molecule = self.molecule;
        let label = |id: AtomId| -> Option<Locant> {
            order.iter().position(|&a| a == id).map(|i| labels[i])
        };
        let members: BTreeSet<AtomId> = order.iter().copied().collect();

        let mut locants = RingLocants::default();
        let mut hetero: Vec<(Locant, u8)> = Vec::new();
        for (i, &atom) in order.iter().enumerate() {
            let Some(element) = molecule.element(atom) else {
                continue;
            };
            if element.is_heteroatom() {
                hetero.push((labels[i], element.hetero_seniority()));
                if element == Element::N
                    && molecule.hydrogens(atom) > 0
                    && molecule.atom(atom).is_some_and(|a| a.aromatic)
                {
                    locants.indicated_hydrogen.push(labels[i].normalized());
                }
            }
            if labels[i].is_fusion() {
                locants.fusion.push(labels[i]);
            }
            for other in molecule.neighbors(atom) {
                if !members.contains(&other) && !molecule.is_element(other, Element::H) {
                    locants.substituents.push(labels[i].normalized());
                }
            }
        }
        hetero.sort();
        locants.heteroatoms = hetero.iter().map(|(l, _)| *l).collect();
        locants.hetero_seniority = hetero.iter().map(|(_, s)| *s).collect();

        for bond in molecule.bonds() {
            if !bond.order.is_unsaturated() {
                continue;
            }
            if let (Some(a), Some(b)) = (label(bond.a), label(bond.b)) {
                let (a, b) = (a.normalized(), b.normalized());
                let (low, high) = (a.min(b), a.max(b));
                locants
                    .unsaturation
                    .push(if high - low == 1 { low } else { high });
            }
        }

        for group in self.groups.iter().filter(|g| g.is_principal()) {
            let on_ring = label(group.anchor())
                .or_else(|| group.atoms().iter().find_map(|id| label(*id)))
                .or_else(|| {
                    molecule
                        .neighbors(group.anchor())
                        .into_iter()
                        .filter_map(label)
                        .min()
                });
            if let Some(locant) = on_ring {
                locants.principal.push(locant.normalized());
            }
        }

        locants.fusion.sort();
        locants.unsaturation.sort_unstable();
        locants.substituents.sort_unstable();
        locants.principal.sort_unstable();
        locants.indicated_hydrogen.sort_unstable();
        locants
    }
}

/// Locant sets of one candidate ring numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RingLocants {
    heteroatoms: Vec<Locant>,
    /// Seniority of each heteroatom, in locant order.
    hetero_seniority: Vec<u8>,
    fusion: Vec<Locant>,
    principal: Vec<u32>,
    unsaturation: Vec<u32>,
    substituents: Vec<u32>,
    indicated_hydrogen: Vec<u32>,
}

impl RingLocants {
    /// Every cited locant, merged.
    fn complete(&self) -> Vec<u32> {
        let mut all: Vec<u32> = self
            .heteroatoms
            .iter()
            .map(|l| l.normalized())
            .chain(self.principal.iter().copied())
            .chain(self.substituents.iter().copied())
            .collect();
        all.sort_unstable();
        all
    }
}

/// Every rotation of `cycle` in both directions.
fn rotations(cycle: &[AtomId]) -> Vec<Vec<AtomId>> {
    let n = cycle.len();
    let mut orders = Vec::with_capacity(2 * n);
    for start in 0..n {
        for reverse in [false, true] {
            orders.push(rotation(cycle, start, reverse));
        }
    }
    orders
}

fn rotation(cycle: &[AtomId], start: usize, reverse: bool) -> Vec<AtomId> {
    let n = cycle.len();
    (0..n)
        .map(|k| {
            let i = if reverse { (start + n - k) % n } else { (start + k) % n };
            cycle[i]
        })
        .collect()
}
