use super::{Conflict, ConflictLog, RuleRecord};
use crate::{
    parse_locant_set, AtomId, Candidate, Chain, FunctionalGroup, Locant, Molecule, NamingError, RingSystem,
    ValidationReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentKind {
    Chain,
    Ring,
}

/// The chosen parent with one locant per atom, in numbering order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentStructure {
    Chain { chain: Chain, locants: Vec<Locant> },
    Ring { ring: RingSystem, locants: Vec<Locant> },
}

impl ParentStructure {
    /// A chain numbered 1..N from its first atom.
    pub fn chain(chain: Chain) -> Self {
        let locants = (1..=chain.len() as u32).map(Locant::new).collect();
        Self::Chain { chain, locants }
    }

    /// A ring system with the locants it currently carries; systems not yet
    /// numbered are labelled 1..N in perception order.
    pub fn ring(ring: RingSystem) -> Self {
        let locants = if ring.locants().len() == ring.len() {
            ring.locants().to_vec()
        } else {
            (1..=ring.len() as u32).map(Locant::new).collect()
        };
        Self::Ring { ring, locants }
    }

    pub fn kind(&self) -> ParentKind {
        match self {
            ParentStructure::Chain { .. } => ParentKind::Chain,
            ParentStructure::Ring { .. } => ParentKind::Ring,
        }
    }

    pub fn atoms(&self) -> &[AtomId] {
        match self {
            ParentStructure::Chain { chain, .. } => chain.atoms(),
            ParentStructure::Ring { ring, .. } => ring.atoms(),
        }
    }

    pub fn locants(&self) -> &[Locant] {
        match self {
            ParentStructure::Chain { locants, .. } | ParentStructure::Ring { locants, .. } => locants,
        }
    }

    pub fn as_chain(&self) -> Option<&Chain> {
        match self {
            ParentStructure::Chain { chain, .. } => Some(chain),
            ParentStructure::Ring { .. } => None,
        }
    }

    pub fn as_ring(&self) -> Option<&RingSystem> {
        match self {
            ParentStructure::Ring { ring, .. } => Some(ring),
            ParentStructure::Chain { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms().len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms().is_empty()
    }

    pub fn contains(&self, id: AtomId) -> bool {
        self.atoms().contains(&id)
    }

    pub fn locant_of(&self, id: AtomId) -> Option<Locant> {
        let index = self.atoms().iter().position(|&a| a == id)?;
        self.locants().get(index).copied()
    }

    /// Integer position of a member atom, fusion letters dropped.
    pub fn position_of(&self, id: AtomId) -> Option<u32> {
        self.locant_of(id).map(|l| l.normalized())
    }

    /// The atom carrying a written locant such as `4` or `4a`.
    pub fn atom_at(&self, label: &str) -> Result<Option<AtomId>, NamingError> {
        let locant: Locant = label.parse()?;
        Ok(self.atom_with(locant))
    }

    /// Atoms for a written locant set such as `2,4a`, in the order given.
    pub fn atoms_at(&self, labels: &str) -> Result<Vec<Option<AtomId>>, NamingError> {
        Ok(parse_locant_set(labels)?
            .into_iter()
            .map(|locant| self.atom_with(locant))
            .collect())
    }

    fn atom_with(&self, locant: Locant) -> Option<AtomId> {
        let index = self.locants().iter().position(|l| *l == locant)?;
        self.atoms().get(index).copied()
    }
}

/// Everything the rule pipeline knows about one molecule at one point in
/// time. Rules never mutate a context in place; each produces the next one.
#[derive(Debug, Clone)]
pub struct NamingContext<'m> {
    molecule: &'m Molecule,
    groups: Vec<FunctionalGroup>,
    ring_systems: Vec<RingSystem>,
    parent_kind: Option<ParentKind>,
    candidates: Vec<Candidate>,
    parent: Option<ParentStructure>,
    numbering_complete: bool,
    conflicts: ConflictLog,
    records: Vec<RuleRecord>,
    report: Option<ValidationReport>,
}

impl<'m> NamingContext<'m> {
    pub fn new(molecule: &'m Molecule, groups: Vec<FunctionalGroup>, ring_systems: Vec<RingSystem>) -> Self {
        Self {
            molecule,
            groups,
            ring_systems,
            parent_kind: None,
            candidates: Vec::new(),
            parent: None,
            numbering_complete: false,
            conflicts: ConflictLog::new(),
            records: Vec::new(),
            report: None,
        }
    }

    pub fn molecule(&self) -> &'m Molecule {
        self.molecule
    }

    pub fn groups(&self) -> &[FunctionalGroup] {
        &self.groups
    }

    pub fn principal_groups(&self) -> impl Iterator<Item = &FunctionalGroup> + '_ {
        self.groups.iter().filter(|g| g.is_principal())
    }

    pub fn ring_systems(&self) -> &[RingSystem] {
        &self.ring_systems
    }

    pub fn parent_kind(&self) -> Option<ParentKind> {
        self.parent_kind
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn parent(&self) -> Option<&ParentStructure> {
        self.parent.as_ref()
    }

    pub fn numbering_complete(&self) -> bool {
        self.numbering_complete
    }

    pub fn conflicts(&self) -> &ConflictLog {
        &self.conflicts
    }

    pub fn records(&self) -> &[RuleRecord] {
        &self.records
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    pub fn with_groups(self, groups: Vec<FunctionalGroup>) -> Self {
        Self { groups, ..self }
    }

    pub fn with_parent_kind(self, kind: ParentKind) -> Self {
        Self {
            parent_kind: Some(kind),
            ..self
        }
    }

    pub fn with_candidates(self, candidates: Vec<Candidate>) -> Self {
        Self { candidates, ..self }
    }

    pub fn with_parent(self, parent: ParentStructure) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    pub fn with_numbering_complete(self, numbering_complete: bool) -> Self {
        Self {
            numbering_complete,
            ..self
        }
    }

    pub fn with_conflict(self, conflict: Conflict) -> Self {
        Self {
            conflicts: self.conflicts.with(conflict),
            ..self
        }
    }

    pub fn with_record(mut self, record: RuleRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_report(self, report: ValidationReport) -> Self {
        Self {
            report: Some(report),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::{perceive_ring_systems, NullTracer, NumberingConfig, Phase, RingNumberer};

    #[test]
    fn test_updates_leave_the_original_alone() {
        let mol = smiles("CCC").unwrap();
        let start = NamingContext::new(&mol, Vec::new(), Vec::new());
        let chain = Chain::new(&mol, vec![0, 1, 2]).unwrap();
        let next = start
            .clone()
            .with_parent(ParentStructure::chain(chain))
            .with_conflict(Conflict::new("test", Phase::Finalize, "noted"));
        assert!(start.parent().is_none());
        assert!(start.conflicts().is_empty());
        assert_eq!(next.parent().map(|p| p.len()), Some(3));
        assert_eq!(next.conflicts().len(), 1);
    }

    #[test]
    fn test_parent_positions() {
        let mol = smiles("CCCC").unwrap();
        let chain = Chain::new(&mol, vec![3, 2, 1, 0]).unwrap();
        let parent = ParentStructure::chain(chain);
        assert_eq!(parent.kind(), ParentKind::Chain);
        assert_eq!(parent.position_of(3), Some(1));
        assert_eq!(parent.position_of(0), Some(4));
        assert_eq!(parent.position_of(9), None);
        assert_eq!(parent.locants().len(), parent.len());
    }

    #[test]
    fn test_atom_lookup_by_written_locant() {
        let mol = smiles("CCCC").unwrap();
        let parent = ParentStructure::chain(Chain::new(&mol, vec![3, 2, 1, 0]).unwrap());
        assert_eq!(parent.atom_at("4").unwrap(), Some(0));
        assert_eq!(parent.atom_at("7").unwrap(), None);
        assert!(matches!(parent.atom_at("4-"), Err(NamingError::InvalidLocant(_))));

        let naphthalene = smiles("c1ccc2ccccc2c1").unwrap();
        let config = NumberingConfig::default();
        let ring = perceive_ring_systems(&naphthalene).remove(0);
        let parent = ParentStructure::ring(RingNumberer::new(&naphthalene, &[], &config, &NullTracer).apply(ring));
        let label = parent.locants().iter().find(|l| l.is_fusion()).unwrap().to_string();
        let fusion = parent.atom_at(&label).unwrap().unwrap();
        assert_eq!(naphthalene.rings().iter().filter(|r| r.contains(&fusion)).count(), 2);

        let atoms = parent.atoms_at(&format!("1, {label}, 99")).unwrap();
        assert_eq!(atoms, vec![parent.atom_at("1").unwrap(), Some(fusion), None]);
        assert!(atoms[0].is_some());
    }
}
