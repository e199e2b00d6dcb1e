//! Functional groups as reported by the detector, and their normalised form.

mod priority;
pub use priority::*;

use crate::{AtomId, Locants, Molecule, Name};

/// A detector's reference to an atom. Some detectors emit bare ids, others
/// wrap them in an object; both normalise to an [`AtomId`] at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomRef {
    Id(AtomId),
    Object { id: AtomId },
}

impl AtomRef {
    pub fn id(&self) -> AtomId {
        match *self {
            AtomRef::Id(id) | AtomRef::Object { id } => id,
        }
    }
}

impl From<AtomId> for AtomRef {
    fn from(id: AtomId) -> Self {
        AtomRef::Id(id)
    }
}

/// A functional group exactly as the detector hands it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFunctionalGroup {
    pub kind: String,
    /// Rank supplied by the detector; looked up in the priority table when
    /// absent.
    pub priority: Option<u32>,
    pub atoms: Vec<AtomRef>,
    pub bonds: Vec<(AtomId, AtomId)>,
    pub is_principal: bool,
}

impl RawFunctionalGroup {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            priority: None,
            atoms: Vec::new(),
            bonds: Vec::new(),
            is_principal: false,
        }
    }

    pub fn with_atoms<I, A>(mut self, atoms: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AtomRef>,
    {
        self.atoms = atoms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bonds(mut self, bonds: Vec<(AtomId, AtomId)>) -> Self {
        self.bonds = bonds;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn principal(mut self) -> Self {
        self.is_principal = true;
        self
    }
}

/// A functional group after ingestion: plain atom ids, a canonical kind, and
/// locants that move from atom ids to positions exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalGroup {
    kind: Name,
    priority: u32,
    atoms: Vec<AtomId>,
    bonds: Vec<(AtomId, AtomId)>,
    is_principal: bool,
    locants: Locants,
}

/// Result of normalising one detector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingested {
    /// `None` when none of the group's atoms exist in the molecule.
    pub group: Option<FunctionalGroup>,
    /// Atom ids the group referenced that the molecule does not contain.
    pub missing: Vec<AtomId>,
}

impl FunctionalGroup {
    pub fn ingest(raw: RawFunctionalGroup, molecule: &Molecule, table: &PriorityTable) -> Ingested {
        let kind = table.canonical(&Name::new(&raw.kind));
        let priority = raw
            .priority
            .or_else(|| table.rank(&kind))
            .unwrap_or(NO_PRIORITY);

        let (atoms, missing): (Vec<AtomId>, Vec<AtomId>) = raw
            .atoms
            .iter()
            .map(AtomRef::id)
            .partition(|id| molecule.contains(*id));
        if atoms.is_empty() {
            return Ingested {
                group: None,
                missing,
            };
        }

        let bonds = raw
            .bonds
            .into_iter()
            .filter(|(a, b)| molecule.contains(*a) && molecule.contains(*b))
            .collect();
        let locants = Locants::AtomIds(vec![atoms[0]]);
        Ingested {
            group: Some(Self {
                kind,
                priority,
                atoms,
                bonds,
                is_principal: raw.is_principal,
                locants,
            }),
            missing,
        }
    }

    pub fn kind(&self) -> &Name {
        &self.kind
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[(AtomId, AtomId)] {
        &self.bonds
    }

    pub fn is_principal(&self) -> bool {
        self.is_principal
    }

    pub fn locants(&self) -> &Locants {
        &self.locants
    }

    /// The atom the group is cited at: the carbonyl carbon of an acid, the
    /// oxygen of an alcohol, the nitrogen of an amine.
    pub fn anchor(&self) -> AtomId {
        self.atoms[0]
    }

    pub fn class(&self) -> Option<GroupClass> {
        GroupClass::from_kind(&self.kind)
    }

    pub fn is_kind(&self, class: GroupClass) -> bool {
        self.class() == Some(class)
    }

    pub fn with_principal(&self, is_principal: bool) -> Self {
        Self {
            is_principal,
            ..self.clone()
        }
    }

    pub fn with_locants(&self, locants: Locants) -> Self {
        Self {
            locants,
            ..self.clone()
        }
    }
}
