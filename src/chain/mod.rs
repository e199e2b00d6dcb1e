//! Acyclic parent chains: enumeration, seniority, selection and orientation.

mod classify;
mod enumerate;
mod orient;
mod select;

pub use classify::*;
pub use enumerate::*;
pub use orient::*;
pub use select::*;

use crate::{AtomId, Molecule};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// An ordered simple path of atoms. Position `i` in the path is locant
/// `i + 1` once the chain has been oriented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Chain(Vec<AtomId>);

impl Chain {
    /// Build a chain, checking that it is non-empty, that consecutive atoms
    /// are bonded and that no atom repeats.
    pub fn new(molecule: &Molecule, atoms: Vec<AtomId>) -> Option<Self> {
        if atoms.is_empty() || !atoms.iter().all(|id| molecule.contains(*id)) {
            return None;
        }
        let unique: BTreeSet<AtomId> = atoms.iter().copied().collect();
        if unique.len() != atoms.len() {
            return None;
        }
        if !atoms.windows(2).all(|pair| molecule.is_bonded(pair[0], pair[1])) {
            return None;
        }
        Some(Chain(atoms))
    }

    /// Paths produced by the enumerator are valid by construction.
    pub(crate) fn from_path(atoms: Vec<AtomId>) -> Self {
        Chain(atoms)
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> AtomId {
        self.0[0]
    }

    pub fn last(&self) -> AtomId {
        self.0[self.0.len() - 1]
    }

    pub fn contains(&self, id: AtomId) -> bool {
        self.0.contains(&id)
    }

    /// 1-based position of `id` in this orientation.
    pub fn position(&self, id: AtomId) -> Option<u32> {
        self.0.iter().position(|&a| a == id).map(|i| i as u32 + 1)
    }

    pub fn reversed(&self) -> Self {
        let mut atoms = self.0.clone();
        atoms.reverse();
        Chain(atoms)
    }

    /// Identity key used for de-duplication: ids joined by commas.
    pub fn key(&self) -> String {
        self.0
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The string-wise smaller of this chain and its reverse. Only used to
    /// recognise the same path found from either end; which way round the
    /// chain is finally numbered is decided by [`orient`].
    pub fn canonical(&self) -> Self {
        let reversed = self.reversed();
        if reversed.key() < self.key() {
            reversed
        } else {
            self.clone()
        }
    }

    pub fn carbon_count(&self, molecule: &Molecule) -> usize {
        self.0
            .iter()
            .filter(|id| molecule.element(**id).is_some_and(|e| e.is_carbon()))
            .count()
    }

    pub fn is_hydrocarbon(&self, molecule: &Molecule) -> bool {
        self.carbon_count(molecule) == self.len()
    }
}

impl Display for Chain {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "[{}]", self.key())
    }
}

/// Why a chain entered the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOrigin {
    /// A globally longest path.
    Longest,
    /// The longest carbon chain leading away from an amine nitrogen.
    AmineAnchored { nitrogen: AtomId },
    /// The longest carbon chain through the anchor carbon of a group that
    /// must be part of the parent.
    GroupAnchored { atom: AtomId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub chain: Chain,
    pub origin: ChainOrigin,
    /// Seniority rank of the best group on the chain; lower is more senior.
    pub priority: u32,
}
