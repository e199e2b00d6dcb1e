//! Errors raised at the data-ingestion boundary.
//!
//! Once a [`Molecule`](crate::Molecule) has been built the numbering engine
//! never fails: ambiguous or inconsistent states are recorded as
//! [`Conflict`](crate::Conflict)s instead. The variants here only describe
//! input that cannot be represented at all.

use crate::AtomId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NamingError {
    /// Two atoms were supplied with the same id.
    #[error("duplicate atom id {0}")]
    DuplicateAtom(AtomId),

    /// A bond or ring refers to an atom id that is not in the molecule.
    #[error("{context} references unknown atom {id}")]
    UnknownAtom { id: AtomId, context: &'static str },

    /// A bond joins an atom to itself.
    #[error("atom {0} is bonded to itself")]
    SelfBond(AtomId),

    /// An element symbol could not be recognised.
    #[error("unknown element symbol '{0}'")]
    UnknownElement(String),

    /// The priority table could not be read.
    #[error("failed to read priority table: {0}")]
    PriorityTable(#[from] csv::Error),

    /// A priority table row is malformed.
    #[error("priority table row {row}: {detail}")]
    PriorityRow { row: usize, detail: String },

    /// A locant label such as `4a` could not be parsed.
    #[error("invalid locant '{0}'")]
    InvalidLocant(String),
}

impl NamingError {
    pub fn unknown_atom(id: AtomId, context: &'static str) -> Self {
        Self::UnknownAtom { id, context }
    }

    pub fn priority_row(row: usize, detail: impl Into<String>) -> Self {
        Self::PriorityRow {
            row,
            detail: detail.into(),
        }
    }
}
