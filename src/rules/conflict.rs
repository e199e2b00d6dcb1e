use super::Phase;
use crate::AtomId;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A state a rule could not resolve. The pipeline keeps going; the conflict
/// travels with the result so callers can tell a best-effort numbering from
/// an unambiguous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub rule_id: &'static str,
    pub phase: Phase,
    pub description: String,
    /// Atoms involved, if any.
    pub atoms: Vec<AtomId>,
}

impl Conflict {
    pub fn new(rule_id: &'static str, phase: Phase, description: impl Into<String>) -> Self {
        Self {
            rule_id,
            phase,
            description: description.into(),
            atoms: Vec::new(),
        }
    }

    pub fn with_atoms(mut self, atoms: Vec<AtomId>) -> Self {
        self.atoms = atoms;
        self
    }
}

impl Display for Conflict {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "[{}] {}", self.rule_id, self.description)?;
        if !self.atoms.is_empty() {
            write!(f, " (atoms {:?})", self.atoms)?;
        }
        Ok(())
    }
}

/// Conflicts in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictLog(Vec<Conflict>);

impl ConflictLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, conflict: Conflict) -> Self {
        self.0.push(conflict);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conflict> + '_ {
        self.0.iter()
    }

    pub fn from_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Conflict> + 'a {
        self.0.iter().filter(move |c| c.rule_id == rule_id)
    }
}

impl<'a> IntoIterator for &'a ConflictLog {
    type Item = &'a Conflict;
    type IntoIter = std::slice::Iter<'a, Conflict>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Audit entry appended for every rule that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    pub rule_id: &'static str,
    pub description: &'static str,
    pub phase: Phase,
}
