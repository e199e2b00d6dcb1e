//! Post-pipeline checks on a finished numbering.
//!
//! Validation never changes the chosen structure. It only reports on it.

use crate::{Locant, Name, NamingContext};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("no parent structure was selected")]
    MissingParent,

    #[error("parent has {atoms} atoms but {locants} locants")]
    LengthMismatch { atoms: usize, locants: usize },

    #[error("locant {0} is assigned more than once")]
    DuplicateLocant(Locant),

    #[error("locant {locant} lies outside 1..={len}")]
    OutOfRange { locant: Locant, len: usize },

    #[error("{kind} group placed at {position}, outside 1..={len}")]
    GroupOutOfRange { kind: Name, position: u32, len: usize },

    #[error("{kind} group still references atom ids")]
    Unconverted { kind: Name },

    #[error("[{rule_id}] {description}")]
    Conflict {
        rule_id: &'static str,
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check the parent locants for duplicates and range, that every group has
/// been converted to a position on the parent, and carry over every
/// conflict the pipeline recorded.
pub fn validate_numbering(context: &NamingContext<'_>) -> ValidationReport {
    let mut errors = Vec::new();

    match context.parent() {
        None => errors.push(ValidationIssue::MissingParent),
        Some(parent) => {
            let len = parent.len();
            if parent.locants().len() != len {
                errors.push(ValidationIssue::LengthMismatch {
                    atoms: len,
                    locants: parent.locants().len(),
                });
            }

            let mut seen = BTreeSet::new();
            for locant in parent.locants() {
                if !seen.insert(*locant) {
                    errors.push(ValidationIssue::DuplicateLocant(*locant));
                }
                let position = locant.normalized() as usize;
                if position == 0 || position > len {
                    errors.push(ValidationIssue::OutOfRange { locant: *locant, len });
                }
            }

            for group in context.groups() {
                match group.locants().positions() {
                    None => errors.push(ValidationIssue::Unconverted {
                        kind: group.kind().clone(),
                    }),
                    Some(positions) => {
                        for &position in positions {
                            if position == 0 || position as usize > len {
                                errors.push(ValidationIssue::GroupOutOfRange {
                                    kind: group.kind().clone(),
                                    position,
                                    len,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    errors.extend(context.conflicts().iter().map(|c| ValidationIssue::Conflict {
        rule_id: c.rule_id,
        description: c.description.clone(),
    }));
    ValidationReport::from_issues(errors)
}
