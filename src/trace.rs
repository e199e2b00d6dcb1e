//! Decision tracing.
//!
//! Every decision point in the engine reports a [`Decision`] to an injected
//! [`Tracer`]. The engine calls the tracer unconditionally and never reads
//! anything back, so whether tracing is enabled cannot change the result.

use crate::{Phase, RingNumberingState};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    RuleApplied {
        rule: &'static str,
        phase: Phase,
    },
    RuleSkipped {
        rule: &'static str,
    },
    CandidatesFound {
        search: &'static str,
        count: usize,
        length: usize,
    },
    PriorityOverride {
        reason: &'static str,
        rank: u32,
    },
    SelectionStage {
        stage: &'static str,
        before: usize,
        after: usize,
    },
    StageSkipped {
        stage: &'static str,
    },
    OrientationChosen {
        reversed: bool,
        reason: &'static str,
    },
    RingTransition {
        from: RingNumberingState,
        to: RingNumberingState,
    },
    PatternPinned {
        pattern: &'static str,
    },
    ShiftConsidered {
        shift: usize,
        reversed: bool,
        accepted: bool,
    },
    Fallback {
        context: &'static str,
        detail: String,
    },
    BudgetExhausted {
        search: &'static str,
        steps: usize,
    },
    ConflictRecorded {
        rule: &'static str,
        description: String,
    },
}

pub trait Tracer: Send + Sync {
    fn record(&self, decision: Decision);
}

/// Forwards decisions to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn record(&self, decision: Decision) {
        match decision {
            Decision::RuleApplied { rule, phase } => debug!(rule, ?phase, "rule applied"),
            Decision::RuleSkipped { rule } => trace!(rule, "rule condition not met"),
            Decision::CandidatesFound {
                search,
                count,
                length,
            } => debug!(search, count, length, "candidate chains found"),
            Decision::PriorityOverride { reason, rank } => {
                debug!(reason, rank, "minimum priority overridden")
            }
            Decision::SelectionStage {
                stage,
                before,
                after,
            } => trace!(stage, before, after, "selection stage filtered candidates"),
            Decision::StageSkipped { stage } => {
                trace!(stage, "selection stage skipped, it would empty the candidate set")
            }
            Decision::OrientationChosen { reversed, reason } => {
                trace!(reversed, reason, "chain orientation chosen")
            }
            Decision::RingTransition { from, to } => trace!(?from, ?to, "ring numbering state"),
            Decision::PatternPinned { pattern } => debug!(pattern, "ring pinned to named pattern"),
            Decision::ShiftConsidered {
                shift,
                reversed,
                accepted,
            } => trace!(shift, reversed, accepted, "von Baeyer shift considered"),
            Decision::Fallback { context, detail } => warn!(context, %detail, "falling back"),
            Decision::BudgetExhausted { search, steps } => {
                warn!(search, steps, "search budget exhausted, using best result so far")
            }
            Decision::ConflictRecorded { rule, description } => {
                warn!(rule, %description, "numbering conflict recorded")
            }
        }
    }
}

/// Discards every decision.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTracer;

impl Tracer for NullTracer {
    fn record(&self, _decision: Decision) {}
}

/// Keeps every decision in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    decisions: Mutex<Vec<Decision>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decisions(&self) -> Vec<Decision> {
        self.decisions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Tracer for RecordingTracer {
    fn record(&self, decision: Decision) {
        self.decisions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(decision);
    }
}

/// Install a formatting subscriber at the given level (`"trace"`,
/// `"debug"`, ...). Unknown levels fall back to `info`. Calling this more
/// than once is harmless.
pub fn init_logging(level: &str) {
    let level = Level::from_str(level).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_test_writer()
        .try_init();
}
