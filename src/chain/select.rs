use super::{group_position, orient, Candidate, Chain, ChainOrigin, OrientedChain};
use crate::{AtomId, Decision, Element, FunctionalGroup, GroupClass, Molecule, PriorityTable, Tracer};
use std::cmp::Ordering;

/// The winning chain, already oriented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub chain: OrientedChain,
    pub origin: ChainOrigin,
    /// Rank the chain competed with, after any diamine override.
    pub priority: u32,
}

struct Scored<'c> {
    candidate: &'c Candidate,
    oriented: OrientedChain,
    priority: u32,
}

/// A chain whose two ends are each bonded to a different nitrogen outside
/// the chain.
pub fn is_diamine_backbone(chain: &Chain, molecule: &Molecule) -> bool {
    let nitrogens = |atom: AtomId| -> Vec<AtomId> {
        molecule
            .neighbors(atom)
            .into_iter()
            .filter(|n| !chain.contains(*n) && molecule.is_element(*n, Element::N))
            .collect()
    };
    let head = nitrogens(chain.first());
    let tail = nitrogens(chain.last());
    head.iter().any(|a| tail.iter().any(|b| a != b))
}

/// Pick the parent chain among `candidates`.
///
/// Candidates are filtered to the most senior rank (a diamine backbone
/// competes at amine rank whatever hangs off its nitrogens), then to the
/// most carbons, then through a cascade of tie-breaks. A tie-break that
/// would discard every remaining candidate is skipped.
pub fn select_best(
    candidates: &[Candidate],
    molecule: &Molecule,
    groups: &[FunctionalGroup],
    table: &PriorityTable,
    tracer: &dyn Tracer,
) -> Option<Selection> {
    if candidates.is_empty() {
        return None;
    }

    let amine_rank = table.class_rank(GroupClass::Amine);
    let mut diamine = false;
    let pool: Vec<Scored> = candidates
        .iter()
        .map(|candidate| {
            let priority = if is_diamine_backbone(&candidate.chain, molecule) {
                diamine = true;
                amine_rank
            } else {
                candidate.priority
            };
            Scored {
                candidate,
                oriented: orient(&candidate.chain, molecule, groups, table, tracer),
                priority,
            }
        })
        .collect();

    let minimum = if diamine {
        tracer.record(Decision::PriorityOverride {
            reason: "diamine backbone",
            rank: amine_rank,
        });
        amine_rank
    } else {
        pool.iter().map(|s| s.priority).min().unwrap_or(amine_rank)
    };

    let pool = filter(pool, "seniority", tracer, |s| s.priority == minimum);

    let most_carbons = pool
        .iter()
        .map(|s| s.oriented.chain.carbon_count(molecule))
        .max()
        .unwrap_or(0);
    let pool = filter(pool, "carbon count", tracer, |s| {
        s.oriented.chain.carbon_count(molecule) == most_carbons
    });

    let principal: Vec<&FunctionalGroup> = groups.iter().filter(|g| g.is_principal()).collect();
    let pool = filter(pool, "principal group", tracer, |s| {
        principal
            .iter()
            .any(|group| group_position(&s.oriented.chain, molecule, group).is_some())
    });

    let pool = filter(pool, "hydrocarbon", tracer, |s| {
        s.oriented.chain.is_hydrocarbon(molecule)
    });

    let attached = |s: &Scored| {
        groups
            .iter()
            .filter(|group| group_position(&s.oriented.chain, molecule, group).is_some())
            .count()
    };
    let most_attached = pool.iter().map(attached).max().unwrap_or(0);
    let pool = filter(pool, "group attachments", tracer, |s| attached(s) == most_attached);

    let best = pool
        .iter()
        .map(|s| &s.oriented)
        .min_by(|a, b| a.compare_locants(b).0)
        .cloned();
    let pool = match best {
        Some(best) => filter(pool, "locants", tracer, |s| {
            s.oriented.compare_locants(&best).0 == Ordering::Equal
        }),
        None => pool,
    };

    pool.into_iter()
        .min_by(|a, b| a.oriented.compare(&b.oriented).0)
        .map(|s| Selection {
            chain: s.oriented,
            origin: s.candidate.origin,
            priority: s.priority,
        })
}

fn filter<'c, F>(pool: Vec<Scored<'c>>, stage: &'static str, tracer: &dyn Tracer, keep: F) -> Vec<Scored<'c>>
where
    F: Fn(&Scored<'c>) -> bool,
{
    let before = pool.len();
    if !pool.iter().any(&keep) {
        tracer.record(Decision::StageSkipped { stage });
        return pool;
    }
    let kept: Vec<Scored> = pool.into_iter().filter(|s| keep(s)).collect();
    tracer.record(Decision::SelectionStage {
        stage,
        before,
        after: kept.len(),
    });
    kept
}
