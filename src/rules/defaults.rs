//! The built-in rule list.
//!
//! | priority | rule                 |
//! |----------|----------------------|
//! | 100      | principal-group      |
//! | 200      | parent-kind          |
//! | 210      | chain-candidates     |
//! | 220      | chain-selection      |
//! | 230      | ring-selection       |
//! | 240      | parent-missing       |
//! | 300      | chain-orientation    |
//! | 310      | ring-numbering       |
//! | 400      | group-locants        |
//! | 900      | numbering-complete   |
//! | 950      | validate             |

use super::{Conflict, NamingContext, ParentKind, ParentStructure, Phase, Rule, RuleEnv};
use crate::{
    orient, select_best, validate_numbering, AtomId, ChainEnumerator, Decision, FunctionalGroup,
    Molecule, RingKind, RingNumberer, RingSystem,
};
use std::collections::BTreeSet;

pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "principal-group",
            description: "mark the most senior suffix-capable groups as principal",
            priority: 100,
            phase: Phase::Seniority,
            condition: needs_principal_group,
            action: choose_principal_group,
        },
        Rule {
            id: "parent-kind",
            description: "decide between a ring and a chain parent",
            priority: 200,
            phase: Phase::ParentSelection,
            condition: |context, _| context.parent_kind().is_none(),
            action: choose_parent_kind,
        },
        Rule {
            id: "chain-candidates",
            description: "enumerate candidate parent chains",
            priority: 210,
            phase: Phase::ParentSelection,
            condition: |context, _| context.parent_kind() == Some(ParentKind::Chain),
            action: enumerate_chains,
        },
        Rule {
            id: "chain-selection",
            description: "select the senior chain",
            priority: 220,
            phase: Phase::ParentSelection,
            condition: |context, _| {
                context.parent().is_none()
                    && context.parent_kind() == Some(ParentKind::Chain)
                    && !context.candidates().is_empty()
            },
            action: select_chain,
        },
        Rule {
            id: "ring-selection",
            description: "select the ring system carrying the principal group",
            priority: 230,
            phase: Phase::ParentSelection,
            condition: |context, _| {
                context.parent().is_none()
                    && context.parent_kind() == Some(ParentKind::Ring)
                    && !context.ring_systems().is_empty()
            },
            action: select_ring,
        },
        Rule {
            id: "parent-missing",
            description: "record that no parent structure could be chosen",
            priority: 240,
            phase: Phase::ParentSelection,
            condition: |context, _| context.parent().is_none(),
            action: |context, _| {
                context.with_conflict(Conflict::new(
                    "parent-missing",
                    Phase::ParentSelection,
                    "no chain or ring parent could be selected",
                ))
            },
        },
        Rule {
            id: "chain-orientation",
            description: "number the chain from the end giving the lowest locants",
            priority: 300,
            phase: Phase::Numbering,
            condition: |context, _| {
                !context.numbering_complete() && context.parent().is_some_and(|p| p.as_chain().is_some())
            },
            action: orient_chain,
        },
        Rule {
            id: "ring-numbering",
            description: "number the ring system",
            priority: 310,
            phase: Phase::Numbering,
            condition: |context, _| {
                context
                    .parent()
                    .and_then(|p| p.as_ring())
                    .is_some_and(|ring| !ring.is_applied())
            },
            action: number_ring,
        },
        Rule {
            id: "group-locants",
            description: "convert group atom references to parent positions",
            priority: 400,
            phase: Phase::Locants,
            condition: |context, _| context.parent().is_some(),
            action: convert_group_locants,
        },
        Rule {
            id: "numbering-complete",
            description: "mark numbering as complete",
            priority: 900,
            phase: Phase::Finalize,
            condition: |context, _| !context.numbering_complete(),
            action: complete_numbering,
        },
        Rule {
            id: "validate",
            description: "check the final numbering",
            priority: 950,
            phase: Phase::Finalize,
            condition: |_, _| true,
            action: |context, _| {
                let report = validate_numbering(&context);
                context.with_report(report)
            },
        },
    ]
}

fn needs_principal_group(context: &NamingContext<'_>, _: &RuleEnv<'_>) -> bool {
    !context.groups().is_empty() && context.principal_groups().next().is_none()
}

fn choose_principal_group<'m>(context: NamingContext<'m>, env: &RuleEnv<'_>) -> NamingContext<'m> {
    let senior = context
        .groups()
        .iter()
        .filter(|g| env.table.is_suffix(g.kind()))
        .map(FunctionalGroup::priority)
        .min();
    let Some(senior) = senior else {
        return context;
    };

    let kinds: BTreeSet<String> = context
        .groups()
        .iter()
        .filter(|g| g.priority() == senior && env.table.is_suffix(g.kind()))
        .map(|g| g.kind().to_string())
        .collect();
    let groups: Vec<FunctionalGroup> = context
        .groups()
        .iter()
        .map(|g| {
            let principal = g.priority() == senior && env.table.is_suffix(g.kind());
            g.with_principal(principal)
        })
        .collect();

    let context = context.with_groups(groups);
    if kinds.len() > 1 {
        let atoms = context
            .principal_groups()
            .map(FunctionalGroup::anchor)
            .collect();
        let names: Vec<String> = kinds.into_iter().collect();
        return context.with_conflict(
            Conflict::new(
                "principal-group",
                Phase::Seniority,
                format!("groups of different kinds share the senior rank: {}", names.join(", ")),
            )
            .with_atoms(atoms),
        );
    }
    context
}

/// Whether `group` is part of, or attached to, `ring`.
fn on_ring(molecule: &Molecule, ring: &RingSystem, group: &FunctionalGroup) -> bool {
    group.atoms().iter().any(|id| ring.contains(*id))
        || molecule
            .neighbors(group.anchor())
            .into_iter()
            .any(|n| ring.contains(n))
}

fn choose_parent_kind<'m>(context: NamingContext<'m>, _: &RuleEnv<'_>) -> NamingContext<'m> {
    let molecule = context.molecule();
    let rings = context.ring_systems();
    let principal: Vec<&FunctionalGroup> = context.principal_groups().collect();
    let kind = if rings.is_empty() {
        ParentKind::Chain
    } else if principal.is_empty() {
        ParentKind::Ring
    } else if principal
        .iter()
        .any(|g| rings.iter().any(|ring| on_ring(molecule, ring, g)))
    {
        ParentKind::Ring
    } else {
        ParentKind::Chain
    };
    context.with_parent_kind(kind)
}

fn ring_atoms(context: &NamingContext<'_>) -> BTreeSet<AtomId> {
    let molecule = context.molecule();
    molecule
        .atom_ids()
        .filter(|id| molecule.is_ring_atom(*id))
        .collect()
}

fn enumerate_chains<'m>(context: NamingContext<'m>, env: &RuleEnv<'_>) -> NamingContext<'m> {
    let enumerator = ChainEnumerator::new(context.molecule(), env.config, env.tracer);
    let candidates = enumerator.candidates(&ring_atoms(&context), context.groups(), env.table);
    if candidates.is_empty() && !context.ring_systems().is_empty() {
        env.tracer.record(Decision::Fallback {
            context: "parent selection",
            detail: "no candidate chain, using a ring parent".to_string(),
        });
        return context
            .with_candidates(candidates)
            .with_parent_kind(ParentKind::Ring);
    }
    context.with_candidates(candidates)
}

fn select_chain<'m>(context: NamingContext<'m>, env: &RuleEnv<'_>) -> NamingContext<'m> {
    let selection = select_best(
        context.candidates(),
        context.molecule(),
        context.groups(),
        env.table,
        env.tracer,
    );
    match selection {
        Some(selection) => {
            let chain = selection.chain.chain.canonical();
            context.with_parent(ParentStructure::chain(chain))
        }
        None => context,
    }
}

fn select_ring<'m>(context: NamingContext<'m>, _: &RuleEnv<'_>) -> NamingContext<'m> {
    let molecule = context.molecule();
    let rings = context.ring_systems();
    let chosen = context
        .principal_groups()
        .find_map(|g| rings.iter().find(|ring| on_ring(molecule, ring, g)))
        .or_else(|| rings.first())
        .cloned();
    match chosen {
        Some(ring) => context.with_parent(ParentStructure::ring(ring)),
        None => context,
    }
}

fn orient_chain<'m>(context: NamingContext<'m>, env: &RuleEnv<'_>) -> NamingContext<'m> {
    let Some(chain) = context.parent().and_then(|p| p.as_chain()).cloned() else {
        return context;
    };
    let oriented = orient(&chain, context.molecule(), context.groups(), env.table, env.tracer);
    context.with_parent(ParentStructure::chain(oriented.chain))
}

fn number_ring<'m>(context: NamingContext<'m>, env: &RuleEnv<'_>) -> NamingContext<'m> {
    let Some(ring) = context.parent().and_then(|p| p.as_ring()).cloned() else {
        return context;
    };
    let spiro = ring.kind() == RingKind::Spiro;
    let atoms = ring.atoms().to_vec();
    let numberer = RingNumberer::new(context.molecule(), context.groups(), env.config, env.tracer);
    let numbered = numberer.apply(ring);
    let context = context.with_parent(ParentStructure::ring(numbered));
    if spiro {
        return context.with_conflict(
            Conflict::new(
                "ring-numbering",
                Phase::Numbering,
                "spiro systems are numbered in perception order",
            )
            .with_atoms(atoms),
        );
    }
    context
}

/// Where a group lands on the parent: its anchor, any of its atoms, or the
/// lowest position its anchor is bonded to.
fn group_position(parent: &ParentStructure, molecule: &Molecule, group: &FunctionalGroup, id: AtomId) -> Option<u32> {
    parent
        .position_of(id)
        .or_else(|| group.atoms().iter().find_map(|a| parent.position_of(*a)))
        .or_else(|| {
            molecule
                .neighbors(id)
                .into_iter()
                .filter_map(|n| parent.position_of(n))
                .min()
        })
}

fn convert_group_locants<'m>(context: NamingContext<'m>, _: &RuleEnv<'_>) -> NamingContext<'m> {
    let Some(parent) = context.parent() else {
        return context;
    };
    let molecule = context.molecule();
    let mut conflicts = Vec::new();
    let groups: Vec<FunctionalGroup> = context
        .groups()
        .iter()
        .map(|group| {
            let (locants, unresolved) = group
                .locants()
                .clone()
                .resolve(|id| group_position(parent, molecule, group, id));
            if !unresolved.is_empty() {
                conflicts.push(
                    Conflict::new(
                        "group-locants",
                        Phase::Locants,
                        format!("{} group is not attached to the parent, placed at 1", group.kind()),
                    )
                    .with_atoms(unresolved),
                );
            }
            group.with_locants(locants)
        })
        .collect();

    conflicts
        .into_iter()
        .fold(context.with_groups(groups), NamingContext::with_conflict)
}

fn complete_numbering<'m>(context: NamingContext<'m>, _: &RuleEnv<'_>) -> NamingContext<'m> {
    if context.parent().is_some() {
        return context.with_numbering_complete(true);
    }
    context.with_conflict(Conflict::new(
        "numbering-complete",
        Phase::Finalize,
        "numbering finished without a parent structure",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::{perceive_ring_systems, Locants, NullTracer, NumberingConfig, PriorityTable, RuleSet};

    fn run<'m>(mol: &'m Molecule, groups: Vec<FunctionalGroup>) -> NamingContext<'m> {
        let config = NumberingConfig::default();
        let env = RuleEnv {
            config: &config,
            table: PriorityTable::builtin(),
            tracer: &NullTracer,
        };
        let context = NamingContext::new(mol, groups, perceive_ring_systems(mol));
        RuleSet::default().run(context, &env)
    }

    #[test]
    fn test_principal_group_chosen_by_rank() {
        let mol = smiles("OCCC(=O)O").unwrap();
        let groups = ingest(
            &mol,
            vec![group("alcohol", &[0]), group("carboxylic acid", &[3, 4, 5])],
        );
        let context = run(&mol, groups);
        let principal: Vec<String> = context.principal_groups().map(|g| g.kind().to_string()).collect();
        assert_eq!(principal, vec!["carboxylic acid"]);
        assert!(context.conflicts().is_empty());
        assert!(context.numbering_complete());
    }

    #[test]
    fn test_tied_kinds_are_a_conflict() {
        let mol = smiles("OCCCC").unwrap();
        let groups = ingest(
            &mol,
            vec![
                group("alcohol", &[0]).with_priority(4),
                group("ester", &[4]).with_priority(4),
            ],
        );
        let context = run(&mol, groups);
        assert_eq!(context.principal_groups().count(), 2);
        assert_eq!(context.conflicts().from_rule("principal-group").count(), 1);
    }

    #[test]
    fn test_ring_parent_when_group_on_ring() {
        let mol = smiles("OC1CCCCC1").unwrap();
        let groups = ingest(&mol, vec![group("alcohol", &[0])]);
        let context = run(&mol, groups);
        assert_eq!(context.parent_kind(), Some(ParentKind::Ring));
        let parent = context.parent().unwrap();
        assert_eq!(parent.position_of(1), Some(1));
        assert_eq!(context.groups()[0].locants(), &Locants::Positions(vec![1]));
    }

    #[test]
    fn test_chain_parent_when_group_off_ring() {
        let mol = smiles("C1CCCCC1CCCO").unwrap();
        let groups = ingest(&mol, vec![group("alcohol", &[9])]);
        let context = run(&mol, groups);
        assert_eq!(context.parent_kind(), Some(ParentKind::Chain));
        let parent = context.parent().unwrap();
        assert_eq!(parent.atoms(), &[8, 7, 6]);
        assert_eq!(context.groups()[0].locants(), &Locants::Positions(vec![1]));
    }

    #[test]
    fn test_detached_group_falls_back_to_one() {
        let mol = smiles("CCCC.O").unwrap();
        let groups = ingest(&mol, vec![group("ether", &[4])]);
        let context = run(&mol, groups);
        assert_eq!(context.groups()[0].locants(), &Locants::Positions(vec![1]));
        let conflict = context.conflicts().from_rule("group-locants").next().unwrap();
        assert_eq!(conflict.atoms, vec![4]);
        assert!(!context.report().unwrap().is_valid);
    }

    #[test]
    fn test_nothing_to_number_is_recorded() {
        let mol = smiles("O").unwrap();
        let context = run(&mol, Vec::new());
        assert!(context.parent().is_none());
        assert!(!context.numbering_complete());
        assert_eq!(context.conflicts().from_rule("parent-missing").count(), 1);
        assert_eq!(context.conflicts().from_rule("numbering-complete").count(), 1);
        assert!(!context.report().unwrap().is_valid);
    }

    #[test]
    fn test_records_follow_fired_rules() {
        let mol = smiles("CCCC").unwrap();
        let context = run(&mol, Vec::new());
        let fired: Vec<&str> = context.records().iter().map(|r| r.rule_id).collect();
        assert_eq!(
            fired,
            vec![
                "parent-kind",
                "chain-candidates",
                "chain-selection",
                "chain-orientation",
                "group-locants",
                "numbering-complete",
                "validate",
            ]
        );
    }
}
