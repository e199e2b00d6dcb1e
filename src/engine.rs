//! The numbering engine: ingestion, the rule pipeline and its outcome.

use crate::{
    perceive_ring_systems, validate_numbering, Conflict, ConflictLog, Decision, FunctionalGroup, LogTracer, Molecule,
    NamingContext, NumberingConfig, ParentStructure, Phase, PriorityTable, RawFunctionalGroup, RingSystem,
    RuleEnv, RuleRecord, RuleSet, Tracer, ValidationReport,
};
use std::sync::Arc;
use tracing::*;

/// A parent structure with the groups numbered against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedParent {
    pub parent: ParentStructure,
    pub groups: Vec<FunctionalGroup>,
    pub records: Vec<RuleRecord>,
}

/// The result of numbering one molecule.
///
/// `Unambiguous` means the pipeline recorded no conflicts and the numbering
/// validated cleanly. Anything else is `BestEffort`, which still carries
/// whatever parent the pipeline managed to choose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Numbering {
    Unambiguous(NumberedParent),
    BestEffort {
        parent: Option<NumberedParent>,
        conflicts: ConflictLog,
        report: ValidationReport,
    },
}

impl Numbering {
    pub fn from_context(context: NamingContext<'_>) -> Self {
        let report = context
            .report()
            .cloned()
            .unwrap_or_else(|| validate_numbering(&context));
        let parent = context.parent().cloned().map(|parent| NumberedParent {
            parent,
            groups: context.groups().to_vec(),
            records: context.records().to_vec(),
        });
        match parent {
            Some(parent) if report.is_valid && context.conflicts().is_empty() => Numbering::Unambiguous(parent),
            parent => Numbering::BestEffort {
                parent,
                conflicts: context.conflicts().clone(),
                report,
            },
        }
    }

    pub fn is_unambiguous(&self) -> bool {
        matches!(self, Numbering::Unambiguous(_))
    }

    pub fn parent(&self) -> Option<&NumberedParent> {
        match self {
            Numbering::Unambiguous(parent) => Some(parent),
            Numbering::BestEffort { parent, .. } => parent.as_ref(),
        }
    }

    /// Conflicts recorded along the way; always empty for an unambiguous
    /// numbering.
    pub fn conflicts(&self) -> Option<&ConflictLog> {
        match self {
            Numbering::Unambiguous(_) => None,
            Numbering::BestEffort { conflicts, .. } => Some(conflicts),
        }
    }
}

#[derive(Clone)]
pub struct NumberingEngine {
    config: NumberingConfig,
    table: PriorityTable,
    tracer: Arc<dyn Tracer>,
    rules: RuleSet,
}

impl Default for NumberingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberingEngine {
    pub fn new() -> Self {
        Self {
            config: NumberingConfig::default(),
            table: PriorityTable::builtin().clone(),
            tracer: Arc::new(LogTracer),
            rules: RuleSet::default(),
        }
    }

    pub fn with_config(self, config: NumberingConfig) -> Self {
        Self { config, ..self }
    }

    pub fn with_table(self, table: PriorityTable) -> Self {
        Self { table, ..self }
    }

    pub fn with_tracer(self, tracer: Arc<dyn Tracer>) -> Self {
        Self { tracer, ..self }
    }

    pub fn with_rules(self, rules: RuleSet) -> Self {
        Self { rules, ..self }
    }

    pub fn config(&self) -> &NumberingConfig {
        &self.config
    }

    pub fn table(&self) -> &PriorityTable {
        &self.table
    }

    /// Run the pipeline with ring systems perceived from the molecule's
    /// rings, returning the final context.
    pub fn run<'m>(&self, molecule: &'m Molecule, groups: Vec<RawFunctionalGroup>) -> NamingContext<'m> {
        self.run_with_systems(molecule, groups, perceive_ring_systems(molecule))
    }

    /// Run the pipeline over ring systems supplied by the caller, for
    /// example with a von Baeyer numbering already attached.
    pub fn run_with_systems<'m>(
        &self,
        molecule: &'m Molecule,
        groups: Vec<RawFunctionalGroup>,
        ring_systems: Vec<RingSystem>,
    ) -> NamingContext<'m> {
        debug!(
            atoms = molecule.len(),
            groups = groups.len(),
            ring_systems = ring_systems.len(),
            "numbering molecule"
        );
        let mut ingested = Vec::with_capacity(groups.len());
        let mut conflicts = Vec::new();
        for raw in groups {
            let kind = raw.kind.clone();
            let result = FunctionalGroup::ingest(raw, molecule, &self.table);
            if !result.missing.is_empty() {
                let description = match result.group {
                    Some(_) => format!("{kind} group references atoms outside the molecule"),
                    None => format!("{kind} group dropped, none of its atoms exist"),
                };
                conflicts.push(Conflict::new("ingest", Phase::Ingestion, description).with_atoms(result.missing));
            }
            ingested.extend(result.group);
        }

        let context = conflicts.into_iter().fold(
            NamingContext::new(molecule, ingested, ring_systems),
            NamingContext::with_conflict,
        );
        for conflict in context.conflicts() {
            self.tracer.record(Decision::ConflictRecorded {
                rule: conflict.rule_id,
                description: conflict.description.clone(),
            });
        }

        let env = RuleEnv {
            config: &self.config,
            table: &self.table,
            tracer: self.tracer.as_ref(),
        };
        let context = self.rules.run(context, &env);
        debug!(
            conflicts = context.conflicts().len(),
            complete = context.numbering_complete(),
            "numbering finished"
        );
        context
    }

    pub fn number(&self, molecule: &Molecule, groups: Vec<RawFunctionalGroup>) -> Numbering {
        Numbering::from_context(self.run(molecule, groups))
    }

    pub fn number_with_systems(
        &self,
        molecule: &Molecule,
        groups: Vec<RawFunctionalGroup>,
        ring_systems: Vec<RingSystem>,
    ) -> Numbering {
        Numbering::from_context(self.run_with_systems(molecule, groups, ring_systems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::{
        init_logging, Atom, Bond, BondOrder, Bridge, Element, Locants, NullTracer, RecordingTracer,
        RingKind, VonBaeyerNumbering,
    };

    fn engine() -> NumberingEngine {
        init_logging("trace");
        NumberingEngine::new()
    }

    fn positions(parent: &NumberedParent, kind: &str) -> Vec<u32> {
        let mut all: Vec<u32> = parent
            .groups
            .iter()
            .filter(|g| g.kind().name() == kind)
            .flat_map(|g| g.locants().positions().unwrap_or_default().to_vec())
            .collect();
        all.sort_unstable();
        all
    }

    #[test]
    fn test_methylpentanoic_acid() {
        let mol = smiles("CCCC(C)C(=O)O").unwrap();
        let numbering = engine().number(&mol, vec![group("carboxylic acid", &[5, 6, 7])]);
        assert!(numbering.is_unambiguous(), "{:?}", numbering);
        let parent = numbering.parent().unwrap();
        assert_eq!(parent.parent.len(), 5);
        assert_eq!(positions(parent, "carboxylic acid"), vec![1]);
        assert_eq!(parent.parent.position_of(5), Some(1));
        // the methyl hangs off atom 3
        assert_eq!(parent.parent.position_of(3), Some(2));
    }

    #[test]
    fn test_pentane_diamine() {
        let mol = smiles("NCCCCCN").unwrap();
        let tracer = Arc::new(RecordingTracer::new());
        let numbering = engine()
            .with_tracer(tracer.clone())
            .number(&mol, vec![group("amine", &[0]), group("amine", &[6])]);
        assert!(numbering.is_unambiguous(), "{:?}", numbering);
        let parent = numbering.parent().unwrap();
        assert_eq!(parent.parent.len(), 5);
        assert!(!parent.parent.contains(0) && !parent.parent.contains(6));
        assert_eq!(positions(parent, "amine"), vec![1, 5]);
        assert!(tracer
            .decisions()
            .iter()
            .any(|d| matches!(d, Decision::PriorityOverride { reason: "diamine backbone", .. })));
    }

    #[test]
    fn test_thiazine_pattern_pinned() {
        let mol = smiles("CC1SCNCC1").unwrap();
        let numbering = engine().number(&mol, Vec::new());
        let parent = numbering.parent().unwrap();
        assert_eq!(parent.parent.position_of(4), Some(1));
        assert_eq!(parent.parent.position_of(3), Some(2));
        assert_eq!(parent.parent.position_of(2), Some(3));
    }

    fn tricyclic() -> (Molecule, RingSystem) {
        let atoms = (0..9)
            .map(|id| Atom::new(id, if id == 3 { Element::O } else { Element::C }))
            .collect();
        let mut bonds: Vec<Bond> = (0..8).map(|i| Bond::new(i, (i + 1) % 8, BondOrder::Single)).collect();
        bonds.push(Bond::new(0, 8, BondOrder::Single));
        bonds.push(Bond::new(8, 4, BondOrder::Single));
        bonds.push(Bond::new(1, 6, BondOrder::Single));
        let rings = vec![vec![0, 1, 6, 7], vec![1, 2, 3, 4, 5, 6], vec![0, 8, 4, 5, 6, 7]];
        let mol = Molecule::new(atoms, bonds)
            .unwrap()
            .with_rings(rings.clone())
            .unwrap();
        let numbering = VonBaeyerNumbering::new(
            (0..8).collect(),
            Bridge::new((0, 4), vec![8]),
            vec![Bridge::new((1, 6), Vec::new())],
        );
        let system = RingSystem::new((0..9).collect(), rings, mol.bonds(), RingKind::Bridged).with_von_baeyer(numbering);
        (mol, system)
    }

    #[test]
    fn test_supplied_bridge_survives_the_pipeline() {
        let (mol, system) = tricyclic();
        let tracer = Arc::new(RecordingTracer::new());
        let numbering = engine()
            .with_tracer(tracer.clone())
            .number_with_systems(&mol, Vec::new(), vec![system]);
        assert!(numbering.is_unambiguous(), "{:?}", numbering);
        let parent = numbering.parent().unwrap();
        assert_eq!(parent.parent.position_of(3), Some(4));
        let ring = parent.parent.as_ring().unwrap();
        assert_eq!(ring.von_baeyer().unwrap().bridge_locants(), vec![(2, 7)]);
        assert!(tracer.decisions().contains(&Decision::ShiftConsidered {
            shift: 4,
            reversed: true,
            accepted: false,
        }));
    }

    #[test]
    fn test_missing_atoms_make_best_effort() {
        let mol = smiles("CCCO").unwrap();
        let numbering = engine()
            .with_tracer(Arc::new(NullTracer))
            .number(&mol, vec![group("alcohol", &[3, 42]), group("ketone", &[77])]);
        let Numbering::BestEffort {
            parent,
            conflicts,
            report,
        } = &numbering
        else {
            panic!("expected a best-effort numbering");
        };
        assert_eq!(conflicts.from_rule("ingest").count(), 2);
        assert!(!report.is_valid);
        let parent = parent.as_ref().unwrap();
        assert_eq!(parent.groups.len(), 1);
        assert_eq!(parent.groups[0].locants(), &Locants::Positions(vec![1]));
    }

    #[test]
    fn test_ring_numbering_is_idempotent_through_the_engine() {
        let mol = smiles("Cc1ccc2ccccc2c1").unwrap();
        let engine = engine().with_tracer(Arc::new(NullTracer));
        let first = engine.run(&mol, Vec::new());
        let ring = first.parent().and_then(|p| p.as_ring()).cloned().unwrap();
        assert!(ring.is_applied());
        let again = engine.run_with_systems(&mol, Vec::new(), vec![ring.clone()]);
        assert_eq!(again.parent().and_then(|p| p.as_ring()), Some(&ring));
        assert!(again.records().iter().all(|r| r.rule_id != "ring-numbering"));
    }

    #[test]
    fn test_custom_rules_and_table() {
        let mol = smiles("CCCO").unwrap();
        let table = PriorityTable::from_csv("kind,rank,suffix,aliases\nalcohol,1,true,hydroxy\n").unwrap();
        let engine = engine()
            .with_table(table)
            .with_rules(RuleSet::default().without("validate"));
        let context = engine.run(&mol, vec![group("hydroxy", &[3])]);
        assert!(context.report().is_none());
        assert_eq!(context.groups()[0].priority(), 1);
        assert!(context.groups()[0].is_principal());
        assert!(Numbering::from_context(context).is_unambiguous());
    }
}
