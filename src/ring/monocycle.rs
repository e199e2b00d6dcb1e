use super::{match_pattern, rotation, rotations, sequential, RingLocants, RingNumberer, RingNumberingState, RingSystem};
use crate::{compare_locant_lists, AtomId, Decision};
use std::cmp::Ordering;

type Key = fn(&RingLocants, &RingLocants) -> Ordering;

fn principal(a: &RingLocants, b: &RingLocants) -> Ordering {
    compare_locant_lists(&a.principal, &b.principal)
}

fn substituents(a: &RingLocants, b: &RingLocants) -> Ordering {
    compare_locant_lists(&a.substituents, &b.substituents)
}

fn unsaturation(a: &RingLocants, b: &RingLocants) -> Ordering {
    compare_locant_lists(&a.unsaturation, &b.unsaturation)
}

fn heteroatoms(a: &RingLocants, b: &RingLocants) -> Ordering {
    compare_locant_lists(&a.heteroatoms, &b.heteroatoms)
}

/// Senior heteroatoms take the lower locants when the sets tie.
fn seniority(a: &RingLocants, b: &RingLocants) -> Ordering {
    a.hetero_seniority.cmp(&b.hetero_seniority)
}

pub(super) fn number(ring: RingSystem, numberer: &RingNumberer) -> RingSystem {
    let tracer = numberer.tracer;
    let molecule = numberer.molecule;
    let cycle = ring.atoms().to_vec();
    let labels = sequential(cycle.len());

    if let Some((pattern, placements)) = match_pattern(&cycle, molecule) {
        tracer.record(Decision::PatternPinned {
            pattern: pattern.name,
        });
        let nh_first = |order: &Vec<AtomId>| -> bool {
            pattern.indicated_hydrogen && molecule.hydrogens(order[0]) > 0
        };
        let best = pick(numberer, placements, &labels, &[principal, substituents], |a, b| {
            nh_first(b).cmp(&nh_first(a))
        });
        return ring
            .advance(RingNumberingState::LocantOptimized, tracer)
            .numbered(best, labels)
            .advance(RingNumberingState::Applied, tracer);
    }

    let hetero: Vec<usize> = cycle
        .iter()
        .enumerate()
        .filter(|(_, id)| molecule.element(**id).is_some_and(|e| e.is_heteroatom()))
        .map(|(i, _)| i)
        .collect();

    match hetero.as_slice() {
        [only] => {
            // Heteroatom is position 1; only the direction is open.
            let ring = ring.advance(RingNumberingState::HeteroatomPositioned, tracer);
            let orders = vec![rotation(&cycle, *only, false), rotation(&cycle, *only, true)];
            let best = pick(numberer, orders, &labels, &[principal, substituents, unsaturation], |_, _| {
                Ordering::Equal
            });
            ring.advance(RingNumberingState::LocantOptimized, tracer)
                .numbered(best, labels)
                .advance(RingNumberingState::Applied, tracer)
        }
        [] => {
            let ring = ring.advance(RingNumberingState::DirectionResolved, tracer);
            let best = pick(
                numberer,
                rotations(&cycle),
                &labels,
                &[principal, unsaturation, substituents],
                |_, _| Ordering::Equal,
            );
            ring.advance(RingNumberingState::LocantOptimized, tracer)
                .numbered(best, labels)
                .advance(RingNumberingState::Applied, tracer)
        }
        _ => {
            // Heteroatom placement is final; substituents are not consulted.
            let best = pick(
                numberer,
                rotations(&cycle),
                &labels,
                &[heteroatoms, seniority, principal, unsaturation],
                |_, _| Ordering::Equal,
            );
            ring.advance(RingNumberingState::DirectionResolved, tracer)
                .numbered(best, labels)
                .advance(RingNumberingState::Applied, tracer)
        }
    }
}

/// The ordering that wins under `first`, then `keys` in turn, then lowest
/// atom ids.
fn pick<F>(
    numberer: &RingNumberer,
    orders: Vec<Vec<AtomId>>,
    labels: &[crate::Locant],
    keys: &[Key],
    first: F,
) -> Vec<AtomId>
where
    F: Fn(&Vec<AtomId>, &Vec<AtomId>) -> Ordering,
{
    let scored: Vec<(Vec<AtomId>, RingLocants)> = orders
        .into_iter()
        .map(|order| {
            let locants = numberer.evaluate(&order, labels);
            (order, locants)
        })
        .collect();
    scored
        .into_iter()
        .min_by(|(oa, la), (ob, lb)| {
            keys.iter()
                .fold(first(oa, ob), |acc, key| acc.then_with(|| key(la, lb)))
                .then_with(|| oa.cmp(ob))
        })
        .map(|(order, _)| order)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::{perceive_ring_systems, Element, FunctionalGroup, Locant, Molecule, NullTracer, NumberingConfig};

    fn numbered(mol: &Molecule, groups: &[FunctionalGroup]) -> RingSystem {
        let config = NumberingConfig::default();
        let ring = perceive_ring_systems(mol).remove(0);
        RingNumberer::new(mol, groups, &config, &NullTracer).apply(ring)
    }

    fn locant(ring: &RingSystem, id: AtomId) -> u32 {
        ring.locant_of(id).map(|l| l.number()).unwrap()
    }

    #[test]
    fn test_carbocycle_lowest_substituents() {
        // 1,3-dimethylcyclohexane written the long way round
        let mol = smiles("CC1CCCC(C)C1").unwrap();
        let ring = numbered(&mol, &[]);
        let mut subs = vec![locant(&ring, 1), locant(&ring, 5)];
        subs.sort();
        assert_eq!(subs, vec![1, 3]);
        assert!(ring.is_applied());
    }

    #[test]
    fn test_single_heteroatom_is_one() {
        // 3-methylpyridine
        let mol = smiles("Cc1cccnc1").unwrap();
        let ring = numbered(&mol, &[]);
        assert_eq!(locant(&ring, 5), 1);
        assert_eq!(locant(&ring, 1), 3);
        assert_eq!(ring.locants()[0], Locant::new(1));
    }

    #[test]
    fn test_principal_group_before_substituents() {
        // methyls favour one direction, the hydroxyl the other
        let mol = smiles("Cc1c(C)ccc(O)n1").unwrap();
        let groups = ingest(&mol, vec![group("alcohol", &[7]).principal()]);
        let ring = numbered(&mol, &groups);
        assert_eq!(locant(&ring, 8), 1);
        assert_eq!(locant(&ring, 6), 2);
        assert_eq!(locant(&ring, 1), 6);

        let plain = numbered(&mol, &[]);
        assert_eq!(locant(&plain, 1), 2);
    }

    #[test]
    fn test_multiple_heteroatoms_ignore_substituents() {
        // 1,4-oxathiane: O is senior and takes 1
        let mol = smiles("CC1CSCCO1").unwrap();
        let ring = numbered(&mol, &[]);
        assert_eq!(locant(&ring, 6), 1);
        assert_eq!(locant(&ring, 3), 4);
        assert!(mol.is_element(ring.atoms()[0], Element::O));
    }

    #[test]
    fn test_principal_group_breaks_heteroatom_tie() {
        // 1,3-dioxan-4-ol: both O1 choices give {1,3}, the hydroxyl picks
        let mol = smiles("OC1OCOCC1").unwrap();
        let groups = ingest(&mol, vec![group("alcohol", &[0]).principal()]);
        let ring = numbered(&mol, &groups);
        assert_eq!(locant(&ring, 4), 1);
        assert_eq!(locant(&ring, 2), 3);
        assert_eq!(locant(&ring, 1), 4);

        let plain = numbered(&mol, &[]);
        assert_eq!(locant(&plain, 1), 6);
    }

    #[test]
    fn test_thiazine_pinned_regardless_of_substituents() {
        // N, C, S consecutive in a six-membered ring; the methyl would prefer S=1
        let mol = smiles("CC1SCNCC1").unwrap();
        let ring = numbered(&mol, &[]);
        assert_eq!(locant(&ring, 4), 1);
        assert_eq!(locant(&ring, 3), 2);
        assert_eq!(locant(&ring, 2), 3);
    }

    #[test]
    fn test_imidazole_nh_is_one() {
        let mol = smiles("c1cnc[nH]1").unwrap();
        let ring = numbered(&mol, &[]);
        assert_eq!(locant(&ring, 4), 1);
        assert_eq!(locant(&ring, 2), 3);
    }

    #[test]
    fn test_lactam_carbonyl_is_two() {
        let mol = smiles("CC1CCC(=O)N1").unwrap();
        let ring = numbered(&mol, &[]);
        assert_eq!(locant(&ring, 6), 1);
        assert_eq!(locant(&ring, 4), 2);
        assert_eq!(locant(&ring, 1), 5);
    }
}
