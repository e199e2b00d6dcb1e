//! Peripheral numbering of ortho-fused systems.
//!
//! Non-fusion atoms are numbered consecutively around the periphery; a
//! fusion atom takes the number of the atom before it plus a letter
//! (`4a`, `8a`). Interior atoms follow the periphery with further letters.

use super::{sequential, RingLocants, RingNumberer, RingNumberingState, RingSystem};
use crate::{compare_locant_lists, AtomId, Decision, Locant};
use std::collections::{BTreeMap, BTreeSet};

pub(super) fn number(ring: RingSystem, numberer: &RingNumberer) -> RingSystem {
    let tracer = numberer.tracer;
    let Some(periphery) = periphery(&ring) else {
        tracer.record(Decision::Fallback {
            context: "fused numbering",
            detail: "periphery is not a single cycle".to_string(),
        });
        let labels = sequential(ring.len());
        let order = ring.atoms().to_vec();
        return ring
            .numbered(order, labels)
            .advance(RingNumberingState::Applied, tracer);
    };

    let fusion: BTreeSet<AtomId> = ring
        .atoms()
        .iter()
        .copied()
        .filter(|id| ring.rings().iter().filter(|r| r.contains(id)).count() >= 2)
        .collect();
    let interior: Vec<AtomId> = ring
        .atoms()
        .iter()
        .copied()
        .filter(|id| !periphery.contains(id))
        .collect();

    let n = periphery.len();
    let mut candidates: Vec<(Vec<AtomId>, Vec<Locant>, RingLocants)> = Vec::new();
    for start in 0..n {
        for reverse in [false, true] {
            let walk = super::rotation(&periphery, start, reverse);
            let before = if reverse {
                periphery[(start + 1) % n]
            } else {
                periphery[(start + n - 1) % n]
            };
            if fusion.contains(&walk[0]) || !fusion.contains(&before) {
                continue;
            }
            let mut order = walk;
            order.extend(interior.iter().copied());
            let labels = label(&order, &fusion);
            let locants = numberer.evaluate(&order, &labels);
            candidates.push((order, labels, locants));
        }
    }
    let ring = ring.advance(RingNumberingState::HeteroatomPositioned, tracer);

    let best = candidates.into_iter().min_by(|(oa, _, a), (ob, _, b)| {
        compare_locant_lists(&a.heteroatoms, &b.heteroatoms)
            .then_with(|| a.hetero_seniority.cmp(&b.hetero_seniority))
            .then_with(|| compare_locant_lists(&a.fusion, &b.fusion))
            .then_with(|| compare_locant_lists(&a.principal, &b.principal))
            .then_with(|| compare_locant_lists(&a.indicated_hydrogen, &b.indicated_hydrogen))
            .then_with(|| compare_locant_lists(&a.substituents, &b.substituents))
            .then_with(|| oa.cmp(ob))
    });

    match best {
        Some((order, labels, _)) => ring
            .advance(RingNumberingState::LocantOptimized, tracer)
            .numbered(order, labels)
            .advance(RingNumberingState::Applied, tracer),
        None => {
            tracer.record(Decision::Fallback {
                context: "fused numbering",
                detail: "no non-fusion atom follows a fusion atom".to_string(),
            });
            let labels = sequential(ring.len());
            let order = ring.atoms().to_vec();
            ring.numbered(order, labels)
                .advance(RingNumberingState::Applied, tracer)
        }
    }
}

/// The outer cycle: bonds that belong to exactly one ring.
fn periphery(ring: &RingSystem) -> Option<Vec<AtomId>> {
    let mut counts: BTreeMap<(AtomId, AtomId), usize> = BTreeMap::new();
    for cycle in ring.rings() {
        for i in 0..cycle.len() {
            let (a, b) = (cycle[i], cycle[(i + 1) % cycle.len()]);
            *counts.entry((a.min(b), a.max(b))).or_default() += 1;
        }
    }
    let mut adjacency: BTreeMap<AtomId, Vec<AtomId>> = BTreeMap::new();
    for (&(a, b), &count) in &counts {
        if count == 1 {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
    }
    if adjacency.is_empty() || adjacency.values().any(|next| next.len() != 2) {
        return None;
    }

    let (&start, _) = adjacency.iter().next()?;
    let mut walk = vec![start];
    let mut previous = start;
    let mut current = adjacency[&start][0];
    while current != start {
        walk.push(current);
        let next = adjacency[&current]
            .iter()
            .copied()
            .find(|&n| n != previous)?;
        previous = current;
        current = next;
        if walk.len() > adjacency.len() {
            return None;
        }
    }
    (walk.len() == adjacency.len()).then_some(walk)
}

fn label(order: &[AtomId], fusion: &BTreeSet<AtomId>) -> Vec<Locant> {
    let mut number = 0;
    let mut letter = b'a';
    let mut labels = Vec::with_capacity(order.len());
    for id in order {
        if fusion.contains(id) && number > 0 {
            labels.push(Locant::fusion(number, letter as char));
            letter += 1;
        } else {
            number += 1;
            letter = b'a';
            labels.push(Locant::new(number));
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::{perceive_ring_systems, Molecule, NullTracer, NumberingConfig};

    fn numbered(mol: &Molecule) -> RingSystem {
        let config = NumberingConfig::default();
        let ring = perceive_ring_systems(mol).remove(0);
        RingNumberer::new(mol, &[], &config, &NullTracer).apply(ring)
    }

    fn labels(ring: &RingSystem) -> Vec<String> {
        ring.locants().iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_naphthalene_labels() {
        let mol = smiles("c1ccc2ccccc2c1").unwrap();
        let ring = numbered(&mol);
        assert_eq!(
            labels(&ring),
            vec!["1", "2", "3", "4", "4a", "5", "6", "7", "8", "8a"]
        );
        for id in [3, 8] {
            assert!(ring.locant_of(id).unwrap().is_fusion());
        }
    }

    #[test]
    fn test_substituent_takes_lowest_locant() {
        // 2-methylnaphthalene
        let mol = smiles("Cc1ccc2ccccc2c1").unwrap();
        let ring = numbered(&mol);
        assert_eq!(ring.locant_of(1), Some(Locant::new(2)));
    }

    #[test]
    fn test_heteroatom_first() {
        // quinoline: N is 1, the fusion atom next to it is 8a
        let mol = smiles("c1ccc2ncccc2c1").unwrap();
        let ring = numbered(&mol);
        assert_eq!(ring.locant_of(4), Some(Locant::new(1)));
        assert_eq!(ring.locant_of(3), Some(Locant::fusion(8, 'a')));
        assert_eq!(ring.locant_of(8), Some(Locant::fusion(4, 'a')));
    }

    #[test]
    fn test_label_sequence() {
        let fusion = BTreeSet::from([4, 9]);
        let labels: Vec<String> = label(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], &fusion)
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(labels, vec!["1", "2", "3", "4", "4a", "5", "6", "7", "8", "8a"]);
    }
}
