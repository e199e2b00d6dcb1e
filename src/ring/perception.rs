use super::{bonds_within, RingKind, RingSystem};
use crate::{AtomId, Molecule};
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeMap, BTreeSet};

/// Group the molecule's rings into ring systems: rings that share at least
/// one atom belong to the same system.
///
/// Systems are returned largest first, ties broken by lowest atom id.
pub fn perceive_ring_systems(molecule: &Molecule) -> Vec<RingSystem> {
    let rings = molecule.rings();
    let mut union = UnionFind::<usize>::new(rings.len());
    for i in 0..rings.len() {
        for j in i + 1..rings.len() {
            if shared(&rings[i], &rings[j]) > 0 {
                union.union(i, j);
            }
        }
    }

    let mut systems: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..rings.len() {
        systems.entry(union.find(i)).or_default().push(i);
    }

    let mut result: Vec<RingSystem> = systems
        .into_values()
        .map(|members| {
            let member_rings: Vec<Vec<AtomId>> = members.iter().map(|&i| rings[i].clone()).collect();
            if member_rings.len() == 1 {
                return RingSystem::monocycle(molecule, member_rings[0].clone());
            }
            let atoms: BTreeSet<AtomId> = member_rings.iter().flatten().copied().collect();
            let kind = classify_system(molecule, &member_rings);
            let bonds = bonds_within(molecule, &atoms);
            RingSystem::new(atoms.into_iter().collect(), member_rings, bonds, kind)
        })
        .collect();

    result.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then_with(|| a.atoms().iter().min().cmp(&b.atoms().iter().min()))
    });
    result
}

fn shared(a: &[AtomId], b: &[AtomId]) -> usize {
    a.iter().filter(|id| b.contains(id)).count()
}

fn classify_system(molecule: &Molecule, rings: &[Vec<AtomId>]) -> RingKind {
    let mut spiro = false;
    let mut bridged = false;
    for i in 0..rings.len() {
        for j in i + 1..rings.len() {
            match shared(&rings[i], &rings[j]) {
                0 => {}
                1 => spiro = true,
                2 => {}
                _ => bridged = true,
            }
        }
    }
    if bridged {
        return RingKind::Bridged;
    }
    if spiro {
        return RingKind::Spiro;
    }
    let aromatic = rings
        .iter()
        .flatten()
        .all(|id| molecule.atom(*id).is_some_and(|atom| atom.aromatic));
    if aromatic {
        RingKind::Fused
    } else {
        RingKind::Bridged
    }
}
