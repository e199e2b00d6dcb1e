use super::Chain;
use crate::{AtomId, BondOrder, Element, GroupClass, Molecule, PriorityTable, NO_PRIORITY};

/// A characteristic group recognised on a chain atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detected {
    pub class: GroupClass,
    /// The chain atom that carries the group.
    pub atom: AtomId,
}

/// Seniority rank of the most senior group found on `chain`.
pub fn classify(chain: &Chain, molecule: &Molecule, table: &PriorityTable) -> u32 {
    detect_groups(chain, molecule, table)
        .iter()
        .map(|found| table.class_rank(found.class))
        .min()
        .unwrap_or(NO_PRIORITY)
}

/// Every group recognised on the chain's carbons.
///
/// Amines are only looked for when nothing at nitrile seniority or better
/// was found, so nitrogen that belongs to a nitrile or nitro group is never
/// mistaken for an amine.
pub fn detect_groups(chain: &Chain, molecule: &Molecule, table: &PriorityTable) -> Vec<Detected> {
    let mut found = Vec::new();
    let mut amines = Vec::new();
    for &atom in chain.atoms() {
        if !molecule.element(atom).is_some_and(|e| e.is_carbon()) {
            continue;
        }
        if let Some(class) = carbonyl_class(molecule, atom) {
            found.push(Detected { class, atom });
        }
        for (other, order) in molecule.bonds_of(atom) {
            if chain.contains(other) {
                continue;
            }
            if let Some(class) = pendant_class(molecule, atom, other, order) {
                found.push(Detected { class, atom });
            } else if order == BondOrder::Single && is_amine_nitrogen(molecule, other) {
                amines.push(Detected {
                    class: GroupClass::Amine,
                    atom,
                });
            }
        }
    }

    let best = found
        .iter()
        .map(|d| table.class_rank(d.class))
        .min()
        .unwrap_or(NO_PRIORITY);
    if best > table.class_rank(GroupClass::Nitrile) {
        found.extend(amines);
    }
    found
}

fn double_bonded_oxygens(molecule: &Molecule, atom: AtomId) -> usize {
    molecule
        .bonds_of(atom)
        .into_iter()
        .filter(|&(other, order)| order == BondOrder::Double && molecule.is_element(other, Element::O))
        .count()
}

fn is_hydroxyl(molecule: &Molecule, oxygen: AtomId) -> bool {
    let Some(atom) = molecule.atom(oxygen) else {
        return false;
    };
    atom.element == Element::O
        && molecule.degree(oxygen) == 1
        && (atom.hydrogens > 0 || atom.charge < 0)
}

/// A carbon with a double bond to oxygen.
pub fn is_carbonyl_carbon(molecule: &Molecule, atom: AtomId) -> bool {
    molecule.is_element(atom, Element::C) && double_bonded_oxygens(molecule, atom) > 0
}

/// Classify a carbonyl carbon by what else it carries.
pub fn carbonyl_class(molecule: &Molecule, carbon: AtomId) -> Option<GroupClass> {
    if !is_carbonyl_carbon(molecule, carbon) {
        return None;
    }
    let mut hydroxyl = false;
    let mut anhydride = false;
    let mut ester = false;
    let mut halide = false;
    let mut amide = false;
    let mut carbons = 0;
    for (other, order) in molecule.bonds_of(carbon) {
        let Some(element) = molecule.element(other) else {
            continue;
        };
        match (element, order) {
            (Element::O, BondOrder::Single) if is_hydroxyl(molecule, other) => hydroxyl = true,
            (Element::O, BondOrder::Single) => {
                let bridged = molecule
                    .neighbors(other)
                    .into_iter()
                    .any(|n| n != carbon && is_carbonyl_carbon(molecule, n));
                if bridged {
                    anhydride = true;
                } else {
                    ester = true;
                }
            }
            (Element::N, BondOrder::Single) => amide = true,
            (e, BondOrder::Single) if e.is_halogen() => halide = true,
            (Element::C, _) => carbons += 1,
            _ => {}
        }
    }

    let class = if hydroxyl {
        GroupClass::CarboxylicAcid
    } else if anhydride {
        GroupClass::Anhydride
    } else if ester {
        GroupClass::Ester
    } else if halide {
        GroupClass::AcylHalide
    } else if amide {
        GroupClass::Amide
    } else if carbons >= 2 {
        GroupClass::Ketone
    } else {
        GroupClass::Aldehyde
    };
    Some(class)
}

/// Classify a group hanging off a chain carbon through `other`.
fn pendant_class(
    molecule: &Molecule,
    carbon: AtomId,
    other: AtomId,
    order: BondOrder,
) -> Option<GroupClass> {
    let element = molecule.element(other)?;
    let onward: Vec<(AtomId, BondOrder)> = molecule
        .bonds_of(other)
        .into_iter()
        .filter(|(n, _)| *n != carbon)
        .collect();
    let hydroxyls = onward
        .iter()
        .filter(|(n, order)| *order == BondOrder::Single && is_hydroxyl(molecule, *n))
        .count();
    let oxo = double_bonded_oxygens(molecule, other);

    match element {
        Element::N if order == BondOrder::Triple => Some(GroupClass::Nitrile),
        Element::N => {
            let oxygens = onward
                .iter()
                .filter(|(n, _)| molecule.is_element(*n, Element::O))
                .count();
            if oxygens >= 2 {
                Some(GroupClass::Nitro)
            } else if onward.iter().any(|(n, o)| {
                *o == BondOrder::Double && molecule.is_element(*n, Element::C) && is_carbonyl_carbon(molecule, *n)
            }) {
                Some(GroupClass::Isocyanate)
            } else if order == BondOrder::Double && oxygens == 0 {
                Some(GroupClass::Imine)
            } else {
                None
            }
        }
        Element::O if order == BondOrder::Single && !is_carbonyl_carbon(molecule, carbon) => {
            if is_hydroxyl(molecule, other) {
                Some(GroupClass::Alcohol)
            } else if onward
                .iter()
                .all(|(n, _)| molecule.is_element(*n, Element::C) && !is_carbonyl_carbon(molecule, *n))
                && !onward.is_empty()
            {
                Some(GroupClass::Ether)
            } else {
                None
            }
        }
        Element::S if order == BondOrder::Single => match oxo {
            0 if onward.is_empty() && molecule.hydrogens(other) > 0 => Some(GroupClass::Thiol),
            0 if !onward.is_empty() => Some(GroupClass::Sulfide),
            1 => Some(GroupClass::Sulfoxide),
            _ if oxo >= 2 => {
                let single: Vec<Element> = onward
                    .iter()
                    .filter(|(_, o)| *o == BondOrder::Single)
                    .filter_map(|(n, _)| molecule.element(*n))
                    .collect();
                if hydroxyls > 0 {
                    Some(GroupClass::SulfonicAcid)
                } else if single.iter().any(|e| e.is_halogen()) {
                    Some(GroupClass::SulfonylHalide)
                } else if single.contains(&Element::N) {
                    Some(GroupClass::Sulfonamide)
                } else {
                    Some(GroupClass::Sulfone)
                }
            }
            _ => None,
        },
        Element::P if order == BondOrder::Single && oxo >= 1 && hydroxyls >= 2 => {
            Some(GroupClass::PhosphonicAcid)
        }
        e if e.is_halogen() && order == BondOrder::Single => Some(GroupClass::Halide),
        _ => None,
    }
}

/// An sp3 nitrogen that can only be cited as an amine: single bonds only,
/// no oxygen, not attached to a carbonyl or sulfonyl centre, not aromatic.
pub fn is_amine_nitrogen(molecule: &Molecule, nitrogen: AtomId) -> bool {
    let Some(atom) = molecule.atom(nitrogen) else {
        return false;
    };
    if atom.element != Element::N || atom.aromatic {
        return false;
    }
    molecule.bonds_of(nitrogen).into_iter().all(|(other, order)| {
        order == BondOrder::Single
            && !molecule.is_element(other, Element::O)
            && double_bonded_oxygens(molecule, other) == 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    fn rank_of(smiles_str: &str, chain: Vec<AtomId>) -> u32 {
        let mol = smiles(smiles_str).unwrap();
        let chain = Chain::new(&mol, chain).unwrap();
        classify(&chain, &mol, PriorityTable::builtin())
    }

    fn class(c: GroupClass) -> u32 {
        PriorityTable::builtin().class_rank(c)
    }

    #[test]
    fn test_carbonyl_family() {
        assert_eq!(rank_of("CCC(=O)O", vec![0, 1, 2]), class(GroupClass::CarboxylicAcid));
        assert_eq!(rank_of("CCC(=O)OC", vec![0, 1, 2]), class(GroupClass::Ester));
        assert_eq!(rank_of("CC(=O)OC(=O)C", vec![0, 1]), class(GroupClass::Anhydride));
        assert_eq!(rank_of("CCC(=O)Cl", vec![0, 1, 2]), class(GroupClass::AcylHalide));
        assert_eq!(rank_of("CCC(=O)N", vec![0, 1, 2]), class(GroupClass::Amide));
        assert_eq!(rank_of("CCC=O", vec![0, 1, 2]), class(GroupClass::Aldehyde));
        assert_eq!(rank_of("CC(=O)C", vec![0, 1, 3]), class(GroupClass::Ketone));
    }

    #[test]
    fn test_pendant_groups() {
        assert_eq!(rank_of("CCO", vec![0, 1]), class(GroupClass::Alcohol));
        assert_eq!(rank_of("CCS", vec![0, 1]), class(GroupClass::Thiol));
        assert_eq!(rank_of("CCC#N", vec![0, 1, 2]), class(GroupClass::Nitrile));
        assert_eq!(rank_of("CCBr", vec![0, 1]), class(GroupClass::Halide));
        assert_eq!(rank_of("CCS(=O)(=O)O", vec![0, 1]), class(GroupClass::SulfonicAcid));
        assert_eq!(rank_of("CCS(=O)(=O)N", vec![0, 1]), class(GroupClass::Sulfonamide));
        assert_eq!(rank_of("CCS(=O)(=O)C", vec![0, 1]), class(GroupClass::Sulfone));
        assert_eq!(rank_of("CCOC", vec![0, 1]), class(GroupClass::Ether));
        assert_eq!(rank_of("CCCC", vec![0, 1, 2, 3]), NO_PRIORITY);
    }

    #[test]
    fn test_amines_only_below_nitrile() {
        assert_eq!(rank_of("NCCC", vec![1, 2, 3]), class(GroupClass::Amine));
        let mol = smiles("NCCC#N").unwrap();
        let chain = Chain::new(&mol, vec![1, 2, 3]).unwrap();
        let found = detect_groups(&chain, &mol, PriorityTable::builtin());
        assert!(found.iter().all(|d| d.class != GroupClass::Amine));
        assert!(found.iter().any(|d| d.class == GroupClass::Nitrile));
    }

    #[test]
    fn test_nitro_is_not_an_amine() {
        let mol = smiles("CC[N+](=O)[O-]").unwrap();
        assert!(!is_amine_nitrogen(&mol, 2));
        let chain = Chain::new(&mol, vec![0, 1]).unwrap();
        assert_eq!(classify(&chain, &mol, PriorityTable::builtin()), class(GroupClass::Nitro));
    }

    #[test]
    fn test_amide_nitrogen_is_not_an_amine() {
        let mol = smiles("CC(=O)NC").unwrap();
        assert!(!is_amine_nitrogen(&mol, 3));
        let mol = smiles("CNC").unwrap();
        assert!(is_amine_nitrogen(&mol, 1));
    }
}
