use crate::NamingError;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Stable atom identifier supplied by the graph builder.
///
/// Every derived structure (chains, rings, locant maps) refers to atoms by
/// this id and never by graph or array position.
pub type AtomId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    Si,
    P,
    S,
    Cl,
    Ge,
    As,
    Se,
    Br,
    Sn,
    Sb,
    Te,
    I,
    Hg,
    Pb,
    Bi,
    /// Any other element, by atomic number.
    Other(u8),
}

impl Element {
    pub fn from_symbol(symbol: &str) -> Result<Self, NamingError> {
        Ok(match symbol {
            "H" => Element::H,
            "B" | "b" => Element::B,
            "C" | "c" => Element::C,
            "N" | "n" => Element::N,
            "O" | "o" => Element::O,
            "F" => Element::F,
            "Si" => Element::Si,
            "P" | "p" => Element::P,
            "S" | "s" => Element::S,
            "Cl" => Element::Cl,
            "Ge" => Element::Ge,
            "As" | "as" => Element::As,
            "Se" | "se" => Element::Se,
            "Br" => Element::Br,
            "Sn" => Element::Sn,
            "Sb" => Element::Sb,
            "Te" | "te" => Element::Te,
            "I" => Element::I,
            "Hg" => Element::Hg,
            "Pb" => Element::Pb,
            "Bi" => Element::Bi,
            _ => return Err(NamingError::UnknownElement(symbol.to_string())),
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Ge => "Ge",
            Element::As => "As",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::Sn => "Sn",
            Element::Sb => "Sb",
            Element::Te => "Te",
            Element::I => "I",
            Element::Hg => "Hg",
            Element::Pb => "Pb",
            Element::Bi => "Bi",
            Element::Other(_) => "*",
        }
    }

    pub fn is_carbon(&self) -> bool {
        *self == Element::C
    }

    pub fn is_hydrogen(&self) -> bool {
        *self == Element::H
    }

    pub fn is_halogen(&self) -> bool {
        matches!(self, Element::F | Element::Cl | Element::Br | Element::I)
    }

    /// Anything other than carbon and hydrogen.
    pub fn is_heteroatom(&self) -> bool {
        !self.is_carbon() && !self.is_hydrogen()
    }

    /// Seniority of a skeletal heteroatom when locants must be shared out
    /// among several kinds (lower value gets the lower locant):
    /// O > S > Se > Te > N > P > As > Sb > Bi > Si > Ge > Sn > Pb > B > Hg.
    pub fn hetero_seniority(&self) -> u8 {
        match self {
            Element::O => 0,
            Element::S => 1,
            Element::Se => 2,
            Element::Te => 3,
            Element::N => 4,
            Element::P => 5,
            Element::As => 6,
            Element::Sb => 7,
            Element::Bi => 8,
            Element::Si => 9,
            Element::Ge => 10,
            Element::Sn => 11,
            Element::Pb => 12,
            Element::B => 13,
            Element::Hg => 14,
            _ => 15,
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub id: AtomId,
    pub element: Element,
    pub charge: i8,
    /// Implicit hydrogen count.
    pub hydrogens: u8,
    pub aromatic: bool,
    pub in_ring: bool,
}

impl Atom {
    pub fn new(id: AtomId, element: Element) -> Self {
        Self {
            id,
            element,
            charge: 0,
            hydrogens: 0,
            aromatic: false,
            in_ring: false,
        }
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_hydrogens(mut self, hydrogens: u8) -> Self {
        self.hydrogens = hydrogens;
        self
    }

    pub fn aromatic(mut self, aromatic: bool) -> Self {
        self.aromatic = aromatic;
        self
    }

    pub fn in_ring(mut self, in_ring: bool) -> Self {
        self.in_ring = in_ring;
        self
    }

    pub fn is_carbon(&self) -> bool {
        self.element.is_carbon()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Double and triple bonds; aromatic bonds are not counted as
    /// unsaturation for locant purposes.
    pub fn is_unsaturated(&self) -> bool {
        matches!(self, BondOrder::Double | BondOrder::Triple)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub a: AtomId,
    pub b: AtomId,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(a: AtomId, b: AtomId, order: BondOrder) -> Self {
        Self { a, b, order }
    }
}

/// Read-only molecular graph handed to the engine by the graph builder,
/// together with the smallest set of smallest rings from the ring detector.
#[derive(Debug, Clone)]
pub struct Molecule {
    graph: UnGraph<Atom, BondOrder>,
    index: BTreeMap<AtomId, NodeIndex>,
    rings: Vec<Vec<AtomId>>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, NamingError> {
        let mut graph = UnGraph::with_capacity(atoms.len(), bonds.len());
        let mut index = BTreeMap::new();
        for atom in atoms {
            let id = atom.id;
            if index.contains_key(&id) {
                return Err(NamingError::DuplicateAtom(id));
            }
            index.insert(id, graph.add_node(atom));
        }
        for bond in bonds {
            if bond.a == bond.b {
                return Err(NamingError::SelfBond(bond.a));
            }
            let a = *index
                .get(&bond.a)
                .ok_or_else(|| NamingError::unknown_atom(bond.a, "bond"))?;
            let b = *index
                .get(&bond.b)
                .ok_or_else(|| NamingError::unknown_atom(bond.b, "bond"))?;
            graph.update_edge(a, b, bond.order);
        }
        Ok(Self {
            graph,
            index,
            rings: Vec::new(),
        })
    }

    /// Attach the ring set found by the ring detector. Each ring is an
    /// atom-id cycle in traversal order.
    pub fn with_rings(mut self, rings: Vec<Vec<AtomId>>) -> Result<Self, NamingError> {
        for ring in &rings {
            for id in ring {
                if !self.contains(*id) {
                    return Err(NamingError::unknown_atom(*id, "ring"));
                }
            }
        }
        self.rings = rings;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: AtomId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.index.get(&id).map(|&node| &self.graph[node])
    }

    pub fn element(&self, id: AtomId) -> Option<Element> {
        self.atom(id).map(|atom| atom.element)
    }

    pub fn is_element(&self, id: AtomId, element: Element) -> bool {
        self.element(id) == Some(element)
    }

    /// Atom ids in ascending order.
    pub fn atom_ids(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.index.keys().copied()
    }

    /// Atoms in ascending id order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.index.values().map(move |&node| &self.graph[node])
    }

    /// Neighbours of `id`, sorted by id so every search is deterministic.
    pub fn neighbors(&self, id: AtomId) -> Vec<AtomId> {
        let Some(&node) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<AtomId> = self
            .graph
            .neighbors(node)
            .map(|other| self.graph[other].id)
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// Neighbours together with the order of the connecting bond.
    pub fn bonds_of(&self, id: AtomId) -> Vec<(AtomId, BondOrder)> {
        let Some(&node) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut bonds: Vec<(AtomId, BondOrder)> = self
            .graph
            .edges(node)
            .map(|edge| {
                let other = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other].id, *edge.weight())
            })
            .collect();
        bonds.sort_unstable_by_key(|(other, _)| *other);
        bonds
    }

    pub fn bond_order(&self, a: AtomId, b: AtomId) -> Option<BondOrder> {
        let (&na, &nb) = (self.index.get(&a)?, self.index.get(&b)?);
        self.graph
            .find_edge(na, nb)
            .and_then(|edge| self.graph.edge_weight(edge))
            .copied()
    }

    pub fn is_bonded(&self, a: AtomId, b: AtomId) -> bool {
        self.bond_order(a, b).is_some()
    }

    pub fn degree(&self, id: AtomId) -> usize {
        self.index
            .get(&id)
            .map(|&node| self.graph.neighbors(node).count())
            .unwrap_or(0)
    }

    pub fn hydrogens(&self, id: AtomId) -> u8 {
        self.atom(id).map(|atom| atom.hydrogens).unwrap_or(0)
    }

    /// All bonds, each reported once with the lower id first.
    pub fn bonds(&self) -> Vec<Bond> {
        let mut bonds: Vec<Bond> = self
            .graph
            .edge_references()
            .map(|edge| {
                let (a, b) = (self.graph[edge.source()].id, self.graph[edge.target()].id);
                Bond::new(a.min(b), a.max(b), *edge.weight())
            })
            .collect();
        bonds.sort_unstable_by_key(|bond| (bond.a, bond.b));
        bonds
    }

    pub fn rings(&self) -> &[Vec<AtomId>] {
        &self.rings
    }

    /// Whether the atom is a ring member, either by its own flag or by
    /// appearing in one of the supplied rings.
    pub fn is_ring_atom(&self, id: AtomId) -> bool {
        self.atom(id).map(|atom| atom.in_ring).unwrap_or(false)
            || self.rings.iter().any(|ring| ring.contains(&id))
    }
}
