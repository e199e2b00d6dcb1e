use super::{carbonyl_class, classify, is_amine_nitrogen, Candidate, Chain, ChainOrigin};
use crate::{
    AtomId, Decision, Element, FunctionalGroup, GroupClass, Molecule, NumberingConfig,
    PriorityTable, SearchBudget, Tracer,
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Which atoms a chain search may use, and where chains must go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainMode {
    /// Acyclic carbons only.
    Carbon,
    /// Acyclic carbons plus skeletal heteroatoms (never amine nitrogen or
    /// halogens).
    HeavyAtom,
    /// Carbon chains passing through the given atom.
    AnchoredAt(AtomId),
    /// Carbon chains with the given atom at one end.
    StartingAt(AtomId),
}

impl ChainMode {
    fn label(&self) -> &'static str {
        match self {
            ChainMode::Carbon => "carbon",
            ChainMode::HeavyAtom => "heavy-atom",
            ChainMode::AnchoredAt(_) => "anchored",
            ChainMode::StartingAt(_) => "terminal",
        }
    }

    fn anchor(&self) -> Option<AtomId> {
        match *self {
            ChainMode::AnchoredAt(atom) | ChainMode::StartingAt(atom) => Some(atom),
            _ => None,
        }
    }
}

pub struct ChainEnumerator<'a> {
    molecule: &'a Molecule,
    config: &'a NumberingConfig,
    tracer: &'a dyn Tracer,
}

type Adjacency = BTreeMap<AtomId, Vec<AtomId>>;

impl<'a> ChainEnumerator<'a> {
    pub fn new(molecule: &'a Molecule, config: &'a NumberingConfig, tracer: &'a dyn Tracer) -> Self {
        Self {
            molecule,
            config,
            tracer,
        }
    }

    /// Whether the molecule is so ring-heavy that no chain should be
    /// considered as the parent.
    pub fn ring_dominated(&self) -> bool {
        let ring_atoms = self
            .molecule
            .atom_ids()
            .filter(|id| self.molecule.is_ring_atom(*id))
            .count();
        if ring_atoms == 0 {
            return false;
        }
        let acyclic_carbons = self
            .molecule
            .atoms()
            .filter(|atom| atom.is_carbon() && !self.molecule.is_ring_atom(atom.id))
            .count();
        self.config
            .ring_dominance
            .dominates(ring_atoms, acyclic_carbons)
    }

    /// All maximal simple paths of the greatest length available in `mode`,
    /// each reported once in canonical form.
    ///
    /// An empty result means no chain parent exists and the caller should
    /// fall back to a ring parent.
    pub fn find_candidate_chains(&self, excluded: &BTreeSet<AtomId>, mode: ChainMode) -> Vec<Chain> {
        if self.ring_dominated() {
            self.tracer.record(Decision::Fallback {
                context: "chain enumeration",
                detail: "ring atoms dominate, deferring to ring parent".to_string(),
            });
            return Vec::new();
        }

        let adjacency = self.adjacency(excluded, mode);
        if let Some(anchor) = mode.anchor() {
            if !adjacency.contains_key(&anchor) {
                return Vec::new();
            }
        }
        if adjacency.is_empty() {
            return Vec::new();
        }

        let mut budget = SearchBudget::new(self.config.max_search_steps);
        let estimate = self.estimate_length(&adjacency, mode, &mut budget);

        let mut length = estimate;
        let mut best = self.paths_of_length(&adjacency, mode, length, &mut budget);
        if best.is_empty() {
            while best.is_empty() && length > 1 && !budget.exhausted() {
                length -= 1;
                best = self.paths_of_length(&adjacency, mode, length, &mut budget);
            }
        } else {
            while length < adjacency.len() && !budget.exhausted() {
                let longer = self.paths_of_length(&adjacency, mode, length + 1, &mut budget);
                if longer.is_empty() {
                    break;
                }
                best = longer;
                length += 1;
            }
        }

        if budget.exhausted() {
            self.tracer.record(Decision::BudgetExhausted {
                search: mode.label(),
                steps: budget.used(),
            });
        }
        self.tracer.record(Decision::CandidatesFound {
            search: mode.label(),
            count: best.len(),
            length,
        });
        best
    }

    /// Assemble the candidate pool for parent selection: the longest chains,
    /// chains leading away from each amine nitrogen, and chains through each
    /// carbonyl carbon that has to end up in the parent.
    pub fn candidates(
        &self,
        excluded: &BTreeSet<AtomId>,
        groups: &[FunctionalGroup],
        table: &PriorityTable,
    ) -> Vec<Candidate> {
        let mut pool: Vec<Candidate> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        let mut add = |chain: Chain, origin: ChainOrigin, hint: Option<u32>| {
            let chain = chain.canonical();
            let mut priority = classify(&chain, self.molecule, table);
            if let Some(hint) = hint {
                priority = priority.min(hint);
            }
            match index.get(&chain.key()) {
                Some(&at) => pool[at].priority = pool[at].priority.min(priority),
                None => {
                    index.insert(chain.key(), pool.len());
                    pool.push(Candidate {
                        chain,
                        origin,
                        priority,
                    });
                }
            }
        };

        for chain in self.find_candidate_chains(excluded, ChainMode::Carbon) {
            add(chain, ChainOrigin::Longest, None);
        }
        if self.config.heteroatom_chains {
            for chain in self.find_candidate_chains(excluded, ChainMode::HeavyAtom) {
                add(chain, ChainOrigin::Longest, None);
            }
        }

        let amine_rank = table.class_rank(GroupClass::Amine);
        for nitrogen in self.molecule.atom_ids() {
            if self.molecule.is_ring_atom(nitrogen) || !is_amine_nitrogen(self.molecule, nitrogen) {
                continue;
            }
            for carbon in self.molecule.neighbors(nitrogen) {
                if !self.molecule.is_element(carbon, Element::C) {
                    continue;
                }
                for chain in self.find_candidate_chains(excluded, ChainMode::StartingAt(carbon)) {
                    add(chain, ChainOrigin::AmineAnchored { nitrogen }, Some(amine_rank));
                }
            }
        }

        let mut anchors: BTreeSet<AtomId> = groups
            .iter()
            .filter(|group| group.class().is_some_and(|class| class.is_carbonyl_anchored()))
            .map(|group| group.anchor())
            .filter(|atom| self.molecule.is_element(*atom, Element::C))
            .collect();
        anchors.extend(
            self.molecule
                .atom_ids()
                .filter(|id| !self.molecule.is_ring_atom(*id))
                .filter(|id| carbonyl_class(self.molecule, *id).is_some()),
        );
        for atom in anchors {
            for chain in self.find_candidate_chains(excluded, ChainMode::AnchoredAt(atom)) {
                add(chain, ChainOrigin::GroupAnchored { atom }, None);
            }
        }

        if pool.len() > self.config.max_candidates {
            self.tracer.record(Decision::BudgetExhausted {
                search: "candidate pool",
                steps: pool.len(),
            });
            // Keep the most senior candidates, in the order they were found.
            let mut ranked: Vec<usize> = (0..pool.len()).collect();
            ranked.sort_by_key(|&at| (pool[at].priority, at));
            let kept: BTreeSet<usize> = ranked.into_iter().take(self.config.max_candidates).collect();
            pool = pool
                .into_iter()
                .enumerate()
                .filter(|(at, _)| kept.contains(at))
                .map(|(_, candidate)| candidate)
                .collect();
        }
        pool
    }

    fn eligible(&self, id: AtomId, excluded: &BTreeSet<AtomId>, mode: ChainMode) -> bool {
        if excluded.contains(&id) || self.molecule.is_ring_atom(id) {
            return false;
        }
        let Some(element) = self.molecule.element(id) else {
            return false;
        };
        match mode {
            ChainMode::HeavyAtom => {
                element.is_carbon()
                    || (element.is_heteroatom()
                        && !element.is_halogen()
                        && !is_amine_nitrogen(self.molecule, id)
                        && self
                            .molecule
                            .neighbors(id)
                            .into_iter()
                            .filter(|n| !self.molecule.is_element(*n, Element::H))
                            .count()
                            >= 2)
            }
            _ => element.is_carbon(),
        }
    }

    fn adjacency(&self, excluded: &BTreeSet<AtomId>, mode: ChainMode) -> Adjacency {
        self.molecule
            .atom_ids()
            .filter(|id| self.eligible(*id, excluded, mode))
            .map(|id| {
                let next = self
                    .molecule
                    .neighbors(id)
                    .into_iter()
                    .filter(|n| self.eligible(*n, excluded, mode))
                    .collect();
                (id, next)
            })
            .collect()
    }

    /// Longest path length (in atoms) by repeated breadth-first sweeps. Exact
    /// on the acyclic skeleton; the deepening pass corrects it otherwise.
    fn estimate_length(&self, adjacency: &Adjacency, mode: ChainMode, budget: &mut SearchBudget) -> usize {
        match mode {
            ChainMode::StartingAt(anchor) => 1 + farthest(adjacency, anchor, None, budget).1,
            ChainMode::AnchoredAt(anchor) => {
                let mut arms: Vec<usize> = adjacency[&anchor]
                    .iter()
                    .map(|&n| 1 + farthest(adjacency, n, Some(anchor), budget).1)
                    .collect();
                arms.sort_unstable_by(|a, b| b.cmp(a));
                1 + arms.iter().take(2).sum::<usize>()
            }
            _ => {
                let mut seen = BTreeSet::new();
                let mut longest = 0;
                for &start in adjacency.keys() {
                    if seen.contains(&start) {
                        continue;
                    }
                    let (end, _) = farthest(adjacency, start, None, budget);
                    let (_, span) = farthest(adjacency, end, None, budget);
                    longest = longest.max(span + 1);
                    seen.extend(component(adjacency, start));
                }
                longest
            }
        }
    }

    fn paths_of_length(
        &self,
        adjacency: &Adjacency,
        mode: ChainMode,
        length: usize,
        budget: &mut SearchBudget,
    ) -> Vec<Chain> {
        let starts: Vec<AtomId> = match mode {
            ChainMode::StartingAt(anchor) => vec![anchor],
            _ => adjacency.keys().copied().collect(),
        };
        let mut search = PathSearch {
            adjacency,
            length,
            must_contain: match mode {
                ChainMode::AnchoredAt(anchor) => Some(anchor),
                _ => None,
            },
            limit: self.config.max_candidates,
            seen: BTreeSet::new(),
            found: Vec::new(),
        };
        for start in starts {
            let mut path = vec![start];
            search.extend(&mut path, budget);
            if budget.exhausted() || search.found.len() >= search.limit {
                break;
            }
        }
        search.found
    }
}

struct PathSearch<'a> {
    adjacency: &'a Adjacency,
    length: usize,
    must_contain: Option<AtomId>,
    limit: usize,
    seen: BTreeSet<String>,
    found: Vec<Chain>,
}

impl PathSearch<'_> {
    fn extend(&mut self, path: &mut Vec<AtomId>, budget: &mut SearchBudget) {
        if !budget.step() || self.found.len() >= self.limit {
            return;
        }
        if path.len() == self.length {
            if self.must_contain.map_or(true, |atom| path.contains(&atom)) {
                let chain = Chain::from_path(path.clone()).canonical();
                if self.seen.insert(chain.key()) {
                    self.found.push(chain);
                }
            }
            return;
        }
        let last = path[path.len() - 1];
        for &next in &self.adjacency[&last] {
            if path.contains(&next) {
                continue;
            }
            path.push(next);
            self.extend(path, budget);
            path.pop();
        }
    }
}

/// The atom farthest from `start` and its distance in bonds, never
/// stepping onto `blocked`.
fn farthest(
    adjacency: &Adjacency,
    start: AtomId,
    blocked: Option<AtomId>,
    budget: &mut SearchBudget,
) -> (AtomId, usize) {
    let mut distance = BTreeMap::from([(start, 0usize)]);
    let mut queue = VecDeque::from([start]);
    let mut best = (start, 0);
    while let Some(atom) = queue.pop_front() {
        if !budget.step() {
            break;
        }
        let d = distance[&atom];
        if d > best.1 {
            best = (atom, d);
        }
        for &next in &adjacency[&atom] {
            if Some(next) == blocked || distance.contains_key(&next) {
                continue;
            }
            distance.insert(next, d + 1);
            queue.push_back(next);
        }
    }
    best
}

fn component(adjacency: &Adjacency, start: AtomId) -> BTreeSet<AtomId> {
    let mut seen = BTreeSet::from([start]);
    let mut stack = vec![start];
    while let Some(atom) = stack.pop() {
        for &next in &adjacency[&atom] {
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen
}
