//! Tunable limits for the numbering engine.

/// Thresholds for deferring to ring-based parent selection.
///
/// These values were tuned empirically against a test corpus and are kept
/// literally: chain enumeration is abandoned when ring atoms outnumber
/// acyclic carbons `ratio`:1 or more, or when there are at least
/// `min_ring_atoms` ring atoms against `max_acyclic_carbons` or fewer
/// acyclic carbons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingDominance {
    pub ratio: usize,
    pub min_ring_atoms: usize,
    pub max_acyclic_carbons: usize,
}

impl Default for RingDominance {
    fn default() -> Self {
        Self {
            ratio: 15,
            min_ring_atoms: 20,
            max_acyclic_carbons: 3,
        }
    }
}

impl RingDominance {
    pub fn dominates(&self, ring_atoms: usize, acyclic_carbons: usize) -> bool {
        if ring_atoms >= self.min_ring_atoms && acyclic_carbons <= self.max_acyclic_carbons {
            return true;
        }
        acyclic_carbons > 0 && ring_atoms >= self.ratio * acyclic_carbons
    }
}

#[derive(Debug, Clone)]
pub struct NumberingConfig {
    /// Depth-first expansions allowed per search (chain paths, ring cycles).
    pub max_search_steps: usize,
    /// Upper bound on collected candidate chains.
    pub max_candidates: usize,
    /// Upper bound on main-ring/main-bridge arrangements tried for a von
    /// Baeyer system.
    pub max_von_baeyer_candidates: usize,
    /// Also enumerate chains with skeletal heteroatoms (`C-O-C-C`), for
    /// replacement ("oxa") nomenclature.
    pub heteroatom_chains: bool,
    pub ring_dominance: RingDominance,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            max_search_steps: 200_000,
            max_candidates: 512,
            max_von_baeyer_candidates: 256,
            heteroatom_chains: false,
            ring_dominance: RingDominance::default(),
        }
    }
}

impl NumberingConfig {
    pub fn with_max_search_steps(mut self, steps: usize) -> Self {
        self.max_search_steps = steps;
        self
    }

    pub fn with_max_candidates(mut self, candidates: usize) -> Self {
        self.max_candidates = candidates;
        self
    }

    pub fn with_max_von_baeyer_candidates(mut self, candidates: usize) -> Self {
        self.max_von_baeyer_candidates = candidates;
        self
    }

    pub fn with_heteroatom_chains(mut self, enabled: bool) -> Self {
        self.heteroatom_chains = enabled;
        self
    }

    pub fn with_ring_dominance(mut self, ring_dominance: RingDominance) -> Self {
        self.ring_dominance = ring_dominance;
        self
    }
}

/// Step counter shared by one bounded search.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    limit: usize,
    used: usize,
}

impl SearchBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Consume one step; false once the budget is spent.
    pub fn step(&mut self) -> bool {
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn exhausted(&self) -> bool {
        self.used >= self.limit
    }

    pub fn used(&self) -> usize {
        self.used
    }
}
