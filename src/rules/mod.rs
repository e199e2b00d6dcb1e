//! The rule pipeline.
//!
//! A [`RuleSet`] is a list of [`Rule`]s run once each, in ascending
//! priority. A rule whose condition does not hold leaves the context as it
//! is; one that fires produces the next context and an audit record.
//! Nothing in the pipeline fails: unresolved states become [`Conflict`]s.

mod conflict;
mod context;
mod defaults;

pub use conflict::*;
pub use context::*;
pub use defaults::*;

use crate::{Decision, NumberingConfig, PriorityTable, Tracer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Ingestion,
    Seniority,
    ParentSelection,
    Numbering,
    Locants,
    Finalize,
}

/// Read-only inputs every rule may consult.
#[derive(Clone, Copy)]
pub struct RuleEnv<'a> {
    pub config: &'a NumberingConfig,
    pub table: &'a PriorityTable,
    pub tracer: &'a dyn Tracer,
}

pub type Condition = for<'m> fn(&NamingContext<'m>, &RuleEnv<'_>) -> bool;
pub type Action = for<'m> fn(NamingContext<'m>, &RuleEnv<'_>) -> NamingContext<'m>;

#[derive(Clone)]
pub struct Rule {
    pub id: &'static str,
    pub description: &'static str,
    pub priority: u32,
    pub phase: Phase,
    pub condition: Condition,
    pub action: Action,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("phase", &self.phase)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl RuleSet {
    pub fn new(mut rules: Vec<Rule>) -> Self {
        rules.sort_by_key(|rule| rule.priority);
        Self { rules }
    }

    /// Add a rule, keeping the list in priority order. Rules with equal
    /// priority run in insertion order.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        let at = self.rules.partition_point(|r| r.priority <= rule.priority);
        self.rules.insert(at, rule);
        self
    }

    /// Drop the rule with the given id.
    pub fn without(mut self, id: &str) -> Self {
        self.rules.retain(|rule| rule.id != id);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn run<'m>(&self, mut context: NamingContext<'m>, env: &RuleEnv<'_>) -> NamingContext<'m> {
        for rule in &self.rules {
            if !(rule.condition)(&context, env) {
                env.tracer.record(Decision::RuleSkipped { rule: rule.id });
                continue;
            }
            let before = context.conflicts().len();
            context = (rule.action)(context, env);
            for conflict in context.conflicts().iter().skip(before) {
                env.tracer.record(Decision::ConflictRecorded {
                    rule: conflict.rule_id,
                    description: conflict.description.clone(),
                });
            }
            env.tracer.record(Decision::RuleApplied {
                rule: rule.id,
                phase: rule.phase,
            });
            context = context.with_record(RuleRecord {
                rule_id: rule.id,
                description: rule.description,
                phase: rule.phase,
            });
        }
        context
    }
}
