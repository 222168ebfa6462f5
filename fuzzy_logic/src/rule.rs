use std::{fmt, sync::Arc};

use rayon::prelude::*;

use crate::{error::FuzzyError, expr::Expression, inference::InferenceContext, set::FuzzySet};

/// IF `condition` THEN `consequent`.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub condition: Expression,
    pub consequent: Arc<FuzzySet>,
}

impl Rule {
    pub fn new(name: &str, condition: Expression, consequent: Arc<FuzzySet>) -> Self {
        Rule {
            name: name.to_string(),
            condition,
            consequent,
        }
    }

    /// Firing strength of the condition, then the consequent shaped by the
    /// context's implication policy.
    pub fn evaluate(&self, context: &InferenceContext) -> FuzzySet {
        let strength = self.condition.evaluate(context);
        log::trace!("rule \"{}\" fires at {}", self.name, strength);

        context.options().implication.apply(
            &self.consequent,
            &format!("{} result set", self.name),
            strength,
        )
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: IF {} THEN {}", self.name, self.condition, self.consequent)
    }
}

/// Ordered rules whose results are unioned into one aggregate set.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleSet { rules }
    }

    /// Append a rule; `None` is ignored.
    pub fn add(&mut self, rule: impl Into<Option<Rule>>) {
        if let Some(rule) = rule.into() {
            self.rules.push(rule);
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule in parallel on the current rayon pool, then union the
    /// results left to right in rule order starting from the empty set.
    ///
    /// The fold runs on one thread after the parallel map, so the aggregate is
    /// bit-identical to `evaluate_sequential`.
    pub fn evaluate(&self, context: &InferenceContext) -> FuzzySet {
        let results = self
            .rules
            .par_iter()
            .map(|rule| rule.evaluate(context))
            .collect::<Vec<FuzzySet>>();
        self.aggregate(context, results)
    }

    pub fn evaluate_sequential(&self, context: &InferenceContext) -> FuzzySet {
        let results = self
            .rules
            .iter()
            .map(|rule| rule.evaluate(context))
            .collect::<Vec<FuzzySet>>();
        self.aggregate(context, results)
    }

    /// Same as `evaluate` but on `pool`.
    pub fn evaluate_in(&self, pool: &rayon::ThreadPool, context: &InferenceContext) -> FuzzySet {
        pool.install(|| self.evaluate(context))
    }

    /// Build a pool of at most `workers` threads, never more than there are rules.
    pub fn worker_pool(&self, workers: usize) -> Result<rayon::ThreadPool, FuzzyError> {
        let threads = workers.min(self.rules.len()).max(1);
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("rule-worker-{}", i))
            .build()
            .map_err(|e| FuzzyError::WorkerPool(e.to_string()))
    }

    fn aggregate(&self, context: &InferenceContext, results: Vec<FuzzySet>) -> FuzzySet {
        let set_ops = context.options().set_ops.as_ref();
        results
            .iter()
            .fold(FuzzySet::empty(), |acc, result| set_ops.union(&acc, result))
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in self.rules.iter() {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
