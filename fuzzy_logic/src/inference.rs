use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    defuzz::{CenterOfMass, Defuzzificator},
    error::FuzzyError,
    linguistic::UniversalSet,
    ops::{Implication, LogicOperators, MinMax, SetOperators, Zadeh},
    rule::RuleSet,
};

/// Operator configuration shared by every evaluation in a context.
#[derive(Clone)]
pub struct InferenceOptions {
    pub set_ops: Arc<dyn SetOperators>,
    pub logic_ops: Arc<dyn LogicOperators>,
    pub defuzzificator: Arc<dyn Defuzzificator>,
    pub implication: Implication,
}

impl InferenceOptions {
    pub fn new(
        set_ops: Arc<dyn SetOperators>,
        logic_ops: Arc<dyn LogicOperators>,
        defuzzificator: Arc<dyn Defuzzificator>,
    ) -> Self {
        InferenceOptions {
            set_ops,
            logic_ops,
            defuzzificator,
            implication: Implication::default(),
        }
    }

    pub fn with_set_ops(mut self, set_ops: impl SetOperators + 'static) -> Self {
        self.set_ops = Arc::new(set_ops);
        self
    }

    pub fn with_logic_ops(mut self, logic_ops: impl LogicOperators + 'static) -> Self {
        self.logic_ops = Arc::new(logic_ops);
        self
    }

    pub fn with_defuzzificator(mut self, defuzzificator: impl Defuzzificator + 'static) -> Self {
        self.defuzzificator = Arc::new(defuzzificator);
        self
    }

    pub fn with_implication(mut self, implication: Implication) -> Self {
        self.implication = implication;
        self
    }
}

impl Default for InferenceOptions {
    /// Min-max set operators, Zadeh logic, center of mass, threshold implication.
    fn default() -> Self {
        InferenceOptions::new(Arc::new(MinMax), Arc::new(Zadeh), Arc::new(CenterOfMass))
    }
}

impl fmt::Debug for InferenceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceOptions")
            .field("implication", &self.implication)
            .finish_non_exhaustive()
    }
}

/// Current input values plus the operators used to evaluate against them.
#[derive(Debug, Clone)]
pub struct InferenceContext {
    values: HashMap<String, f64>,
    options: InferenceOptions,
}

impl InferenceContext {
    /// Every named input starts unset (NaN).
    pub fn new<I, S>(inputs: I, options: InferenceOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InferenceContext {
            values: inputs.into_iter().map(|s| (s.into(), f64::NAN)).collect(),
            options,
        }
    }

    /// Value of input `name`, NaN when unset or unknown.
    pub fn value(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(f64::NAN)
    }

    /// Store `value` for a known input. Unknown names are ignored and reported
    /// by the `false` return.
    pub fn set_value(&mut self, name: &str, value: f64) -> bool {
        match self.values.get_mut(name) {
            Some(v) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    pub fn has_input(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }
}

/// Ties a context to a rule set and recomputes the decision on every input write.
pub struct InferenceMachine {
    universes: Vec<Arc<UniversalSet>>,
    rule_set: RuleSet,
    context: InferenceContext,
    decision: Option<f64>,
    pool: Option<rayon::ThreadPool>,
}

impl InferenceMachine {
    pub fn new(
        context: InferenceContext,
        universes: impl IntoIterator<Item = Arc<UniversalSet>>,
        rule_set: RuleSet,
    ) -> Self {
        InferenceMachine {
            universes: universes.into_iter().collect(),
            rule_set,
            context,
            decision: None,
            pool: None,
        }
    }

    /// Evaluate rules on a dedicated pool of at most `workers` threads instead of
    /// the global rayon pool.
    pub fn with_workers(mut self, workers: usize) -> Result<Self, FuzzyError> {
        self.pool = Some(self.rule_set.worker_pool(workers)?);
        Ok(self)
    }

    /// Write input `name`, then re-run the rule set and defuzzify the aggregate.
    /// Returns the new decision, None when the aggregate carries no membership.
    pub fn set(&mut self, name: &str, value: f64) -> Option<f64> {
        if !self.context.set_value(name, value) {
            log::warn!("ignoring write to unknown input \"{}\"", name);
        }

        let aggregate = match &self.pool {
            Some(pool) => self.rule_set.evaluate_in(pool, &self.context),
            None => self.rule_set.evaluate(&self.context),
        };

        self.decision = match self.context.options().defuzzificator.defuzzify(&aggregate) {
            Ok(decision) => Some(decision),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        };
        log::debug!(
            "{} rules, aggregate of {} elements, decision {:?}",
            self.rule_set.len(),
            aggregate.len(),
            self.decision
        );
        self.decision
    }

    /// Current value of input `name`, not the decision.
    pub fn get(&self, name: &str) -> f64 {
        self.context.value(name)
    }

    pub fn decision(&self) -> Option<f64> {
        self.decision
    }

    pub fn decision_or_nan(&self) -> f64 {
        self.decision.unwrap_or(f64::NAN)
    }

    pub fn universe(&self, name: &str) -> Option<&Arc<UniversalSet>> {
        self.universes.iter().find(|u| u.name() == name)
    }

    pub fn universes(&self) -> &[Arc<UniversalSet>] {
        &self.universes
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    pub fn context(&self) -> &InferenceContext {
        &self.context
    }
}
