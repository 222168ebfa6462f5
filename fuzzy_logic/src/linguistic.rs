use std::sync::Arc;

use crate::{arange, error::FuzzyError, expr::Expression, set::FuzzySet, F};

/// A discretized domain and the fuzzy sets defined over it.
#[derive(Debug, Clone)]
pub struct UniversalSet {
    name: String,
    domain: Vec<f64>,
    sets: Vec<Arc<FuzzySet>>,
}

impl UniversalSet {
    /// Domain `begin, begin + step, ...` up to `end`.
    pub fn new(name: &str, begin: f64, end: f64, step: f64) -> Result<Self, FuzzyError> {
        Ok(UniversalSet {
            name: name.to_string(),
            domain: arange(begin, end, step)?,
            sets: vec![],
        })
    }

    /// Domain given explicitly; it must be finite and strictly increasing.
    pub fn with_domain(name: &str, domain: Vec<f64>) -> Result<Self, FuzzyError> {
        if let Some(x) = domain.iter().find(|x| !x.is_finite()) {
            return Err(FuzzyError::InvalidDomain(format!(
                "\"{}\" contains the non-finite value {}",
                name, x
            )));
        }
        if let Some(w) = domain.windows(2).find(|w| w[0] >= w[1]) {
            return Err(FuzzyError::InvalidDomain(format!(
                "\"{}\" is not strictly increasing at {} -> {}",
                name, w[0], w[1]
            )));
        }
        Ok(UniversalSet {
            name: name.to_string(),
            domain,
            sets: vec![],
        })
    }

    /// Create a fuzzy set sampled over this domain and register it here.
    pub fn add_set(&mut self, name: &str, membership_f: F) -> Arc<FuzzySet> {
        let set = Arc::new(FuzzySet::sampled(name, membership_f, &self.domain));
        self.sets.push(Arc::clone(&set));
        set
    }

    pub fn term(&self, name: &str) -> Option<Arc<FuzzySet>> {
        self.sets.iter().find(|s| s.name() == name).cloned()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn sets(&self) -> &[Arc<FuzzySet>] {
        &self.sets
    }
}

/// A named input slot over a universal set. Its live value is held by the
/// inference context, not here.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub universe: Arc<UniversalSet>,
}

impl Variable {
    pub fn new(name: &str, universe: Arc<UniversalSet>) -> Self {
        Variable {
            name: name.to_string(),
            universe,
        }
    }

    /// `self IS term`, or None when the universe has no such term.
    pub fn is(&self, term: &str) -> Option<Expression> {
        self.universe
            .term(term)
            .map(|set| Expression::is(&self.name, set))
    }
}
