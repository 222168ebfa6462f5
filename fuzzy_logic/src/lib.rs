pub mod defuzz;
pub mod error;
pub mod expr;
pub mod inference;
pub mod linguistic;
pub mod ops;
pub mod rule;
pub mod set;
pub mod shape;

use std::sync::Arc;

pub use defuzz::{CenterOfMass, Defuzzificator, MeanOfMaximum};
pub use error::FuzzyError;
pub use expr::Expression;
pub use inference::{InferenceContext, InferenceMachine, InferenceOptions};
pub use linguistic::{UniversalSet, Variable};
pub use ops::{Implication, LogicOperators, MinMax, Product, SetOperators, Zadeh};
pub use rule::{Rule, RuleSet};
pub use set::FuzzySet;

/// Upper bound on the number of elements `arange` will generate.
pub const MAX_DOMAIN_LEN: usize = 10_000_000;

/// A membership function, shared read-only between sets and threads.
pub type F = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// `start, start + interval, ...` up to `stop`. Each element is computed as
/// `start + i * interval`; one that overshoots `stop` by less than a billionth
/// of `interval` is kept and snapped to `stop`.
///
/// Fails when the domain would exceed [`MAX_DOMAIN_LEN`] elements or when
/// `interval` is too small to move past `start` at its float precision.
pub fn arange(start: f64, stop: f64, interval: f64) -> Result<Vec<f64>, FuzzyError> {
    if !(start.is_finite() && stop.is_finite() && interval.is_finite()) {
        return Err(FuzzyError::InvalidDomain(format!(
            "bounds and step must be finite, got ({}, {}, {})",
            start, stop, interval
        )));
    } else if stop < start {
        return Err(FuzzyError::InvalidDomain(format!(
            "end {} can not be less than start {}",
            stop, start
        )));
    } else if interval <= 0f64 {
        return Err(FuzzyError::InvalidDomain(format!(
            "interval must be > 0, got {}",
            interval
        )));
    }
    let steps = ((stop - start) / interval).floor();
    if !steps.is_finite() || steps >= MAX_DOMAIN_LEN as f64 {
        return Err(FuzzyError::InvalidDomain(format!(
            "({}, {}, {}) spans more than {} elements",
            start, stop, interval, MAX_DOMAIN_LEN
        )));
    }
    let tolerance = interval * 1e-9;

    let domain = (0..=steps as usize + 1)
        .map(|i| start + i as f64 * interval)
        .take_while(|&x| x <= stop + tolerance)
        .map(|x| if x > stop { stop } else { x })
        .collect::<Vec<f64>>();

    if domain.windows(2).any(|w| w[0] >= w[1]) {
        return Err(FuzzyError::InvalidDomain(format!(
            "interval {} is below the float precision of ({}, {})",
            interval, start, stop
        )));
    }
    Ok(domain)
}
