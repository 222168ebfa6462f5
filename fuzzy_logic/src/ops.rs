use std::collections::BTreeMap;

use crate::set::FuzzySet;

/// Union and intersection of two fuzzy sets.
pub trait SetOperators: Send + Sync {
    fn union(&self, left: &FuzzySet, right: &FuzzySet) -> FuzzySet;
    fn intersect(&self, left: &FuzzySet, right: &FuzzySet) -> FuzzySet;
}

/// Connectives over membership degrees.
pub trait LogicOperators: Send + Sync {
    fn and(&self, left: f64, right: f64) -> f64;
    fn or(&self, left: f64, right: f64) -> f64;
    fn not(&self, operand: f64) -> f64;
}

// f64::min/max drop a NaN operand, these keep it
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    a.min(b)
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    a.max(b)
}

/// Standard union (max) and intersection (min).
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMax;

impl SetOperators for MinMax {
    /// Every element of either operand, with the larger of the two degrees as
    /// each operand reports it through `degree_of`.
    fn union(&self, left: &FuzzySet, right: &FuzzySet) -> FuzzySet {
        let mut values = BTreeMap::new();
        for (k, v) in left.entries() {
            values.insert(k, nan_max(v, right.degree_of(k.value())));
        }
        for (k, v) in right.entries() {
            values
                .entry(k)
                .or_insert_with(|| nan_max(v, left.degree_of(k.value())));
        }
        FuzzySet::from_map(&format!("{} UNION {}", left, right), values)
    }

    /// Elements of `left` that `right` also holds with a positive degree.
    fn intersect(&self, left: &FuzzySet, right: &FuzzySet) -> FuzzySet {
        let values = left
            .entries()
            .into_iter()
            .filter_map(|(k, v)| {
                let r = right.degree_of(k.value());
                (r > 0.0).then(|| (k, nan_min(v, r)))
            })
            .collect();
        FuzzySet::from_map(&format!("{} INTERSECT {}", left, right), values)
    }
}

/// Zadeh connectives: min, max and complement.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zadeh;

impl LogicOperators for Zadeh {
    fn and(&self, left: f64, right: f64) -> f64 {
        nan_min(left, right)
    }

    fn or(&self, left: f64, right: f64) -> f64 {
        nan_max(left, right)
    }

    fn not(&self, operand: f64) -> f64 {
        1.0 - operand
    }
}

/// Algebraic product and probabilistic sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Product;

impl LogicOperators for Product {
    fn and(&self, left: f64, right: f64) -> f64 {
        left * right
    }

    fn or(&self, left: f64, right: f64) -> f64 {
        left + right - left * right
    }

    fn not(&self, operand: f64) -> f64 {
        1.0 - operand
    }
}

/// How a rule turns its firing strength and consequent into a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Implication {
    /// Keep only the consequent elements whose degree is at most the strength.
    #[default]
    Threshold,
    /// Cap every consequent degree at the strength (Mamdani min).
    Clip,
}

impl Implication {
    pub fn apply(self, consequent: &FuzzySet, name: &str, strength: f64) -> FuzzySet {
        match self {
            Implication::Threshold => consequent.filter_below(name, strength),
            Implication::Clip => consequent.clip(name, strength),
        }
    }
}
