use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
    sync::{PoisonError, RwLock},
};

use crate::{error::FuzzyError, F};

pub const EMPTY_SET_NAME: &str = "Empty set";

/// A domain element used as a map key. Ordered by `f64::total_cmp`, with `-0.0`
/// folded into `0.0` so both land on the same entry.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Point(f64);

impl Point {
    pub(crate) fn new(x: f64) -> Self {
        if x == 0.0 {
            Point(0.0)
        } else {
            Point(x)
        }
    }

    pub(crate) fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Point {}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

pub struct FuzzySet {
    name: String,
    membership_f: Option<F>,
    // lazily extended by `degree_of` when a membership function is attached
    values: RwLock<BTreeMap<Point, f64>>,
}

impl FuzzySet {
    /// The canonical empty set, identity of union.
    pub fn empty() -> Self {
        FuzzySet::from_map(EMPTY_SET_NAME, BTreeMap::new())
    }

    /// Sample `membership_f` over `domain`, keeping only points with a positive degree.
    pub(crate) fn sampled(name: &str, membership_f: F, domain: &[f64]) -> Self {
        let values = domain
            .iter()
            .filter_map(|x| {
                let degree = clamp_degree((membership_f)(*x));
                (degree > 0.0).then(|| (Point::new(*x), degree))
            })
            .collect();

        FuzzySet {
            name: name.to_string(),
            membership_f: Some(membership_f),
            values: RwLock::new(values),
        }
    }

    /// Standalone set from explicit `(element, degree)` pairs. No membership
    /// function is attached, so lookups off the stored keys use the nearest key.
    pub fn from_values<I>(name: &str, values: I) -> Result<Self, FuzzyError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut map = BTreeMap::new();
        for (element, degree) in values {
            if !element.is_finite() || !(0.0..=1.0).contains(&degree) {
                return Err(FuzzyError::InvalidDegree { element, degree });
            }
            map.insert(Point::new(element), degree);
        }
        Ok(FuzzySet::from_map(name, map))
    }

    pub(crate) fn from_map(name: &str, values: BTreeMap<Point, f64>) -> Self {
        FuzzySet {
            name: name.to_string(),
            membership_f: None,
            values: RwLock::new(values),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_membership_f(&self) -> bool {
        self.membership_f.is_some()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of the stored `(element, degree)` pairs in ascending element order.
    pub fn values(&self) -> Vec<(f64, f64)> {
        self.read().iter().map(|(k, v)| (k.value(), *v)).collect()
    }

    /// Return the degree of membership of the input value in the FuzzySet.
    ///
    /// Stored elements answer directly. Otherwise a function-backed set computes
    /// the degree and caches it when positive, and a standalone set answers with
    /// the degree of its nearest stored element. The empty standalone set is 0
    /// everywhere and NaN stays NaN.
    pub fn degree_of(&self, input: f64) -> f64 {
        if input.is_nan() {
            return f64::NAN;
        }
        let key = Point::new(input);
        {
            let values = self.read();
            if let Some(degree) = values.get(&key) {
                return *degree;
            }
            if self.membership_f.is_none() {
                return nearest(&values, key).unwrap_or(0.0);
            }
        }

        match &self.membership_f {
            Some(f) => {
                let degree = clamp_degree((f)(input));
                if degree > 0.0 {
                    self.write().insert(key, degree);
                }
                degree
            }
            None => 0.0,
        }
    }

    /// Return a new FuzzySet with every degree capped at `strength`.
    pub fn clip(&self, name: &str, strength: f64) -> FuzzySet {
        let values = self
            .read()
            .iter()
            .map(|(k, v)| (*k, v.min(strength)))
            .collect();
        FuzzySet::from_map(name, values)
    }

    /// Return a new FuzzySet holding only the elements whose degree does not exceed
    /// `strength`. A NaN strength keeps nothing.
    pub fn filter_below(&self, name: &str, strength: f64) -> FuzzySet {
        let values = self
            .read()
            .iter()
            .filter(|(_, v)| **v <= strength)
            .map(|(k, v)| (*k, *v))
            .collect();
        FuzzySet::from_map(name, values)
    }

    pub(crate) fn entries(&self) -> BTreeMap<Point, f64> {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<Point, f64>> {
        // a poisoned cache still only holds function results
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<Point, f64>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn clamp_degree(degree: f64) -> f64 {
    // NaN stays NaN
    degree.clamp(0f64, 1f64)
}

/// Degree of the stored element closest to `key`; ties go to the lower element.
fn nearest(values: &BTreeMap<Point, f64>, key: Point) -> Option<f64> {
    let below = values.range(..key).next_back();
    let above = values.range(key..).next();

    match (below, above) {
        (Some((lk, lv)), Some((hk, hv))) => {
            if key.value() - lk.value() <= hk.value() - key.value() {
                Some(*lv)
            } else {
                Some(*hv)
            }
        }
        (Some((_, v)), None) | (None, Some((_, v))) => Some(*v),
        (None, None) => None,
    }
}

impl Clone for FuzzySet {
    fn clone(&self) -> Self {
        FuzzySet {
            name: self.name.clone(),
            membership_f: self.membership_f.clone(),
            values: RwLock::new(self.entries()),
        }
    }
}

impl fmt::Debug for FuzzySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzySet")
            .field("name", &self.name)
            .field("membership_f", &self.membership_f.is_some())
            .field("values", &self.values())
            .finish()
    }
}

impl fmt::Display for FuzzySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use float_cmp::approx_eq;

    use super::*;
    use crate::{arange, shape::triangle};

    fn explicit(values: &[(f64, f64)]) -> FuzzySet {
        FuzzySet::from_values("s", values.iter().copied()).unwrap()
    }

    #[test]
    fn test_sampled_drops_zero_degrees() {
        let domain = arange(0.0, 4.0, 0.5).unwrap();
        let s = FuzzySet::sampled("mid", triangle(1.0, 2.0, 3.0).unwrap(), &domain);

        assert_eq!(s.values(), vec![(1.5, 0.5), (2.0, 1.0), (2.5, 0.5)]);
        assert!(s.has_membership_f());
    }

    #[test]
    fn test_lazy_fill() {
        let domain = arange(0.0, 4.0, 1.0).unwrap();
        let s = FuzzySet::sampled("mid", triangle(1.0, 2.0, 3.0).unwrap(), &domain);
        assert_eq!(s.len(), 1);

        assert!(approx_eq!(f64, s.degree_of(1.5), 0.5, epsilon = 1e-12));
        assert_eq!(s.len(), 2);
        // idempotent on repeated access
        assert!(approx_eq!(f64, s.degree_of(1.5), 0.5, epsilon = 1e-12));
        assert_eq!(s.len(), 2);

        assert_eq!(s.degree_of(10.0), 0.0);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_nearest_fallback() {
        let s = explicit(&[(0.0, 0.2), (5.0, 0.5), (10.0, 0.9)]);

        assert_eq!(s.degree_of(5.0), 0.5);
        assert_eq!(s.degree_of(1.0), 0.2);
        assert_eq!(s.degree_of(4.0), 0.5);
        assert_eq!(s.degree_of(2.5), 0.2);
        assert_eq!(s.degree_of(100.0), 0.9);
        assert_eq!(s.degree_of(-3.0), 0.2);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_empty() {
        let e = FuzzySet::empty();
        assert!(e.is_empty());
        assert_eq!(e.name(), EMPTY_SET_NAME);
        assert_eq!(e.degree_of(3.0), 0.0);
        assert!(e.degree_of(f64::NAN).is_nan());
    }

    #[test]
    fn test_clip_and_filter() {
        let s = explicit(&[(0.0, 0.2), (5.0, 0.5), (10.0, 0.9)]);

        assert_eq!(
            s.filter_below("r", 0.6).values(),
            vec![(0.0, 0.2), (5.0, 0.5)]
        );
        assert_eq!(
            s.clip("r", 0.6).values(),
            vec![(0.0, 0.2), (5.0, 0.5), (10.0, 0.6)]
        );
        assert!(s.filter_below("r", f64::NAN).is_empty());
    }

    #[test]
    fn test_invalid_degree() {
        assert!(FuzzySet::from_values("bad", vec![(1.0, 1.5)]).is_err());
        assert!(FuzzySet::from_values("bad", vec![(f64::NAN, 0.5)]).is_err());
        assert!(FuzzySet::from_values("bad", vec![(1.0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_negative_zero_key() {
        let s = explicit(&[(-0.0, 0.7)]);
        assert_eq!(s.values(), vec![(0.0, 0.7)]);
        assert_eq!(s.degree_of(0.0), 0.7);
    }

    #[test]
    fn test_degrees_are_clamped() {
        let f: F = Arc::new(|x| x);
        let s = FuzzySet::sampled("raw", f, &[-1.0, 0.5, 3.0]);
        assert_eq!(s.values(), vec![(0.5, 0.5), (3.0, 1.0)]);
    }
}
