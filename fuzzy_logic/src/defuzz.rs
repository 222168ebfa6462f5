use crate::{error::FuzzyError, set::FuzzySet};

/// Turns an aggregate fuzzy set into one crisp value.
pub trait Defuzzificator: Send + Sync {
    fn defuzzify(&self, set: &FuzzySet) -> Result<f64, FuzzyError>;
}

/// `sum(x * degree) / sum(degree)` over the stored elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterOfMass;

impl Defuzzificator for CenterOfMass {
    fn defuzzify(&self, set: &FuzzySet) -> Result<f64, FuzzyError> {
        let (weighted_sum, mf_sum) = set
            .values()
            .iter()
            .fold((0.0, 0.0), |(ws, s), (x, degree)| (ws + x * degree, s + degree));

        if mf_sum <= 0.0 || mf_sum.is_nan() {
            return Err(FuzzyError::NoDecision(set.name().to_string()));
        }
        Ok(weighted_sum / mf_sum)
    }
}

/// Mean of the elements that hold the maximal degree.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanOfMaximum;

impl Defuzzificator for MeanOfMaximum {
    fn defuzzify(&self, set: &FuzzySet) -> Result<f64, FuzzyError> {
        let values = set.values();
        let max = values
            .iter()
            .map(|(_, degree)| *degree)
            .max_by(f64::total_cmp)
            .unwrap_or(0.0);

        if max <= 0.0 || max.is_nan() {
            return Err(FuzzyError::NoDecision(set.name().to_string()));
        }

        let (sum, count) = values
            .iter()
            .filter(|(_, degree)| *degree == max)
            .fold((0.0, 0usize), |(s, n), (x, _)| (s + x, n + 1));
        Ok(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::{linguistic::UniversalSet, shape::triangle};

    #[test]
    fn test_center_of_mass() {
        let s = FuzzySet::from_values("agg", vec![(0.0, 0.2), (5.0, 0.8)]).unwrap();
        let d = CenterOfMass.defuzzify(&s).unwrap();
        assert!(approx_eq!(f64, d, 4.0, epsilon = 1e-12));
    }

    #[test]
    fn test_center_of_mass_symmetric_shape() {
        let mut u = UniversalSet::new("out", 0.0, 10.0, 0.01).unwrap();
        let s = u.add_set("mid", triangle(2.0, 5.0, 8.0).unwrap());
        assert!(approx_eq!(
            f64,
            CenterOfMass.defuzzify(&s).unwrap(),
            5.0,
            epsilon = 1e-6
        ));
    }

    #[test]
    fn test_no_decision() {
        assert!(matches!(
            CenterOfMass.defuzzify(&FuzzySet::empty()),
            Err(FuzzyError::NoDecision(_))
        ));
        let zeros = FuzzySet::from_values("zeros", vec![(1.0, 0.0), (2.0, 0.0)]).unwrap();
        assert!(CenterOfMass.defuzzify(&zeros).is_err());
        assert!(MeanOfMaximum.defuzzify(&zeros).is_err());
    }

    #[test]
    fn test_zero_is_a_decision() {
        let s = FuzzySet::from_values("at zero", vec![(0.0, 0.4)]).unwrap();
        assert_eq!(CenterOfMass.defuzzify(&s), Ok(0.0));
    }

    #[test]
    fn test_mean_of_maximum() {
        let s = FuzzySet::from_values(
            "agg",
            vec![(0.0, 0.2), (4.0, 0.9), (6.0, 0.9), (10.0, 0.5)],
        )
        .unwrap();
        assert_eq!(MeanOfMaximum.defuzzify(&s), Ok(5.0));
    }
}
