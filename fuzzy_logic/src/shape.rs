use std::sync::Arc;

use crate::{error::FuzzyError, F};

fn check_ordered(shape: &'static str, parameters: &[f64]) -> Result<(), FuzzyError> {
    if parameters.iter().any(|p| !p.is_finite()) {
        return Err(FuzzyError::InvalidShape {
            shape,
            parameters: parameters.to_vec(),
            reason: "parameters must be finite",
        });
    }
    if parameters.windows(2).any(|w| w[0] > w[1]) {
        return Err(FuzzyError::InvalidShape {
            shape,
            parameters: parameters.to_vec(),
            reason: "parameters must be in non-decreasing order",
        });
    }
    Ok(())
}

/// Triangle rising from 0 at `a` to 1 at `b` and falling back to 0 at `c`.
///
/// A degenerate side (`a == b` or `b == c`) is a vertical step, so the peak
/// still has degree 1 and nothing divides by zero.
pub fn triangle(a: f64, b: f64, c: f64) -> Result<F, FuzzyError> {
    check_ordered("triangle", &[a, b, c])?;
    Ok(Arc::new(move |x| {
        if x < a || x > c {
            return 0.0;
        } else if x == b {
            return 1.0;
        } else if x < b {
            return (x - a) / (b - a);
        }
        (c - x) / (c - b)
    }))
}

/// Trapezoid rising on `[a, b]`, flat at 1 on `[b, c]` and falling on `[c, d]`.
pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<F, FuzzyError> {
    check_ordered("trapezoid", &[a, b, c, d])?;
    Ok(Arc::new(move |x| {
        if x < a || x > d {
            return 0.0;
        } else if x >= b && x <= c {
            return 1.0;
        } else if x < b {
            return (x - a) / (b - a);
        }
        (d - x) / (d - c)
    }))
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_triangle() {
        let f = triangle(0.0, 1.0, 2.0).unwrap();
        assert!(approx_eq!(f64, f(0.5), 0.5, epsilon = 1e-12));
        assert_eq!(f(1.0), 1.0);
        assert_eq!(f(2.5), 0.0);
        assert_eq!(f(-0.1), 0.0);
        assert_eq!(f(0.0), 0.0);
        assert_eq!(f(2.0), 0.0);
        assert!(approx_eq!(f64, f(1.5), 0.5, epsilon = 1e-12));
    }

    #[test]
    fn test_trapezoidal() {
        let f = trapezoidal(0.0, 1.0, 2.0, 3.0).unwrap();
        assert_eq!(f(1.5), 1.0);
        assert_eq!(f(1.0), 1.0);
        assert_eq!(f(2.0), 1.0);
        assert!(approx_eq!(f64, f(2.5), 0.5, epsilon = 1e-12));
        assert!(approx_eq!(f64, f(0.25), 0.25, epsilon = 1e-12));
        assert_eq!(f(3.5), 0.0);
    }

    #[test]
    fn test_degenerate_sides() {
        let left = triangle(1.0, 1.0, 2.0).unwrap();
        assert_eq!(left(1.0), 1.0);
        assert_eq!(left(0.999), 0.0);
        assert!(approx_eq!(f64, left(1.5), 0.5, epsilon = 1e-12));

        let right = triangle(0.0, 1.0, 1.0).unwrap();
        assert_eq!(right(1.0), 1.0);
        assert_eq!(right(1.001), 0.0);

        let point = triangle(3.0, 3.0, 3.0).unwrap();
        assert_eq!(point(3.0), 1.0);
        assert_eq!(point(3.1), 0.0);

        let square = trapezoidal(0.0, 0.0, 2.0, 2.0).unwrap();
        assert_eq!(square(0.0), 1.0);
        assert_eq!(square(2.0), 1.0);
        assert_eq!(square(2.1), 0.0);
        assert!(!square(1.0).is_nan());
    }

    #[test]
    fn test_outside_support_is_zero() {
        let f = triangle(-2.0, 0.0, 2.0).unwrap();
        for x in [-100.0, -2.0001, 2.0001, 7.0, f64::INFINITY] {
            assert_eq!(f(x), 0.0, "x = {}", x);
        }
        let g = trapezoidal(-2.0, -1.0, 1.0, 2.0).unwrap();
        for x in [-0.5, 0.0, 0.5, 1.0, -1.0] {
            assert_eq!(g(x), 1.0, "x = {}", x);
        }
    }

    #[test]
    fn test_malformed_parameters() {
        assert!(matches!(
            triangle(2.0, 1.0, 3.0),
            Err(FuzzyError::InvalidShape { shape: "triangle", .. })
        ));
        assert!(trapezoidal(0.0, 2.0, 1.0, 3.0).is_err());
        assert!(triangle(0.0, f64::NAN, 1.0).is_err());
    }
}
