//! Fallback formula - interpretable closed-form logistic model
//!
//! Used whenever no trained artifact is loaded. Coefficients and intercept
//! are fixed:
//!
//! ```text
//! z = 0.9·stress + 0.7·ics − 0.45·scg + 0.015·age + 0.35·poste_nuit − 1.5
//! p = 1 / (1 + e^(−z))
//! ```

use crate::logic::features::{FeatureRow, FEATURE_COUNT};

/// Coefficients in layout order: stress, ics, scg, age, poste_nuit
pub const FALLBACK_COEFFICIENTS: [f64; FEATURE_COUNT] = [0.9, 0.7, -0.45, 0.015, 0.35];

/// Intercept
pub const FALLBACK_INTERCEPT: f64 = -1.5;

/// Standard logistic sigmoid
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Linear score of the fallback formula
pub fn fallback_logit(row: &FeatureRow) -> f64 {
    let [stress, ics, scg, age, poste_nuit] = *row;
    0.9 * stress + 0.7 * ics - 0.45 * scg + 0.015 * age + 0.35 * poste_nuit - 1.5
}

/// Positive-class probability (0..1) from the fallback formula
pub fn fallback_probability(row: &FeatureRow) -> f64 {
    sigmoid(fallback_logit(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_constants_match_formula() {
        let row = [2.0, 3.0, 4.0, 50.0, 1.0];
        let dot: f64 = FALLBACK_COEFFICIENTS
            .iter()
            .zip(row.iter())
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + FALLBACK_INTERCEPT;
        assert!(approx(dot, fallback_logit(&row)));
    }

    #[test]
    fn test_reference_points() {
        // 2.7 + 0.7 - 3.15 + 0.6 + 0 - 1.5
        assert!(approx(fallback_logit(&[3.0, 1.0, 7.0, 40.0, 0.0]), -0.65));
        assert!(approx(fallback_probability(&[3.0, 1.0, 7.0, 40.0, 0.0]), 0.342_989_537_326_501));

        // 4.5 + 2.8 - 0 + 0.9 + 0.35 - 1.5
        assert!(approx(fallback_logit(&[5.0, 4.0, 0.0, 60.0, 1.0]), 7.05));
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-40.0) < 1e-6);
    }

    #[test]
    fn test_monotonic_in_each_feature() {
        let base = [3.0, 2.0, 5.0, 40.0, 0.0];
        let p0 = fallback_probability(&base);

        let bump = |i: usize, delta: f64| {
            let mut row = base;
            row[i] += delta;
            fallback_probability(&row)
        };

        assert!(bump(0, 0.5) >= p0); // stress
        assert!(bump(1, 1.0) >= p0); // ics
        assert!(bump(2, 1.0) <= p0); // scg is protective
        assert!(bump(3, 10.0) >= p0); // age
        assert!(bump(4, 1.0) >= p0); // night shift
    }

    #[test]
    fn test_monotonic_over_grid() {
        for stress in [1.0, 2.5, 4.0] {
            for ics in 0..4 {
                for scg in [0.0, 5.0, 9.0] {
                    for night in [0.0, 1.0] {
                        let row = [stress, ics as f64, scg, 45.0, night];
                        let p = fallback_probability(&row);
                        assert!(fallback_probability(&[stress + 1.0, ics as f64, scg, 45.0, night]) >= p);
                        assert!(fallback_probability(&[stress, ics as f64 + 1.0, scg, 45.0, night]) >= p);
                        assert!(fallback_probability(&[stress, ics as f64, scg + 1.0, 45.0, night]) <= p);
                        assert!(fallback_probability(&[stress, ics as f64, scg, 46.0, night]) >= p);
                        assert!(fallback_probability(&[stress, ics as f64, scg, 45.0, 1.0]) >= p);
                    }
                }
            }
        }
    }
}
