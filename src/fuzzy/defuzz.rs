//! Defuzzification methods
//!
//! All methods work on an aggregate fuzzy set sampled at the output
//! universe's resolution. An identically-zero set has no defined crisp value,
//! which is reported as `None` and resolved by the caller.

use serde::{Deserialize, Serialize};

/// Defuzzification method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationMethod {
    /// Center of Gravity (Centroid)
    #[default]
    Centroid,
    /// Bisector of Area
    Bisector,
    /// Mean of Maximum
    #[serde(alias = "mom")]
    MeanOfMaximum,
}

impl DefuzzificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefuzzificationMethod::Centroid => "centroid",
            DefuzzificationMethod::Bisector => "bisector",
            DefuzzificationMethod::MeanOfMaximum => "mom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "centroid" | "cog" | "center-of-gravity" => Some(DefuzzificationMethod::Centroid),
            "bisector" => Some(DefuzzificationMethod::Bisector),
            "mom" | "mean-of-maximum" | "mean_of_maximum" => {
                Some(DefuzzificationMethod::MeanOfMaximum)
            }
            _ => None,
        }
    }

    /// Defuzzify `(xs[i], mu[i])` pairs; `None` when the set is empty
    pub fn defuzzify(&self, xs: &[f64], mu: &[f64]) -> Option<f64> {
        let total: f64 = mu.iter().sum();
        if total <= 0.0 || xs.is_empty() {
            return None;
        }

        match self {
            DefuzzificationMethod::Centroid => {
                let numerator: f64 = xs.iter().zip(mu).map(|(x, m)| x * m).sum();
                Some(numerator / total)
            }
            DefuzzificationMethod::Bisector => {
                let half_area = total / 2.0;
                let mut cumulative = 0.0;
                for (x, m) in xs.iter().zip(mu) {
                    cumulative += m;
                    if cumulative >= half_area {
                        return Some(*x);
                    }
                }
                xs.last().copied()
            }
            DefuzzificationMethod::MeanOfMaximum => {
                let max_value = mu.iter().cloned().fold(0.0, f64::max);
                let maxima: Vec<f64> = xs
                    .iter()
                    .zip(mu)
                    .filter(|(_, m)| (**m - max_value).abs() < f64::EPSILON)
                    .map(|(x, _)| *x)
                    .collect();
                if maxima.is_empty() {
                    None
                } else {
                    Some(maxima.iter().sum::<f64>() / maxima.len() as f64)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_symmetric() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let mu = [0.0, 0.5, 1.0, 0.5, 0.0];
        let c = DefuzzificationMethod::Centroid.defuzzify(&xs, &mu).unwrap();
        assert!((c - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_weighted() {
        let xs = [0.0, 10.0];
        let mu = [1.0, 3.0];
        let c = DefuzzificationMethod::Centroid.defuzzify(&xs, &mu).unwrap();
        assert!((c - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_set_has_no_value() {
        let xs = [0.0, 1.0, 2.0];
        let mu = [0.0, 0.0, 0.0];
        for method in [
            DefuzzificationMethod::Centroid,
            DefuzzificationMethod::Bisector,
            DefuzzificationMethod::MeanOfMaximum,
        ] {
            assert_eq!(method.defuzzify(&xs, &mu), None);
        }
    }

    #[test]
    fn test_bisector_and_mom() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let mu = [0.25, 1.0, 1.0, 0.25];
        assert_eq!(DefuzzificationMethod::Bisector.defuzzify(&xs, &mu), Some(1.0));
        assert_eq!(DefuzzificationMethod::MeanOfMaximum.defuzzify(&xs, &mu), Some(1.5));
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!(
            DefuzzificationMethod::from_str("centroid"),
            Some(DefuzzificationMethod::Centroid)
        );
        assert_eq!(
            DefuzzificationMethod::from_str("MOM"),
            Some(DefuzzificationMethod::MeanOfMaximum)
        );
        assert_eq!(DefuzzificationMethod::from_str("lom"), None);
    }
}
