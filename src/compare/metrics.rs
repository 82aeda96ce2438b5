//! Error and classification metrics over aligned prediction series
//!
//! Every function takes `predicted` and `truth` slices of equal length and
//! returns 0.0 for empty input.

use serde::{Deserialize, Serialize};

use crate::aqi::AqiCategory;

/// Default relative-error tolerance for the satisfaction rate
pub const DEFAULT_SATISFACTION_TOLERANCE: f64 = 0.20;

/// Number of AQI bands used for categorical metrics
const BANDS: usize = AqiCategory::ALL.len();

/// Metrics of one prediction series against ground truth
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub accuracy: f64,
    pub f1_score: f64,
    pub satisfaction: f64,
}

impl MethodMetrics {
    pub fn compute(predicted: &[f64], truth: &[f64], tolerance: f64) -> Self {
        Self {
            mae: mae(predicted, truth),
            rmse: rmse(predicted, truth),
            accuracy: accuracy(predicted, truth),
            f1_score: weighted_f1(predicted, truth),
            satisfaction: satisfaction(predicted, truth, tolerance),
        }
    }
}

/// Metrics for both methods
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsReport {
    pub fuzzy: MethodMetrics,
    pub crisp: MethodMetrics,
}

/// Mean absolute error
pub fn mae(predicted: &[f64], truth: &[f64]) -> f64 {
    mean(predicted.iter().zip(truth).map(|(p, t)| (p - t).abs()))
}

/// Root mean squared error
pub fn rmse(predicted: &[f64], truth: &[f64]) -> f64 {
    mean(predicted.iter().zip(truth).map(|(p, t)| (p - t).powi(2))).sqrt()
}

/// Fraction of samples whose AQI band matches the true band
pub fn accuracy(predicted: &[f64], truth: &[f64]) -> f64 {
    mean(
        predicted
            .iter()
            .zip(truth)
            .map(|(&p, &t)| bool_to_f64(AqiCategory::band_index(p) == AqiCategory::band_index(t))),
    )
}

/// F1 per AQI band, weighted by the band's support in `truth`
///
/// Bands that only occur in `predicted` contribute with weight 0; a band
/// whose precision and recall are both 0 scores 0.
pub fn weighted_f1(predicted: &[f64], truth: &[f64]) -> f64 {
    let n = predicted.len().min(truth.len());
    if n == 0 {
        return 0.0;
    }

    let mut tp = [0usize; BANDS];
    let mut fp = [0usize; BANDS];
    let mut fn_ = [0usize; BANDS];
    for (&p, &t) in predicted.iter().zip(truth) {
        let p = AqiCategory::band_index(p);
        let t = AqiCategory::band_index(t);
        if p == t {
            tp[t] += 1;
        } else {
            fp[p] += 1;
            fn_[t] += 1;
        }
    }

    let mut weighted = 0.0;
    for band in 0..BANDS {
        let support = tp[band] + fn_[band];
        if support == 0 {
            continue;
        }
        let precision = ratio(tp[band], tp[band] + fp[band]);
        let recall = ratio(tp[band], support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        weighted += f1 * support as f64;
    }
    weighted / n as f64
}

/// Fraction of samples with `|pred - truth| / |truth| <= tolerance`
///
/// Samples with zero truth are excluded; 0.0 when none remain.
pub fn satisfaction(predicted: &[f64], truth: &[f64], tolerance: f64) -> f64 {
    mean(
        predicted
            .iter()
            .zip(truth)
            .filter(|&(_, &t)| t != 0.0)
            .map(|(&p, &t)| bool_to_f64((p - t).abs() / t.abs() <= tolerance)),
    )
}

/// Samples that count towards [`satisfaction`]
pub fn satisfaction_eligible(truth: &[f64]) -> usize {
    truth.iter().filter(|&&t| t != 0.0).count()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metrics() {
        let predicted = [10.0, 20.0, 30.0, 40.0];
        let truth = [12.0, 18.0, 30.0, 44.0];
        assert!((mae(&predicted, &truth) - 2.0).abs() < 1e-12);
        // (4 + 4 + 0 + 16) / 4 = 6
        assert!((rmse(&predicted, &truth) - 6.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(mae(&[], &[]), 0.0);
        assert_eq!(rmse(&[], &[]), 0.0);
        assert_eq!(accuracy(&[], &[]), 0.0);
        assert_eq!(weighted_f1(&[], &[]), 0.0);
        assert_eq!(satisfaction(&[], &[], 0.2), 0.0);
        assert_eq!(MethodMetrics::compute(&[], &[], 0.2), MethodMetrics::default());
    }

    #[test]
    fn test_accuracy_uses_bands() {
        // 40 and 45 share "Good"; 60 vs 160 do not
        let predicted = [40.0, 60.0];
        let truth = [45.0, 160.0];
        assert!((accuracy(&predicted, &truth) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_f1_perfect() {
        let series = [10.0, 75.0, 120.0, 420.0];
        assert!((weighted_f1(&series, &series) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_f1_hand_computed() {
        // truth bands:     0, 0, 1, 1
        // predicted bands: 0, 1, 1, 5
        let truth = [10.0, 20.0, 60.0, 70.0];
        let predicted = [15.0, 80.0, 90.0, 400.0];
        // band 0: p=1, r=0.5 -> f1=2/3, support 2
        // band 1: p=0.5, r=0.5 -> f1=0.5, support 2
        // band 5: support 0 -> weight 0
        let expected = (2.0 / 3.0 * 2.0 + 0.5 * 2.0) / 4.0;
        assert!((weighted_f1(&predicted, &truth) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_f1_all_wrong() {
        let truth = [10.0, 20.0];
        let predicted = [400.0, 450.0];
        assert_eq!(weighted_f1(&predicted, &truth), 0.0);
    }

    #[test]
    fn test_satisfaction_excludes_zero_truth() {
        let predicted = [100.0, 50.0, 10.0];
        let truth = [110.0, 0.0, 20.0];
        // 100 vs 110: 9% ok; 10 vs 20: 50% fail; zero truth ignored
        assert!((satisfaction(&predicted, &truth, 0.2) - 0.5).abs() < 1e-12);
        assert_eq!(satisfaction_eligible(&truth), 2);
        assert_eq!(satisfaction(&[5.0], &[0.0], 0.2), 0.0);
    }
}
