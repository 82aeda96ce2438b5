//! Fuzzy vs crisp comparison over a batch of samples
//!
//! For every valid record three numbers are produced, index-aligned:
//!
//! - the fuzzy prediction (supplied by the caller as a closure)
//! - the crisp baseline ([`BaselineMethod`])
//! - the weighted ground truth ([`baseline::ground_truth`])
//!
//! Records with a missing or non-finite field are skipped and counted; the
//! batch always completes.
//!
//! With `parallel` enabled the batch is spread over rayon's thread pool.
//! Results are collected in source order either way.

pub mod metrics;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::baseline::{self, BaselineMethod};
use crate::error::{AqiError, AqiResult};

pub use metrics::{MethodMetrics, MetricsReport, DEFAULT_SATISFACTION_TOLERANCE};

/// One dataset row; any field may be absent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleRecord {
    #[serde(rename = "CO")]
    pub co: Option<f64>,
    #[serde(rename = "NO2")]
    pub no2: Option<f64>,
    #[serde(rename = "O3_Sensor")]
    pub o3: Option<f64>,
    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,
    #[serde(rename = "Humidity")]
    pub humidity: Option<f64>,
}

impl SampleRecord {
    pub fn new(co: f64, no2: f64, o3: f64, temperature: f64, humidity: f64) -> Self {
        Self {
            co: Some(co),
            no2: Some(no2),
            o3: Some(o3),
            temperature: Some(temperature),
            humidity: Some(humidity),
        }
    }

    /// Column values in `(name, value)` form, dataset order
    pub fn fields(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("CO", self.co),
            ("NO2", self.no2),
            ("O3_Sensor", self.o3),
            ("Temperature", self.temperature),
            ("Humidity", self.humidity),
        ]
    }

    /// Check every field is present and finite
    pub fn validate(&self) -> AqiResult<Sample> {
        let mut values = [0.0; 5];
        for (slot, (name, value)) in values.iter_mut().zip(self.fields()) {
            let value = value.ok_or_else(|| AqiError::missing_field(name))?;
            if !value.is_finite() {
                return Err(AqiError::non_finite(name, value));
            }
            *slot = value;
        }
        let [co, no2, o3, temperature, humidity] = values;
        Ok(Sample {
            co,
            no2,
            o3,
            temperature,
            humidity,
        })
    }
}

/// A fully populated, finite record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub temperature: f64,
    pub humidity: f64,
}

/// Comparison tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOptions {
    pub baseline: BaselineMethod,
    pub satisfaction_tolerance: f64,
    pub parallel: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            baseline: BaselineMethod::Banded,
            satisfaction_tolerance: DEFAULT_SATISFACTION_TOLERANCE,
            parallel: true,
        }
    }
}

/// Index-aligned prediction series
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Predictions {
    pub fuzzy: Vec<f64>,
    pub crisp: Vec<f64>,
    pub ground_truth: Vec<f64>,
}

impl Predictions {
    pub fn len(&self) -> usize {
        self.ground_truth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ground_truth.is_empty()
    }
}

/// Result of one comparison run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub predictions: Predictions,
    pub metrics: MetricsReport,
    /// Samples that produced predictions
    pub sample_size: usize,
    /// Records rejected as invalid
    pub skipped: usize,
    /// Samples with non-zero ground truth
    pub satisfaction_eligible: usize,
    pub baseline: BaselineMethod,
}

/// Run both methods over `records`
///
/// `fuzzy` maps a valid sample to the fuzzy AQI.
pub fn compare<F>(
    records: &[SampleRecord],
    options: &ComparisonOptions,
    fuzzy: F,
) -> ComparisonReport
where
    F: Fn(&Sample) -> f64 + Sync,
{
    let evaluate = |record: &SampleRecord| -> AqiResult<(f64, f64, f64)> {
        let sample = record.validate()?;
        Ok((
            fuzzy(&sample),
            options.baseline.score(sample.co, sample.no2, sample.o3),
            baseline::ground_truth(sample.co, sample.no2, sample.o3),
        ))
    };

    let results: Vec<AqiResult<(f64, f64, f64)>> = if options.parallel {
        records.par_iter().map(evaluate).collect()
    } else {
        records.iter().map(evaluate).collect()
    };

    let mut predictions = Predictions::default();
    let mut skipped = 0;
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok((f, c, g)) => {
                predictions.fuzzy.push(f);
                predictions.crisp.push(c);
                predictions.ground_truth.push(g);
            }
            Err(e) => {
                warn!(record = index, code = e.code.code(), "skipping sample: {}", e.message);
                skipped += 1;
            }
        }
    }

    if predictions.is_empty() {
        info!(skipped, "comparison produced no predictions");
        return ComparisonReport {
            skipped,
            baseline: options.baseline,
            ..ComparisonReport::default()
        };
    }

    let tolerance = options.satisfaction_tolerance;
    let metrics = MetricsReport {
        fuzzy: MethodMetrics::compute(&predictions.fuzzy, &predictions.ground_truth, tolerance),
        crisp: MethodMetrics::compute(&predictions.crisp, &predictions.ground_truth, tolerance),
    };

    info!(
        samples = predictions.len(),
        skipped,
        fuzzy_mae = metrics.fuzzy.mae,
        crisp_mae = metrics.crisp.mae,
        "comparison complete"
    );

    ComparisonReport {
        sample_size: predictions.len(),
        satisfaction_eligible: self::metrics::satisfaction_eligible(&predictions.ground_truth),
        predictions,
        metrics,
        skipped,
        baseline: options.baseline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn records() -> Vec<SampleRecord> {
        vec![
            SampleRecord::new(1.0, 30.0, 200.0, 20.0, 50.0),
            SampleRecord::new(8.0, 180.0, 1200.0, 28.0, 70.0),
            SampleRecord::new(15.0, 380.0, 2900.0, 36.0, 80.0),
            SampleRecord::new(0.0, 0.0, 0.0, 20.0, 50.0),
        ]
    }

    #[test]
    fn test_validate_reports_field() {
        let mut record = SampleRecord::new(1.0, 2.0, 3.0, 4.0, 5.0);
        assert!(record.validate().is_ok());

        record.no2 = None;
        let err = record.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingField);
        assert_eq!(err.context_field("field"), Some("NO2"));

        record.no2 = Some(f64::NAN);
        assert_eq!(record.validate().unwrap_err().code, ErrorCode::NonFiniteValue);
    }

    #[test]
    fn test_series_are_aligned() {
        let options = ComparisonOptions {
            parallel: false,
            ..ComparisonOptions::default()
        };
        let report = compare(&records(), &options, |s| s.co * 10.0);
        assert_eq!(report.sample_size, 4);
        assert_eq!(report.predictions.fuzzy, vec![10.0, 80.0, 150.0, 0.0]);
        assert_eq!(report.predictions.crisp.len(), 4);
        assert_eq!(report.predictions.ground_truth[3], 0.0);
        assert_eq!(report.satisfaction_eligible, 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let many: Vec<SampleRecord> = (0..200)
            .map(|i| SampleRecord::new(i as f64 * 0.1, i as f64, i as f64 * 10.0, 20.0, 50.0))
            .collect();
        let sequential = ComparisonOptions {
            parallel: false,
            ..ComparisonOptions::default()
        };
        let parallel = ComparisonOptions::default();
        let predict = |s: &Sample| s.no2 * 1.1;
        assert_eq!(
            compare(&many, &sequential, predict),
            compare(&many, &parallel, predict)
        );
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let mut batch = records();
        batch.insert(1, SampleRecord::default());
        batch.push(SampleRecord {
            co: Some(f64::INFINITY),
            ..SampleRecord::new(1.0, 1.0, 1.0, 1.0, 1.0)
        });
        let report = compare(&batch, &ComparisonOptions::default(), |_| 100.0);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.sample_size, 4);
        assert_eq!(report.predictions.fuzzy.len(), 4);
    }

    #[test]
    fn test_empty_batch_gives_default_report() {
        let report = compare(&[], &ComparisonOptions::default(), |_| 0.0);
        assert!(report.predictions.is_empty());
        assert_eq!(report.metrics, MetricsReport::default());
        assert_eq!(report.sample_size, 0);

        let all_bad = [SampleRecord::default(); 3];
        let report = compare(&all_bad, &ComparisonOptions::default(), |_| 0.0);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.metrics, MetricsReport::default());
    }

    #[test]
    fn test_baseline_is_used_for_crisp_series() {
        let options = ComparisonOptions {
            baseline: BaselineMethod::PeakNormalized,
            parallel: false,
            ..ComparisonOptions::default()
        };
        let report = compare(&records()[2..3], &options, |_| 0.0);
        let expected = BaselineMethod::PeakNormalized.score(15.0, 380.0, 2900.0);
        assert_eq!(report.predictions.crisp, vec![expected]);
        assert_eq!(report.baseline, BaselineMethod::PeakNormalized);
    }
}
