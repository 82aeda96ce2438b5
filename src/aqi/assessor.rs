//! Air-quality assessment facade
//!
//! [`AirQualityAssessor`] owns the standard fuzzy system and exposes the
//! caller-facing operations: single assessments, membership curves and
//! batch comparison against the crisp baseline.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::compare::{self, ComparisonOptions, ComparisonReport, Sample, SampleRecord};
use crate::config::AqiConfig;
use crate::dataset::Dataset;
use crate::error::AqiResult;
use crate::fuzzy::{
    FuzzySystem, InferenceOptions, MembershipCurve, RuleActivation, TermDegrees,
};

use super::category::AqiCategory;
use super::rules::standard_rules;
use super::variables::{self, CO, HUMIDITY, NO2, O3, TEMPERATURE};

pub const DEFAULT_TEMPERATURE: f64 = 20.0;
pub const DEFAULT_HUMIDITY: f64 = 50.0;
pub const DEFAULT_CURVE_POINTS: usize = 50;
pub const DEFAULT_COMPARISON_SEED: u64 = 42;

/// Readings used for one assessment, after defaults were applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssessmentInputs {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub temperature: f64,
    pub humidity: f64,
}

/// Outcome of one assessment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResult {
    /// Defuzzified AQI on `[0, 500]`
    pub fuzzy_aqi: f64,
    pub category: AqiCategory,
    /// Crisp baseline for the same readings
    pub crisp_aqi: f64,
    pub confidence: f64,
    /// No rule fired and the universe midpoint was returned
    pub fallback_used: bool,
    /// Term degrees for the variables that expose diagnostics
    pub memberships: IndexMap<String, TermDegrees>,
    /// Every rule in rule-base order
    pub activations: Vec<RuleActivation>,
    pub inputs: AssessmentInputs,
}

/// Standard air-quality engine
#[derive(Debug, Clone)]
pub struct AirQualityAssessor {
    system: FuzzySystem,
    comparison: ComparisonOptions,
    seed: u64,
}

impl AirQualityAssessor {
    /// Standard variables and rules with default options
    pub fn new() -> AqiResult<Self> {
        Self::with_options(InferenceOptions::default(), ComparisonOptions::default())
    }

    pub fn with_options(
        inference: InferenceOptions,
        comparison: ComparisonOptions,
    ) -> AqiResult<Self> {
        let system = FuzzySystem::builder()
            .options(inference)
            .output(variables::aqi()?)
            .rules(standard_rules());
        let system = variables::inputs()?
            .into_iter()
            .fold(system, |builder, variable| builder.input(variable))
            .build()?;

        Ok(Self {
            system,
            comparison,
            seed: DEFAULT_COMPARISON_SEED,
        })
    }

    pub fn from_config(config: &AqiConfig) -> AqiResult<Self> {
        Ok(Self::with_options(config.inference_options(), config.comparison_options())?
            .with_seed(config.comparison.seed))
    }

    /// Seed used by [`compare_dataset`](Self::compare_dataset)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    pub fn comparison_options(&self) -> &ComparisonOptions {
        &self.comparison
    }

    /// Assess one set of readings
    ///
    /// Missing temperature and humidity default to 20.0 and 50.0. Every
    /// input is supplied, so the only way this fails is a non-standard
    /// system; the standard one never does.
    pub fn assess(
        &self,
        co: f64,
        no2: f64,
        o3: f64,
        temperature: Option<f64>,
        humidity: Option<f64>,
    ) -> AqiResult<AssessmentResult> {
        let inputs = AssessmentInputs {
            co,
            no2,
            o3,
            temperature: temperature.unwrap_or(DEFAULT_TEMPERATURE),
            humidity: humidity.unwrap_or(DEFAULT_HUMIDITY),
        };

        let outcome = self.system.infer([
            (CO, inputs.co),
            (NO2, inputs.no2),
            (O3, inputs.o3),
            (TEMPERATURE, inputs.temperature),
            (HUMIDITY, inputs.humidity),
        ])?;

        let memberships = outcome
            .memberships
            .into_iter()
            .filter(|(name, _)| {
                self.system
                    .input(name)
                    .map(|v| v.exposes_diagnostics())
                    .unwrap_or(false)
            })
            .collect();

        let result = AssessmentResult {
            fuzzy_aqi: outcome.value,
            category: AqiCategory::from_aqi(outcome.value),
            crisp_aqi: self.comparison.baseline.score(co, no2, o3),
            confidence: outcome.confidence,
            fallback_used: outcome.fallback_used,
            memberships,
            activations: outcome.activations,
            inputs,
        };
        debug!(
            aqi = result.fuzzy_aqi,
            category = %result.category,
            crisp = result.crisp_aqi,
            "assessment"
        );
        Ok(result)
    }

    fn fuzzy_aqi(&self, sample: &Sample) -> f64 {
        match self.assess(
            sample.co,
            sample.no2,
            sample.o3,
            Some(sample.temperature),
            Some(sample.humidity),
        ) {
            Ok(result) => result.fuzzy_aqi,
            Err(_) => self.system.output().universe().midpoint(),
        }
    }

    /// Sampled membership curves for every input and the output variable
    pub fn membership_curves(&self, n_points: usize) -> IndexMap<String, MembershipCurve> {
        self.system
            .inputs()
            .chain(std::iter::once(self.system.output()))
            .map(|v| (v.name().to_string(), v.sample_curve(n_points)))
            .collect()
    }

    /// Compare fuzzy and crisp predictions over `records`
    pub fn compare(&self, records: &[SampleRecord]) -> ComparisonReport {
        compare::compare(records, &self.comparison, |sample| self.fuzzy_aqi(sample))
    }

    /// Compare over up to `sample_count` rows drawn from `dataset`
    pub fn compare_dataset(&self, dataset: &Dataset, sample_count: usize) -> ComparisonReport {
        let records = dataset.sample(sample_count, self.seed);
        self.compare(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineMethod;

    fn assessor() -> AirQualityAssessor {
        AirQualityAssessor::new().unwrap()
    }

    #[test]
    fn test_clean_air_is_good() {
        let result = assessor().assess(1.0, 30.0, 200.0, None, None).unwrap();
        assert_eq!(result.category, AqiCategory::Good);
        assert!(result.fuzzy_aqi <= 50.0);
        assert!(!result.fallback_used);
        assert_eq!(result.inputs.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(result.inputs.humidity, DEFAULT_HUMIDITY);
    }

    #[test]
    fn test_extreme_pollution_is_hazardous() {
        let result = assessor().assess(15.0, 380.0, 2900.0, None, None).unwrap();
        assert_eq!(result.category, AqiCategory::Hazardous);
        assert!(result.confidence > 0.6);

        let full_strength = result
            .activations
            .iter()
            .filter(|a| a.consequent == "Hazardous" && a.strength == 1.0)
            .count();
        assert!(full_strength >= 2);
    }

    #[test]
    fn test_assess_is_bit_identical() {
        let a = assessor();
        let first = a.assess(4.2, 145.0, 1337.0, Some(31.0), Some(72.0)).unwrap();
        let second = a.assess(4.2, 145.0, 1337.0, Some(31.0), Some(72.0)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.fuzzy_aqi.to_bits(), second.fuzzy_aqi.to_bits());
    }

    #[test]
    fn test_dominant_co_is_monotonic() {
        let a = assessor();
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=16 {
            let co = 12.0 + step as f64 * 0.5;
            let aqi = a.assess(co, 30.0, 200.0, None, None).unwrap().fuzzy_aqi;
            assert!(aqi + 1e-9 >= previous, "AQI fell at CO={}: {} < {}", co, aqi, previous);
            previous = aqi;
        }
    }

    #[test]
    fn test_diagnostics_exclude_weather() {
        let result = assessor().assess(3.0, 90.0, 900.0, Some(35.0), Some(90.0)).unwrap();
        let names: Vec<&str> = result.memberships.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["CO", "NO2", "O3"]);
        assert_eq!(result.activations.len(), 10);
    }

    #[test]
    fn test_out_of_range_readings_are_total() {
        let a = assessor();
        let result = a.assess(-5.0, 9000.0, 1e9, Some(-80.0), Some(150.0)).unwrap();
        assert!(result.fuzzy_aqi.is_finite());
        let nan = a.assess(f64::NAN, 10.0, 10.0, None, None).unwrap();
        assert!(nan.fuzzy_aqi.is_finite());
    }

    #[test]
    fn test_crisp_follows_baseline() {
        let peak = AirQualityAssessor::with_options(
            InferenceOptions::default(),
            ComparisonOptions {
                baseline: BaselineMethod::PeakNormalized,
                ..ComparisonOptions::default()
            },
        )
        .unwrap();
        let result = peak.assess(10.0, 40.0, 300.0, None, None).unwrap();
        assert!((result.crisp_aqi - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_membership_curves() {
        let curves = assessor().membership_curves(DEFAULT_CURVE_POINTS);
        let names: Vec<&str> = curves.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["CO", "NO2", "O3", "Temperature", "Humidity", "AQI"]);
        for curve in curves.values() {
            assert_eq!(curve.universe.len(), DEFAULT_CURVE_POINTS);
            for ys in curve.terms.values() {
                assert!(ys.iter().all(|y| (0.0..=1.0).contains(y)));
            }
        }
        assert_eq!(curves["O3"].universe[0], 0.0);
        assert_eq!(*curves["O3"].universe.last().unwrap(), 3000.0);
    }

    #[test]
    fn test_compare_zero_samples() {
        let a = assessor();
        let data = Dataset::synthetic(20, 1).unwrap();
        let report = a.compare_dataset(&data, 0);
        assert!(report.predictions.is_empty());
        assert_eq!(report.metrics, compare::MetricsReport::default());
    }

    #[test]
    fn test_compare_dataset() {
        let a = assessor();
        let data = Dataset::synthetic(300, 42).unwrap();
        let report = a.compare_dataset(&data, 100);
        assert_eq!(report.sample_size, 100);
        assert_eq!(report.predictions.fuzzy.len(), 100);
        assert!(report.metrics.fuzzy.mae >= 0.0);
        assert!((0.0..=1.0).contains(&report.metrics.fuzzy.accuracy));
        assert!((0.0..=1.0).contains(&report.metrics.crisp.f1_score));

        // Same seed, same draw
        assert_eq!(a.compare_dataset(&data, 100), report);
    }
}
