//! Crisp reference calculators
//!
//! Two step/linear scoring functions that share nothing with the fuzzy
//! membership functions:
//!
//! - [`BaselineMethod::Banded`]: points per pollutant band, inverted and
//!   rescaled to the AQI range
//! - [`BaselineMethod::PeakNormalized`]: the worst pollutant, linearly
//!   rescaled over its typical range
//!
//! plus the weighted [`ground_truth`] reference that both predictors are
//! scored against.
//!
//! All thresholds and weights are calibration constants.

use serde::{Deserialize, Serialize};

// ============================================================================
// Calibration constants
// ============================================================================

/// Top of the AQI scale
pub const AQI_MAX: f64 = 500.0;

/// Divisor applied to the O3 sensor reading before banding
pub const O3_SENSOR_SCALE: f64 = 10.0;

/// Typical full-scale ranges used for linear normalization
pub const CO_RANGE: f64 = 20.0;
pub const NO2_RANGE: f64 = 400.0;
pub const O3_RANGE: f64 = 3000.0;

/// Ground-truth weights for CO, NO2 and O3
pub const CO_WEIGHT: f64 = 0.4;
pub const NO2_WEIGHT: f64 = 0.3;
pub const O3_WEIGHT: f64 = 0.3;

/// `(exclusive upper bound, points)` per band; readings past the last band score 0
pub const CO_BANDS: [(f64, f64); 4] = [(1.0, 40.0), (3.0, 30.0), (5.0, 20.0), (7.0, 10.0)];
pub const NO2_BANDS: [(f64, f64); 4] = [(50.0, 35.0), (100.0, 25.0), (150.0, 15.0), (200.0, 5.0)];
pub const O3_BANDS: [(f64, f64); 3] = [(50.0, 25.0), (100.0, 15.0), (150.0, 5.0)];

/// Maximum band score (all pollutants in their cleanest band)
pub const MAX_SCORE: f64 = 100.0;

// ============================================================================
// Baselines
// ============================================================================

/// Crisp method used as the comparison baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMethod {
    #[default]
    Banded,
    #[serde(alias = "peak")]
    PeakNormalized,
}

impl BaselineMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaselineMethod::Banded => "banded",
            BaselineMethod::PeakNormalized => "peak",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "banded" | "band" | "crisp" => Some(BaselineMethod::Banded),
            "peak" | "peak_normalized" | "peak-normalized" | "epa" => {
                Some(BaselineMethod::PeakNormalized)
            }
            _ => None,
        }
    }

    /// Score raw readings (O3 as the raw sensor value)
    pub fn score(&self, co: f64, no2: f64, o3: f64) -> f64 {
        match self {
            BaselineMethod::Banded => banded_aqi(co, no2, o3),
            BaselineMethod::PeakNormalized => peak_normalized_aqi(co, no2, o3),
        }
    }
}

fn band_points(value: f64, bands: &[(f64, f64)]) -> f64 {
    bands
        .iter()
        .find(|(upper, _)| value < *upper)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

/// Band score in `[0, MAX_SCORE]`; higher means cleaner air
pub fn band_score(co: f64, no2: f64, o3_scaled: f64) -> f64 {
    band_points(co, &CO_BANDS) + band_points(no2, &NO2_BANDS) + band_points(o3_scaled, &O3_BANDS)
}

/// Banded crisp AQI on `[0, AQI_MAX]`
///
/// `o3` is the raw sensor reading; it is divided by [`O3_SENSOR_SCALE`]
/// before banding.
pub fn banded_aqi(co: f64, no2: f64, o3: f64) -> f64 {
    let score = band_score(co, no2, o3 / O3_SENSOR_SCALE);
    let inverted = (MAX_SCORE - score).clamp(0.0, MAX_SCORE);
    inverted * (AQI_MAX / MAX_SCORE)
}

fn normalize(value: f64, range: f64) -> f64 {
    (value / range * AQI_MAX).min(AQI_MAX)
}

/// Worst pollutant, each rescaled to `[0, AQI_MAX]` over its typical range
pub fn peak_normalized_aqi(co: f64, no2: f64, o3: f64) -> f64 {
    let clamp = |v: f64| v.clamp(0.0, AQI_MAX);
    clamp(normalize(co, CO_RANGE))
        .max(clamp(normalize(no2, NO2_RANGE)))
        .max(clamp(normalize(o3, O3_RANGE)))
}

/// Weighted reference AQI, independent of both predictors
pub fn ground_truth(co: f64, no2: f64, o3: f64) -> f64 {
    let weighted = CO_WEIGHT * normalize(co, CO_RANGE)
        + NO2_WEIGHT * normalize(no2, NO2_RANGE)
        + O3_WEIGHT * normalize(o3, O3_RANGE);
    weighted.min(AQI_MAX)
}
