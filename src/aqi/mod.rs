//! Air-quality domain layer
//!
//! Concrete variables, the ten-rule rule base and the [`AirQualityAssessor`]
//! facade built on the generic [`crate::fuzzy`] engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_aqi::aqi::AirQualityAssessor;
//!
//! let assessor = AirQualityAssessor::new()?;
//! let result = assessor.assess(1.0, 30.0, 200.0, None, None)?;
//! println!("{:.1} ({})", result.fuzzy_aqi, result.category);
//! ```

mod assessor;
mod category;
pub mod rules;
pub mod variables;

pub use assessor::{
    AirQualityAssessor, AssessmentInputs, AssessmentResult, DEFAULT_COMPARISON_SEED,
    DEFAULT_CURVE_POINTS, DEFAULT_HUMIDITY, DEFAULT_TEMPERATURE,
};
pub use category::{AqiCategory, BAND_UPPER_BOUNDS};
