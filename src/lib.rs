//! fuzzy-aqi - Fuzzy Air Quality Index
//!
//! A Mamdani fuzzy-inference engine that turns pollutant readings into an
//! Air Quality Index, next to a crisp threshold baseline it is measured
//! against.
//!
//! # Architecture
//!
//! - [`fuzzy`] - Generic engine: membership functions, linguistic variables,
//!   rule trees and the inference pipeline
//! - [`aqi`] - The air-quality variables, the standard rule base and the
//!   [`AirQualityAssessor`] facade
//! - [`baseline`] - Crisp band and peak-normalized AQI calculators
//! - [`compare`] - Batch comparison and accuracy metrics
//! - [`dataset`] - UCI CSV loader, synthetic generator and statistics
//! - [`config`] - TOML configuration with environment overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_aqi::{AirQualityAssessor, Dataset};
//!
//! let assessor = AirQualityAssessor::new()?;
//!
//! let result = assessor.assess(15.0, 380.0, 2900.0, None, None)?;
//! assert_eq!(result.category.as_str(), "Hazardous");
//!
//! let data = Dataset::synthetic(5000, 42)?;
//! let report = assessor.compare_dataset(&data, 100);
//! println!("fuzzy MAE {:.2}, crisp MAE {:.2}",
//!     report.metrics.fuzzy.mae, report.metrics.crisp.mae);
//! ```

pub mod aqi;
pub mod baseline;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fuzzy;

// Re-export the assessor surface
pub use aqi::{AirQualityAssessor, AqiCategory, AssessmentInputs, AssessmentResult};

// Re-export engine types
pub use fuzzy::{
    DefuzzificationMethod, FuzzyRule, FuzzySystem, InferenceOptions, InferenceOutcome,
    LinguisticVariable, MembershipCurve, MembershipFunction, Universe,
};

// Re-export comparison and data types
pub use baseline::BaselineMethod;
pub use compare::{ComparisonOptions, ComparisonReport, MetricsReport, SampleRecord};
pub use dataset::{ColumnStats, Dataset, DatasetError, DatasetSource};

// Re-export configuration and errors
pub use config::{AqiConfig, ConfigError, LogLevel, OutputFormat};
pub use error::{AqiError, AqiResult, ErrorCode};
