//! Configuration System for fuzzy-aqi
//!
//! Provides a flexible configuration system supporting:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple config file locations
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./fuzzy-aqi.toml` - Project-local configuration
//! 2. `~/.config/fuzzy-aqi/config.toml` - User configuration (XDG)
//! 3. `~/.fuzzy-aqi/config.toml` - User configuration (legacy)
//! 4. `/etc/fuzzy-aqi/config.toml` - System-wide configuration
//!
//! # Environment Variables
//!
//! - `AQI_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `AQI_FORMAT` - Output format (text, json)
//! - `AQI_DEFUZZ` - Defuzzification method (centroid, bisector, mom)
//! - `AQI_FALLBACK_CONFIDENCE` - Confidence reported when no rule fires
//! - `AQI_CURVE_POINTS` - Points per membership curve
//! - `AQI_SAMPLES` - Default comparison sample count
//! - `AQI_SEED` - Comparison sampling seed
//! - `AQI_PARALLEL` - Parallel batch comparison (true/false)
//! - `AQI_BASELINE` - Crisp baseline (banded, peak)
//! - `AQI_DATASET` - Path to a UCI Air Quality CSV
//!
//! # Example Configuration
//!
//! ```toml
//! # fuzzy-aqi.toml
//!
//! [general]
//! log_level = "normal"
//! format = "text"
//!
//! [inference]
//! defuzzification = "centroid"
//! fallback_confidence = 0.1
//! curve_points = 50
//!
//! [comparison]
//! sample_count = 100
//! seed = 42
//! parallel = true
//! baseline = "banded"
//! satisfaction_tolerance = 0.2
//!
//! [dataset]
//! path = "AirQualityUCI.csv"
//! synthetic_samples = 5000
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aqi::{DEFAULT_COMPARISON_SEED, DEFAULT_CURVE_POINTS};
use crate::baseline::BaselineMethod;
use crate::compare::{ComparisonOptions, DEFAULT_SATISFACTION_TOLERANCE};
use crate::dataset::DEFAULT_SYNTHETIC_SAMPLES;
use crate::error::{AqiError, ErrorCode};
use crate::fuzzy::{DefuzzificationMethod, InferenceOptions, DEFAULT_FALLBACK_CONFIDENCE};

/// Project-local configuration file name
pub const CONFIG_FILE_NAME: &str = "fuzzy-aqi.toml";

// ============================================================================
// Configuration Schema
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AqiConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Inference engine settings
    pub inference: InferenceConfig,
    /// Batch comparison settings
    pub comparison: ComparisonConfig,
    /// Dataset source settings
    pub dataset: DatasetConfig,
}

/// General configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logging level
    pub log_level: LogLevel,
    /// Output format for the CLI
    pub format: OutputFormat,
}

/// Inference configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub defuzzification: DefuzzificationMethod,
    /// Confidence reported when no rule fires, in [0, 1]
    pub fallback_confidence: f64,
    /// Points per variable for membership curves
    pub curve_points: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            defuzzification: DefuzzificationMethod::Centroid,
            fallback_confidence: DEFAULT_FALLBACK_CONFIDENCE,
            curve_points: DEFAULT_CURVE_POINTS,
        }
    }
}

/// Comparison configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Rows drawn per comparison
    pub sample_count: usize,
    /// Seed for drawing rows
    pub seed: u64,
    /// Spread the batch over a thread pool
    pub parallel: bool,
    pub baseline: BaselineMethod,
    /// Relative error counted as satisfactory
    pub satisfaction_tolerance: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            sample_count: 100,
            seed: DEFAULT_COMPARISON_SEED,
            parallel: true,
            baseline: BaselineMethod::Banded,
            satisfaction_tolerance: DEFAULT_SATISFACTION_TOLERANCE,
        }
    }
}

/// Dataset configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// UCI CSV to load; synthetic data is used when unset or unreadable
    pub path: Option<PathBuf>,
    /// Rows generated for the synthetic fallback
    pub synthetic_samples: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: None,
            synthetic_samples: DEFAULT_SYNTHETIC_SAMPLES,
        }
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiet" | "q" | "0" => Some(LogLevel::Quiet),
            "normal" | "n" | "1" => Some(LogLevel::Normal),
            "verbose" | "v" | "2" => Some(LogLevel::Verbose),
            "debug" | "d" | "3" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Matching `tracing` level filter
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Quiet => tracing::Level::ERROR,
            LogLevel::Normal => tracing::Level::INFO,
            LogLevel::Verbose => tracing::Level::DEBUG,
            LogLevel::Debug => tracing::Level::TRACE,
        }
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

// ============================================================================
// Configuration Loading
// ============================================================================

impl AqiConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from default locations
    ///
    /// Searches for config files in order:
    /// 1. ./fuzzy-aqi.toml
    /// 2. ~/.config/fuzzy-aqi/config.toml
    /// 3. ~/.fuzzy-aqi/config.toml
    /// 4. /etc/fuzzy-aqi/config.toml
    ///
    /// Then applies environment variable overrides and validates.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for path in Self::config_paths() {
            if path.exists() {
                config = Self::load_from_file(&path)?;
                break;
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        let config: AqiConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        let config: AqiConfig = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<string>"), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the list of config file search paths
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".").join(CONFIG_FILE_NAME)];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("fuzzy-aqi").join("config.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".fuzzy-aqi").join("config.toml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/fuzzy-aqi/config.toml"));

        paths
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any `AQI_*` lookup; unparsable values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("AQI_LOG_LEVEL").and_then(|v| LogLevel::from_str(&v)) {
            self.general.log_level = level;
        }

        if let Some(format) = lookup("AQI_FORMAT").and_then(|v| OutputFormat::from_str(&v)) {
            self.general.format = format;
        }

        if let Some(method) =
            lookup("AQI_DEFUZZ").and_then(|v| DefuzzificationMethod::from_str(&v))
        {
            self.inference.defuzzification = method;
        }

        if let Some(conf) = lookup("AQI_FALLBACK_CONFIDENCE").and_then(|v| v.parse().ok()) {
            self.inference.fallback_confidence = conf;
        }

        if let Some(points) = lookup("AQI_CURVE_POINTS").and_then(|v| v.parse().ok()) {
            self.inference.curve_points = points;
        }

        if let Some(samples) = lookup("AQI_SAMPLES").and_then(|v| v.parse().ok()) {
            self.comparison.sample_count = samples;
        }

        if let Some(seed) = lookup("AQI_SEED").and_then(|v| v.parse().ok()) {
            self.comparison.seed = seed;
        }

        if let Some(val) = lookup("AQI_PARALLEL") {
            self.comparison.parallel = parse_bool(&val);
        }

        if let Some(baseline) = lookup("AQI_BASELINE").and_then(|v| BaselineMethod::from_str(&v)) {
            self.comparison.baseline = baseline;
        }

        if let Some(path) = lookup("AQI_DATASET") {
            self.dataset.path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let conf = self.inference.fallback_confidence;
        if !(0.0..=1.0).contains(&conf) {
            return Err(ConfigError::InvalidValue {
                key: "inference.fallback_confidence".to_string(),
                message: format!("must lie in [0, 1], got {}", conf),
            });
        }
        if self.inference.curve_points < 2 {
            return Err(ConfigError::InvalidValue {
                key: "inference.curve_points".to_string(),
                message: format!("must be at least 2, got {}", self.inference.curve_points),
            });
        }
        let tol = self.comparison.satisfaction_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "comparison.satisfaction_tolerance".to_string(),
                message: format!("must be a non-negative number, got {}", tol),
            });
        }
        Ok(())
    }

    /// Engine options derived from the `[inference]` section
    pub fn inference_options(&self) -> InferenceOptions {
        InferenceOptions {
            defuzzification: self.inference.defuzzification,
            fallback_confidence: self.inference.fallback_confidence,
        }
    }

    /// Comparison options derived from the `[comparison]` section
    pub fn comparison_options(&self) -> ComparisonOptions {
        ComparisonOptions {
            baseline: self.comparison.baseline,
            satisfaction_tolerance: self.comparison.satisfaction_tolerance,
            parallel: self.comparison.parallel,
        }
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Write configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))
    }

    /// Generate a default configuration file content
    pub fn default_config_content() -> &'static str {
        r#"# fuzzy-aqi Configuration File

[general]
# Logging level: quiet, normal, verbose, debug
log_level = "normal"
# CLI output format: text, json
format = "text"

[inference]
# Defuzzification method: centroid, bisector, mean_of_maximum (mom)
defuzzification = "centroid"
# Confidence reported when no rule fires (0.0 - 1.0)
fallback_confidence = 0.1
# Points per membership curve
curve_points = 50

[comparison]
# Rows drawn per comparison run
sample_count = 100
# Seed for drawing rows
seed = 42
# Evaluate samples on a thread pool
parallel = true
# Crisp baseline: banded, peak_normalized (peak)
baseline = "banded"
# Relative error counted as satisfactory
satisfaction_tolerance = 0.2

[dataset]
# UCI Air Quality CSV (semicolon separated, decimal comma)
# path = "AirQualityUCI.csv"
# Rows generated when no dataset is available
synthetic_samples = 5000
"#
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading/writing config file
    #[error("IO error reading {}: {}", .0.display(), .1)]
    Io(PathBuf, String),
    /// Parse error in config file
    #[error("Parse error in {}: {}", .0.display(), .1)]
    Parse(PathBuf, String),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// A value outside its allowed range
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl From<ConfigError> for AqiError {
    fn from(err: ConfigError) -> Self {
        let code = match &err {
            ConfigError::Io(..) => ErrorCode::ConfigNotFound,
            ConfigError::Parse(..) => ErrorCode::InvalidConfigSyntax,
            ConfigError::InvalidValue { .. } => ErrorCode::InvalidConfigValue,
            ConfigError::Serialize(_) => ErrorCode::ConfigError,
        };
        let aqi = AqiError::new(code, err.to_string());
        match err {
            ConfigError::Io(path, _) | ConfigError::Parse(path, _) => {
                aqi.with_context("path", path.display().to_string())
            }
            ConfigError::InvalidValue { key, .. } => aqi.with_context("key", key),
            ConfigError::Serialize(_) => aqi,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AqiConfig::new();
        assert_eq!(config.general.log_level, LogLevel::Normal);
        assert_eq!(config.inference.defuzzification, DefuzzificationMethod::Centroid);
        assert_eq!(config.inference.fallback_confidence, 0.1);
        assert_eq!(config.comparison.seed, 42);
        assert_eq!(config.dataset.synthetic_samples, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [general]
            log_level = "verbose"
            format = "json"

            [inference]
            defuzzification = "mom"
            curve_points = 80

            [comparison]
            sample_count = 250
            baseline = "peak_normalized"
            parallel = false

            [dataset]
            path = "data/AirQualityUCI.csv"
        "#;

        let config = AqiConfig::load_from_str(toml).unwrap();
        assert_eq!(config.general.log_level, LogLevel::Verbose);
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.inference.defuzzification, DefuzzificationMethod::MeanOfMaximum);
        assert_eq!(config.inference.curve_points, 80);
        assert_eq!(config.comparison.sample_count, 250);
        assert_eq!(config.comparison.baseline, BaselineMethod::PeakNormalized);
        assert!(!config.comparison.parallel);
        assert_eq!(
            config.dataset.path,
            Some(PathBuf::from("data/AirQualityUCI.csv"))
        );
        // Unset keys keep their defaults
        assert_eq!(config.comparison.seed, 42);
    }

    #[test]
    fn test_default_content_parses() {
        let config = AqiConfig::load_from_str(AqiConfig::default_config_content()).unwrap();
        assert_eq!(config, AqiConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AqiConfig::load_from_str("[inference]\nfallback_confidence = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "inference.fallback_confidence"));

        let err = AqiConfig::load_from_str("[inference]\ncurve_points = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = AqiConfig::load_from_str("[general]\nlog_level = 3.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AQI_LOG_LEVEL", "debug"),
            ("AQI_DEFUZZ", "mom"),
            ("AQI_FALLBACK_CONFIDENCE", "0.05"),
            ("AQI_SAMPLES", "500"),
            ("AQI_SEED", "7"),
            ("AQI_PARALLEL", "no"),
            ("AQI_BASELINE", "peak"),
            ("AQI_DATASET", "/data/air.csv"),
            ("AQI_CURVE_POINTS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AqiConfig::new();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.general.log_level, LogLevel::Debug);
        assert_eq!(config.inference.defuzzification, DefuzzificationMethod::MeanOfMaximum);
        assert_eq!(config.inference.fallback_confidence, 0.05);
        assert_eq!(config.comparison.sample_count, 500);
        assert_eq!(config.comparison.seed, 7);
        assert!(!config.comparison.parallel);
        assert_eq!(config.comparison.baseline, BaselineMethod::PeakNormalized);
        assert_eq!(config.dataset.path, Some(PathBuf::from("/data/air.csv")));
        assert_eq!(config.inference.curve_points, DEFAULT_CURVE_POINTS);
    }

    #[test]
    fn test_derived_options() {
        let mut config = AqiConfig::new();
        config.inference.fallback_confidence = 0.2;
        config.comparison.parallel = false;
        assert_eq!(config.inference_options().fallback_confidence, 0.2);
        assert!(!config.comparison_options().parallel);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(LogLevel::from_str("quiet"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::from_str("V"), Some(LogLevel::Verbose));
        assert_eq!(LogLevel::from_str("loud"), None);
        assert_eq!(LogLevel::Verbose.tracing_level(), tracing::Level::DEBUG);
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
    }

    #[test]
    fn test_serialize_config() {
        let toml = AqiConfig::new().to_toml().unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[inference]"));
        assert!(toml.contains("[comparison]"));
        let round = AqiConfig::load_from_str(&toml).unwrap();
        assert_eq!(round, AqiConfig::new());
    }

    #[test]
    fn test_config_paths() {
        let paths = AqiConfig::config_paths();
        assert!(!paths.is_empty());
        assert!(paths[0].ends_with(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_error_conversion() {
        let err: AqiError = ConfigError::InvalidValue {
            key: "inference.curve_points".to_string(),
            message: "too small".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
        assert_eq!(err.context_field("key"), Some("inference.curve_points"));
    }
}
