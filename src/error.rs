//! Structured Error Handling for fuzzy-aqi
//!
//! Provides a unified error type hierarchy with:
//! - Error codes for programmatic handling
//! - Structured error payloads (JSON-friendly)
//! - Context preservation through error chains
//!
//! # Error Categories
//!
//! - Configuration errors (1xxx) - malformed membership functions, universes
//!   or rules. Raised only while an engine is being built.
//! - Inference errors (2xxx) - a direct engine call was missing a declared input
//! - Sample errors (3xxx) - a comparison record or dataset row is unusable
//! - Config file errors (7xxx) - TOML configuration issues
//! - Internal errors (9xxx)
//!
//! A degenerate inference (no rule fired) is deliberately *not* represented
//! here: it is reported through `InferenceOutcome::fallback_used`.
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_aqi::error::{AqiError, ErrorCode};
//!
//! fn check_sigma(sigma: f64) -> Result<(), AqiError> {
//!     if sigma <= 0.0 {
//!         return Err(AqiError::membership("sigma must be positive")
//!             .with_code(ErrorCode::InvalidMembership)
//!             .with_context("sigma", sigma.to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use serde::{Deserialize, Serialize};

// ============================================================================
// Error Codes
// ============================================================================

/// Unique error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Configuration errors (1xxx)
    /// Generic engine configuration error
    ConfigurationError = 1000,
    /// Membership function parameters violate the shape's ordering
    InvalidMembership = 1001,
    /// Universe bounds or resolution are invalid
    InvalidUniverse = 1002,
    /// Term declared twice on the same variable
    DuplicateTerm = 1003,
    /// Variable declared twice on the same system
    DuplicateVariable = 1004,
    /// Rule references an undeclared variable
    UnknownVariable = 1005,
    /// Rule references an undeclared term
    UnknownTerm = 1006,
    /// Rule is structurally invalid (weight, consequent)
    InvalidRule = 1007,

    // Inference errors (2xxx)
    /// Generic inference error
    InferenceError = 2000,
    /// A declared input variable received no value
    MissingInput = 2001,

    // Sample errors (3xxx)
    /// Generic invalid sample
    InvalidSample = 3000,
    /// Required numeric field absent
    MissingField = 3001,
    /// Field present but NaN or infinite
    NonFiniteValue = 3002,
    /// Dataset could not be read
    DatasetError = 3003,

    // Config file errors (7xxx)
    /// Generic config file error
    ConfigError = 7000,
    /// Config file not found
    ConfigNotFound = 7001,
    /// Invalid config syntax
    InvalidConfigSyntax = 7002,
    /// Invalid config value
    InvalidConfigValue = 7003,

    // Internal errors (9xxx)
    /// Internal error
    InternalError = 9000,
    /// Invalid serialized form
    InvalidFormat = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a short description of the error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ConfigurationError => "Configuration error",
            ErrorCode::InvalidMembership => "Invalid membership function",
            ErrorCode::InvalidUniverse => "Invalid universe",
            ErrorCode::DuplicateTerm => "Duplicate term",
            ErrorCode::DuplicateVariable => "Duplicate variable",
            ErrorCode::UnknownVariable => "Unknown variable",
            ErrorCode::UnknownTerm => "Unknown term",
            ErrorCode::InvalidRule => "Invalid rule",

            ErrorCode::InferenceError => "Inference error",
            ErrorCode::MissingInput => "Missing input value",

            ErrorCode::InvalidSample => "Invalid sample",
            ErrorCode::MissingField => "Missing required field",
            ErrorCode::NonFiniteValue => "Non-finite value",
            ErrorCode::DatasetError => "Dataset error",

            ErrorCode::ConfigError => "Config file error",
            ErrorCode::ConfigNotFound => "Config file not found",
            ErrorCode::InvalidConfigSyntax => "Invalid config syntax",
            ErrorCode::InvalidConfigValue => "Invalid config value",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::InvalidFormat => "Invalid format",
        }
    }

    /// Whether this code belongs to the construction-time configuration family
    pub fn is_configuration(&self) -> bool {
        (1000..2000).contains(&self.code())
    }

    /// Whether this code marks a per-record sample failure
    pub fn is_sample(&self) -> bool {
        (3000..3003).contains(&self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// Error Context
// ============================================================================

/// Additional context information for an error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Key-value pairs of context information
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    /// Source location (file:line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Stack of error causes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for fuzzy-aqi
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AqiError {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    /// Hint for resolving the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl AqiError {
    /// Create a new error with a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    // ========================================================================
    // Factory methods
    // ========================================================================

    /// Generic engine configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationError, message)
    }

    /// Malformed membership function parameters
    pub fn membership(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMembership, message)
    }

    /// Malformed universe
    pub fn universe(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidUniverse, message)
    }

    pub fn duplicate_term(variable: &str, term: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateTerm,
            format!("term '{}' declared twice on variable '{}'", term, variable),
        )
        .with_context("variable", variable)
        .with_context("term", term)
    }

    pub fn duplicate_variable(variable: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateVariable,
            format!("variable '{}' declared twice", variable),
        )
        .with_context("variable", variable)
    }

    pub fn unknown_variable(variable: &str) -> Self {
        Self::new(
            ErrorCode::UnknownVariable,
            format!("rule references undeclared variable '{}'", variable),
        )
        .with_context("variable", variable)
    }

    pub fn unknown_term(variable: &str, term: &str) -> Self {
        Self::new(
            ErrorCode::UnknownTerm,
            format!("rule references undeclared term '{}.{}'", variable, term),
        )
        .with_context("variable", variable)
        .with_context("term", term)
    }

    pub fn invalid_rule(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRule, message)
    }

    pub fn missing_input(variable: &str) -> Self {
        Self::new(
            ErrorCode::MissingInput,
            format!("no value supplied for input variable '{}'", variable),
        )
        .with_context("variable", variable)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("record is missing required field '{}'", field),
        )
        .with_context("field", field)
    }

    pub fn non_finite(field: &str, value: f64) -> Self {
        Self::new(
            ErrorCode::NonFiniteValue,
            format!("field '{}' is not a finite number ({})", field, value),
        )
        .with_context("field", field)
    }

    pub fn dataset(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatasetError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.fields.insert(key.into(), value.into());
        self
    }

    /// Add a cause to the error chain
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.causes.push(cause.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.location = Some(location.into());
        self
    }

    /// Add a hint for resolving the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// True for errors that can only arise while building an engine
    pub fn is_configuration(&self) -> bool {
        self.code.is_configuration()
    }

    /// True for per-record failures that a batch skips over
    pub fn is_sample(&self) -> bool {
        self.code.is_sample()
    }

    /// Look up a context field
    pub fn context_field(&self, key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|c| c.fields.get(key))
            .map(String::as_str)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"INTERNAL_ERROR","message":"{}"}}"#, self.message)
        })
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

impl fmt::Display for AqiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;

        if let Some(ref ctx) = self.context {
            if let Some(ref loc) = ctx.location {
                write!(f, " at {}", loc)?;
            }
            if !ctx.causes.is_empty() {
                write!(f, "\nCaused by:")?;
                for cause in &ctx.causes {
                    write!(f, "\n  - {}", cause)?;
                }
            }
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for AqiError {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<std::io::Error> for AqiError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        let code = match err.kind() {
            ErrorKind::NotFound => ErrorCode::ConfigNotFound,
            ErrorKind::InvalidData | ErrorKind::UnexpectedEof => ErrorCode::DatasetError,
            _ => ErrorCode::InternalError,
        };
        AqiError::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for AqiError {
    fn from(err: serde_json::Error) -> Self {
        AqiError::new(ErrorCode::InvalidFormat, err.to_string())
            .with_context("format", "JSON")
    }
}

impl From<toml::de::Error> for AqiError {
    fn from(err: toml::de::Error) -> Self {
        AqiError::config(err.to_string())
            .with_code(ErrorCode::InvalidConfigSyntax)
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// A Result type using AqiError
pub type AqiResult<T> = Result<T, AqiError>;

// ============================================================================
// Macros for convenient error creation
// ============================================================================

/// Create an AqiError with context from the current location
#[macro_export]
macro_rules! aqi_error {
    ($code:expr, $msg:expr) => {
        $crate::error::AqiError::new($code, $msg)
            .at(format!("{}:{}", file!(), line!()))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::AqiError::new($code, format!($fmt, $($arg)*))
            .at(format!("{}:{}", file!(), line!()))
    };
}

/// Bail out early with an error
#[macro_export]
macro_rules! aqi_bail {
    ($code:expr, $msg:expr) => {
        return Err($crate::aqi_error!($code, $msg))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::aqi_error!($code, $fmt, $($arg)*))
    };
}

/// Ensure a condition holds, or return an error
#[macro_export]
macro_rules! aqi_ensure {
    ($cond:expr, $code:expr, $msg:expr) => {
        if !$cond {
            $crate::aqi_bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::aqi_bail!($code, $fmt, $($arg)*);
        }
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AqiError::membership("a > b");
        assert_eq!(err.code, ErrorCode::InvalidMembership);
        assert_eq!(err.message, "a > b");
        assert!(err.is_configuration());
        assert!(!err.is_sample());
    }

    #[test]
    fn test_unknown_term_context() {
        let err = AqiError::unknown_term("CO", "Extreme");
        assert_eq!(err.code, ErrorCode::UnknownTerm);
        assert_eq!(err.context_field("variable"), Some("CO"));
        assert_eq!(err.context_field("term"), Some("Extreme"));
        assert!(err.message.contains("CO.Extreme"));
    }

    #[test]
    fn test_sample_errors() {
        assert!(AqiError::missing_field("NO2").is_sample());
        assert!(AqiError::non_finite("O3_Sensor", f64::NAN).is_sample());
        assert!(!AqiError::dataset("bad header").is_sample());
    }

    #[test]
    fn test_error_with_cause() {
        let err = AqiError::configuration("rule base rejected")
            .with_cause("unknown term")
            .with_cause("rule 3");

        let ctx = err.context.as_ref().unwrap();
        assert_eq!(ctx.causes.len(), 2);
    }

    #[test]
    fn test_error_to_json() {
        let err = AqiError::missing_input("Humidity");
        let json = err.to_json();
        assert!(json.contains("MISSING_INPUT"));
        assert!(json.contains("Humidity"));
    }

    #[test]
    fn test_error_display() {
        let err = AqiError::universe("min must be below max")
            .at("variables.rs:12")
            .with_cause("min = 5, max = 1")
            .with_hint("swap the bounds");

        let display = err.to_string();
        assert!(display.contains("[1002]"));
        assert!(display.contains("min must be below max"));
        assert!(display.contains("variables.rs:12"));
        assert!(display.contains("min = 5, max = 1"));
        assert!(display.contains("swap the bounds"));
    }

    #[test]
    fn test_ensure_macro() {
        fn positive(x: f64) -> AqiResult<f64> {
            crate::aqi_ensure!(x > 0.0, ErrorCode::InvalidMembership, "expected positive, got {}", x);
            Ok(x)
        }

        assert!(positive(1.0).is_ok());
        let err = positive(-1.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMembership);
        assert!(err.message.contains("-1"));
        assert!(err.context.unwrap().location.is_some());
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::UnknownVariable.description(), "Unknown variable");
        assert_eq!(ErrorCode::MissingField.code(), 3001);
    }
}
