//! Membership function shapes
//!
//! Every shape is a plain enum variant evaluated by a single `match`.
//! Parameters are checked once by the validated constructors; evaluation is
//! pure and total and always lands in `[0, 1]`.

use serde::{Deserialize, Serialize};

use crate::error::{AqiError, AqiResult, ErrorCode};

/// Membership function types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Triangular: 0 at `a`, 1 at `b`, 0 at `c`
    Triangular { a: f64, b: f64, c: f64 },
    /// Trapezoidal: ramps on `[a,b]` and `[c,d]`, plateau on `[b,c]`
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// Gaussian bell: `exp(-(x-mean)^2 / (2 sigma^2))`
    Gaussian { mean: f64, sigma: f64 },
    /// 1 up to `a`, falling to 0 at `b`
    RampLeft { a: f64, b: f64 },
    /// 0 up to `a`, rising to 1 at `b`
    RampRight { a: f64, b: f64 },
}

fn ensure_finite(shape: &str, params: &[f64]) -> AqiResult<()> {
    if params.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(AqiError::membership(format!("{} parameters must be finite: {:?}", shape, params)))
    }
}

impl MembershipFunction {
    /// Triangular shape; requires `a <= b <= c` and `a < c`.
    ///
    /// `a == b` or `b == c` gives a shoulder (one-sided ramp).
    pub fn triangular(a: f64, b: f64, c: f64) -> AqiResult<Self> {
        ensure_finite("triangular", &[a, b, c])?;
        crate::aqi_ensure!(
            a <= b && b <= c && a < c,
            ErrorCode::InvalidMembership,
            "triangular points must satisfy a <= b <= c with a < c (got {}, {}, {})",
            a, b, c
        );
        Ok(MembershipFunction::Triangular { a, b, c })
    }

    /// Trapezoidal shape; requires `a <= b <= c <= d` and `a < d`.
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> AqiResult<Self> {
        ensure_finite("trapezoidal", &[a, b, c, d])?;
        crate::aqi_ensure!(
            a <= b && b <= c && c <= d && a < d,
            ErrorCode::InvalidMembership,
            "trapezoidal points must satisfy a <= b <= c <= d with a < d (got {}, {}, {}, {})",
            a, b, c, d
        );
        Ok(MembershipFunction::Trapezoidal { a, b, c, d })
    }

    /// Gaussian shape; requires `sigma > 0`.
    pub fn gaussian(mean: f64, sigma: f64) -> AqiResult<Self> {
        ensure_finite("gaussian", &[mean, sigma])?;
        crate::aqi_ensure!(
            sigma > 0.0,
            ErrorCode::InvalidMembership,
            "gaussian sigma must be positive (got {})",
            sigma
        );
        Ok(MembershipFunction::Gaussian { mean, sigma })
    }

    pub fn ramp_left(a: f64, b: f64) -> AqiResult<Self> {
        ensure_finite("ramp_left", &[a, b])?;
        crate::aqi_ensure!(
            a <= b,
            ErrorCode::InvalidMembership,
            "ramp points must satisfy a <= b (got {}, {})",
            a, b
        );
        Ok(MembershipFunction::RampLeft { a, b })
    }

    pub fn ramp_right(a: f64, b: f64) -> AqiResult<Self> {
        ensure_finite("ramp_right", &[a, b])?;
        crate::aqi_ensure!(
            a <= b,
            ErrorCode::InvalidMembership,
            "ramp points must satisfy a <= b (got {}, {})",
            a, b
        );
        Ok(MembershipFunction::RampRight { a, b })
    }

    /// Re-check the ordering constraints of an already-built value
    /// (e.g. one deserialized from configuration).
    pub fn validate(&self) -> AqiResult<()> {
        match *self {
            MembershipFunction::Triangular { a, b, c } => Self::triangular(a, b, c).map(|_| ()),
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                Self::trapezoidal(a, b, c, d).map(|_| ())
            }
            MembershipFunction::Gaussian { mean, sigma } => Self::gaussian(mean, sigma).map(|_| ()),
            MembershipFunction::RampLeft { a, b } => Self::ramp_left(a, b).map(|_| ()),
            MembershipFunction::RampRight { a, b } => Self::ramp_right(a, b).map(|_| ()),
        }
    }

    /// Evaluate membership for a crisp value
    pub fn evaluate(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return 0.0;
        }

        let degree = match *self {
            MembershipFunction::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    // a <= x < b, so b > a
                    (x - a) / (b - a)
                } else {
                    // b < x <= c, so c > b
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            MembershipFunction::Gaussian { mean, sigma } => {
                let exp = -((x - mean).powi(2)) / (2.0 * sigma.powi(2));
                exp.exp()
            }
            MembershipFunction::RampLeft { a, b } => {
                if x <= a {
                    1.0
                } else if x >= b {
                    0.0
                } else {
                    (b - x) / (b - a)
                }
            }
            MembershipFunction::RampRight { a, b } => {
                if x <= a {
                    0.0
                } else if x >= b {
                    1.0
                } else {
                    (x - a) / (b - a)
                }
            }
        };

        degree.clamp(0.0, 1.0)
    }

    /// Get the core (where membership = 1)
    pub fn core(&self) -> Option<(f64, f64)> {
        match *self {
            MembershipFunction::Triangular { b, .. } => Some((b, b)),
            MembershipFunction::Trapezoidal { b, c, .. } => Some((b, c)),
            MembershipFunction::Gaussian { mean, .. } => Some((mean, mean)),
            MembershipFunction::RampLeft { a, .. } => Some((f64::NEG_INFINITY, a)),
            MembershipFunction::RampRight { b, .. } => Some((b, f64::INFINITY)),
        }
    }

    /// Get the support (where membership > 0); `None` when unbounded on both sides
    pub fn support(&self) -> Option<(f64, f64)> {
        match *self {
            MembershipFunction::Triangular { a, c, .. } => Some((a, c)),
            MembershipFunction::Trapezoidal { a, d, .. } => Some((a, d)),
            MembershipFunction::Gaussian { .. } => None,
            MembershipFunction::RampLeft { b, .. } => Some((f64::NEG_INFINITY, b)),
            MembershipFunction::RampRight { a, .. } => Some((a, f64::INFINITY)),
        }
    }

    /// Short shape name, used in diagnostics
    pub fn shape_name(&self) -> &'static str {
        match self {
            MembershipFunction::Triangular { .. } => "triangular",
            MembershipFunction::Trapezoidal { .. } => "trapezoidal",
            MembershipFunction::Gaussian { .. } => "gaussian",
            MembershipFunction::RampLeft { .. } => "ramp_left",
            MembershipFunction::RampRight { .. } => "ramp_right",
        }
    }
}
