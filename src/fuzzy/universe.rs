//! Universe of discourse
//!
//! A bounded numeric range with a sampling step. The sampled points are used
//! for numerical defuzzification; `linspace` produces plot-ready grids.

use serde::{Deserialize, Serialize};

use crate::error::{AqiResult, ErrorCode};

/// Bounded numeric domain `[min, max]` sampled every `step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
}

impl Universe {
    /// Create a universe; requires finite bounds, `min < max` and `step > 0`.
    pub fn new(min: f64, max: f64, step: f64) -> AqiResult<Self> {
        crate::aqi_ensure!(
            min.is_finite() && max.is_finite() && step.is_finite(),
            ErrorCode::InvalidUniverse,
            "universe parameters must be finite (min {}, max {}, step {})",
            min, max, step
        );
        crate::aqi_ensure!(
            min < max,
            ErrorCode::InvalidUniverse,
            "universe min must be below max (got {} >= {})",
            min, max
        );
        crate::aqi_ensure!(
            step > 0.0,
            ErrorCode::InvalidUniverse,
            "universe resolution must be positive (got {})",
            step
        );
        Ok(Self { min, max, step })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Clamp a reading into the bounds; NaN maps to `min`.
    pub fn clamp(&self, x: f64) -> f64 {
        if x.is_nan() {
            self.min
        } else {
            x.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Number of sample points (`min + i*step` strictly below `max`)
    pub fn sample_count(&self) -> usize {
        let raw = (self.max - self.min) / self.step;
        // Tolerate representation error so that 0..20 by 0.1 gives 200 points
        ((raw - 1e-9).ceil().max(1.0)) as usize
    }

    /// Iterate the sampled points
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.sample_count()).map(move |i| self.min + (i as f64) * self.step)
    }

    /// `n` evenly spaced points over the closed range `[min, max]`
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let delta = (self.max - self.min) / ((n - 1) as f64);
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.max
                        } else {
                            self.min + (i as f64) * delta
                        }
                    })
                    .collect()
            }
        }
    }
}
