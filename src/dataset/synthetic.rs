//! Seeded synthetic readings
//!
//! | column      | distribution |
//! |-------------|--------------|
//! | CO          | LogNormal(0.5, 0.8) |
//! | NO2         | Weibull(shape 1.5) x 150 |
//! | O3_Sensor   | Gamma(shape 2, scale 400) |
//! | Temperature | Normal(20, 8) |
//! | Humidity    | Beta(2, 2) x 100 |

use rand::Rng;
use rand_distr::{Beta, Distribution, Gamma, LogNormal, Normal, Weibull};

use super::DatasetError;
use crate::compare::SampleRecord;

pub const DEFAULT_SYNTHETIC_SAMPLES: usize = 5000;
pub const DEFAULT_SEED: u64 = 42;

const NO2_SCALE: f64 = 150.0;
const HUMIDITY_SCALE: f64 = 100.0;

fn invalid(column: &str, err: impl std::fmt::Display) -> DatasetError {
    DatasetError::Distribution {
        column: column.to_string(),
        message: err.to_string(),
    }
}

pub(super) fn generate<R: Rng>(rng: &mut R, n: usize) -> Result<Vec<SampleRecord>, DatasetError> {
    let co = LogNormal::new(0.5, 0.8).map_err(|e| invalid("CO", e))?;
    let no2 = Weibull::new(1.0, 1.5).map_err(|e| invalid("NO2", e))?;
    let o3 = Gamma::new(2.0, 400.0).map_err(|e| invalid("O3_Sensor", e))?;
    let temperature = Normal::new(20.0, 8.0).map_err(|e| invalid("Temperature", e))?;
    let humidity = Beta::new(2.0, 2.0).map_err(|e| invalid("Humidity", e))?;

    Ok((0..n)
        .map(|_| {
            SampleRecord::new(
                co.sample(rng),
                no2.sample(rng) * NO2_SCALE,
                o3.sample(rng),
                temperature.sample(rng),
                humidity.sample(rng) * HUMIDITY_SCALE,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    #[test]
    fn test_seed_is_reproducible() {
        let a = Dataset::synthetic(100, 42).unwrap();
        let b = Dataset::synthetic(100, 42).unwrap();
        let c = Dataset::synthetic(100, 43).unwrap();
        assert_eq!(a.records(), b.records());
        assert_ne!(a.records(), c.records());
    }

    #[test]
    fn test_value_ranges() {
        let data = Dataset::synthetic(2000, DEFAULT_SEED).unwrap();
        for record in data.records() {
            let sample = record.validate().unwrap();
            assert!(sample.co > 0.0);
            assert!(sample.no2 >= 0.0);
            assert!(sample.o3 > 0.0);
            assert!((0.0..=100.0).contains(&sample.humidity));
        }
        let stats = data.statistics();
        // Gamma(2, 400) has mean 800; Normal(20, 8) mean 20
        assert!((stats["O3_Sensor"].mean - 800.0).abs() < 60.0);
        assert!((stats["Temperature"].mean - 20.0).abs() < 1.0);
        assert!((stats["Humidity"].mean - 50.0).abs() < 3.0);
    }
}
