//! In-memory tabular dataset of pollutant readings
//!
//! Columns: `CO`, `NO2`, `O3_Sensor`, `Temperature`, `Humidity`.
//!
//! # Sources
//!
//! - [`Dataset::from_uci_csv`]: the UCI Air Quality CSV export
//! - [`Dataset::synthetic`]: seeded draws from per-column distributions
//! - [`Dataset::load_or_synthetic`]: the CSV if readable, otherwise synthetic
//!
//! ```rust,ignore
//! use fuzzy_aqi::dataset::Dataset;
//!
//! let data = Dataset::load_or_synthetic(Some("AirQualityUCI.csv".as_ref()), 5000, 42);
//! for (column, stats) in data.statistics() {
//!     println!("{column}: mean {:.2} std {:.2}", stats.mean, stats.std);
//! }
//! ```

mod stats;
mod synthetic;
mod uci;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::compare::SampleRecord;
use crate::error::{AqiError, ErrorCode};

pub use stats::ColumnStats;
pub use synthetic::{DEFAULT_SEED, DEFAULT_SYNTHETIC_SAMPLES};

/// Column names in dataset order
pub const COLUMNS: [&str; 5] = ["CO", "NO2", "O3_Sensor", "Temperature", "Humidity"];

/// Dataset loading error
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Empty input: no header line")]
    NoHeader,

    #[error("Invalid distribution parameters for {column}: {message}")]
    Distribution { column: String, message: String },
}

impl From<DatasetError> for AqiError {
    fn from(err: DatasetError) -> Self {
        let aqi = AqiError::new(ErrorCode::DatasetError, err.to_string());
        match &err {
            DatasetError::MissingColumn { column } => aqi.with_context("column", column.clone()),
            DatasetError::Io { path, .. } => aqi.with_context("path", path.clone()),
            _ => aqi,
        }
    }
}

/// Where the rows came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetSource {
    UciCsv { path: Option<PathBuf>, dropped_rows: usize },
    Synthetic { samples: usize, seed: u64 },
    InMemory,
}

/// Rows of readings
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<SampleRecord>,
    source: DatasetSource,
}

impl Dataset {
    pub fn new(records: Vec<SampleRecord>) -> Self {
        Self {
            records,
            source: DatasetSource::InMemory,
        }
    }

    /// Parse a UCI Air Quality CSV export
    pub fn from_uci_csv<R: std::io::BufRead>(reader: R) -> Result<Self, DatasetError> {
        let parsed = uci::parse(reader)?;
        Ok(Self {
            records: parsed.records,
            source: DatasetSource::UciCsv {
                path: None,
                dropped_rows: parsed.dropped,
            },
        })
    }

    /// Open and parse a UCI CSV file
    pub fn from_uci_path(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut dataset = Self::from_uci_csv(BufReader::new(file))?;
        if let DatasetSource::UciCsv { path: p, .. } = &mut dataset.source {
            *p = Some(path.to_path_buf());
        }
        info!(path = %path.display(), rows = dataset.len(), "loaded UCI dataset");
        Ok(dataset)
    }

    /// `n` synthetic rows drawn with a seeded RNG
    pub fn synthetic(n: usize, seed: u64) -> Result<Self, DatasetError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = synthetic::generate(&mut rng, n)?;
        Ok(Self {
            records,
            source: DatasetSource::Synthetic { samples: n, seed },
        })
    }

    /// Load the CSV at `path`, falling back to synthetic data on any failure
    pub fn load_or_synthetic(path: Option<&Path>, synthetic_samples: usize, seed: u64) -> Self {
        if let Some(path) = path {
            match Self::from_uci_path(path) {
                Ok(dataset) if !dataset.is_empty() => return dataset,
                Ok(_) => warn!(path = %path.display(), "dataset has no complete rows"),
                Err(e) => warn!(path = %path.display(), "failed to load dataset: {}", e),
            }
        }
        info!(samples = synthetic_samples, seed, "generating synthetic dataset");
        Self::synthetic(synthetic_samples, seed).unwrap_or_else(|e| {
            warn!("synthetic generation failed: {}", e);
            Self::new(Vec::new())
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Up to `n` distinct rows, drawn without replacement
    ///
    /// Rows keep the order in which they were drawn.
    pub fn sample(&self, n: usize, seed: u64) -> Vec<SampleRecord> {
        let amount = n.min(self.records.len());
        let mut rng = StdRng::seed_from_u64(seed);
        rand::seq::index::sample(&mut rng, self.records.len(), amount)
            .into_iter()
            .map(|i| self.records[i])
            .collect()
    }

    /// Per-column statistics over present values
    pub fn statistics(&self) -> IndexMap<String, ColumnStats> {
        COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let values: Vec<f64> = self
                    .records
                    .iter()
                    .filter_map(|r| r.fields()[i].1)
                    .filter(|v| v.is_finite())
                    .collect();
                (column.to_string(), ColumnStats::from_values(&values))
            })
            .collect()
    }
}
