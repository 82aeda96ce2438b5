//! fuzzy-aqi - Fuzzy Air Quality Index
//!
//! Command-line interface for assessments, membership curves and
//! fuzzy-versus-crisp comparisons.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use fuzzy_aqi::{
    AirQualityAssessor, AqiConfig, AssessmentResult, ColumnStats, ComparisonReport, Dataset,
    LogLevel, MembershipCurve, OutputFormat,
};

#[derive(Parser)]
#[command(name = "fuzzy-aqi")]
#[command(version = env!("FUZZY_AQI_VERSION"))]
#[command(long_version = concat!(env!("FUZZY_AQI_VERSION"), " (", env!("FUZZY_AQI_TARGET"), ")"))]
#[command(about = "Fuzzy-logic Air Quality Index with a crisp baseline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (overrides the default search path)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// UCI Air Quality CSV to use instead of the configured dataset
    #[arg(long, global = true, value_name = "CSV")]
    data: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<FormatArg>,

    /// Output file (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Assess one set of readings
    Assess {
        /// CO concentration (mg/m3)
        #[arg(long)]
        co: f64,
        /// NO2 concentration (ug/m3)
        #[arg(long)]
        no2: f64,
        /// O3 sensor response
        #[arg(long)]
        o3: f64,
        /// Temperature in degrees Celsius (default 20)
        #[arg(long, allow_negative_numbers = true)]
        temperature: Option<f64>,
        /// Relative humidity in percent (default 50)
        #[arg(long)]
        humidity: Option<f64>,
    },
    /// Sample the membership functions of every variable
    Curves {
        /// Points per curve
        #[arg(long)]
        points: Option<usize>,
    },
    /// Compare fuzzy and crisp predictions over the dataset
    Compare {
        /// Rows to draw from the dataset
        #[arg(long)]
        samples: Option<usize>,
        /// Seed for drawing rows
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Per-column dataset statistics
    Stats,
    /// Print the default configuration file
    InitConfig,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::InitConfig = cli.command {
        return emit(cli.output.as_ref(), AqiConfig::default_config_content());
    }

    let config = load_config(&cli)?;
    init_logging(config.general.log_level);

    let format = config.general.format;
    let assessor = AirQualityAssessor::from_config(&config)
        .context("Failed to build the inference engine")?;

    let content = match &cli.command {
        Command::Assess {
            co,
            no2,
            o3,
            temperature,
            humidity,
        } => {
            let result = assessor.assess(*co, *no2, *o3, *temperature, *humidity)?;
            render(format, &result, format_assessment)?
        }
        Command::Curves { points } => {
            let points = points.unwrap_or(config.inference.curve_points).max(2);
            let curves = assessor.membership_curves(points);
            render(format, &curves, format_curves)?
        }
        Command::Compare { samples, seed } => {
            let dataset = load_dataset(&config);
            let assessor = match seed {
                Some(seed) => assessor.with_seed(*seed),
                None => assessor,
            };
            let report = assessor
                .compare_dataset(&dataset, samples.unwrap_or(config.comparison.sample_count));
            render(format, &report, format_comparison)?
        }
        Command::Stats => {
            let dataset = load_dataset(&config);
            let stats = dataset.statistics();
            render(format, &stats, format_stats)?
        }
        Command::InitConfig => AqiConfig::default_config_content().to_string(),
    };

    emit(cli.output.as_ref(), &content)
}

/// Config file, then environment, then command-line flags
fn load_config(cli: &Cli) -> Result<AqiConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = AqiConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            config.apply_env_overrides();
            config.validate()?;
            config
        }
        None => AqiConfig::load().context("Failed to load configuration")?,
    };

    if let Some(format) = cli.format {
        config.general.format = format.into();
    }
    if let Some(path) = &cli.data {
        config.dataset.path = Some(path.clone());
    }
    if cli.quiet {
        config.general.log_level = LogLevel::Quiet;
    } else if cli.verbose {
        config.general.log_level = LogLevel::Verbose;
    }
    Ok(config)
}

fn init_logging(level: LogLevel) {
    let default = level.tracing_level().to_string().to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_dataset(config: &AqiConfig) -> Dataset {
    Dataset::load_or_synthetic(
        config.dataset.path.as_deref(),
        config.dataset.synthetic_samples,
        config.comparison.seed,
    )
}

fn render<T: Serialize>(format: OutputFormat, value: &T, text: fn(&T) -> String) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => Ok(text(value)),
    }
}

fn emit(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write to: {}", path.display())),
        None => io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout"),
    }
}

// ============================================================================
// Text formatting
// ============================================================================

fn format_assessment(result: &AssessmentResult) -> String {
    let mut out = String::new();
    let i = &result.inputs;
    let _ = writeln!(
        out,
        "Readings:   CO {:.2}  NO2 {:.1}  O3 {:.0}  T {:.1}  RH {:.1}",
        i.co, i.no2, i.o3, i.temperature, i.humidity
    );
    let _ = writeln!(out, "Fuzzy AQI:  {:.1} ({})", result.fuzzy_aqi, result.category);
    let _ = writeln!(out, "Crisp AQI:  {:.1}", result.crisp_aqi);
    let _ = writeln!(out, "Confidence: {:.3}", result.confidence);
    if result.fallback_used {
        let _ = writeln!(out, "Warning:    no rule fired, universe midpoint returned");
    }

    let _ = writeln!(out, "\nMemberships:");
    for (variable, degrees) in &result.memberships {
        let terms: Vec<String> = degrees
            .iter()
            .map(|(term, d)| format!("{}={:.3}", term, d))
            .collect();
        let _ = writeln!(out, "  {:<4} {}", variable, terms.join("  "));
    }

    let _ = writeln!(out, "\nRules:");
    for activation in result.activations.iter().filter(|a| a.fired()) {
        let _ = writeln!(
            out,
            "  {:>2} {:<26} -> {:<32} {:.3}",
            activation.index + 1,
            activation.name.as_deref().unwrap_or("-"),
            activation.consequent,
            activation.strength
        );
    }
    out
}

fn format_curves(curves: &IndexMap<String, MembershipCurve>) -> String {
    let mut out = String::new();
    for (variable, curve) in curves {
        let (lo, hi) = match (curve.universe.first(), curve.universe.last()) {
            (Some(lo), Some(hi)) => (*lo, *hi),
            _ => continue,
        };
        let _ = writeln!(
            out,
            "{} [{}, {}] {} points",
            variable,
            lo,
            hi,
            curve.universe.len()
        );
        for (term, ys) in &curve.terms {
            let support: Vec<f64> = curve
                .universe
                .iter()
                .zip(ys)
                .filter(|(_, y)| **y > 0.0)
                .map(|(x, _)| *x)
                .collect();
            let peak = curve
                .universe
                .iter()
                .zip(ys)
                .fold((lo, f64::NEG_INFINITY), |best, (x, y)| {
                    if *y > best.1 {
                        (*x, *y)
                    } else {
                        best
                    }
                });
            match (support.first(), support.last()) {
                (Some(a), Some(b)) => {
                    let _ = writeln!(
                        out,
                        "  {:<32} peak {:>8.2}  support [{:.2}, {:.2}]",
                        term, peak.0, a, b
                    );
                }
                _ => {
                    let _ = writeln!(out, "  {:<32} (zero on every sample)", term);
                }
            }
        }
    }
    out
}

fn format_comparison(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Samples: {} (skipped {}, satisfaction over {})",
        report.sample_size, report.skipped, report.satisfaction_eligible
    );
    let _ = writeln!(out, "Baseline: {}\n", report.baseline.as_str());
    let _ = writeln!(
        out,
        "{:<8} {:>9} {:>9} {:>9} {:>9} {:>13}",
        "method", "MAE", "RMSE", "accuracy", "F1", "satisfaction"
    );
    for (name, m) in [("fuzzy", &report.metrics.fuzzy), ("crisp", &report.metrics.crisp)] {
        let _ = writeln!(
            out,
            "{:<8} {:>9.2} {:>9.2} {:>9.3} {:>9.3} {:>13.3}",
            name, m.mae, m.rmse, m.accuracy, m.f1_score, m.satisfaction
        );
    }
    out
}

fn format_stats(stats: &IndexMap<String, ColumnStats>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>7} {:>10} {:>10} {:>10} {:>10}",
        "column", "count", "min", "max", "mean", "std"
    );
    for (column, s) in stats {
        let _ = writeln!(
            out,
            "{:<12} {:>7} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            column, s.count, s.min, s.max, s.mean, s.std
        );
    }
    out
}
