use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};

use qrsdetector::config::DetectorConfig;
use qrsdetector::ecg_source::{CsvSource, EcgSource};
use qrsdetector::output::{DetectionReport, OutputFormat, create_formatter};
use qrsdetector::qrs::QrsDetector;

#[derive(Parser, Debug)]
#[command(name = "qrsdetector")]
#[command(about = "Detect QRS complexes in ECG recordings (offline)", long_about = None)]
struct Args {
    /// CSV files with a header line and timestamp,amplitude rows
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Detector configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Sampling frequency in Hz; sample-count defaults are rescaled from 250 Hz
    #[arg(short = 'r', long)]
    sample_rate: Option<f64>,

    /// Column delimiter
    #[arg(short = 'd', long, default_value = ",")]
    delimiter: char,

    /// Number of header lines to skip
    #[arg(long, default_value = "1")]
    header_lines: usize,

    /// Disable the candidate peak amplitude limit
    #[arg(long)]
    no_limit: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match (&args.config, args.sample_rate) {
        (Some(path), _) => DetectorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        (None, Some(rate)) => DetectorConfig::for_sample_rate(rate),
        (None, None) => DetectorConfig::default(),
    };
    if args.no_limit {
        config.findpeaks.limit = None;
    }

    log::info!(
        "fs {} Hz, band {}-{} Hz (order {}), window {}, spacing {}, refractory {}",
        config.signal_frequency,
        config.filter.lowcut,
        config.filter.highcut,
        config.filter.order,
        config.integration_window,
        config.findpeaks.spacing,
        config.classifier.refractory_period
    );

    let detector = QrsDetector::new(config).context("Invalid detector configuration")?;
    let formatter = create_formatter(args.format, args.verbose > 0);

    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    for path in &args.files {
        let line = analyze_file(path, &detector, &args, formatter.as_ref())
            .with_context(|| format!("Failed to process {}", path.display()))?;
        println!("{}", line);
    }

    Ok(())
}

fn analyze_file(
    path: &Path,
    detector: &QrsDetector,
    args: &Args,
    formatter: &dyn qrsdetector::output::Formatter,
) -> anyhow::Result<String> {
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let recording = CsvSource::open(path)?
        .with_delimiter(args.delimiter)
        .with_header_lines(args.header_lines)
        .read_recording()?;
    log::info!("{}: {} samples", filename, recording.len());

    let result = detector.detect_recording(&recording)?;

    let report = DetectionReport {
        source: &filename,
        sample_count: recording.len(),
        signal_frequency: detector.config().signal_frequency,
        result: &result,
    };
    Ok(formatter.format(&report))
}
