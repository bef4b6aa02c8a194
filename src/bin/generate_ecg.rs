use anyhow::{Context, Result};
use clap::Parser;
use qrsdetector::simulation::{BeatShape, NoiseConfig, SyntheticEcg, apply_noise};
use serde::Deserialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "generate_ecg")]
#[command(about = "Generate synthetic ECG CSV files with configurable noise for QRS detector testing")]
struct Args {
    /// TOML configuration file ([beat] and [noise] sections)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Heart rates in bpm: comma-separated (e.g., "60,72,90") or range (e.g., "50-150:10")
    #[arg(short = 'H', long, default_value = "60-120:20")]
    heart_rates: String,

    /// Number of trials per heart rate
    #[arg(short, long, default_value_t = 3)]
    trials: u32,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Recording duration in seconds
    #[arg(short, long, default_value_t = 30.0)]
    duration: f64,

    /// Sampling frequency in Hz
    #[arg(long, default_value_t = 250.0)]
    sample_rate: f64,

    /// Output filename prefix
    #[arg(long, default_value = "ecg")]
    prefix: String,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,

    /// Gaussian noise standard deviation (CLI override)
    #[arg(long)]
    noise_std: Option<f64>,

    /// Baseline wander amplitude at 0.3 Hz (CLI override)
    #[arg(long)]
    wander: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    beat: BeatShape,
    noise: NoiseConfig,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    file: String,
    heart_rate_bpm: f64,
    trial: u32,
    seed: u64,
    beat_positions: Vec<usize>,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    sample_rate: f64,
    duration: f64,
    files: Vec<ManifestEntry>,
}

fn parse_heart_rates(s: &str) -> Result<Vec<f64>> {
    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let step: f64 = parts[1].parse().context("Invalid step value")?;
        if step <= 0.0 {
            anyhow::bail!("Step must be positive");
        }
        let range_parts: Vec<&str> = parts[0].split('-').collect();
        if range_parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let start: f64 = range_parts[0].parse().context("Invalid start value")?;
        let end: f64 = range_parts[1].parse().context("Invalid end value")?;

        let mut rates = Vec::new();
        let mut r = start;
        while r <= end {
            rates.push(r);
            r += step;
        }
        Ok(rates)
    } else {
        s.split(',')
            .map(|p| p.trim().parse::<f64>().context("Invalid heart rate value"))
            .collect()
    }
}

fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_noise_config(toml: &TomlConfig, args: &Args, seed: u64) -> NoiseConfig {
    let mut config = toml.noise.clone().with_seed(seed);

    if let Some(std_dev) = args.noise_std {
        config = config.with_gaussian(std_dev);
    }
    if let Some(amplitude) = args.wander {
        config = config.with_baseline_wander(amplitude, 0.3);
    }

    config
}

fn write_csv(path: &Path, samples: &[f64], sample_rate: f64) -> Result<()> {
    let file = fs::File::create(path).context("Failed to create CSV file")?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "timestamp,ecg_measurement")?;
    for (i, sample) in samples.iter().enumerate() {
        writeln!(writer, "{:.6},{:.6}", i as f64 / sample_rate, sample)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let toml_config = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        TomlConfig::default()
    };

    let heart_rates = parse_heart_rates(&args.heart_rates)?;
    let base_seed = args.seed.unwrap_or(0);

    let mut manifest_entries = Vec::new();
    let total_files = heart_rates.len() * args.trials as usize;
    let mut file_count = 0;

    for &heart_rate in &heart_rates {
        for trial in 0..args.trials {
            let seed = base_seed + trial as u64 * 1000 + heart_rate as u64;
            let noise_config = build_noise_config(&toml_config, &args, seed);

            let mut ecg = SyntheticEcg::new(args.sample_rate, args.duration, heart_rate);
            ecg.beat = toml_config.beat.clone();

            let signal = apply_noise(&ecg.generate(), &noise_config, args.sample_rate)?;

            let filename = format!("{}_hr{:03}_t{:02}.csv", args.prefix, heart_rate as i32, trial);
            let filepath = args.output_dir.join(&filename);

            write_csv(&filepath, &signal, args.sample_rate)
                .with_context(|| format!("Failed to write {}", filepath.display()))?;

            manifest_entries.push(ManifestEntry {
                file: filename,
                heart_rate_bpm: heart_rate,
                trial,
                seed,
                beat_positions: ecg.beat_positions(),
            });

            file_count += 1;
            eprint!("\rGenerating: {}/{}", file_count, total_files);
        }
    }
    eprintln!();

    if args.manifest {
        let manifest = Manifest {
            sample_rate: args.sample_rate,
            duration: args.duration,
            files: manifest_entries,
        };
        let manifest_path = args.output_dir.join("manifest.json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} files in {}",
        total_files,
        args.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heart_rates_comma_separated() {
        let rates = parse_heart_rates("60, 72,90").unwrap();
        assert_eq!(rates, vec![60.0, 72.0, 90.0]);
    }

    #[test]
    fn test_parse_heart_rates_range() {
        let rates = parse_heart_rates("60-120:20").unwrap();
        assert_eq!(rates, vec![60.0, 80.0, 100.0, 120.0]);
    }

    #[test]
    fn test_parse_heart_rates_rejects_bad_step() {
        assert!(parse_heart_rates("60-120:0").is_err());
        assert!(parse_heart_rates("60-120:x").is_err());
    }

    #[test]
    fn test_toml_config_sections() {
        let config: TomlConfig = toml::from_str(
            r#"
            [beat]
            r_amplitude = 3.0

            [noise.additive]
            std_dev = 0.05
            "#,
        )
        .unwrap();

        assert_eq!(config.beat.r_amplitude, 3.0);
        assert_eq!(config.beat.t_delay_secs, 0.25);
        assert_eq!(config.noise.additive.unwrap().std_dev, 0.05);
    }
}
