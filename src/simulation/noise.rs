use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

use crate::error::{QrsError, Result};

/// Interference added on top of a clean synthetic ECG
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub additive: Option<AdditiveNoiseConfig>,
    pub baseline_wander: Option<BaselineWanderConfig>,
    pub powerline: Option<PowerlineConfig>,
    pub impulse: Option<ImpulseNoiseConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_gaussian(mut self, std_dev: f64) -> Self {
        self.additive = Some(AdditiveNoiseConfig { std_dev });
        self
    }

    pub fn with_baseline_wander(mut self, amplitude: f64, frequency_hz: f64) -> Self {
        self.baseline_wander = Some(BaselineWanderConfig {
            amplitude,
            frequency_hz,
        });
        self
    }

    pub fn with_powerline(mut self, amplitude: f64, frequency_hz: f64) -> Self {
        self.powerline = Some(PowerlineConfig {
            amplitude,
            frequency_hz,
        });
        self
    }

    pub fn with_impulse(mut self, rate_hz: f64, amplitude: f64, duration_samples: usize) -> Self {
        self.impulse = Some(ImpulseNoiseConfig {
            rate_hz,
            amplitude,
            duration_samples,
        });
        self
    }
}

/// White Gaussian noise
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub std_dev: f64,
}

/// Slow sinusoidal drift, e.g. from respiration
#[derive(Clone, Debug, serde::Deserialize)]
pub struct BaselineWanderConfig {
    pub amplitude: f64,
    pub frequency_hz: f64,
}

/// Mains hum
#[derive(Clone, Debug, serde::Deserialize)]
pub struct PowerlineConfig {
    pub amplitude: f64,
    pub frequency_hz: f64,
}

/// Rectangular bursts at random intervals, e.g. electrode motion
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ImpulseNoiseConfig {
    pub rate_hz: f64,
    pub amplitude: f64,
    pub duration_samples: usize,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

fn add_sinusoid(signal: &mut [f64], amplitude: f64, frequency_hz: f64, signal_frequency: f64) {
    let omega = 2.0 * PI * frequency_hz / signal_frequency;
    for (i, sample) in signal.iter_mut().enumerate() {
        *sample += amplitude * (omega * i as f64).sin();
    }
}

fn apply_additive_noise(
    signal: &mut [f64],
    config: &AdditiveNoiseConfig,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    if !config.std_dev.is_finite() || config.std_dev < 0.0 {
        return Err(QrsError::Config(format!(
            "noise std_dev must be non-negative, got {}",
            config.std_dev
        )));
    }
    let normal = Normal::new(0.0, config.std_dev)
        .map_err(|e| QrsError::Config(format!("invalid noise std_dev: {}", e)))?;

    for sample in signal.iter_mut() {
        *sample += normal.sample(rng);
    }
    Ok(())
}

fn apply_impulse_noise(
    signal: &mut [f64],
    config: &ImpulseNoiseConfig,
    signal_frequency: f64,
    rng: &mut ChaCha8Rng,
) {
    let n = signal.len();
    if n == 0 || config.rate_hz <= 0.0 {
        return;
    }

    let avg_samples_between_impulses = signal_frequency / config.rate_hz;

    let mut pos = 0usize;
    loop {
        let interval = (rng.random::<f64>() * 2.0 * avg_samples_between_impulses) as usize;
        pos += interval.max(1);

        if pos >= n {
            break;
        }

        let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
        let end = (pos + config.duration_samples).min(n);

        for sample in signal[pos..end].iter_mut() {
            *sample += sign * config.amplitude;
        }
    }
}

/// Return a copy of `clean_signal` with every configured interference added
///
/// # Errors
/// Returns `QrsError::Config` for an invalid Gaussian standard deviation
pub fn apply_noise(
    clean_signal: &[f64],
    config: &NoiseConfig,
    signal_frequency: f64,
) -> Result<Vec<f64>> {
    let mut signal = clean_signal.to_vec();
    let mut rng = create_rng(config.seed);

    if let Some(ref wander) = config.baseline_wander {
        add_sinusoid(&mut signal, wander.amplitude, wander.frequency_hz, signal_frequency);
    }

    if let Some(ref powerline) = config.powerline {
        add_sinusoid(
            &mut signal,
            powerline.amplitude,
            powerline.frequency_hz,
            signal_frequency,
        );
    }

    if let Some(ref additive_config) = config.additive {
        apply_additive_noise(&mut signal, additive_config, &mut rng)?;
    }

    if let Some(ref impulse_config) = config.impulse {
        apply_impulse_noise(&mut signal, impulse_config, signal_frequency, &mut rng);
    }

    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean() -> Vec<f64> {
        (0..1000).map(|i| (i as f64 * 0.1).sin()).collect()
    }

    #[test]
    fn test_additive_noise_changes_signal() {
        let config = NoiseConfig::default().with_seed(42).with_gaussian(0.1);
        let noisy = apply_noise(&clean(), &config, 250.0).unwrap();

        assert_eq!(clean().len(), noisy.len());
        assert_ne!(clean(), noisy);
    }

    #[test]
    fn test_seeded_rng_reproducibility() {
        let config = NoiseConfig::default()
            .with_seed(12345)
            .with_gaussian(0.05)
            .with_impulse(2.0, 1.0, 3);

        let noisy1 = apply_noise(&clean(), &config, 250.0).unwrap();
        let noisy2 = apply_noise(&clean(), &config, 250.0).unwrap();

        assert_eq!(noisy1, noisy2);
    }

    #[test]
    fn test_baseline_wander_is_deterministic() {
        let config = NoiseConfig::default().with_baseline_wander(0.5, 0.25);
        let flat = vec![0.0; 1000];
        let wander = apply_noise(&flat, &config, 250.0).unwrap();

        // Quarter period of 0.25 Hz at 250 Hz is 250 samples
        assert!((wander[250] - 0.5).abs() < 1e-9);
        assert!(wander[0].abs() < 1e-12);
    }

    #[test]
    fn test_negative_std_dev_rejected() {
        let config = NoiseConfig::default().with_seed(1).with_gaussian(-1.0);
        assert!(matches!(
            apply_noise(&clean(), &config, 250.0),
            Err(QrsError::Config(_))
        ));
    }

    #[test]
    fn test_impulse_noise_adds_bursts() {
        let config = NoiseConfig::default().with_seed(7).with_impulse(5.0, 2.0, 4);
        let flat = vec![0.0; 2500];
        let noisy = apply_noise(&flat, &config, 250.0).unwrap();

        let disturbed = noisy.iter().filter(|&&v| v != 0.0).count();
        assert!(disturbed > 0);
        assert!(noisy.iter().all(|&v| v.abs() <= 2.0 * 4.0));
    }
}
