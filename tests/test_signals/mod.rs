#![allow(dead_code)]

use qrsdetector::simulation::{NoiseConfig, SyntheticEcg, apply_noise, pulse_train};

pub const SIGNAL_FREQUENCY: f64 = 250.0;
pub const PULSE_AMPLITUDE: f64 = 5.0;
pub const PULSE_WIDTH: usize = 5;

/// Sharp rectangular pulses over faint seeded Gaussian noise
pub fn pulses_with_background(len: usize, positions: &[usize], seed: u64) -> Vec<f64> {
    let clean = pulse_train(len, positions, PULSE_AMPLITUDE, PULSE_WIDTH);
    let noise = NoiseConfig::default().with_seed(seed).with_gaussian(0.01);
    apply_noise(&clean, &noise, SIGNAL_FREQUENCY).expect("valid noise config")
}

/// Synthetic ECG with baseline wander and Gaussian noise
pub fn noisy_ecg(duration_secs: f64, heart_rate_bpm: f64, seed: u64) -> (SyntheticEcg, Vec<f64>) {
    let ecg = SyntheticEcg::new(SIGNAL_FREQUENCY, duration_secs, heart_rate_bpm);
    let noise = NoiseConfig::default()
        .with_seed(seed)
        .with_gaussian(0.05)
        .with_baseline_wander(0.5, 0.3);
    let signal = apply_noise(&ecg.generate(), &noise, SIGNAL_FREQUENCY).expect("valid noise config");
    (ecg, signal)
}

/// Index of the detected peak closest to `position`, if within `tolerance`
pub fn find_near(peaks: &[usize], position: usize, tolerance: usize) -> Option<usize> {
    peaks
        .iter()
        .copied()
        .filter(|&p| p.abs_diff(position) <= tolerance)
        .min_by_key(|&p| p.abs_diff(position))
}
