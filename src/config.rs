//! Configuration for the QRS detector.
//!
//! All defaults are tuned for ECG recorded at 250 Hz. Every parameter that is
//! expressed in samples (`integration_window`, `findpeaks.spacing`,
//! `classifier.refractory_period`) has to scale with the sampling frequency;
//! use [`DetectorConfig::for_sample_rate`] rather than editing
//! `signal_frequency` alone.
//!
//! A configuration can also be loaded from TOML. Missing keys keep their
//! defaults:
//!
//! ```
//! use qrsdetector::config::DetectorConfig;
//!
//! let config = DetectorConfig::from_toml_str(
//!     r#"
//!     integration_window = 20
//!
//!     [classifier]
//!     refractory_period = 150
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.integration_window, 20);
//! assert_eq!(config.classifier.refractory_period, 150);
//! assert_eq!(config.findpeaks.spacing, 50);
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{QrsError, Result};
use crate::signal_processing::filters::check_filter_spec;

/// Sampling frequency the default sample-count parameters were tuned for.
pub const REFERENCE_SIGNAL_FREQUENCY: f64 = 250.0;

/// Complete detector configuration
///
/// Use `DetectorConfig::default()` for 250 Hz input.
///
/// # Example
/// ```
/// use qrsdetector::config::DetectorConfig;
///
/// let mut config = DetectorConfig::default();
/// config.findpeaks.limit = Some(0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    /// ECG device sampling frequency in samples per second
    pub signal_frequency: f64,
    /// Band-pass filter configuration
    pub filter: FilterConfig,
    /// Moving-window integration length in samples
    pub integration_window: usize,
    /// Candidate peak extraction configuration
    pub findpeaks: FindPeaksConfig,
    /// Adaptive signal/noise classification configuration
    pub classifier: ClassifierConfig,
}

/// Butterworth band-pass filter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Lower cutoff in Hz (0.0 designs a low-pass at `highcut`)
    pub lowcut: f64,
    /// Upper cutoff in Hz
    pub highcut: f64,
    /// Butterworth order
    pub order: usize,
}

/// Candidate peak extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FindPeaksConfig {
    /// Peaks must be strictly greater than this value (`None` disables the check)
    pub limit: Option<f64>,
    /// Neighbourhood half-width in samples a peak must dominate
    pub spacing: usize,
}

/// Adaptive threshold classifier configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Samples after an accepted QRS during which candidates are ignored
    pub refractory_period: usize,
    /// Weight of a new QRS peak in the running signal level (alpha)
    pub signal_peak_filtering_factor: f64,
    /// Weight of a new noise peak in the running noise level (beta)
    pub noise_peak_filtering_factor: f64,
    /// Position of the threshold between noise and signal level (gamma)
    pub signal_noise_diff_weight: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            signal_frequency: REFERENCE_SIGNAL_FREQUENCY,
            filter: FilterConfig::default(),
            integration_window: 15,
            findpeaks: FindPeaksConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            lowcut: 0.0,
            highcut: 15.0,
            order: 1,
        }
    }
}

impl Default for FindPeaksConfig {
    fn default() -> Self {
        Self {
            limit: Some(0.35),
            spacing: 50,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            refractory_period: 120,
            signal_peak_filtering_factor: 0.125,
            noise_peak_filtering_factor: 0.125,
            signal_noise_diff_weight: 0.25,
        }
    }
}

impl DetectorConfig {
    /// Default configuration rescaled for a different sampling frequency
    ///
    /// Sample-count parameters are multiplied by `signal_frequency / 250`
    /// and rounded, never dropping below one sample. Cutoffs and weights are
    /// left untouched.
    pub fn for_sample_rate(signal_frequency: f64) -> Self {
        let defaults = Self::default();
        let ratio = signal_frequency / REFERENCE_SIGNAL_FREQUENCY;
        let scale = |samples: usize| ((samples as f64 * ratio).round() as usize).max(1);

        Self {
            signal_frequency,
            integration_window: scale(defaults.integration_window),
            findpeaks: FindPeaksConfig {
                spacing: scale(defaults.findpeaks.spacing),
                ..defaults.findpeaks
            },
            classifier: ClassifierConfig {
                refractory_period: scale(defaults.classifier.refractory_period),
                ..defaults.classifier
            },
            filter: defaults.filter,
        }
    }

    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| QrsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Smallest input length (in raw samples) the pipeline accepts
    pub fn min_signal_len(&self) -> usize {
        (2 * self.findpeaks.spacing).max(2)
    }

    /// Check every parameter, returning the first problem found
    ///
    /// # Errors
    /// `QrsError::InvalidFilterSpec` for bad cutoffs or order,
    /// `QrsError::Config` for everything else.
    pub fn validate(&self) -> Result<()> {
        if !self.signal_frequency.is_finite() || self.signal_frequency <= 0.0 {
            return Err(QrsError::Config(format!(
                "signal_frequency must be positive, got {}",
                self.signal_frequency
            )));
        }

        check_filter_spec(
            self.filter.lowcut,
            self.filter.highcut,
            self.signal_frequency,
            self.filter.order,
        )?;

        if self.integration_window == 0 {
            return Err(QrsError::Config(
                "integration_window must be at least 1 sample".to_string(),
            ));
        }
        if self.findpeaks.spacing == 0 {
            return Err(QrsError::Config(
                "findpeaks spacing must be at least 1 sample".to_string(),
            ));
        }
        if let Some(limit) = self.findpeaks.limit {
            if !limit.is_finite() {
                return Err(QrsError::Config(format!(
                    "findpeaks limit must be finite, got {}",
                    limit
                )));
            }
        }

        self.classifier.validate()
    }
}

impl ClassifierConfig {
    fn validate(&self) -> Result<()> {
        if self.refractory_period == 0 {
            return Err(QrsError::Config(
                "refractory_period must be at least 1 sample".to_string(),
            ));
        }

        let weights = [
            ("signal_peak_filtering_factor", self.signal_peak_filtering_factor),
            ("noise_peak_filtering_factor", self.noise_peak_filtering_factor),
            ("signal_noise_diff_weight", self.signal_noise_diff_weight),
        ];
        for (name, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                return Err(QrsError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_signal_len(), 100);
    }

    #[test]
    fn test_for_sample_rate_scales_sample_counts() {
        let config = DetectorConfig::for_sample_rate(500.0);
        assert_eq!(config.integration_window, 30);
        assert_eq!(config.findpeaks.spacing, 100);
        assert_eq!(config.classifier.refractory_period, 240);
        assert_eq!(config.filter.highcut, 15.0);
        assert!(config.validate().is_ok());

        let config = DetectorConfig::for_sample_rate(360.0);
        assert_eq!(config.integration_window, 22); // 21.6
        assert_eq!(config.findpeaks.spacing, 72);
        assert_eq!(config.classifier.refractory_period, 173); // 172.8
    }

    #[test]
    fn test_zero_refractory_period_rejected() {
        let mut config = DetectorConfig::default();
        config.classifier.refractory_period = 0;
        assert!(matches!(config.validate(), Err(QrsError::Config(_))));
    }

    #[test]
    fn test_zero_window_and_spacing_rejected() {
        let mut config = DetectorConfig::default();
        config.integration_window = 0;
        assert!(matches!(config.validate(), Err(QrsError::Config(_))));

        let mut config = DetectorConfig::default();
        config.findpeaks.spacing = 0;
        assert!(matches!(config.validate(), Err(QrsError::Config(_))));
    }

    #[test]
    fn test_weights_out_of_range_rejected() {
        let mut config = DetectorConfig::default();
        config.classifier.signal_noise_diff_weight = 1.5;
        assert!(matches!(config.validate(), Err(QrsError::Config(_))));

        let mut config = DetectorConfig::default();
        config.classifier.noise_peak_filtering_factor = -0.1;
        assert!(matches!(config.validate(), Err(QrsError::Config(_))));
    }

    #[test]
    fn test_bad_filter_surfaces_as_filter_spec_error() {
        let mut config = DetectorConfig::default();
        config.filter.highcut = 200.0; // above Nyquist at 250 Hz
        assert!(matches!(
            config.validate(),
            Err(QrsError::InvalidFilterSpec(_))
        ));
    }

    #[test]
    fn test_from_toml_str() {
        let config = DetectorConfig::from_toml_str(
            r#"
            signal_frequency = 250.0

            [filter]
            lowcut = 5.0
            highcut = 15.0
            order = 2

            [findpeaks]
            spacing = 40
            "#,
        )
        .unwrap();

        assert_eq!(config.filter.lowcut, 5.0);
        assert_eq!(config.filter.order, 2);
        assert_eq!(config.findpeaks.spacing, 40);
        assert_eq!(config.findpeaks.limit, Some(0.35));
        assert_eq!(config.classifier.refractory_period, 120);
    }

    #[test]
    fn test_from_toml_str_rejects_negative_window() {
        let result = DetectorConfig::from_toml_str("integration_window = -15");
        assert!(matches!(result, Err(QrsError::Config(_))));
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_keys() {
        let result = DetectorConfig::from_toml_str("detection_window = 40");
        assert!(matches!(result, Err(QrsError::Config(_))));
    }
}
