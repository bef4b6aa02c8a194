use serde::Serialize;

use crate::config::DetectorConfig;
use crate::ecg_source::EcgRecording;
use crate::error::{QrsError, Result};
use crate::qrs::classifier::{AdaptiveClassifier, Classification};
use crate::signal_processing::{
    PeakCandidate, PeakFinder, bandpass_filter, differentiate, integrate, square,
};

/// Intermediate outputs of the conditioning pipeline
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConditionedSignals {
    /// Band-pass filtered ECG, same length as the input
    pub filtered: Vec<f64>,
    /// First difference of `filtered`, one sample shorter
    pub differentiated: Vec<f64>,
    /// Square of `differentiated`
    pub squared: Vec<f64>,
    /// Moving-window integral of `squared`, `integration_window - 1` samples longer
    pub integrated: Vec<f64>,
}

/// Output of one detection run
///
/// All indices refer to the integrated signal. They are not shifted back to
/// raw sample positions; the integrated signal is `integration_window - 2`
/// samples longer than the raw input and lags it by the filter and window
/// delays.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    /// Accepted QRS peak indices, strictly increasing
    pub qrs_peaks: Vec<usize>,
    /// Rejected noise peak indices, strictly increasing
    pub noise_peaks: Vec<usize>,
    /// All candidate peaks handed to the classifier
    pub candidates: Vec<PeakCandidate>,
    /// Classifier label for each entry of `candidates`
    pub labels: Vec<Classification>,
    #[serde(skip)]
    pub signals: ConditionedSignals,
}

impl DetectionResult {
    /// Gaps between consecutive QRS peaks, in samples
    pub fn rr_intervals(&self) -> Vec<usize> {
        self.qrs_peaks.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Mean heart rate in beats per minute, if at least two beats were found
    pub fn mean_heart_rate_bpm(&self, signal_frequency: f64) -> Option<f64> {
        let intervals = self.rr_intervals();
        if intervals.is_empty() {
            return None;
        }
        let mean_samples = intervals.iter().sum::<usize>() as f64 / intervals.len() as f64;
        Some(60.0 * signal_frequency / mean_samples)
    }

    /// Number of candidates ignored inside a refractory period
    pub fn refractory_skips(&self) -> usize {
        self.labels
            .iter()
            .filter(|&&label| label == Classification::Refractory)
            .count()
    }
}

/// Offline QRS detector
///
/// Runs band-pass filtering, differentiation, squaring, moving-window
/// integration, peak finding and adaptive classification over one complete
/// signal. The configuration is validated once in [`QrsDetector::new`]; a
/// detector holds no state between runs.
///
/// # Example
/// ```
/// use qrsdetector::{DetectorConfig, QrsDetector};
///
/// let detector = QrsDetector::new(DetectorConfig::default()).unwrap();
/// let result = detector.detect(&vec![0.0; 1000]).unwrap();
/// assert!(result.qrs_peaks.is_empty());
/// ```
pub struct QrsDetector {
    config: DetectorConfig,
    peak_finder: PeakFinder,
    classifier: AdaptiveClassifier,
}

impl QrsDetector {
    /// Create a detector, rejecting invalid configuration up front
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;

        let peak_finder = PeakFinder::new(config.findpeaks.spacing, config.findpeaks.limit)?;
        let classifier = AdaptiveClassifier::new(&config.classifier);

        Ok(Self {
            config,
            peak_finder,
            classifier,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the full pipeline over raw ECG amplitudes
    ///
    /// # Errors
    /// `QrsError::SignalTooShort` if `amplitudes` is shorter than twice the
    /// peak spacing; filter errors propagate unchanged.
    pub fn detect(&self, amplitudes: &[f64]) -> Result<DetectionResult> {
        let needed = self.config.min_signal_len();
        if amplitudes.len() < needed {
            return Err(QrsError::SignalTooShort {
                needed,
                available: amplitudes.len(),
            });
        }

        let signals = self.condition(amplitudes)?;

        let candidates = self.peak_finder.find_candidates(&signals.integrated);
        log::debug!(
            "{} candidate peaks (spacing {}, limit {:?})",
            candidates.len(),
            self.peak_finder.spacing(),
            self.peak_finder.limit()
        );

        let classified = self.classifier.classify(&candidates);
        log::debug!(
            "{} QRS peaks, {} noise peaks, final threshold {:.4}",
            classified.qrs_peaks.len(),
            classified.noise_peaks.len(),
            classified.final_state.threshold
        );

        Ok(DetectionResult {
            qrs_peaks: classified.qrs_peaks,
            noise_peaks: classified.noise_peaks,
            candidates,
            labels: classified.labels,
            signals,
        })
    }

    /// Run the pipeline over the amplitude column of a loaded recording
    pub fn detect_recording(&self, recording: &EcgRecording) -> Result<DetectionResult> {
        self.detect(&recording.amplitudes())
    }

    fn condition(&self, amplitudes: &[f64]) -> Result<ConditionedSignals> {
        let filter = &self.config.filter;
        let filtered = bandpass_filter(
            amplitudes,
            filter.lowcut,
            filter.highcut,
            self.config.signal_frequency,
            filter.order,
        )?;
        let differentiated = differentiate(&filtered);
        let squared = square(&differentiated);
        let integrated = integrate(&squared, self.config.integration_window);

        log::debug!(
            "conditioned {} samples: filtered {}, differentiated {}, integrated {}",
            amplitudes.len(),
            filtered.len(),
            differentiated.len(),
            integrated.len()
        );

        Ok(ConditionedSignals {
            filtered,
            differentiated,
            squared,
            integrated,
        })
    }
}
