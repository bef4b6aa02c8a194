use std::fmt;

use serde::Serialize;

use crate::config::ClassifierConfig;
use crate::signal_processing::PeakCandidate;

/// Outcome for one candidate peak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Exceeded the adaptive threshold, accepted as a heartbeat
    Qrs,
    /// At or below the adaptive threshold
    Noise,
    /// Inside the refractory period of the previous QRS, ignored
    Refractory,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::Qrs => "qrs",
            Classification::Noise => "noise",
            Classification::Refractory => "refractory",
        };
        f.write_str(name)
    }
}

/// Running signal/noise levels of the adaptive threshold
///
/// All levels start at zero, so the first candidate outside a refractory
/// window is always accepted as QRS and seeds the signal level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassificationState {
    pub signal_peak_level: f64,
    pub noise_peak_level: f64,
    pub threshold: f64,
    pub last_qrs_index: Option<usize>,
}

impl ClassificationState {
    /// Whether `index` falls inside the refractory period of the last QRS
    pub fn in_refractory_period(&self, index: usize, refractory_period: usize) -> bool {
        self.last_qrs_index
            .is_some_and(|last| index.saturating_sub(last) <= refractory_period)
    }

    /// Classify one candidate and return the updated state
    ///
    /// Refractory candidates leave the state untouched. Otherwise the
    /// matching level is updated by exponential averaging and the threshold
    /// is recomputed from both levels.
    pub fn step(
        self,
        candidate: &PeakCandidate,
        config: &ClassifierConfig,
    ) -> (Self, Classification) {
        if self.in_refractory_period(candidate.index, config.refractory_period) {
            return (self, Classification::Refractory);
        }

        let mut next = self;
        let classification = if candidate.value > self.threshold {
            let alpha = config.signal_peak_filtering_factor;
            next.signal_peak_level = alpha * candidate.value + (1.0 - alpha) * self.signal_peak_level;
            next.last_qrs_index = Some(candidate.index);
            Classification::Qrs
        } else {
            let beta = config.noise_peak_filtering_factor;
            next.noise_peak_level = beta * candidate.value + (1.0 - beta) * self.noise_peak_level;
            Classification::Noise
        };

        next.threshold = next.noise_peak_level
            + config.signal_noise_diff_weight * (next.signal_peak_level - next.noise_peak_level);

        (next, classification)
    }
}

/// Result of classifying a whole candidate sequence
#[derive(Debug, Clone, Default)]
pub struct ClassifiedPeaks {
    pub qrs_peaks: Vec<usize>,
    pub noise_peaks: Vec<usize>,
    /// One label per input candidate, in input order
    pub labels: Vec<Classification>,
    pub final_state: ClassificationState,
}

/// Adaptive threshold classifier
///
/// Walks candidates in ascending index order. Each decision depends on all
/// earlier ones, so candidates must not be reordered or processed in
/// parallel.
pub struct AdaptiveClassifier {
    config: ClassifierConfig,
}

impl AdaptiveClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Classify every candidate starting from a zeroed state
    pub fn classify(&self, candidates: &[PeakCandidate]) -> ClassifiedPeaks {
        candidates.iter().fold(
            ClassifiedPeaks::default(),
            |mut acc, candidate| {
                let (state, label) = acc.final_state.step(candidate, &self.config);

                log::trace!(
                    "peak {} value {:.4}: {:?} (threshold {:.4} -> {:.4})",
                    candidate.index,
                    candidate.value,
                    label,
                    acc.final_state.threshold,
                    state.threshold
                );

                match label {
                    Classification::Qrs => acc.qrs_peaks.push(candidate.index),
                    Classification::Noise => acc.noise_peaks.push(candidate.index),
                    Classification::Refractory => {}
                }
                acc.labels.push(label);
                acc.final_state = state;
                acc
            },
        )
    }
}
