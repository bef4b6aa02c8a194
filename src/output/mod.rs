//! Rendering of detection results.

mod csv;
mod json;
mod text;

use rolling_stats::Stats;
use serde::Serialize;

use crate::qrs::DetectionResult;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Everything a formatter needs to describe one detection run
pub struct DetectionReport<'a> {
    /// Name of the recording, usually its file name
    pub source: &'a str,
    /// Number of raw samples in the recording
    pub sample_count: usize,
    pub signal_frequency: f64,
    pub result: &'a DetectionResult,
}

/// Statistics of the gaps between consecutive QRS peaks, in samples
#[derive(Debug, Clone, Serialize)]
pub struct RrSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl RrSummary {
    /// Summarize RR intervals, `None` when fewer than two beats were found
    pub fn from_result(result: &DetectionResult) -> Option<Self> {
        let mut stats: Stats<f64> = Stats::new();
        for interval in result.rr_intervals() {
            stats.update(interval as f64);
        }
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

impl DetectionReport<'_> {
    pub fn rr_summary(&self) -> Option<RrSummary> {
        RrSummary::from_result(self.result)
    }

    pub fn heart_rate_bpm(&self) -> Option<f64> {
        self.result.mean_heart_rate_bpm(self.signal_frequency)
    }
}

pub trait Formatter {
    fn format(&self, report: &DetectionReport) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::qrs::{Classification, ConditionedSignals};
    use crate::signal_processing::PeakCandidate;
    use approx::assert_relative_eq;

    pub(crate) fn sample_result() -> DetectionResult {
        DetectionResult {
            qrs_peaks: vec![113, 413, 713],
            noise_peaks: vec![560],
            candidates: vec![
                PeakCandidate { index: 113, value: 6.5 },
                PeakCandidate { index: 180, value: 0.9 },
                PeakCandidate { index: 413, value: 6.25 },
                PeakCandidate { index: 560, value: 0.5 },
                PeakCandidate { index: 713, value: 6.0 },
            ],
            labels: vec![
                Classification::Qrs,
                Classification::Refractory,
                Classification::Qrs,
                Classification::Noise,
                Classification::Qrs,
            ],
            signals: ConditionedSignals::default(),
        }
    }

    #[test]
    fn test_rr_summary() {
        let result = sample_result();
        let summary = RrSummary::from_result(&result).unwrap();
        assert_eq!(summary.count, 2);
        assert_relative_eq!(summary.mean, 300.0);
        assert_relative_eq!(summary.min, 300.0);
        assert_relative_eq!(summary.max, 300.0);
    }

    #[test]
    fn test_rr_summary_needs_two_beats() {
        let mut result = sample_result();
        result.qrs_peaks.truncate(1);
        assert!(RrSummary::from_result(&result).is_none());
    }

    #[test]
    fn test_heart_rate() {
        let result = sample_result();
        let report = DetectionReport {
            source: "test.csv",
            sample_count: 1000,
            signal_frequency: 250.0,
            result: &result,
        };
        assert_relative_eq!(report.heart_rate_bpm().unwrap(), 50.0);
    }
}
