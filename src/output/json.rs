use serde_json::json;

use super::{DetectionReport, Formatter};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, report: &DetectionReport) -> String {
        let result = report.result;
        json!({
            "source": report.source,
            "sample_count": report.sample_count,
            "signal_frequency": report.signal_frequency,
            "qrs_peaks": result.qrs_peaks,
            "noise_peaks": result.noise_peaks,
            "refractory_skips": result.refractory_skips(),
            "heart_rate_bpm": report.heart_rate_bpm(),
            "rr_intervals": report.rr_summary(),
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_result;

    #[test]
    fn test_json_round_trips_indices() {
        let result = sample_result();
        let report = DetectionReport {
            source: "ecg.csv",
            sample_count: 1000,
            signal_frequency: 250.0,
            result: &result,
        };

        let text = JsonFormatter.format(&report);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["qrs_peaks"], json!([113, 413, 713]));
        assert_eq!(value["noise_peaks"], json!([560]));
        assert_eq!(value["refractory_skips"], json!(1));
        assert_eq!(value["rr_intervals"]["count"], json!(2));
    }
}
