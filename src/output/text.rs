use super::{DetectionReport, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &DetectionReport) -> String {
        let result = report.result;
        let bpm = report
            .heart_rate_bpm()
            .map_or("-".to_string(), |hr| format!("{:.1}", hr));

        let mut text = format!(
            "{}: {} samples, {} QRS, {} noise, {} refractory, heart rate: {} bpm",
            report.source,
            report.sample_count,
            result.qrs_peaks.len(),
            result.noise_peaks.len(),
            result.refractory_skips(),
            bpm
        );

        if self.verbose {
            if let Some(rr) = report.rr_summary() {
                text.push_str(&format!(
                    "\n  RR (samples): mean {:.1} std {:.1} min {:.0} max {:.0} [n={}]",
                    rr.mean, rr.std_dev, rr.min, rr.max, rr.count
                ));
            }
            text.push_str(&format!("\n  qrs peaks indices: {:?}", result.qrs_peaks));
            text.push_str(&format!("\n  noise peaks indices: {:?}", result.noise_peaks));
        }

        text
    }
}
