use super::{DetectionReport, Formatter};

/// One row per candidate peak with its classification
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, report: &DetectionReport) -> String {
        let result = report.result;
        result
            .candidates
            .iter()
            .zip(&result.labels)
            .map(|(candidate, label)| {
                format!(
                    "{},{},{:.6},{}",
                    report.source, candidate.index, candidate.value, label
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(&self) -> Option<&'static str> {
        Some("source,index,value,classification")
    }
}
