//! JSON formatter for machine-readable report output

use satori_core::AnalysisReport;

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, report: &AnalysisReport) -> serde_json::Result<String> {
        serde_json::to_string_pretty(report)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
