//! Pretty formatter for human-readable terminal output
//!
//! Displays violations with colors, the triggering context, and a
//! severity summary.

use colored::{ColoredString, Colorize};
use satori_core::{AnalysisReport, Severity, Violation};

pub struct PrettyFormatter;

impl PrettyFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, report: &AnalysisReport) -> String {
        let mut output = String::new();

        for violation in &report.violations {
            output.push_str(&self.format_violation(violation));
            output.push('\n');
        }

        output.push_str(&self.format_summary(report));

        if report.degraded_queries > 0 {
            output.push_str(&format!(
                "\n{} {} rule quer(ies) failed and were treated as no-match",
                "warning:".yellow().bold(),
                report.degraded_queries
            ));
        }

        output
    }

    fn format_violation(&self, violation: &Violation) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{}[{}]: {}",
            self.colorize_severity(violation.severity),
            violation.rule_id.dimmed(),
            violation.rule_description
        ));
        lines.push(format!("  {} {}", "code:".blue(), violation.matched_code));
        lines.push(format!("  {} {}", "context:".blue(), violation.context));

        lines.join("\n")
    }

    fn colorize_severity(&self, severity: Severity) -> ColoredString {
        match severity {
            Severity::High => "high".red().bold(),
            Severity::Low => "low".yellow().bold(),
        }
    }

    fn format_summary(&self, report: &AnalysisReport) -> String {
        if report.is_clean() {
            return format!("{}", "No rule violations found.".green());
        }

        let violations_str = if report.summary.total == 1 {
            "violation"
        } else {
            "violations"
        };

        format!(
            "\nFound {} {} ({}, {})",
            report.summary.total.to_string().bold(),
            violations_str,
            format!("{} high", report.summary.high).red(),
            format!("{} low", report.summary.low).yellow()
        )
    }
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satori_core::TriggeringContext;

    fn report_with(violations: Vec<Violation>, degraded: u32) -> AnalysisReport {
        AnalysisReport::build(violations, degraded)
    }

    fn connect_violation() -> Violation {
        Violation {
            matched_code: "db.connect()".to_string(),
            rule_id: "no-connect-in-loop".to_string(),
            rule_description: "Do not open a database connection inside a loop.".to_string(),
            severity: Severity::High,
            context: TriggeringContext::Loop,
        }
    }

    #[test]
    fn formats_violation_with_code_and_context() {
        let output = PrettyFormatter::new().format(&report_with(vec![connect_violation()], 0));

        assert!(output.contains("no-connect-in-loop"));
        assert!(output.contains("db.connect()"));
        assert!(output.contains("loop"));
        assert!(output.contains("1"));
    }

    #[test]
    fn clean_report_says_so() {
        let output = PrettyFormatter::new().format(&report_with(Vec::new(), 0));

        assert!(output.contains("No rule violations found."));
    }

    #[test]
    fn degraded_queries_are_surfaced() {
        let output = PrettyFormatter::new().format(&report_with(Vec::new(), 3));

        assert!(output.contains("3 rule quer(ies) failed"));
    }

    #[test]
    fn summary_counts_severities() {
        let mut low = connect_violation();
        low.severity = Severity::Low;
        let output =
            PrettyFormatter::new().format(&report_with(vec![connect_violation(), low], 0));

        assert!(output.contains("1 high"));
        assert!(output.contains("1 low"));
        assert!(output.contains("violations"));
    }
}
