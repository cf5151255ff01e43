//! Violation report building.
//!
//! Pure aggregation: violations are kept in the order they were produced
//! (source order, loop-then-conditional per node) and counted by severity.
//! No filtering, deduplication, or rewriting happens here — suppressing
//! false positives is the narrative reviewer's job, never the report's.

use serde::Serialize;

use crate::store::Severity;

/// The structural scope that triggered a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggeringContext {
    Loop,
    Conditional,
    Anywhere,
}

impl std::fmt::Display for TriggeringContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TriggeringContext::Loop => "loop",
            TriggeringContext::Conditional => "conditional",
            TriggeringContext::Anywhere => "anywhere",
        };
        f.write_str(s)
    }
}

/// One matched node triggering one rule within one context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub matched_code: String,
    pub rule_id: String,
    pub rule_description: String,
    pub severity: Severity,
    pub context: TriggeringContext,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub high: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub violations: Vec<Violation>,
    pub summary: Summary,
    /// Number of rule queries that failed and degraded to "no match".
    /// Lets callers tell "clean code" apart from "retrieval was down".
    pub degraded_queries: u32,
}

impl AnalysisReport {
    pub fn build(violations: Vec<Violation>, degraded_queries: u32) -> Self {
        let summary = Summary {
            total: violations.len(),
            high: violations
                .iter()
                .filter(|v| v.severity == Severity::High)
                .count(),
            low: violations
                .iter()
                .filter(|v| v.severity == Severity::Low)
                .count(),
        };
        Self {
            violations,
            summary,
            degraded_queries,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

impl std::fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            write!(f, "No rule violations found.")?;
        } else {
            writeln!(
                f,
                "Found {} rule violation(s) (high: {}, low: {}):",
                self.summary.total, self.summary.high, self.summary.low
            )?;
            for violation in &self.violations {
                writeln!(f, "- code: {}", violation.matched_code)?;
                writeln!(f, "  context: {}", violation.context)?;
                writeln!(
                    f,
                    "  severity: {}",
                    match violation.severity {
                        Severity::High => "high",
                        Severity::Low => "low",
                    }
                )?;
                writeln!(f, "  rule: {}", violation.rule_description)?;
            }
        }
        if self.degraded_queries > 0 {
            write!(
                f,
                "\nwarning: {} rule quer(ies) degraded to no-match",
                self.degraded_queries
            )?;
        }
        Ok(())
    }
}
