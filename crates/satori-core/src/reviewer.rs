//! Narrative reviewer seam.
//!
//! An optional post-processing stage that turns a finished report into
//! prose commentary. It runs strictly after the report is built and may
//! disagree with or suppress raw violations in its prose, but it can
//! never alter the report itself. No implementation ships with the core;
//! callers plug in their own model client.

use crate::report::AnalysisReport;

#[derive(Debug, thiserror::Error)]
#[error("narrative review failed: {0}")]
pub struct ReviewerError(pub String);

/// Turns a source unit and its violation report into freeform commentary.
///
/// No structural guarantee is made about the output text.
pub trait NarrativeReviewer {
    fn review(&self, source: &str, report: &AnalysisReport) -> Result<String, ReviewerError>;
}
