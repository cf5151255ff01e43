//! Review engine composing the full pipeline.
//!
//! Source text -> structural context analysis -> rule matching against the
//! seeded store -> report. Only parse failures surface as errors; every
//! retrieval-layer failure degrades to "no evidence of violation" and is
//! counted on the report.

use crate::analyzer::analyze;
use crate::config::Config;
use crate::matcher::{match_descriptors, MatchConfig};
use crate::parser::ParseError;
use crate::report::AnalysisReport;
use crate::reviewer::{NarrativeReviewer, ReviewerError};
use crate::store::{default_rules, seed_rules, RuleStore};

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub struct ReviewEngine {
    store: RuleStore,
    match_config: MatchConfig,
}

impl ReviewEngine {
    /// Engine over a freshly seeded default store.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Engine configured from `satori.toml` settings: threshold, top-k,
    /// and disabled rule ids (excluded at seed time).
    pub fn with_config(config: &Config) -> Self {
        let mut store = RuleStore::with_default_provider();
        let rules = default_rules()
            .into_iter()
            .filter(|r| !config.rules.disabled.contains(&r.id))
            .collect();
        seed_rules(&mut store, rules);
        Self {
            store,
            match_config: config.match_config(),
        }
    }

    /// Engine over a caller-provided store (already seeded or not).
    pub fn with_store(store: RuleStore, match_config: MatchConfig) -> Self {
        Self {
            store,
            match_config,
        }
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Run the full pipeline on one source unit.
    pub fn review(&self, source: &str) -> Result<AnalysisReport, ReviewError> {
        let descriptors = analyze(source)?;
        let outcome = match_descriptors(&descriptors, &self.store, &self.match_config);
        Ok(AnalysisReport::build(
            outcome.violations,
            outcome.degraded_queries,
        ))
    }

    /// Run the pipeline, then hand the finished report to a narrative
    /// reviewer. The report is returned alongside the commentary and is
    /// valid regardless of whether the reviewer succeeds.
    pub fn review_with_commentary(
        &self,
        source: &str,
        reviewer: &dyn NarrativeReviewer,
    ) -> Result<(AnalysisReport, Result<String, ReviewerError>), ReviewError> {
        let report = self.review(source)?;
        let commentary = reviewer.review(source, &report);
        Ok((report, commentary))
    }
}

impl Default for ReviewEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One-call surface: review `source` with the default rule set and policy.
pub fn review_code(source: &str) -> Result<AnalysisReport, ReviewError> {
    ReviewEngine::new().review(source)
}

/// One-time store setup: a default-provider store seeded with the
/// canonical rules. Idempotent by construction — seeding an already
/// non-empty store is a no-op.
pub fn initialize_rule_store() -> RuleStore {
    let mut store = RuleStore::with_default_provider();
    seed_rules(&mut store, default_rules());
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TriggeringContext;
    use crate::store::Severity;

    #[test]
    fn review_clean_code_returns_empty_report() {
        let report = review_code("x = 1\ny = x + 1\n").unwrap();

        assert!(report.is_clean());
        assert_eq!(report.degraded_queries, 0);
    }

    #[test]
    fn review_surfaces_parse_errors() {
        let result = review_code("for in :::\n");

        assert!(matches!(result, Err(ReviewError::Parse(_))));
    }

    #[test]
    fn review_finds_connect_in_loop() {
        let report = review_code("for i in range(5):\n    db.connect()\n").unwrap();

        assert_eq!(report.summary.total, 1);
        let v = &report.violations[0];
        assert_eq!(v.severity, Severity::High);
        assert_eq!(v.context, TriggeringContext::Loop);
    }

    #[test]
    fn initialize_rule_store_seeds_canonical_rules() {
        let store = initialize_rule_store();

        assert_eq!(store.len(), 4);
    }

    #[test]
    fn disabled_rules_are_excluded_at_seed_time() {
        let mut config = Config::default();
        config
            .rules
            .disabled
            .push("no-print-in-loop".to_string());
        let engine = ReviewEngine::with_config(&config);

        assert_eq!(engine.store().len(), 3);
        let report = engine
            .review("for i in range(5):\n    print(i)\n")
            .unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn commentary_failure_leaves_report_intact() {
        struct BrokenReviewer;
        impl NarrativeReviewer for BrokenReviewer {
            fn review(
                &self,
                _source: &str,
                _report: &AnalysisReport,
            ) -> Result<String, ReviewerError> {
                Err(ReviewerError("model unavailable".to_string()))
            }
        }

        let engine = ReviewEngine::new();
        let (report, commentary) = engine
            .review_with_commentary("if x:\n    print(\"x\")\n", &BrokenReviewer)
            .unwrap();

        assert_eq!(report.summary.total, 1);
        assert!(commentary.is_err());
    }
}
