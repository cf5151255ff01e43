//! Rule matching engine.
//!
//! Consumes node descriptors, derives an action fingerprint per call-like
//! node, and queries the rule store once per active structural context.
//! A hit requires both the exact metadata predicate and a top-1 distance
//! at or below the configured threshold; query failures degrade to
//! "no match" and are counted, never propagated.

use crate::analyzer::NodeDescriptor;
use crate::report::{TriggeringContext, Violation};
use crate::store::{ForbiddenContext, RuleFilter, RuleQuery};

/// Matching policy knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Maximum accepted cosine distance for the top candidate. The bound
    /// is inclusive: a candidate at exactly this distance is accepted.
    pub max_distance: f64,
    /// Candidates requested per query; only the top one is considered.
    pub top_k: usize,
}

pub const DEFAULT_MAX_DISTANCE: f64 = 0.8;

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            top_k: 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub violations: Vec<Violation>,
    pub degraded_queries: u32,
}

/// Extract the action fingerprint from a call's source text.
///
/// Takes the text before the first opening parenthesis, strips
/// whitespace, and keeps the last member-access segment:
/// `db.connect(...)` becomes `connect`, a bare `print(...)` stays
/// `print`. Returns `None` when no parenthesis is present — such nodes
/// are skipped for matching.
pub fn action_fingerprint(source_text: &str) -> Option<String> {
    let (head, _) = source_text.split_once('(')?;
    let name = head.trim().rsplit('.').next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Match every call-like descriptor against the store.
///
/// Per node: the loop-scoped and conditional-scoped queries fire
/// independently (both can hit for one node, loop first); the
/// anywhere-scoped query runs only when both structural flags are false.
pub fn match_descriptors(
    descriptors: &[NodeDescriptor],
    store: &dyn RuleQuery,
    config: &MatchConfig,
) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();

    for descriptor in descriptors.iter().filter(|d| d.kind.is_call()) {
        let Some(text) = descriptor.source_text.as_deref() else {
            continue;
        };
        let Some(action) = action_fingerprint(text) else {
            continue;
        };

        if descriptor.in_loop {
            check_context(
                store,
                text,
                &action,
                ForbiddenContext::Loop,
                TriggeringContext::Loop,
                config,
                &mut outcome,
            );
        }
        if descriptor.in_conditional {
            check_context(
                store,
                text,
                &action,
                ForbiddenContext::Conditional,
                TriggeringContext::Conditional,
                config,
                &mut outcome,
            );
        }
        if !descriptor.in_loop && !descriptor.in_conditional {
            check_context(
                store,
                text,
                &action,
                ForbiddenContext::Anywhere,
                TriggeringContext::Anywhere,
                config,
                &mut outcome,
            );
        }
    }

    outcome
}

fn check_context(
    store: &dyn RuleQuery,
    text: &str,
    action: &str,
    scope: ForbiddenContext,
    context: TriggeringContext,
    config: &MatchConfig,
    outcome: &mut MatchOutcome,
) {
    let filter = RuleFilter::action(action, scope);
    let hits = match store.query(text, &filter, config.top_k.max(1)) {
        Ok(hits) => hits,
        Err(error) => {
            tracing::warn!(%error, action, %context, "rule query failed; treating as no match");
            outcome.degraded_queries += 1;
            return;
        }
    };

    let Some(top) = hits.into_iter().next() else {
        return;
    };
    if top.distance > config.max_distance {
        tracing::debug!(
            rule = %top.rule.id,
            distance = top.distance,
            threshold = config.max_distance,
            "top candidate rejected by distance threshold"
        );
        return;
    }

    tracing::debug!(rule = %top.rule.id, distance = top.distance, %context, "rule hit");
    outcome.violations.push(Violation {
        matched_code: text.to_string(),
        rule_id: top.rule.id,
        rule_description: top.rule.description,
        severity: top.rule.severity,
        context,
    });
}
