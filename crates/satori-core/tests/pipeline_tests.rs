//! End-to-end pipeline tests against the canonical seeded rule set.

use satori_core::embedding::EmbeddingProvider;
use satori_core::matcher::MatchConfig;
use satori_core::store::{seed_default_rules, seed_rules, ForbiddenContext, Rule, RuleStore};
use satori_core::{initialize_rule_store, review_code, ReviewEngine, Severity, TriggeringContext};

#[test]
fn loop_with_connect_and_print_yields_two_loop_violations() {
    let report = review_code("for i in range(5): db.connect(); print(i)\n").unwrap();

    assert_eq!(report.summary.total, 2);

    let connect = &report.violations[0];
    assert_eq!(connect.matched_code, "db.connect()");
    assert_eq!(connect.severity, Severity::High);
    assert_eq!(connect.context, TriggeringContext::Loop);

    let print = &report.violations[1];
    assert_eq!(print.matched_code, "print(i)");
    assert_eq!(print.severity, Severity::Low);
    assert_eq!(print.context, TriggeringContext::Loop);
}

#[test]
fn print_in_conditional_yields_one_low_violation() {
    let report = review_code("if x > 0: print(\"x\")\n").unwrap();

    assert_eq!(report.summary.total, 1);
    let v = &report.violations[0];
    assert_eq!(v.matched_code, "print(\"x\")");
    assert_eq!(v.severity, Severity::Low);
    assert_eq!(v.context, TriggeringContext::Conditional);
}

#[test]
fn top_level_eval_without_anywhere_rule_is_clean() {
    let report = review_code("eval('1+1')\n").unwrap();

    assert!(report.is_clean());
}

#[test]
fn anywhere_rule_fires_for_top_level_call() {
    let mut store = RuleStore::with_default_provider();
    seed_rules(
        &mut store,
        vec![Rule {
            id: "no-eval-anywhere".to_string(),
            description: "Do not call eval at all; evaluating dynamic strings is a security \
                          risk."
                .to_string(),
            action: "eval".to_string(),
            forbidden_in: ForbiddenContext::Anywhere,
            severity: Severity::High,
            keywords: "eval, exec".to_string(),
        }],
    );
    let engine = ReviewEngine::with_store(store, MatchConfig::default());

    let report = engine.review("eval('1+1')\n").unwrap();

    assert_eq!(report.summary.total, 1);
    let v = &report.violations[0];
    assert_eq!(v.rule_id, "no-eval-anywhere");
    assert_eq!(v.context, TriggeringContext::Anywhere);
    assert_eq!(v.matched_code, "eval('1+1')");
}

#[test]
fn call_nested_in_conditional_and_loop_fires_both_contexts() {
    let report = review_code("if flag:\n  for i in range(3):\n    print(i)\n").unwrap();

    let print_violations: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.matched_code == "print(i)")
        .collect();
    assert_eq!(print_violations.len(), 2);
    assert_eq!(print_violations[0].context, TriggeringContext::Loop);
    assert_eq!(print_violations[1].context, TriggeringContext::Conditional);
    assert!(
        report
            .violations
            .iter()
            .all(|v| v.context != TriggeringContext::Anywhere)
    );
}

#[test]
fn seeding_is_idempotent_across_repeated_initialisation() {
    let mut store = initialize_rule_store();
    let first_ids: Vec<String> = store.ids().iter().map(|s| s.to_string()).collect();
    let first_count = store.len();

    let second_count = seed_default_rules(&mut store);

    assert_eq!(first_count, second_count);
    let second_ids: Vec<String> = store.ids().iter().map(|s| s.to_string()).collect();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn identical_source_yields_identical_reports() {
    let code = "if flag:\n  for i in range(3):\n    db.connect()\n    print(i)\n";

    let first = review_code(code).unwrap();
    let second = review_code(code).unwrap();

    assert_eq!(first, second);
}

#[test]
fn report_order_follows_source_order() {
    let code = "for i in items:\n    db.connect()\nif x:\n    print(\"late\")\n";

    let report = review_code(code).unwrap();

    assert_eq!(report.summary.total, 2);
    assert_eq!(report.violations[0].matched_code, "db.connect()");
    assert_eq!(report.violations[1].matched_code, "print(\"late\")");
}

/// Maps any text containing "query" onto one axis and everything else
/// onto the orthogonal one, so the cosine distance between a query and a
/// rule document is exactly 1.0.
struct AxisProvider;

impl EmbeddingProvider for AxisProvider {
    fn embed(&self, text: &str) -> Vec<f32> {
        if text.contains("query") {
            vec![1.0, 0.0]
        } else {
            vec![0.0, 1.0]
        }
    }

    fn dimensions(&self) -> usize {
        2
    }
}

fn axis_store() -> RuleStore {
    let mut store = RuleStore::new(Box::new(AxisProvider));
    seed_rules(
        &mut store,
        vec![Rule {
            id: "no-query-in-loop".to_string(),
            description: "Do not issue lookups inside a loop.".to_string(),
            action: "query".to_string(),
            forbidden_in: ForbiddenContext::Loop,
            severity: Severity::High,
            keywords: String::new(),
        }],
    );
    store
}

#[test]
fn distance_equal_to_threshold_is_accepted() {
    let config = MatchConfig {
        max_distance: 1.0,
        top_k: 1,
    };
    let engine = ReviewEngine::with_store(axis_store(), config);

    let report = engine.review("for i in items:\n    query(x)\n").unwrap();

    assert_eq!(report.summary.total, 1, "inclusive bound accepts distance == threshold");
}

#[test]
fn distance_above_threshold_is_rejected() {
    let config = MatchConfig {
        max_distance: 0.99,
        top_k: 1,
    };
    let engine = ReviewEngine::with_store(axis_store(), config);

    let report = engine.review("for i in items:\n    query(x)\n").unwrap();

    assert!(report.is_clean());
    assert_eq!(report.degraded_queries, 0, "a threshold miss is not a degraded query");
}

#[test]
fn engine_reuses_one_store_across_reviews() {
    let engine = ReviewEngine::new();

    let first = engine.review("for i in items:\n    print(i)\n").unwrap();
    let second = engine.review("if x:\n    eval('x')\n").unwrap();

    assert_eq!(first.summary.total, 1);
    assert_eq!(second.summary.total, 1);
    assert_eq!(second.violations[0].severity, Severity::High);
}
