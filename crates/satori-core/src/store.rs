//! Vector-backed rule store.
//!
//! Rules carry a natural-language description (embedded for semantic
//! ranking) plus exact-match metadata (`action`, `forbidden_in`). The
//! store is an explicitly constructed handle with an init-once, read-many
//! lifecycle: seeding happens before analysis, queries take `&self`, and
//! nothing mutates rule state while a review runs.

use serde::Serialize;

use crate::embedding::{cosine_distance, EmbeddingProvider, HashedTfIdf};

/// Structural scope in which a rule's action is disallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForbiddenContext {
    Loop,
    Conditional,
    Anywhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    High,
}

/// One violation rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub id: String,
    pub description: String,
    /// Exact-match key derived from call fingerprints (e.g. `connect`).
    pub action: String,
    pub forbidden_in: ForbiddenContext,
    pub severity: Severity,
    /// Comma-separated identifier hints folded into the embedded document
    /// to sharpen retrieval for short code snippets.
    pub keywords: String,
}

impl Rule {
    /// The text that gets embedded for this rule.
    pub fn document(&self) -> String {
        if self.keywords.is_empty() {
            self.description.clone()
        } else {
            format!("{} Keywords: {}", self.description, self.keywords)
        }
    }
}

/// Conjunctive exact-equality predicate over rule metadata.
///
/// The matching engine only ever ANDs the two fields it sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleFilter {
    pub action: Option<String>,
    pub forbidden_in: Option<ForbiddenContext>,
}

impl RuleFilter {
    pub fn action(action: &str, forbidden_in: ForbiddenContext) -> Self {
        Self {
            action: Some(action.to_string()),
            forbidden_in: Some(forbidden_in),
        }
    }

    fn matches(&self, rule: &Rule) -> bool {
        if let Some(action) = &self.action {
            if rule.action != *action {
                return false;
            }
        }
        if let Some(forbidden_in) = self.forbidden_in {
            if rule.forbidden_in != forbidden_in {
                return false;
            }
        }
        true
    }
}

/// A query hit: the rule plus its cosine distance from the query text.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub rule: Rule,
    pub distance: f64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    #[error("embedding dimension mismatch: query has {query}, store expects {stored}")]
    DimensionMismatch { query: usize, stored: usize },
}

/// Query surface of a rule store.
///
/// The matching engine depends on this trait rather than the concrete
/// store, so failure handling can be exercised with a test double.
pub trait RuleQuery {
    /// Top-k rules passing `filter`, ranked by ascending cosine distance
    /// between the query text and each rule's document.
    fn query(
        &self,
        text: &str,
        filter: &RuleFilter,
        top_k: usize,
    ) -> Result<Vec<RuleMatch>, QueryError>;
}

struct StoredRule {
    rule: Rule,
    embedding: Vec<f32>,
}

pub struct RuleStore {
    provider: Box<dyn EmbeddingProvider>,
    entries: Vec<StoredRule>,
}

impl RuleStore {
    pub fn new(provider: Box<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            entries: Vec::new(),
        }
    }

    pub fn with_default_provider() -> Self {
        Self::new(Box::new(HashedTfIdf::default()))
    }

    pub fn add(&mut self, rules: impl IntoIterator<Item = Rule>) {
        for rule in rules {
            let embedding = self.provider.embed(&rule.document());
            self.entries.push(StoredRule { rule, embedding });
        }
    }

    pub fn get(&self, ids: &[&str]) -> Vec<&Rule> {
        self.entries
            .iter()
            .filter(|e| ids.contains(&e.rule.id.as_str()))
            .map(|e| &e.rule)
            .collect()
    }

    pub fn delete(&mut self, ids: &[&str]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !ids.contains(&e.rule.id.as_str()));
        before - self.entries.len()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.rule.id.as_str()).collect()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.entries.iter().map(|e| &e.rule)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RuleQuery for RuleStore {
    fn query(
        &self,
        text: &str,
        filter: &RuleFilter,
        top_k: usize,
    ) -> Result<Vec<RuleMatch>, QueryError> {
        let query_embedding = self.provider.embed(text);

        let mut matches: Vec<RuleMatch> = Vec::new();
        for entry in self.entries.iter().filter(|e| filter.matches(&e.rule)) {
            if entry.embedding.len() != query_embedding.len() {
                return Err(QueryError::DimensionMismatch {
                    query: query_embedding.len(),
                    stored: entry.embedding.len(),
                });
            }
            matches.push(RuleMatch {
                rule: entry.rule.clone(),
                distance: cosine_distance(&query_embedding, &entry.embedding),
            });
        }

        matches.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);
        Ok(matches)
    }
}

/// The rule set shipped by default: four canonical rules mirroring the
/// seeded review corpus.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "no-print-in-loop".to_string(),
            description: "Do not call print inside a loop; repeated console output adds I/O \
                          cost on every iteration."
                .to_string(),
            action: "print".to_string(),
            forbidden_in: ForbiddenContext::Loop,
            severity: Severity::Low,
            keywords: "print, logger.info, console.log".to_string(),
        },
        Rule {
            id: "no-connect-in-loop".to_string(),
            description: "Do not open a database connection inside a loop; reuse a single \
                          connection or a pool."
                .to_string(),
            action: "connect".to_string(),
            forbidden_in: ForbiddenContext::Loop,
            severity: Severity::High,
            keywords: "db.connect, connect, new Connection".to_string(),
        },
        Rule {
            id: "no-print-in-conditional".to_string(),
            description: "Do not call print inside a conditional branch; use a logging \
                          framework instead."
                .to_string(),
            action: "print".to_string(),
            forbidden_in: ForbiddenContext::Conditional,
            severity: Severity::Low,
            keywords: "print, logging.debug".to_string(),
        },
        Rule {
            id: "no-eval-in-conditional".to_string(),
            description: "Do not call eval inside a conditional branch; evaluating dynamic \
                          strings is a security risk."
                .to_string(),
            action: "eval".to_string(),
            forbidden_in: ForbiddenContext::Conditional,
            severity: Severity::High,
            keywords: "eval, exec".to_string(),
        },
    ]
}

/// Seed `rules` into `store` exactly once.
///
/// Idempotent: a non-empty store is returned unchanged, so calling this at
/// every startup is safe. Returns the record count after seeding.
pub fn seed_rules(store: &mut RuleStore, rules: Vec<Rule>) -> usize {
    if !store.is_empty() {
        tracing::debug!(count = store.len(), "rule store already seeded");
        return store.len();
    }
    store.add(rules);
    tracing::debug!(count = store.len(), "seeded rule store");
    store.len()
}

/// Seed the default rule set. Idempotent.
pub fn seed_default_rules(store: &mut RuleStore) -> usize {
    seed_rules(store, default_rules())
}
