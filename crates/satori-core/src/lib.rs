//! satori-core — context-aware static rule matcher.
//!
//! Pipeline: parse source text, tag every construct with its enclosing
//! structural context (loop / conditional / neither), match call-like
//! constructs against a seeded corpus of natural-language violation rules
//! (exact metadata filter AND semantic-similarity rank), and aggregate
//! the hits into an ordered report.
//!
//! ```
//! use satori_core::review_code;
//!
//! let report = review_code("for i in range(5):\n    db.connect()\n").unwrap();
//! assert_eq!(report.summary.high, 1);
//! ```

pub mod analyzer;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod matcher;
pub mod parser;
pub mod report;
pub mod reviewer;
pub mod store;

pub use analyzer::{analyze, ContextState, NodeDescriptor, NodeKind};
pub use config::{Config, ConfigError, CONFIG_FILENAME};
pub use engine::{initialize_rule_store, review_code, ReviewEngine, ReviewError};
pub use matcher::MatchConfig;
pub use parser::{ParseError, PythonParser};
pub use report::{AnalysisReport, TriggeringContext, Violation};
pub use reviewer::{NarrativeReviewer, ReviewerError};
pub use store::{
    default_rules, seed_default_rules, ForbiddenContext, Rule, RuleStore, Severity,
};
