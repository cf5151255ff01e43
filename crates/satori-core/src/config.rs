//! Configuration loading and parsing for satori
//!
//! Provides functionality to load and parse `satori.toml` configuration
//! files. Everything has a default, so a missing file is never an error
//! for callers that use [`Config::default`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::matcher::{MatchConfig, DEFAULT_MAX_DISTANCE};

pub const CONFIG_FILENAME: &str = "satori.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["match", "rules"];
const KNOWN_MATCH_KEYS: &[&str] = &["max_distance", "top_k"];
const KNOWN_RULES_KEYS: &[&str] = &["disabled"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "match")]
    pub matching: MatchSection,
    pub rules: RulesSection,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchSection {
    pub max_distance: f64,
    pub top_k: usize,
}

impl Default for MatchSection {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            top_k: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesSection {
    /// Rule ids excluded at seed time.
    pub disabled: Vec<String>,
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<ConfigResult, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<ConfigResult, ConfigError> {
        let value: toml::Value =
            toml::from_str(contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let warnings = collect_unknown_key_warnings(&value);

        let config: Config = value.try_into().map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(ConfigResult { config, warnings })
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            max_distance: self.matching.max_distance,
            top_k: self.matching.top_k,
        }
    }
}

fn collect_unknown_key_warnings(value: &toml::Value) -> Vec<String> {
    let mut warnings = Vec::new();
    let Some(table) = value.as_table() else {
        return warnings;
    };

    for key in table.keys() {
        if !KNOWN_TOP_LEVEL_KEYS.contains(&key.as_str()) {
            warnings.push(format!("Unknown configuration key '{key}'"));
        }
    }
    for (section, known) in [("match", KNOWN_MATCH_KEYS), ("rules", KNOWN_RULES_KEYS)] {
        if let Some(section_table) = table.get(section).and_then(|v| v.as_table()) {
            for key in section_table.keys() {
                if !known.contains(&key.as_str()) {
                    warnings.push(format!("Unknown configuration key '{section}.{key}'"));
                }
            }
        }
    }

    warnings
}
