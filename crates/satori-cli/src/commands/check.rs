//! Check command - reviews a source file for rule violations

use std::path::{Path, PathBuf};

use clap::Args;
use satori_core::{Config, ReviewEngine, CONFIG_FILENAME};

use crate::output::{JsonFormatter, PrettyFormatter};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the source file to review
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format for the report
    #[arg(short, long, default_value = "pretty", value_parser = ["pretty", "json"])]
    pub format: String,

    /// Path to a satori.toml configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CheckArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let source = std::fs::read_to_string(&self.path)?;

        let engine = ReviewEngine::with_config(&config);
        let report = engine.review(&source)?;

        let rendered = match self.format.as_str() {
            "json" => JsonFormatter::new().format(&report)?,
            _ => PrettyFormatter::new().format(&report),
        };
        println!("{rendered}");

        if !report.is_clean() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => {
                let default = Path::new(CONFIG_FILENAME);
                if !default.exists() {
                    return Ok(Config::default());
                }
                default.to_path_buf()
            }
        };

        let result = Config::load_from_path(&path)?;
        for warning in &result.warnings {
            eprintln!("warning: {warning}");
        }
        Ok(result.config)
    }
}
