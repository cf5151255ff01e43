//! Rules command - lists the seeded rule set

use clap::Args;
use colored::Colorize;
use satori_core::store::{default_rules, ForbiddenContext};
use satori_core::Severity;

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Emit the rule set as JSON
    #[arg(long)]
    pub json: bool,
}

impl RulesArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let rules = default_rules();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rules)?);
            return Ok(());
        }

        for rule in &rules {
            let severity = match rule.severity {
                Severity::High => "high".red().bold(),
                Severity::Low => "low".yellow().bold(),
            };
            let scope = match rule.forbidden_in {
                ForbiddenContext::Loop => "loop",
                ForbiddenContext::Conditional => "conditional",
                ForbiddenContext::Anywhere => "anywhere",
            };
            println!(
                "{} [{severity}] {} forbidden in {scope}",
                rule.id.bold(),
                rule.action
            );
            println!("  {}", rule.description.dimmed());
        }
        Ok(())
    }
}
