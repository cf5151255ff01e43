//! CLI subcommands.

mod check;
mod rules;

pub use check::CheckArgs;
pub use rules::RulesArgs;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review a source file against the rule corpus
    Check(CheckArgs),
    /// List the active rule set
    Rules(RulesArgs),
}
