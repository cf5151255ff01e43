//! Satori CLI - Command-line interface for the satori review engine
//!
//! Context-aware static rule matcher: flags suspicious calls by the
//! structural scope they appear in, backed by semantic rule retrieval.

mod commands;
mod output;

use clap::Parser;
use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "satori",
    author,
    version,
    about = "Context-aware static rule matcher",
    long_about = "Satori reviews source files against a corpus of natural-language\n\
                  violation rules. Each call is matched in the structural context it\n\
                  appears in (loop, conditional branch, or top level), combining exact\n\
                  metadata filtering with semantic-similarity ranking."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => args.run(),
        Commands::Rules(args) => args.run(),
    }
}
