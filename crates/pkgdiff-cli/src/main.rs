//! pkgdiff CLI
//!
//! Command-line interface for comparing two export snapshots

use clap::Parser;
use pkgdiff_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "pkgdiff")]
#[command(
    about = "pkgdiff - compare two record export snapshots",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    compare: commands::compare::CompareArgs,

    /// Emit JSON structured logs instead of human-readable ones
    #[arg(long)]
    log_json: bool,
}

fn main() {
    let cli = Cli::parse();

    init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = commands::compare::execute(cli.compare);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
