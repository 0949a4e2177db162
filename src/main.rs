//! rfs CLI entrypoint

use clap::Parser;

use refined_search::cli::Cli;
use refined_search::output;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        output::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}
