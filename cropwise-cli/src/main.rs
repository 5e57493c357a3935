// cropwise-cli/src/main.rs
//
// Entry point of the `cropwise` binary.
//
// Responsibilities:
// - Parsing command-line arguments (`Cli`, `Commands`).
// - Initializing logging.
// - Dispatching to the command implementations.
// - Mapping errors to a message on stderr and a non-zero exit status.

use clap::Parser;
use cropwise_cli::terminal::print_error;
use cropwise_cli::{Cli, Commands, logging, run_detect, run_tracks};
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Tracks(args) => run_tracks(args),
        Commands::Detect(args) => run_detect(args),
    };

    if let Err(e) = result {
        print_error(&format!("Error: {:#}", e));
        process::exit(1);
    }
}
