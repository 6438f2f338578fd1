//! modlock CLI - MODULE.bazel.lock engine
//!
//! Entry point for the modlock command-line application.

use clap::Parser;

use modlock::cli::output::display_error;
use modlock::cli::Cli;

fn main() {
    let cli = Cli::parse();
    cli.output_config().init_tracing();

    // Run the command and handle errors
    if let Err(e) = cli.run() {
        display_error(&e);
        std::process::exit(1);
    }
}
