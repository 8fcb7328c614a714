//! teamcard - Command-line tool for rendering team shorthand into team card images

use std::process::ExitCode;

use teamcard::cli;

fn main() -> ExitCode {
    cli::run()
}
