/// QUT command line front end
///
/// Runs a `.qut` program file, or starts an interactive session when no
/// subcommand is given.
use qut_core::cli;

fn main() {
    if let Err(e) = cli::run_cli() {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(cli::exit_code(&e));
    }
}
