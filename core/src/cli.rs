use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::session::Session;

/// Required extension for program files
pub const PROGRAM_EXTENSION: &str = "qut";

/// The REPL could not read its next line
#[derive(Debug, thiserror::Error)]
#[error("An error occurred while reading the command line: {0}")]
pub struct LineReadError(#[from] io::Error);

const BANNER: &str = ">> Welcome to the QUT language! for exit, just type exit!!";
const PROMPT: &str = ">> ";

#[derive(Parser)]
#[command(name = "qut")]
#[command(about = "QUT - an interpreter for the QUT tape language", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of tape cells (overrides config file and env vars)
    #[arg(long, global = true)]
    pub tape_length: Option<usize>,

    /// Trace tokenization and every executed step to stderr
    #[arg(long, global = true)]
    pub trace: bool,

    /// Subcommand to run; starts the REPL when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a .qut program file
    Run {
        /// Program file (must end in .qut)
        file: PathBuf,

        /// Print the final machine state as JSON to stderr
        #[arg(long)]
        dump_state: bool,
    },

    /// Start an interactive session
    Repl,

    /// Print the effective configuration as TOML
    Config,
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli)
}

/// Process exit status for an error returned by [`run_cli`]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.is::<LineReadError>() {
        2
    } else {
        1
    }
}

/// Build the effective configuration for a parsed command line
pub fn load_config(cli: &Cli) -> Result<Config> {
    Config::builder()
        .config_path(cli.config.clone())
        .tape_length(cli.tape_length)
        .trace(cli.trace.then_some(true))
        .build()
        .context("Failed to load configuration")
}

fn run_cli_with_args(cli: Cli) -> Result<()> {
    // Eagerly load and validate configuration before executing any command
    let config = load_config(&cli)?;
    init_tracing(config.trace);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Run { file, dump_state } => run_file(&file, config, dump_state),
        Commands::Repl => run_repl(config),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over the trace flag
fn init_tracing(trace: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if trace { "warn,qut::trace=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .try_init();
}

/// Reject paths that do not carry the `.qut` extension
pub fn check_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(PROGRAM_EXTENSION) => Ok(()),
        _ => bail!("This is not a qut file."),
    }
}

fn run_file(path: &Path, config: Config, dump_state: bool) -> Result<()> {
    check_extension(path)?;
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    tracing::info!(file = %path.display(), tape_length = config.tape_length, "running program");

    let mut session = Session::new(config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = session.execute(&source, &mut stdin.lock(), &mut stdout.lock());

    if dump_state {
        let state = serde_json::to_string_pretty(session.machine())?;
        eprintln!("{}", state);
    }

    let result = outcome?;
    tracing::info!(steps = result.steps, "program finished");
    Ok(())
}

fn run_repl(config: Config) -> Result<()> {
    let mut session = Session::new(config)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();

    println!("{}", BANNER);

    let mut line = String::new();
    loop {
        print!("{}", PROMPT);
        stdout.lock().flush()?;

        line.clear();
        let read = input.read_line(&mut line).map_err(LineReadError)?;
        if read == 0 {
            // EOF ends the session like `exit`
            println!();
            return Ok(());
        }

        let text = line.trim();
        match repl_command(text) {
            ReplCommand::Exit => return Ok(()),
            ReplCommand::Skip => continue,
            ReplCommand::Program => {}
        }

        let outcome = session.execute(text, &mut input, &mut stdout.lock());
        if let Err(err) = outcome {
            println!();
            println!("ERROR: {}", err);
            tracing::debug!(?err, "repl command failed");
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Skip,
    Program,
}

fn repl_command(text: &str) -> ReplCommand {
    match text.split_whitespace().next() {
        None => ReplCommand::Skip,
        Some("exit") => ReplCommand::Exit,
        Some(_) => ReplCommand::Program,
    }
}
