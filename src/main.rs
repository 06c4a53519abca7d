// Lua Simples: syntax checker for a teaching subset of Lua

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use lua_simples::config::{Loader, Settings};
use lua_simples::driver::{self, DriverError, SourceUnit};
use lua_simples::parser::Mode;

#[derive(Parser, Debug)]
#[command(name = "lua-simples", version, about = "Check Lua Simples sources for syntax errors")]
struct Cli {
    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate one or more source files
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Report every error, resynchronizing after each one
        #[arg(long, conflicts_with = "strict")]
        recover: bool,

        /// Stop at the first error in each file
        #[arg(long)]
        strict: bool,

        /// Maximum nesting of blocks and parentheses
        #[arg(long)]
        max_depth: Option<usize>,

        /// Configuration file layered over the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the token stream of a source file
    Tokens { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Returns whether every unit was accepted.
fn run(command: Command) -> Result<bool, DriverError> {
    match command {
        Command::Check {
            files,
            recover,
            strict,
            max_depth,
            config,
        } => {
            let mode = match (recover, strict) {
                (true, _) => Some(Mode::Recover),
                (_, true) => Some(Mode::Strict),
                _ => None,
            };
            let settings = load_settings(config.as_deref(), mode, max_depth)?;

            let units = files
                .iter()
                .map(|path| SourceUnit::load(path, settings.input.max_source_bytes))
                .collect::<Result<Vec<_>, _>>()?;

            let report = driver::check_units(&units, &settings.options());
            print!("{}", report);
            Ok(report.all_accepted())
        }
        Command::Tokens { file } => {
            let settings = load_settings(None, None, None)?;
            let unit = SourceUnit::load(&file, settings.input.max_source_bytes)?;
            print!("{}", driver::dump_tokens(&unit.text));
            Ok(true)
        }
    }
}

fn load_settings(
    config: Option<&Path>,
    mode: Option<Mode>,
    max_depth: Option<usize>,
) -> Result<Settings, DriverError> {
    let mut loader = Loader::new().with_project_file(".");
    if let Some(path) = config {
        loader = loader.with_file(path);
    }
    if let Some(mode) = mode {
        loader = loader.mode(mode)?;
    }
    if let Some(depth) = max_depth {
        loader = loader.max_depth(depth)?;
    }
    Ok(loader.build()?)
}
