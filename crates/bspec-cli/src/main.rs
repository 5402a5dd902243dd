//! BSpec CLI
//!
//! Main entry point for the `bspec` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

mod cli;
mod commands;
mod error;

use bspec_common_config::BspecConfig;
use bspec_common_log::{LogConfig, LogFormat, LogLevel};
use cli::Cli;
use error::CliError;

/// Application exit codes
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    FormatError = 4,
    ValidationError = 5,
    NotFound = 6,
    Security = 7,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            error::report(&e);
            e.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.load_config()?;
    init_logging(&cli, &config);
    debug!(format = %config.output.format, "configuration loaded");

    cli.execute(config)
}

/// Config file first, then `BSPEC_LOG_*`, then `-v`/`-q`.
fn init_logging(cli: &Cli, config: &BspecConfig) {
    let mut log = LogConfig::default()
        .with_format(LogFormat::parse(&config.log.format))
        .with_level(LogLevel::parse(&config.log.level).unwrap_or_default())
        .with_env();

    if cli.verbose > 0 || cli.quiet {
        log = log.with_level(LogLevel::from_verbosity(cli.verbose, cli.quiet));
    }

    if let Err(e) = bspec_common_log::init(log) {
        eprintln!("warning: {e}");
    }
}
