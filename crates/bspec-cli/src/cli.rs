//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use bspec_common_config::{BspecConfig, ConfigLoader};
use bspec_output::Formatter;
use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::commands::{
    ExtractCommand, InitCommand, OpenCommand, PackCommand, QueryCommand, ValidateCommand,
};
use crate::error::CliError;

/// BSpec - business specification archives
///
/// Create, pack, extract, inspect and query `.bspec` archives.
#[derive(Debug, Parser)]
#[command(
    name = "bspec",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        long,
        global = true,
        env = "BSPEC_CONFIG",
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        value_name = "FORMAT",
        help = "Output format (json, yaml, markdown)"
    )]
    pub output: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true, overrides_with = "no_pretty")]
    pub pretty: bool,

    /// Compact JSON output
    #[arg(long, global = true, overrides_with = "pretty")]
    pub no_pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize a new BSpec project directory
    #[command(visible_alias = "new")]
    Init(InitCommand),

    /// Pack a project directory into a .bspec archive
    Pack(PackCommand),

    /// Extract a .bspec archive into a directory
    Extract(ExtractCommand),

    /// Show archive information, documents or statistics
    Open(OpenCommand),

    /// Filter, sort and project archive documents
    Query(QueryCommand),

    /// Validate every document in an archive
    Validate(ValidateCommand),

    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsCommand),
}

/// Shell completions generation
#[derive(Debug, Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

impl Cli {
    /// Load configuration from `--config`, or from `.bspec/config.yaml` under the current directory
    pub fn load_config(&self) -> Result<BspecConfig, CliError> {
        let loader = match &self.config {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::default(),
        };
        Ok(loader.load()?)
    }

    /// Execute the selected command
    pub fn execute(self, mut config: BspecConfig) -> Result<(), CliError> {
        if let Some(format) = self.output {
            config.output.format = format;
        }
        if self.pretty {
            config.output.pretty = true;
        } else if self.no_pretty {
            config.output.pretty = false;
        }

        let ctx = CommandContext {
            config,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        match self.command {
            Command::Init(cmd) => cmd.execute(&ctx),
            Command::Pack(cmd) => cmd.execute(&ctx),
            Command::Extract(cmd) => cmd.execute(&ctx),
            Command::Open(cmd) => cmd.execute(&ctx),
            Command::Query(cmd) => cmd.execute(&ctx),
            Command::Validate(cmd) => cmd.execute(&ctx),
            Command::Completions(cmd) => cmd.execute(&ctx),
        }
    }
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, _ctx: &CommandContext) -> Result<(), CliError> {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(self.shell, &mut cmd, name, &mut io::stdout());
        Ok(())
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: BspecConfig,
    pub verbose: u8,
    pub quiet: bool,
}

impl CommandContext {
    /// Formatter for the configured output format
    ///
    /// Built on demand so commands that print no rendered output never fail on a bad format name.
    pub fn formatter(&self) -> Result<Formatter, CliError> {
        let output = &self.config.output;
        Ok(Formatter::new(&output.format, output.pretty)?.excerpt_length(output.excerpt_length))
    }

    /// Print a status line unless `--quiet`
    pub fn say(&self, line: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", line.as_ref());
        }
    }

    /// Write rendered output to stdout, newline-terminated
    pub fn emit(&self, rendered: &str) {
        if rendered.ends_with('\n') {
            print!("{rendered}");
        } else {
            println!("{rendered}");
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }
}
