//! Open command implementation.

use std::path::PathBuf;

use bspec_archive::open;
use bspec_query::{Query, QueryEngine};
use clap::{ArgGroup, Parser, ValueHint};
use tracing::debug;

use crate::cli::CommandContext;
use crate::error::CliError;

/// Show archive information, the document list or statistics
#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("view").args(["info", "list", "stats"])))]
pub struct OpenCommand {
    /// Archive file or extracted directory
    #[arg(value_hint = ValueHint::AnyPath)]
    pub path: PathBuf,

    /// Show manifest and content counts (default)
    #[arg(short, long)]
    pub info: bool,

    /// List all documents
    #[arg(short, long)]
    pub list: bool,

    /// Show document statistics
    #[arg(short, long)]
    pub stats: bool,
}

impl OpenCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let formatter = ctx.formatter()?;
        let archive = open(&self.path)?;
        debug!(documents = archive.documents.len(), "archive opened");

        let rendered = if self.list {
            let result = QueryEngine::new(&archive).execute(&Query::default());
            formatter.format_query_result(&result)?
        } else if self.stats {
            formatter.format_stats(&QueryEngine::new(&archive).stats())?
        } else {
            formatter.format_archive_info(&archive)?
        };

        ctx.emit(&rendered);
        Ok(())
    }
}
