//! Validate command implementation.

use std::path::PathBuf;

use bspec_archive::open;
use bspec_document::Schema;
use clap::{Parser, ValueHint};
use tracing::debug;

use crate::cli::CommandContext;
use crate::error::CliError;

/// Validate every document of an archive
///
/// Uses `computed/schema.json` when the archive ships one and the built-in schema otherwise.
#[derive(Debug, Parser)]
pub struct ValidateCommand {
    /// Archive file or extracted directory
    #[arg(value_hint = ValueHint::AnyPath)]
    pub path: PathBuf,
}

impl ValidateCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let archive = open(&self.path)?;
        let schema = match archive.schema() {
            Some(schema) => {
                debug!("using schema shipped with the archive");
                schema
            }
            None => Schema::builtin(),
        };

        let mut failed = 0usize;
        for (name, document) in &archive.documents {
            let violations = document.validate(Some(&schema));
            if violations.is_empty() {
                ctx.say(format!("✓ documents/{name}"));
                continue;
            }

            failed += 1;
            println!("✗ documents/{name}");
            for violation in violations {
                println!("    - {violation}");
            }
        }

        if failed > 0 {
            return Err(CliError::validation(format!(
                "{failed} of {} document(s) failed validation",
                archive.documents.len()
            )));
        }

        ctx.say(format!("All {} document(s) valid", archive.documents.len()));
        Ok(())
    }
}
