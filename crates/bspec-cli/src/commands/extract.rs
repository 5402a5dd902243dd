//! Extract command implementation.

use std::path::{Path, PathBuf};

use bspec_archive::archive::{ASSETS_DIR, COMPUTED_DIR, DOCUMENTS_DIR};
use bspec_archive::{extract, MANIFEST_FILE};
use bspec_common_core::ResultExt;
use clap::{Parser, ValueHint};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Extract a `.bspec` archive into a directory
#[derive(Debug, Parser)]
pub struct ExtractCommand {
    /// Archive file to extract
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Destination directory (defaults to the archive's file stem)
    #[arg(value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Replace an existing destination directory
    #[arg(short, long)]
    pub force: bool,
}

impl ExtractCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        if !self.file.is_file() {
            return Err(CliError::not_found("archive", &self.file));
        }

        let output_dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => default_output_dir(&self.file),
        };

        if output_dir.exists() {
            if !self.force {
                return Err(CliError::user_with_hint(
                    format!("output directory already exists: {}", output_dir.display()),
                    "use --force to overwrite",
                ));
            }
            std::fs::remove_dir_all(&output_dir).with_path(&output_dir)?;
        }

        let entries = extract(&self.file, &output_dir)?;
        ctx.say(format!(
            "Successfully extracted {} to {}",
            self.file.display(),
            output_dir.display()
        ));

        if ctx.is_verbose() {
            print_summary(&output_dir, entries)?;
        }
        Ok(())
    }
}

fn default_output_dir(file: &Path) -> PathBuf {
    file.file_stem()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("archive"))
}

fn print_summary(dir: &Path, entries: usize) -> Result<(), CliError> {
    println!("\nExtraction Summary:");
    if dir.join(MANIFEST_FILE).is_file() {
        println!("  ✓ {MANIFEST_FILE}");
    }
    for section in [DOCUMENTS_DIR, ASSETS_DIR, COMPUTED_DIR] {
        let path = dir.join(section);
        if path.is_dir() {
            let count = bspec_common_fs::walk_files(&path)?.len();
            println!("  ✓ {section}/ ({count} files)");
        }
    }
    println!("  {entries} entries written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir_is_file_stem() {
        assert_eq!(default_output_dir(Path::new("out/plan.bspec")), PathBuf::from("plan"));
        assert_eq!(default_output_dir(Path::new("plan")), PathBuf::from("plan"));
    }
}
