//! Pack command implementation.

use std::path::{Path, PathBuf};

use bspec_archive::{pack_file, validate_source_directory, PackSummary, EXTENSION};
use clap::{Parser, ValueHint};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Pack a project directory into a `.bspec` archive
#[derive(Debug, Parser)]
pub struct PackCommand {
    /// Project directory to pack
    #[arg(value_hint = ValueHint::DirPath)]
    pub source: PathBuf,

    /// Output file (defaults to `<source name>.bspec`)
    #[arg(value_name = "OUTPUT", value_hint = ValueHint::FilePath)]
    pub archive: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,
}

impl PackCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        validate_source_directory(&self.source)?;

        let output = output_path(&self.source, self.archive.as_deref());
        if output.exists() && !self.force {
            return Err(CliError::user_with_hint(
                format!("output file already exists: {}", output.display()),
                "use --force to overwrite",
            ));
        }

        let summary = pack_file(&self.source, &output)?;
        ctx.say(format!(
            "Successfully packed {} to {}",
            self.source.display(),
            output.display()
        ));

        if ctx.is_verbose() {
            print_summary(&self.source, &output, &summary);
        }
        Ok(())
    }
}

/// Explicit output with the `.bspec` extension enforced, or `<source name>.bspec`.
fn output_path(source: &Path, output: Option<&Path>) -> PathBuf {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "archive".to_string());
            PathBuf::from(name)
        }
    };

    if path.extension().is_some_and(|ext| ext == EXTENSION) {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".");
        name.push(EXTENSION);
        PathBuf::from(name)
    }
}

fn print_summary(source: &Path, output: &Path, summary: &PackSummary) {
    println!("\nPacking Summary:");
    println!("Source: {}", source.display());
    println!("  ✓ manifest.json");
    println!("  ✓ documents/ ({} files)", summary.documents);
    println!("  ✓ assets/ ({} files)", summary.assets);
    println!("  ✓ computed/ ({} files)", summary.computed);
    println!(
        "  {} files, {} directories, {} bytes uncompressed",
        summary.files, summary.directories, summary.content_bytes
    );
    if let Some(bytes) = summary.archive_bytes {
        println!("\nOutput: {} ({:.2} KB)", output.display(), bytes as f64 / 1024.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_uses_source_name() {
        assert_eq!(output_path(Path::new("plans/acme"), None), PathBuf::from("acme.bspec"));
        assert_eq!(output_path(Path::new(".."), None), PathBuf::from("archive.bspec"));
    }

    #[test]
    fn test_extension_is_enforced() {
        assert_eq!(
            output_path(Path::new("acme"), Some(Path::new("out/plan"))),
            PathBuf::from("out/plan.bspec")
        );
        assert_eq!(
            output_path(Path::new("acme"), Some(Path::new("plan.bspec"))),
            PathBuf::from("plan.bspec")
        );
        assert_eq!(
            output_path(Path::new("acme"), Some(Path::new("plan.tar"))),
            PathBuf::from("plan.tar.bspec")
        );
    }
}
