//! Init command implementation.

use std::path::{Path, PathBuf};

use bspec_archive::{init_project, ConformanceLevel, IndustryProfile, InitOptions};
use clap::{Parser, ValueHint};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Initialize a new BSpec project
#[derive(Debug, Parser)]
pub struct InitCommand {
    /// Project directory to create
    #[arg(value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Project author
    #[arg(short, long)]
    pub author: Option<String>,

    /// Project description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Conformance level (bronze, silver, gold)
    #[arg(short, long)]
    pub conformance: Option<ConformanceLevel>,

    /// Industry profile (software-saas, physical-product, service-business, nonprofit)
    #[arg(short, long)]
    pub industry: Option<IndustryProfile>,

    /// Include sample mission and vision documents
    #[arg(short, long)]
    pub samples: bool,

    /// Replace an existing directory
    #[arg(short, long)]
    pub force: bool,
}

impl InitCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let project = &ctx.config.project;

        let conformance_level = match self.conformance {
            Some(level) => level,
            None => project
                .conformance_level
                .parse()
                .map_err(|e| config_value_error("project.conformance_level", e))?,
        };
        let industry_profile = match self.industry {
            Some(profile) => profile,
            None => project
                .industry_profile
                .parse()
                .map_err(|e| config_value_error("project.industry_profile", e))?,
        };

        let options = InitOptions {
            name: None,
            description: self.description.clone(),
            author: Some(self.author.clone().unwrap_or_else(|| project.author.clone())),
            conformance_level,
            industry_profile,
            samples: self.samples,
            force: self.force,
        };

        let manifest = init_project(&self.dir, &options)?;
        ctx.say(format!("Successfully initialized BSpec project: {}", manifest.name));

        if ctx.is_verbose() {
            print_structure(&self.dir)?;
        }
        Ok(())
    }
}

fn config_value_error(key: &str, err: impl std::fmt::Display) -> CliError {
    CliError::Config {
        message: format!("invalid {key} in configuration: {err}"),
        hint: None,
    }
}

fn print_structure(dir: &Path) -> Result<(), CliError> {
    println!("\nProject Structure:");
    println!("{}/", dir.display());
    println!("├── manifest.json");
    println!("├── README.md");
    println!("├── .gitignore");
    println!("├── documents/");
    for file in bspec_common_fs::walk_files(dir.join("documents"))? {
        println!("│   ├── {}", file.display());
    }
    println!("├── assets/");
    println!("└── computed/");

    println!("\nNext Steps:");
    println!("1. cd {}", dir.display());
    println!("2. Edit documents in the documents/ directory");
    println!("3. Use 'bspec query .' to explore your documents");
    println!("4. Use 'bspec pack .' to create a .bspec archive");
    Ok(())
}
