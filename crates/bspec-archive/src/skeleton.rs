//! New project skeleton.

use crate::archive::{ASSETS_DIR, COMPUTED_DIR, DOCUMENTS_DIR};
use crate::manifest::{ConformanceLevel, IndustryProfile, Manifest, MANIFEST_FILE};
use bspec_common_core::{Error, Result, ResultExt};
use bspec_common_fs as fs;
use bspec_document::{render, Document, DocumentStatus, MetadataValue};
use std::path::Path;
use tracing::info;

/// Options for [`init_project`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Project name; defaults to the directory's file name.
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub conformance_level: ConformanceLevel,
    pub industry_profile: IndustryProfile,
    /// Write the mission and vision sample documents.
    pub samples: bool,
    /// Replace an existing directory.
    pub force: bool,
}

const GITIGNORE: &str = "\
# BSpec generated files
*.bspec
computed/

# OS files
.DS_Store
Thumbs.db

# Editor files
.vscode/
.idea/
*.swp
*.swo
*~

# Logs
*.log

# Temporary files
*.tmp
*.temp
";

/// Create a project directory with an empty manifest and section directories.
pub fn init_project(dir: impl AsRef<Path>, options: &InitOptions) -> Result<Manifest> {
    let dir = dir.as_ref();

    if dir.exists() {
        if !options.force {
            return Err(Error::config(format!(
                "directory already exists: {} (use --force to overwrite)",
                dir.display()
            )));
        }
        std::fs::remove_dir_all(dir).with_path(dir)?;
    }

    for section in [DOCUMENTS_DIR, ASSETS_DIR, COMPUTED_DIR] {
        fs::ensure_dir(dir.join(section))?;
    }

    let name = options.name.clone().unwrap_or_else(|| {
        dir.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bspec-project".to_string())
    });

    let mut manifest = Manifest::new(&name);
    if let Some(description) = options.description.as_deref().filter(|d| !d.is_empty()) {
        manifest.description = description.to_string();
    }
    if let Some(author) = options.author.as_deref().filter(|a| !a.is_empty()) {
        manifest.author = author.to_string();
    }
    manifest.conformance_level = options.conformance_level;
    manifest.industry_profile = options.industry_profile;

    let json = manifest
        .to_json()
        .map_err(|e| Error::serialization(e.to_string()))?;
    fs::write_string_atomic(dir.join(MANIFEST_FILE), &json)?;

    if options.samples {
        for (file, doc) in sample_documents() {
            fs::write_string_atomic(dir.join(DOCUMENTS_DIR).join(file), &render(&doc))?;
        }
    }

    fs::write_string_atomic(dir.join("README.md"), &readme(&name, &manifest.description))?;
    fs::write_string_atomic(dir.join(".gitignore"), GITIGNORE)?;

    info!(path = %dir.display(), samples = options.samples, "initialized project");
    Ok(manifest)
}

fn sample_documents() -> Vec<(&'static str, Document)> {
    let mission = Document::builder("MSN", "MSN-mission-001")
        .title("Organization Mission Statement")
        .owner("Leadership Team")
        .status(DocumentStatus::Draft)
        .domain("strategic")
        .metadata(
            "success_criteria",
            vec!["Mission statement approved by leadership"],
        )
        .content(
            "# Organization Mission Statement\n\n## Purpose\n\n\
             Define the core purpose and mission of the organization.\n\n\
             ## Mission\n\n[Define your organization's mission here]\n\n\
             ## Values\n\n[List your organization's core values here]\n",
        )
        .build();

    let vision = Document::builder("VSN", "VSN-vision-001")
        .title("Organization Vision")
        .owner("Leadership Team")
        .status(DocumentStatus::Draft)
        .domain("strategic")
        .metadata("related", vec![MetadataValue::from("MSN-mission-001")])
        .metadata("success_criteria", vec!["Vision shared across all teams"])
        .content(
            "# Organization Vision\n\n## Vision Statement\n\n\
             [Define your organization's vision statement here]\n\n\
             ## Strategic Goals\n\n[List key strategic goals that support the vision]\n\n\
             ## Success Metrics\n\n[Define how success will be measured]\n",
        )
        .build();

    vec![
        ("MSN-mission-v1.0.0.md", mission),
        ("VSN-vision-v1.0.0.md", vision),
    ]
}

fn readme(name: &str, description: &str) -> String {
    format!(
        "# {name}\n\n{description}\n\n## About\n\n\
         This is a BSpec (Business Specification Standard) project that documents business \
         requirements, architecture, and processes.\n\n\
         ## Structure\n\n\
         - **documents/**: BSpec document files (.md)\n\
         - **assets/**: Static assets (images, diagrams, etc.)\n\
         - **computed/**: Computed analysis files (.json)\n\
         - **manifest.json**: Project metadata\n\n\
         ## Getting Started\n\n\
         ```bash\n\
         # Query documents\n\
         bspec query . --type MSN\n\n\
         # Pack into a .bspec file\n\
         bspec pack . {name}.bspec\n\n\
         # Extract a .bspec file\n\
         bspec extract {name}.bspec\n\
         ```\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::read_directory;
    use bspec_common_core::ErrorCategory;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_layout() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("acme");
        let manifest = init_project(&dir, &InitOptions::default()).unwrap();

        assert_eq!(manifest.name, "acme");
        assert_eq!(manifest.description, "BSpec project: acme");
        for entry in ["manifest.json", "README.md", ".gitignore"] {
            assert!(dir.join(entry).is_file(), "{entry}");
        }
        for section in ["documents", "assets", "computed"] {
            assert!(dir.join(section).is_dir(), "{section}");
        }

        let archive = read_directory(&dir).unwrap();
        assert!(archive.documents.is_empty());
        assert_eq!(archive.manifest, manifest);
    }

    #[test]
    fn test_init_samples_validate_cleanly() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("acme");
        let options = InitOptions {
            author: Some("Ada".into()),
            conformance_level: ConformanceLevel::Gold,
            samples: true,
            ..Default::default()
        };
        init_project(&dir, &options).unwrap();

        let archive = read_directory(&dir).unwrap();
        assert_eq!(archive.manifest.author, "Ada");
        assert_eq!(archive.manifest.conformance_level, ConformanceLevel::Gold);
        assert_eq!(archive.documents.len(), 2);
        for (path, doc) in &archive.documents {
            assert_eq!(doc.validate(None), Vec::<String>::new(), "{path}");
        }
    }

    #[test]
    fn test_init_existing_requires_force() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("acme");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("stale.txt"), "old").unwrap();

        let err = init_project(&dir, &InitOptions::default()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);

        let options = InitOptions {
            force: true,
            ..Default::default()
        };
        init_project(&dir, &options).unwrap();
        assert!(!dir.join("stale.txt").exists());
    }
}
