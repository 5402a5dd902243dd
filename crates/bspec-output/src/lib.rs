//! Rendering of BSpec results as JSON, YAML or Markdown.

mod markdown;

use bspec_archive::{Archive, Manifest};
use bspec_document::Document;
use bspec_query::{ArchiveStats, QueryResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default number of body characters shown per document in listings.
pub const DEFAULT_EXCERPT_LENGTH: usize = 200;

/// Output errors.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Markdown,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "markdown",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(OutputError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Something the formatter can render.
///
/// Structured formats serialize the value directly; Markdown is written by hand.
pub trait Renderable: Serialize {
    fn markdown(&self, excerpt_length: usize) -> String;
}

impl Renderable for QueryResult {
    fn markdown(&self, excerpt_length: usize) -> String {
        markdown::query_result(self, excerpt_length)
    }
}

impl Renderable for Document {
    fn markdown(&self, _excerpt_length: usize) -> String {
        bspec_document::render(self)
    }
}

impl Renderable for ArchiveStats {
    fn markdown(&self, _excerpt_length: usize) -> String {
        markdown::stats(self)
    }
}

/// Archive overview: the manifest plus section counts.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveInfo<'a> {
    pub manifest: &'a Manifest,
    pub document_count: usize,
    pub asset_count: usize,
    pub computed_count: usize,
}

impl<'a> From<&'a Archive> for ArchiveInfo<'a> {
    fn from(archive: &'a Archive) -> Self {
        Self {
            manifest: &archive.manifest,
            document_count: archive.documents.len(),
            asset_count: archive.assets.len(),
            computed_count: archive.computed.len(),
        }
    }
}

impl Renderable for ArchiveInfo<'_> {
    fn markdown(&self, _excerpt_length: usize) -> String {
        markdown::archive_info(self)
    }
}

/// Renders values in one fixed format.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: OutputFormat,
    pretty: bool,
    excerpt_length: usize,
}

impl Formatter {
    /// Build a formatter from a format name; unknown names are rejected here.
    pub fn new(format: &str, pretty: bool) -> Result<Self, OutputError> {
        Ok(Self::with_format(format.parse()?, pretty))
    }

    pub fn with_format(format: OutputFormat, pretty: bool) -> Self {
        Self {
            format,
            pretty,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }

    /// Body characters kept per document in Markdown listings.
    pub fn excerpt_length(mut self, length: usize) -> Self {
        self.excerpt_length = length;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render<T: Renderable + ?Sized>(&self, value: &T) -> Result<String, OutputError> {
        match self.format {
            OutputFormat::Json if self.pretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Markdown => Ok(value.markdown(self.excerpt_length)),
        }
    }

    pub fn format_query_result(&self, result: &QueryResult) -> Result<String, OutputError> {
        self.render(result)
    }

    pub fn format_document(&self, document: &Document) -> Result<String, OutputError> {
        self.render(document)
    }

    pub fn format_archive_info(&self, archive: &Archive) -> Result<String, OutputError> {
        self.render(&ArchiveInfo::from(archive))
    }

    pub fn format_stats(&self, stats: &ArchiveStats) -> Result<String, OutputError> {
        self.render(stats)
    }
}
