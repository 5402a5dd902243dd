//! The canonical document record.

use crate::metadata::{Metadata, MetadataValue};
use crate::registry::{TypeRegistry, TypeSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Frontmatter keys mapped onto first-class [`Document`] fields.
pub mod keys {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const TYPE: &str = "type";
    pub const STATUS: &str = "status";
    pub const VERSION: &str = "version";
    pub const OWNER: &str = "owner";
    pub const CREATED: &str = "created";
    pub const UPDATED: &str = "updated";
    pub const DOMAIN: &str = "domain";

    /// Well-known keys in canonical frontmatter order.
    pub const ALL: [&str; 9] = [ID, TITLE, TYPE, STATUS, VERSION, OWNER, CREATED, UPDATED, DOMAIN];
}

/// List-valued fields of the base schema, seeded empty by [`DocumentBuilder`].
pub const LIST_FIELDS: &[&str] = &[
    "stakeholders",
    "reviewers",
    "contributors",
    "depends_on",
    "enables",
    "conflicts_with",
    "related",
    "assumptions",
    "constraints",
    "success_criteria",
    "risks",
    "metrics",
    "resources_required",
    "tags",
    "industry",
    "geography",
];

/// Default version for new documents.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    Draft,
    Review,
    Accepted,
    Deprecated,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 4] = [Self::Draft, Self::Review, Self::Accepted, Self::Deprecated];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Review => "Review",
            Self::Accepted => "Accepted",
            Self::Deprecated => "Deprecated",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid status value: {s}"))
    }
}

/// One specification document.
///
/// Scalar fields hold the raw frontmatter text so that malformed records can
/// still be loaded and reported by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub status: String,
    pub version: String,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    #[serde(default)]
    pub content: String,
}

impl Document {
    /// Start building a new document with creation defaults.
    pub fn builder(doc_type: impl Into<String>, id: impl Into<String>) -> DocumentBuilder {
        DocumentBuilder::new(doc_type, id)
    }

    /// Parsed status, if it is one of the canonical values.
    pub fn status_kind(&self) -> Option<DocumentStatus> {
        self.status.parse().ok()
    }

    /// Value of a well-known scalar field by frontmatter key.
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            keys::ID => Some(&self.id),
            keys::TITLE => Some(&self.title),
            keys::TYPE => Some(&self.doc_type),
            keys::STATUS => Some(&self.status),
            keys::VERSION => Some(&self.version),
            keys::OWNER => Some(&self.owner),
            keys::CREATED => self.created.as_deref(),
            keys::UPDATED => self.updated.as_deref(),
            keys::DOMAIN => self.domain.as_deref(),
            _ => None,
        }
    }

    /// List-valued metadata entry; absent or non-list keys yield an empty slice.
    pub fn list(&self, key: &str) -> &[MetadataValue] {
        self.metadata
            .get(key)
            .and_then(|v| v.as_list().ok())
            .unwrap_or(&[])
    }

    /// Registry row for this document's type code.
    pub fn type_spec(&self) -> Option<&'static TypeSpec> {
        TypeRegistry::builtin().lookup(&self.doc_type)
    }

    /// Full frontmatter view: non-empty well-known fields plus the metadata bag.
    pub fn frontmatter(&self) -> Metadata {
        let mut map = self.metadata.clone();
        for key in keys::ALL {
            match self.field(key) {
                Some(value) if !value.is_empty() => {
                    map.insert(key.to_string(), MetadataValue::from(value));
                }
                _ => {}
            }
        }
        map
    }
}

/// Raised when a document is wrapped as a type it was not parsed as.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("document type mismatch: expected {expected}, found {found}")]
    Mismatch { expected: String, found: String },

    #[error("unknown document type: {0}")]
    Unknown(String),
}

/// A document checked against a registry row.
#[derive(Debug, Clone, Copy)]
pub struct TypedDocument<'a> {
    document: &'a Document,
    spec: &'static TypeSpec,
}

impl<'a> TypedDocument<'a> {
    /// Wrap `document` as `code`, rejecting a `type:` mismatch.
    pub fn new(document: &'a Document, code: &str) -> Result<Self, TypeError> {
        if document.doc_type != code {
            return Err(TypeError::Mismatch {
                expected: code.to_string(),
                found: document.doc_type.clone(),
            });
        }
        Self::from_document(document)
    }

    /// Wrap `document` as whatever type its frontmatter declares.
    pub fn from_document(document: &'a Document) -> Result<Self, TypeError> {
        let spec = document
            .type_spec()
            .ok_or_else(|| TypeError::Unknown(document.doc_type.clone()))?;
        Ok(Self { document, spec })
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn spec(&self) -> &'static TypeSpec {
        self.spec
    }

    /// Declared domain, or the type's default domain.
    pub fn domain(&self) -> String {
        self.document
            .domain
            .clone()
            .unwrap_or_else(|| self.spec.domain.to_string())
    }
}

/// Builder applying creation defaults.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    pub fn new(doc_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            doc: Document {
                id: id.into(),
                doc_type: doc_type.into(),
                ..Document::default()
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.doc.title = title.into();
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.doc.owner = owner.into();
        self
    }

    pub fn status(mut self, status: DocumentStatus) -> Self {
        self.doc.status = status.to_string();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.doc.version = version.into();
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.doc.domain = Some(domain.into());
        self
    }

    pub fn created(mut self, date: impl Into<String>) -> Self {
        self.doc.created = Some(date.into());
        self
    }

    pub fn updated(mut self, date: impl Into<String>) -> Self {
        self.doc.updated = Some(date.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.doc.content = content.into();
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.doc.metadata.insert(key.into(), value.into());
        self
    }

    /// Finish, filling every unset field with its default.
    pub fn build(self) -> Document {
        let mut doc = self.doc;
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();

        if doc.created.is_none() {
            doc.created = Some(today.clone());
        }
        if doc.updated.is_none() {
            doc.updated = Some(today);
        }
        if doc.status.is_empty() {
            doc.status = DocumentStatus::Draft.to_string();
        }
        if doc.version.is_empty() {
            doc.version = DEFAULT_VERSION.to_string();
        }
        if doc.domain.is_none() {
            if let Some(spec) = doc.type_spec() {
                doc.domain = Some(spec.domain.to_string());
            }
        }
        for key in LIST_FIELDS {
            doc.metadata
                .entry(key.to_string())
                .or_insert_with(|| MetadataValue::List(Vec::new()));
        }
        if let Some(flag) = doc.type_spec().and_then(|s| s.flag) {
            doc.metadata
                .entry(flag.key().to_string())
                .or_insert(MetadataValue::Bool(true));
        }

        doc
    }
}
