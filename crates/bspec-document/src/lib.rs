//! BSpec document model.
//!
//! A document is a Markdown body preceded by a frontmatter block. This crate
//! parses and renders that block, carries the open metadata bag, maps type
//! codes to business domains and validates documents.

pub mod document;
pub mod frontmatter;
pub mod metadata;
pub mod registry;
pub mod validation;

pub use document::{Document, DocumentBuilder, DocumentStatus, TypeError, TypedDocument};
pub use frontmatter::{parse, parse_str, render, ParseError};
pub use metadata::{Metadata, MetadataTypeError, MetadataValue};
pub use registry::{BusinessDomain, TypeFlag, TypeRegistry, TypeRule, TypeSpec};
pub use validation::{validate_metadata, FieldType, Schema};
