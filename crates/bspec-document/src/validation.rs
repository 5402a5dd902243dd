//! Metadata and document validation.
//!
//! Validation never fails: every violated rule becomes one message in the
//! returned list, and an empty list means the document is valid.

use crate::document::{keys, Document, DocumentStatus};
use crate::metadata::{Metadata, MetadataValue};
use crate::registry::{BusinessDomain, TypeRegistry, TypeRule};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Fields every document must declare.
pub const REQUIRED_FIELDS: [&str; 5] = [keys::ID, keys::TITLE, keys::STATUS, keys::VERSION, keys::OWNER];

/// Expected JSON-like type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Array,
    Object,
    Number,
    Boolean,
}

impl FieldType {
    /// Parse a schema type name; unrecognized names are not checked.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    pub fn matches(&self, value: &MetadataValue) -> bool {
        value.type_name() == self.as_str()
    }

    fn article(&self) -> &'static str {
        match self {
            Self::Array | Self::Object => "an",
            _ => "a",
        }
    }
}

/// Frontmatter schema, as shipped in an archive's computed data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub required_fields: Vec<String>,
    pub field_types: BTreeMap<String, String>,
    pub enums: BTreeMap<String, Vec<MetadataValue>>,
}

impl Schema {
    /// The schema used when an archive ships none.
    pub fn builtin() -> Self {
        let field_types = [
            ("id", "string"),
            ("title", "string"),
            ("status", "string"),
            ("version", "string"),
            ("owner", "string"),
            ("type", "string"),
            ("contexts", "array"),
            ("related", "array"),
            ("metrics", "array"),
            ("risks", "array"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let status = DocumentStatus::ALL
            .iter()
            .map(|s| MetadataValue::from(s.as_str()))
            .collect();

        Self {
            required_fields: REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect(),
            field_types,
            enums: BTreeMap::from([(keys::STATUS.to_string(), status)]),
        }
    }

    /// Read a schema from a computed-data blob, either bare or under `yaml_schema`.
    pub fn from_computed(value: &serde_json::Value) -> Option<Self> {
        let candidate = value.get("yaml_schema").unwrap_or(value);
        if !candidate.is_object() {
            return None;
        }
        let schema: Schema = serde_json::from_value(candidate.clone()).ok()?;
        if schema.required_fields.is_empty() && schema.field_types.is_empty() && schema.enums.is_empty() {
            return None;
        }
        Some(schema)
    }
}

fn is_missing(value: Option<&MetadataValue>) -> bool {
    match value {
        None | Some(MetadataValue::Null) => true,
        Some(MetadataValue::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Validate a frontmatter map, optionally against a schema.
pub fn validate_metadata(metadata: &Metadata, schema: Option<&Schema>) -> Vec<String> {
    let mut errors = Vec::new();
    let mut reported = BTreeSet::new();

    for field in REQUIRED_FIELDS {
        if is_missing(metadata.get(field)) {
            errors.push(format!("missing required field: {field}"));
            reported.insert(field.to_string());
        }
    }

    if let Some(status) = metadata.get(keys::STATUS).filter(|v| !is_missing(Some(*v))) {
        match status.as_str() {
            Ok(s) if s.parse::<DocumentStatus>().is_ok() => {}
            Ok(s) => {
                errors.push(format!("invalid status value: {s}"));
                reported.insert(keys::STATUS.to_string());
            }
            Err(_) => {
                errors.push("status field must be a string".to_string());
                reported.insert(keys::STATUS.to_string());
            }
        }
    }

    let Some(schema) = schema else {
        return errors;
    };

    for field in &schema.required_fields {
        if !reported.contains(field) && is_missing(metadata.get(field)) {
            errors.push(format!("missing required field: {field}"));
            reported.insert(field.clone());
        }
    }

    for (field, type_name) in &schema.field_types {
        let (Some(expected), Some(value)) = (FieldType::parse(type_name), metadata.get(field)) else {
            continue;
        };
        if !reported.contains(field) && !expected.matches(value) {
            errors.push(format!(
                "field {field} must be {} {}",
                expected.article(),
                expected.as_str()
            ));
            reported.insert(field.clone());
        }
    }

    for (field, allowed) in &schema.enums {
        let Some(value) = metadata.get(field) else {
            continue;
        };
        if !reported.contains(field) && !allowed.contains(value) {
            errors.push(format!("invalid value for {field}: {value}"));
            reported.insert(field.clone());
        }
    }

    errors
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid version pattern"))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"))
}

impl Document {
    /// Frontmatter checks plus the document-level rules: type code, ID
    /// prefix, version and date formats, domain and per-type rules.
    pub fn validate(&self, schema: Option<&Schema>) -> Vec<String> {
        let mut errors = validate_metadata(&self.frontmatter(), schema);
        let registry = TypeRegistry::builtin();

        if self.doc_type.is_empty() {
            errors.push(format!("missing required field: {}", keys::TYPE));
        } else if registry.lookup(&self.doc_type).is_none() {
            errors.push(format!("unknown document type: {}", self.doc_type));
        }

        if !self.id.is_empty() && !self.doc_type.is_empty() {
            let prefix = format!("{}-", self.doc_type);
            if !self.id.starts_with(&prefix) {
                errors.push(format!("id must start with document type '{prefix}'"));
            }
        }

        if !self.version.is_empty() && !version_pattern().is_match(&self.version) {
            errors.push("version must follow semantic versioning (e.g., '1.0.0')".to_string());
        }

        for (field, value) in [(keys::CREATED, &self.created), (keys::UPDATED, &self.updated)] {
            if let Some(date) = value.as_deref().filter(|d| !d.is_empty()) {
                if !date_pattern().is_match(date) {
                    errors.push(format!("{field} must be in YYYY-MM-DD format"));
                }
            }
        }

        if let Some(domain) = self.domain.as_deref().filter(|d| !d.is_empty()) {
            if domain.parse::<BusinessDomain>().is_err() {
                errors.push(format!("invalid domain value: {domain}"));
            }
        }

        if let Some(spec) = registry.lookup(&self.doc_type) {
            for rule in spec.rules {
                if !self.satisfies(rule) {
                    errors.push(rule.message().to_string());
                }
            }
        }

        errors
    }

    fn satisfies(&self, rule: &TypeRule) -> bool {
        match rule {
            TypeRule::RequireSuccessCriteria => !self.list("success_criteria").is_empty(),
            TypeRule::RequireRelated => !self.list("related").is_empty(),
            TypeRule::RequireMetrics => !self.list("metrics").is_empty(),
            TypeRule::RequireRelatedPrefix(prefix) => self
                .list("related")
                .iter()
                .any(|r| r.as_str().map_or(false, |s| s.starts_with(prefix))),
        }
    }
}
