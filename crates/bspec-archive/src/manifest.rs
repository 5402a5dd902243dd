//! Archive manifest (`manifest.json`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// File name of the manifest at the archive root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Version written into new manifests.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Rejected conformance level or industry profile name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// Ordinal quality tier declared by an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConformanceLevel {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl ConformanceLevel {
    pub const ALL: [ConformanceLevel; 3] = [Self::Bronze, Self::Silver, Self::Gold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }
}

impl fmt::Display for ConformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConformanceLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "conformance level",
                value: s.to_string(),
            })
    }
}

/// Industry profile an archive is written against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndustryProfile {
    #[default]
    SoftwareSaas,
    PhysicalProduct,
    ServiceBusiness,
    Nonprofit,
}

impl IndustryProfile {
    pub const ALL: [IndustryProfile; 4] = [
        Self::SoftwareSaas,
        Self::PhysicalProduct,
        Self::ServiceBusiness,
        Self::Nonprofit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SoftwareSaas => "software-saas",
            Self::PhysicalProduct => "physical-product",
            Self::ServiceBusiness => "service-business",
            Self::Nonprofit => "nonprofit",
        }
    }
}

impl fmt::Display for IndustryProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndustryProfile {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "industry profile",
                value: s.to_string(),
            })
    }
}

/// Archive-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: String,
    pub bspec_version: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub total_documents: usize,
    #[serde(default)]
    pub document_types: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub conformance_level: ConformanceLevel,
    #[serde(default)]
    pub industry_profile: IndustryProfile,
}

impl Manifest {
    /// A fresh manifest stamped with the current time and empty inventories.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            format_version: FORMAT_VERSION.to_string(),
            bspec_version: FORMAT_VERSION.to_string(),
            description: format!("BSpec project: {name}"),
            name,
            author: "Unknown".to_string(),
            created_at: now,
            updated_at: now,
            total_documents: 0,
            document_types: Vec::new(),
            domains: Vec::new(),
            conformance_level: ConformanceLevel::default(),
            industry_profile: IndustryProfile::default(),
        }
    }

    /// Parse manifest JSON.
    pub fn from_json(raw: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(raw)
    }

    /// Indented JSON form written to disk.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conformance_is_ordinal() {
        assert!(ConformanceLevel::Bronze < ConformanceLevel::Silver);
        assert!(ConformanceLevel::Silver < ConformanceLevel::Gold);
        assert_eq!("GOLD".parse::<ConformanceLevel>().unwrap(), ConformanceLevel::Gold);
        assert!("platinum".parse::<ConformanceLevel>().is_err());
    }

    #[test]
    fn test_industry_profile_names() {
        assert_eq!(
            "service-business".parse::<IndustryProfile>().unwrap(),
            IndustryProfile::ServiceBusiness
        );
        let err = "retail".parse::<IndustryProfile>().unwrap_err();
        assert_eq!(err.to_string(), "unknown industry profile: retail");
        assert_eq!(
            serde_json::to_string(&IndustryProfile::PhysicalProduct).unwrap(),
            "\"physical-product\""
        );
    }

    #[test]
    fn test_new_manifest_defaults() {
        let manifest = Manifest::new("acme");
        assert_eq!(manifest.format_version, "1.0.0");
        assert_eq!(manifest.description, "BSpec project: acme");
        assert_eq!(manifest.author, "Unknown");
        assert_eq!(manifest.created_at, manifest.updated_at);
        assert!(manifest.document_types.is_empty());
    }

    #[test]
    fn test_manifest_json_shape() {
        let manifest = Manifest::new("acme");
        let value: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
        for key in [
            "format_version",
            "bspec_version",
            "name",
            "description",
            "author",
            "created_at",
            "updated_at",
            "total_documents",
            "document_types",
            "domains",
            "conformance_level",
            "industry_profile",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["conformance_level"], "bronze");
        assert_eq!(value["industry_profile"], "software-saas");
    }

    #[test]
    fn test_manifest_parses_go_style_timestamps() {
        let raw = br#"{
            "format_version": "1.0.0",
            "bspec_version": "1.0.0",
            "name": "demo",
            "created_at": "2024-05-01T10:20:30.123456789+02:00",
            "updated_at": "2024-05-01T08:20:30Z",
            "conformance_level": "silver",
            "industry_profile": "nonprofit"
        }"#;
        let manifest = Manifest::from_json(raw).unwrap();
        assert_eq!(manifest.conformance_level, ConformanceLevel::Silver);
        assert_eq!(manifest.total_documents, 0);
        assert_eq!(manifest.created_at.timestamp(), manifest.updated_at.timestamp());
    }
}
