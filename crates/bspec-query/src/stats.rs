//! Collection statistics.

use bspec_document::Document;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Summary of a document collection, built in a single pass.
///
/// Distinct lists and histograms are key-ordered, so the result does not
/// depend on document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveStats {
    pub total_documents: usize,
    pub total_assets: usize,
    pub document_types: Vec<String>,
    pub domains: Vec<String>,
    pub owners: Vec<String>,
    pub status_distribution: BTreeMap<String, usize>,
    pub type_distribution: BTreeMap<String, usize>,
}

impl ArchiveStats {
    pub fn collect<'a>(documents: impl IntoIterator<Item = &'a Document>, total_assets: usize) -> Self {
        let mut types = BTreeSet::new();
        let mut domains = BTreeSet::new();
        let mut owners = BTreeSet::new();
        let mut stats = Self {
            total_assets,
            ..Self::default()
        };

        for doc in documents {
            stats.total_documents += 1;
            *stats.status_distribution.entry(doc.status.clone()).or_default() += 1;
            *stats.type_distribution.entry(doc.doc_type.clone()).or_default() += 1;

            if !doc.doc_type.is_empty() {
                types.insert(doc.doc_type.clone());
            }
            if let Some(domain) = doc.domain.as_deref().filter(|d| !d.is_empty()) {
                domains.insert(domain.to_string());
            }
            if !doc.owner.is_empty() {
                owners.insert(doc.owner.clone());
            }
        }

        stats.document_types = types.into_iter().collect();
        stats.domains = domains.into_iter().collect();
        stats.owners = owners.into_iter().collect();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(doc_type: &str, status: &str, domain: Option<&str>) -> Document {
        Document {
            doc_type: doc_type.to_string(),
            status: status.to_string(),
            domain: domain.map(str::to_string),
            owner: "Team".to_string(),
            ..Document::default()
        }
    }

    #[test]
    fn test_histograms() {
        let docs = [
            doc("MSN", "Draft", Some("strategic")),
            doc("CAP", "Accepted", Some("product")),
            doc("CAP", "Accepted", None),
        ];
        let stats = ArchiveStats::collect(&docs, 4);

        assert_eq!(stats.total_documents, 3);
        assert_eq!(stats.total_assets, 4);
        assert_eq!(stats.document_types, vec!["CAP", "MSN"]);
        assert_eq!(stats.domains, vec!["product", "strategic"]);
        assert_eq!(stats.owners, vec!["Team"]);
        assert_eq!(stats.status_distribution["Accepted"], 2);
        assert_eq!(stats.type_distribution["CAP"], 2);
        assert_eq!(stats.type_distribution["MSN"], 1);
    }

    #[test]
    fn test_order_independent() {
        let mut docs = vec![
            doc("MSN", "Draft", Some("strategic")),
            doc("CAP", "Review", Some("product")),
            doc("RSK", "Draft", Some("risk")),
        ];
        let forward = ArchiveStats::collect(&docs, 0);
        docs.reverse();
        assert_eq!(forward, ArchiveStats::collect(&docs, 0));
    }

    #[test]
    fn test_json_keys() {
        let value = serde_json::to_value(ArchiveStats::default()).unwrap();
        for key in [
            "total_documents",
            "total_assets",
            "document_types",
            "domains",
            "owners",
            "status_distribution",
            "type_distribution",
        ] {
            assert!(value.get(key).is_some(), "{key}");
        }
    }
}
