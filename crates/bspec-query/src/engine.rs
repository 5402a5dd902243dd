//! Query evaluation.

use crate::query::{non_empty, Query, SortOrder};
use crate::stats::ArchiveStats;
use bspec_archive::Archive;
use bspec_document::document::keys;
use bspec_document::Document;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

/// Documents selected by a query, returned with the query that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub documents: Vec<Document>,
    /// Number of documents returned, after the limit.
    pub total: usize,
    pub query: Query,
}

/// Field a query can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Title,
    Type,
    Status,
    Version,
    Owner,
    Created,
    Updated,
    Domain,
}

impl SortKey {
    /// Case-insensitive lookup; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            keys::ID => Self::Id,
            keys::TITLE => Self::Title,
            keys::TYPE => Self::Type,
            keys::STATUS => Self::Status,
            keys::VERSION => Self::Version,
            keys::OWNER => Self::Owner,
            keys::CREATED => Self::Created,
            keys::UPDATED => Self::Updated,
            keys::DOMAIN => Self::Domain,
            _ => return None,
        };
        Some(key)
    }

    fn value<'d>(&self, doc: &'d Document) -> &'d str {
        match self {
            Self::Id => &doc.id,
            Self::Title => &doc.title,
            Self::Type => &doc.doc_type,
            Self::Status => &doc.status,
            Self::Version => &doc.version,
            Self::Owner => &doc.owner,
            Self::Created => doc.created.as_deref().unwrap_or(""),
            Self::Updated => doc.updated.as_deref().unwrap_or(""),
            Self::Domain => doc.domain.as_deref().unwrap_or(""),
        }
    }

    fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let (left, right) = (self.value(a), self.value(b));
        if *self == Self::Version {
            if let (Ok(l), Ok(r)) = (semver::Version::parse(left), semver::Version::parse(right)) {
                return l.cmp(&r);
            }
        }
        left.to_lowercase().cmp(&right.to_lowercase())
    }
}

/// Read-only evaluator over a document collection.
#[derive(Debug, Clone)]
pub struct QueryEngine<'a> {
    documents: Vec<&'a Document>,
    assets: usize,
}

impl<'a> QueryEngine<'a> {
    /// Engine over an archive's documents, in path order.
    pub fn new(archive: &'a Archive) -> Self {
        Self {
            documents: archive.documents.values().collect(),
            assets: archive.assets.len(),
        }
    }

    /// Engine over a bare document list, kept in the given order.
    pub fn from_documents(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
            assets: 0,
        }
    }

    /// Filter, then stable-sort, then truncate, then project.
    pub fn execute(&self, query: &Query) -> QueryResult {
        let mut selected: Vec<&Document> = self
            .documents
            .iter()
            .copied()
            .filter(|doc| matches(doc, query))
            .collect();
        debug!(matched = selected.len(), of = self.documents.len(), "filtered documents");

        if let Some(name) = non_empty(&query.sort_by) {
            match SortKey::parse(name) {
                Some(key) => {
                    let order = query.order().unwrap_or_default();
                    selected.sort_by(|a, b| match order {
                        SortOrder::Asc => key.compare(a, b),
                        SortOrder::Desc => key.compare(b, a),
                    });
                }
                None => debug!(sort_by = name, "unknown sort key, keeping order"),
            }
        }

        if let Some(limit) = query.effective_limit() {
            selected.truncate(limit);
        }

        let documents: Vec<Document> = if query.fields.is_empty() {
            selected.into_iter().cloned().collect()
        } else {
            selected.into_iter().map(|doc| project(doc, &query.fields)).collect()
        };

        QueryResult {
            total: documents.len(),
            documents,
            query: query.clone(),
        }
    }

    /// Distinct non-empty type codes, sorted.
    pub fn document_types(&self) -> Vec<String> {
        self.distinct(|doc| Some(doc.doc_type.as_str()))
    }

    /// Distinct non-empty domains, sorted.
    pub fn domains(&self) -> Vec<String> {
        self.distinct(|doc| doc.domain.as_deref())
    }

    /// Distinct non-empty owners, sorted.
    pub fn owners(&self) -> Vec<String> {
        self.distinct(|doc| Some(doc.owner.as_str()))
    }

    fn distinct(&self, field: impl Fn(&Document) -> Option<&str>) -> Vec<String> {
        self.documents
            .iter()
            .filter_map(|doc| field(*doc))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Counts and histograms over the whole collection.
    pub fn stats(&self) -> ArchiveStats {
        ArchiveStats::collect(self.documents.iter().copied(), self.assets)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

fn matches(doc: &Document, query: &Query) -> bool {
    if let Some(want) = non_empty(&query.doc_type) {
        if !eq_ignore_case(&doc.doc_type, want) {
            return false;
        }
    }
    if let Some(want) = non_empty(&query.domain) {
        if !eq_ignore_case(doc.domain.as_deref().unwrap_or(""), want) {
            return false;
        }
    }
    if let Some(want) = non_empty(&query.status) {
        if !eq_ignore_case(&doc.status, want) {
            return false;
        }
    }
    if let Some(want) = non_empty(&query.owner) {
        if !contains_ignore_case(&doc.owner, want) {
            return false;
        }
    }
    if let Some(term) = non_empty(&query.search) {
        if !contains_ignore_case(&format!("{} {}", doc.title, doc.content), term) {
            return false;
        }
    }

    query.metadata.iter().all(|(key, want)| {
        doc.metadata
            .get(key)
            .and_then(|v| v.scalar_string())
            .map_or(false, |v| contains_ignore_case(&v, want))
    })
}

/// Copy of `doc` holding only the named fields; `*` keeps everything.
fn project(doc: &Document, fields: &[String]) -> Document {
    let wanted = |name: &str| fields.iter().any(|f| f == "*" || f.eq_ignore_ascii_case(name));

    let mut out = Document::default();
    if wanted(keys::ID) {
        out.id = doc.id.clone();
    }
    if wanted(keys::TITLE) {
        out.title = doc.title.clone();
    }
    if wanted(keys::TYPE) {
        out.doc_type = doc.doc_type.clone();
    }
    if wanted(keys::STATUS) {
        out.status = doc.status.clone();
    }
    if wanted(keys::VERSION) {
        out.version = doc.version.clone();
    }
    if wanted(keys::OWNER) {
        out.owner = doc.owner.clone();
    }
    if wanted(keys::CREATED) {
        out.created = doc.created.clone();
    }
    if wanted(keys::UPDATED) {
        out.updated = doc.updated.clone();
    }
    if wanted(keys::DOMAIN) {
        out.domain = doc.domain.clone();
    }
    if wanted("content") {
        out.content = doc.content.clone();
    }
    if wanted("metadata") {
        out.metadata = doc.metadata.clone();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str, doc_type: &str, status: &str) -> Document {
        Document {
            id: id.to_string(),
            title: title.to_string(),
            doc_type: doc_type.to_string(),
            status: status.to_string(),
            version: "1.0.0".to_string(),
            owner: "Strategy Team".to_string(),
            content: format!("About {title}"),
            ..Document::default()
        }
    }

    #[test]
    fn test_type_filter_is_case_insensitive() {
        let docs = [doc("MSN-1", "M", "MSN", "Draft"), doc("CAP-1", "C", "CAP", "Draft")];
        let engine = QueryEngine::from_documents(&docs);
        let q = Query {
            doc_type: Some("cap".into()),
            ..Default::default()
        };
        let result = engine.execute(&q);
        assert_eq!(result.total, 1);
        assert_eq!(result.documents[0].id, "CAP-1");
        assert_eq!(result.query, q);
    }

    #[test]
    fn test_owner_and_search_are_substrings() {
        let docs = [doc("A-1", "Pricing model", "REV", "Draft"), doc("A-2", "Hiring", "TEA", "Draft")];
        let engine = QueryEngine::from_documents(&docs);

        let q = Query {
            owner: Some("strategy".into()),
            search: Some("PRICING".into()),
            ..Default::default()
        };
        let ids: Vec<_> = engine.execute(&q).documents.into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["A-1"]);
    }

    #[test]
    fn test_search_is_literal() {
        let docs = [doc("A-1", "cost (a+b)", "CST", "Draft")];
        let engine = QueryEngine::from_documents(&docs);
        let q = Query {
            search: Some("(a+b".into()),
            ..Default::default()
        };
        assert_eq!(engine.execute(&q).total, 1);
    }

    #[test]
    fn test_metadata_filter() {
        let mut tagged = doc("A-1", "One", "CAP", "Draft");
        tagged.metadata.insert("tier".into(), "Gold Plus".into());
        tagged.metadata.insert("priority".into(), 3i64.into());
        let plain = doc("A-2", "Two", "CAP", "Draft");
        let docs = [tagged, plain];
        let engine = QueryEngine::from_documents(&docs);

        let q = Query {
            metadata: [("tier".to_string(), "gold".to_string())].into(),
            ..Default::default()
        };
        assert_eq!(engine.execute(&q).total, 1);

        let q = Query {
            metadata: [("priority".to_string(), "3".to_string())].into(),
            ..Default::default()
        };
        assert_eq!(engine.execute(&q).documents[0].id, "A-1");

        let q = Query {
            metadata: [("missing".to_string(), "x".to_string())].into(),
            ..Default::default()
        };
        assert_eq!(engine.execute(&q).total, 0);
    }

    #[test]
    fn test_metadata_filter_ignores_first_class_fields() {
        let mut owned = doc("A-1", "One", "CAP", "Draft");
        owned.owner = "Ops Team".to_string();
        let docs = [owned];
        let engine = QueryEngine::from_documents(&docs);

        let q = Query {
            metadata: [("owner".to_string(), "ops".to_string())].into(),
            ..Default::default()
        };
        assert_eq!(engine.execute(&q).total, 0);
    }

    #[test]
    fn test_exact_filters_fold_unicode_case() {
        let mut docs = [doc("A-1", "One", "CAP", "Überprüft"), doc("A-2", "Two", "CAP", "Draft")];
        docs[0].domain = Some("Économie".to_string());
        let engine = QueryEngine::from_documents(&docs);

        let q = Query {
            status: Some("überprüft".into()),
            domain: Some("ÉCONOMIE".into()),
            ..Default::default()
        };
        let result = engine.execute(&q);
        assert_eq!(result.total, 1);
        assert_eq!(result.documents[0].id, "A-1");
    }

    #[test]
    fn test_tags_do_not_filter() {
        let docs = [doc("A-1", "One", "CAP", "Draft"), doc("A-2", "Two", "CAP", "Draft")];
        let engine = QueryEngine::from_documents(&docs);
        let q = Query {
            tags: vec!["nothing-has-this".into()],
            ..Default::default()
        };
        let result = engine.execute(&q);
        assert_eq!(result.total, 2);
        assert_eq!(result.query.tags, vec!["nothing-has-this"]);
    }

    #[test]
    fn test_sort_desc_and_unknown_key() {
        let docs = [doc("A", "b", "X", "Draft"), doc("B", "A", "X", "Draft"), doc("C", "c", "X", "Draft")];
        let engine = QueryEngine::from_documents(&docs);

        let q = Query {
            sort_by: Some("Title".into()),
            sort_order: Some("desc".into()),
            ..Default::default()
        };
        let titles: Vec<_> = engine.execute(&q).documents.into_iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["c", "b", "A"]);

        let q = Query {
            sort_by: Some("colour".into()),
            ..Default::default()
        };
        let ids: Vec<_> = engine.execute(&q).documents.into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_by_semantic_version() {
        let mut docs = [doc("A", "a", "X", "Draft"), doc("B", "b", "X", "Draft"), doc("C", "c", "X", "Draft")];
        docs[0].version = "1.10.0".into();
        docs[1].version = "1.2.0".into();
        docs[2].version = "1.9.3".into();
        let engine = QueryEngine::from_documents(&docs);
        let q = Query {
            sort_by: Some("version".into()),
            ..Default::default()
        };
        let ids: Vec<_> = engine.execute(&q).documents.into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_projection_after_limit() {
        let docs = [doc("A", "b", "X", "Draft"), doc("B", "a", "X", "Draft")];
        let engine = QueryEngine::from_documents(&docs);
        let q = Query {
            fields: vec!["id".into(), "TITLE".into()],
            sort_by: Some("title".into()),
            limit: Some(1),
            ..Default::default()
        };
        let result = engine.execute(&q);
        assert_eq!(result.total, 1);
        let only = &result.documents[0];
        assert_eq!(only.id, "B");
        assert_eq!(only.title, "a");
        assert!(only.doc_type.is_empty());
        assert!(only.content.is_empty());
        assert!(only.created.is_none());
    }

    #[test]
    fn test_wildcard_projection_keeps_everything() {
        let mut full = doc("A", "a", "X", "Draft");
        full.domain = Some("growth".into());
        full.metadata.insert("k".into(), "v".into());
        let docs = [full.clone()];
        let engine = QueryEngine::from_documents(&docs);
        let q = Query {
            fields: vec!["*".into()],
            ..Default::default()
        };
        assert_eq!(engine.execute(&q).documents[0], full);
    }

    #[test]
    fn test_distinct_helpers() {
        let mut a = doc("A", "a", "CAP", "Draft");
        a.domain = Some("product".into());
        let mut b = doc("B", "b", "MSN", "Draft");
        b.owner = "Board".into();
        let c = doc("C", "c", "CAP", "Draft");
        let docs = [a, b, c];
        let engine = QueryEngine::from_documents(&docs);

        assert_eq!(engine.document_types(), vec!["CAP", "MSN"]);
        assert_eq!(engine.domains(), vec!["product"]);
        assert_eq!(engine.owners(), vec!["Board", "Strategy Team"]);
    }
}
