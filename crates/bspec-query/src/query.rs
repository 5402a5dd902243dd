//! Query descriptor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejected query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid sort order: {0} (must be 'asc' or 'desc')")]
    InvalidSortOrder(String),

    #[error("limit cannot be negative")]
    NegativeLimit,

    #[error("invalid query JSON: {0}")]
    InvalidJson(String),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(QueryError::InvalidSortOrder(other.to_string())),
        }
    }
}

/// A request against a document collection.
///
/// Every filter is optional and an empty string counts as unset. `tags` is
/// carried and echoed but does not take part in filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Query {
    /// Parse the JSON descriptor form.
    pub fn from_json(raw: &str) -> Result<Self, QueryError> {
        serde_json::from_str(raw).map_err(|e| QueryError::InvalidJson(e.to_string()))
    }

    /// Fill this query's fields from `overrides` wherever `overrides` sets one.
    pub fn overlay(mut self, overrides: Query) -> Self {
        fn take(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.doc_type, overrides.doc_type);
        take(&mut self.domain, overrides.domain);
        take(&mut self.status, overrides.status);
        take(&mut self.owner, overrides.owner);
        take(&mut self.search, overrides.search);
        take(&mut self.sort_by, overrides.sort_by);
        take(&mut self.sort_order, overrides.sort_order);
        if overrides.limit.is_some() {
            self.limit = overrides.limit;
        }
        if !overrides.tags.is_empty() {
            self.tags = overrides.tags;
        }
        if !overrides.fields.is_empty() {
            self.fields = overrides.fields;
        }
        self.metadata.extend(overrides.metadata);
        self
    }

    /// Parsed sort direction; unset means ascending.
    pub fn order(&self) -> Result<SortOrder, QueryError> {
        match non_empty(&self.sort_order) {
            Some(order) => order.parse(),
            None => Ok(SortOrder::Asc),
        }
    }

    /// Limit if positive.
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|n| *n > 0).and_then(|n| usize::try_from(n).ok())
    }
}

/// `Some` only for a set, non-empty string.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Reject a negative limit or a sort order other than `asc`/`desc`.
///
/// The search term is a plain substring, so no pattern syntax is checked.
pub fn validate_query(query: &Query) -> Result<(), QueryError> {
    query.order()?;
    if query.limit.is_some_and(|n| n < 0) {
        return Err(QueryError::NegativeLimit);
    }
    Ok(())
}
