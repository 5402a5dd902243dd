//! Query engine for BSpec archives.
//!
//! Evaluation is pure: filters are ANDed, results are stable-sorted, then
//! truncated to the limit, then projected onto the requested fields.

pub mod engine;
pub mod query;
pub mod stats;

pub use engine::{QueryEngine, QueryResult, SortKey};
pub use query::{validate_query, Query, QueryError, SortOrder};
pub use stats::ArchiveStats;
