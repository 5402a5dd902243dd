//! Query command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use bspec_archive::open;
use bspec_query::{validate_query, Query, QueryEngine};
use clap::{Parser, ValueHint};
use tracing::debug;

use crate::cli::CommandContext;
use crate::error::CliError;

/// Filter, sort and project the documents of an archive
#[derive(Debug, Parser)]
pub struct QueryCommand {
    /// Archive file or extracted directory
    #[arg(value_hint = ValueHint::AnyPath)]
    pub path: PathBuf,

    /// Document type code, e.g. CAP
    #[arg(long = "type", value_name = "TYPE")]
    pub doc_type: Option<String>,

    /// Business domain
    #[arg(long)]
    pub domain: Option<String>,

    /// Document status
    #[arg(long)]
    pub status: Option<String>,

    /// Document owner
    #[arg(long)]
    pub owner: Option<String>,

    /// Substring searched in title and body
    #[arg(long)]
    pub search: Option<String>,

    /// Tag (repeatable; echoed, not yet used for filtering)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Metadata filter; the value must occur in the field (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub metadata: Vec<(String, String)>,

    /// Fields to keep in each result
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Maximum number of results
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Sort key (id, title, type, status, version, owner, created, updated, domain)
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort order (asc, desc)
    #[arg(long)]
    pub sort_order: Option<String>,

    /// Full query as JSON; other flags override its fields
    #[arg(long, value_name = "JSON")]
    pub query_json: Option<String>,
}

impl QueryCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let query = self.build_query()?;
        validate_query(&query)?;

        let formatter = ctx.formatter()?;
        let archive = open(&self.path)?;
        let result = QueryEngine::new(&archive).execute(&query);
        debug!(total = result.total, "query executed");

        ctx.emit(&formatter.format_query_result(&result)?);
        Ok(())
    }

    fn build_query(&self) -> Result<Query, CliError> {
        let base = match &self.query_json {
            Some(raw) => Query::from_json(raw)?,
            None => Query::default(),
        };

        let flags = Query {
            doc_type: self.doc_type.clone(),
            domain: self.domain.clone(),
            status: self.status.clone(),
            owner: self.owner.clone(),
            tags: self.tags.clone(),
            search: self.search.clone(),
            fields: self.fields.clone(),
            limit: self.limit,
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            metadata: self.metadata.iter().cloned().collect::<BTreeMap<_, _>>(),
        };
        Ok(base.overlay(flags))
    }
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
