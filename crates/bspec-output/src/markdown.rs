use crate::ArchiveInfo;
use bspec_query::{ArchiveStats, QueryResult};
use chrono::SecondsFormat;
use std::collections::BTreeMap;
use std::fmt::Write;

const RULE: &str = "\n\n---\n\n";

fn excerpt(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

pub(crate) fn query_result(result: &QueryResult, excerpt_length: usize) -> String {
    let mut out = String::from("# Query Results\n\n");
    let _ = write!(out, "**Total Documents:** {}\n\n", result.total);

    if result.documents.is_empty() {
        out.push_str("No documents found matching the query criteria.\n");
        return out;
    }

    out.push_str("## Documents\n\n");
    for (i, doc) in result.documents.iter().enumerate() {
        let _ = write!(out, "### {}. {}\n\n", i + 1, doc.title);
        let _ = writeln!(out, "- **ID:** {}", doc.id);
        let _ = writeln!(out, "- **Type:** {}", doc.doc_type);
        let _ = writeln!(out, "- **Status:** {}", doc.status);
        let _ = writeln!(out, "- **Version:** {}", doc.version);
        let _ = writeln!(out, "- **Owner:** {}", doc.owner);
        if let Some(domain) = doc.domain.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "- **Domain:** {domain}");
        }
        let _ = writeln!(out, "- **Created:** {}", doc.created.as_deref().unwrap_or(""));
        let _ = writeln!(out, "- **Updated:** {}", doc.updated.as_deref().unwrap_or(""));
        if !doc.content.is_empty() {
            out.push_str("\n**Content:**\n\n");
            out.push_str(&excerpt(&doc.content, excerpt_length));
        }
        out.push_str(RULE);
    }
    out
}

pub(crate) fn archive_info(info: &ArchiveInfo<'_>) -> String {
    let manifest = info.manifest;
    let mut out = String::from("# BSpec Archive Information\n\n## Manifest\n\n");
    let _ = writeln!(out, "- **Name:** {}", manifest.name);
    let _ = writeln!(out, "- **Description:** {}", manifest.description);
    let _ = writeln!(out, "- **Author:** {}", manifest.author);
    let _ = writeln!(out, "- **BSpec Version:** {}", manifest.bspec_version);
    let _ = writeln!(out, "- **Format Version:** {}", manifest.format_version);
    let _ = writeln!(
        out,
        "- **Created:** {}",
        manifest.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(
        out,
        "- **Updated:** {}",
        manifest.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "- **Conformance Level:** {}", manifest.conformance_level);
    let _ = writeln!(out, "- **Industry Profile:** {}", manifest.industry_profile);

    out.push_str("\n## Content Statistics\n\n");
    let _ = writeln!(out, "- **Documents:** {}", info.document_count);
    let _ = writeln!(out, "- **Assets:** {}", info.asset_count);
    let _ = writeln!(out, "- **Computed Files:** {}", info.computed_count);

    bullet_section(&mut out, "\n## Document Types\n\n", &manifest.document_types, false);
    bullet_section(&mut out, "\n## Domains\n\n", &manifest.domains, false);
    out
}

pub(crate) fn stats(stats: &ArchiveStats) -> String {
    let mut out = String::from("# Archive Statistics\n\n");
    let _ = writeln!(out, "**Total Documents:** {}", stats.total_documents);
    let _ = write!(out, "**Total Assets:** {}\n\n", stats.total_assets);

    histogram(&mut out, "## Status Distribution\n\n", &stats.status_distribution);
    histogram(&mut out, "## Document Type Distribution\n\n", &stats.type_distribution);
    bullet_section(&mut out, "## Available Document Types\n\n", &stats.document_types, true);
    bullet_section(&mut out, "## Available Domains\n\n", &stats.domains, true);
    bullet_section(&mut out, "## Document Owners\n\n", &stats.owners, false);
    out
}

fn histogram(out: &mut String, heading: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    out.push_str(heading);
    for (key, count) in counts {
        let _ = writeln!(out, "- **{key}:** {count}");
    }
    out.push('\n');
}

fn bullet_section(out: &mut String, heading: &str, items: &[String], trailing_blank: bool) {
    if items.is_empty() {
        return;
    }
    let mut sorted: Vec<&String> = items.iter().collect();
    sorted.sort();

    out.push_str(heading);
    for item in sorted {
        let _ = writeln!(out, "- {item}");
    }
    if trailing_blank {
        out.push('\n');
    }
}
