//! Frontmatter parsing and rendering.
//!
//! A document is a `---` line, a block of `key: value` metadata, a closing
//! `---` line and a Markdown body. The block is parsed as YAML; when it is
//! not valid YAML the parser falls back to one `key: value` pair per line.

use crate::document::{keys, Document};
use crate::metadata::{yaml_key, Metadata, MetadataValue};
use thiserror::Error;
use tracing::{debug, warn};

/// Line opening and closing the metadata block.
pub const DELIMITER: &str = "---";

/// Structural parse failures. Every variant is fatal for the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing frontmatter: document must start with a '---' line")]
    MissingFrontmatter,

    #[error("missing frontmatter: no closing '---' line")]
    UnterminatedFrontmatter,

    #[error("document is not valid UTF-8")]
    InvalidUtf8,
}

/// Split raw text into `(block, body)`.
pub fn split(raw: &str) -> Result<(&str, &str), ParseError> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let (first, rest) = match text.find('\n') {
        Some(i) => (&text[..i], &text[i + 1..]),
        None => (text, ""),
    };
    if first.trim_end_matches('\r') != DELIMITER {
        return Err(ParseError::MissingFrontmatter);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let bare = line.trim_end_matches('\n').trim_end_matches('\r');
        if bare == DELIMITER {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((block, body));
        }
        offset += line.len();
    }

    Err(ParseError::UnterminatedFrontmatter)
}

/// Parse raw bytes into a [`Document`].
pub fn parse(raw: &[u8]) -> Result<Document, ParseError> {
    let text = std::str::from_utf8(raw).map_err(|_| ParseError::InvalidUtf8)?;
    parse_str(text)
}

/// Parse text into a [`Document`].
pub fn parse_str(raw: &str) -> Result<Document, ParseError> {
    let (block, body) = split(raw)?;
    let pairs = parse_block(block);

    let mut doc = Document {
        content: body.to_string(),
        ..Document::default()
    };

    for (key, value) in pairs {
        if keys::ALL.contains(&key.as_str()) {
            match value.scalar_string() {
                Some(text) if matches!(value, MetadataValue::String(_)) => assign(&mut doc, &key, text),
                Some(text) => {
                    let text = written_text(block, &key).unwrap_or(text);
                    assign(&mut doc, &key, text);
                }
                None if value.is_null() => {}
                None => debug!(key = %key, "ignoring structured value for well-known field"),
            }
        } else {
            doc.metadata.insert(key, value);
        }
    }

    Ok(doc)
}

/// The value of `key` as written in the block, for scalars YAML would retype.
fn written_text(block: &str, key: &str) -> Option<String> {
    parse_lines(block)
        .into_iter()
        .find(|(k, _)| k == key)
        .and_then(|(_, value)| value.scalar_string())
}

fn assign(doc: &mut Document, key: &str, value: String) {
    match key {
        keys::ID => doc.id = value,
        keys::TITLE => doc.title = value,
        keys::TYPE => doc.doc_type = value,
        keys::STATUS => doc.status = value,
        keys::VERSION => doc.version = value,
        keys::OWNER => doc.owner = value,
        keys::CREATED => doc.created = Some(value),
        keys::UPDATED => doc.updated = Some(value),
        keys::DOMAIN => doc.domain = Some(value),
        _ => {}
    }
}

/// Parse a metadata block into key-value pairs.
pub fn parse_block(block: &str) -> Vec<(String, MetadataValue)> {
    if block.trim().is_empty() {
        return Vec::new();
    }

    match serde_yaml::from_str::<serde_yaml::Value>(block) {
        Ok(serde_yaml::Value::Mapping(map)) => map
            .into_iter()
            .filter_map(|(k, v)| yaml_key(k).map(|k| (k, MetadataValue::from(v))))
            .collect(),
        Ok(_) => {
            warn!("frontmatter is not a mapping; using line parser");
            parse_lines(block)
        }
        Err(e) => {
            warn!(error = %e, "frontmatter is not valid YAML; using line parser");
            parse_lines(block)
        }
    }
}

/// Line-oriented fallback: one `key: value` pair per line, lines without a
/// colon are ignored, quotes and surrounding whitespace are stripped.
pub fn parse_lines(block: &str) -> Vec<(String, MetadataValue)> {
    block
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'').trim();
            Some((key.to_string(), MetadataValue::from(value)))
        })
        .collect()
}

/// Render a document back into frontmatter plus body.
///
/// Well-known fields come first in canonical order, then the metadata bag
/// in key order. Structured values are written in YAML flow style.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');

    for key in keys::ALL {
        if let Some(value) = doc.field(key) {
            let optional = matches!(key, keys::CREATED | keys::UPDATED | keys::DOMAIN);
            if optional && value.is_empty() {
                continue;
            }
            push_line(&mut out, key, &scalar(value));
        }
    }

    render_metadata(&mut out, &doc.metadata);

    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&doc.content);
    out
}

fn render_metadata(out: &mut String, metadata: &Metadata) {
    for (key, value) in metadata {
        push_line(out, &scalar(key), &flow(value));
    }
}

fn push_line(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push(':');
    if !value.is_empty() {
        out.push(' ');
        out.push_str(value);
    }
    out.push('\n');
}

/// A YAML scalar, quoted only when a plain scalar would not read back as the same string.
fn scalar(value: &str) -> String {
    let plain_ok = !value.is_empty()
        && !value.contains('\n')
        && value.trim() == value
        && matches!(
            serde_yaml::from_str::<serde_yaml::Value>(value),
            Ok(serde_yaml::Value::String(ref s)) if s == value
        );

    if plain_ok {
        value.to_string()
    } else {
        quoted(value)
    }
}

fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.replace('"', "\\\"")))
}

/// YAML flow representation of a metadata value.
fn flow(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Null => "null".to_string(),
        MetadataValue::Bool(b) => b.to_string(),
        MetadataValue::Integer(n) => n.to_string(),
        MetadataValue::Float(n) if n.is_finite() => {
            let text = n.to_string();
            if text.contains('.') || text.contains('e') {
                text
            } else {
                format!("{text}.0")
            }
        }
        MetadataValue::Float(n) if n.is_nan() => ".nan".to_string(),
        MetadataValue::Float(n) if *n > 0.0 => ".inf".to_string(),
        MetadataValue::Float(_) => "-.inf".to_string(),
        MetadataValue::String(s) => quoted(s),
        MetadataValue::List(items) => {
            let inner: Vec<String> = items.iter().map(flow).collect();
            format!("[{}]", inner.join(", "))
        }
        MetadataValue::Map(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quoted(k), flow(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "---\nid: CAP-example\ntitle: Example Capability\ntype: CAP\nstatus: Draft\nversion: 1.0.0\nowner: Team X\ndomain: product\n---\n# Body markdown follows\n";

    #[test]
    fn test_parse_sample() {
        let doc = parse_str(SAMPLE).unwrap();
        assert_eq!(doc.id, "CAP-example");
        assert_eq!(doc.title, "Example Capability");
        assert_eq!(doc.doc_type, "CAP");
        assert_eq!(doc.status, "Draft");
        assert_eq!(doc.version, "1.0.0");
        assert_eq!(doc.owner, "Team X");
        assert_eq!(doc.domain.as_deref(), Some("product"));
        assert_eq!(doc.created, None);
        assert_eq!(doc.content, "# Body markdown follows\n");
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_missing_opening_delimiter() {
        let err = parse_str("# Just markdown\n").unwrap_err();
        assert_eq!(err, ParseError::MissingFrontmatter);
        assert!(err.to_string().contains("missing frontmatter"));
    }

    #[test]
    fn test_missing_closing_delimiter() {
        let err = parse_str("---\nid: X-1\ntitle: never closed\n").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedFrontmatter);
        assert!(err.to_string().contains("missing frontmatter"));
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(parse(&[0xff, 0xfe, 0x00]).unwrap_err(), ParseError::InvalidUtf8);
    }

    #[test]
    fn test_crlf_and_closing_at_eof() {
        let doc = parse_str("---\r\nid: MSN-1\r\ntitle: Mission\r\n---").unwrap();
        assert_eq!(doc.id, "MSN-1");
        assert_eq!(doc.title, "Mission");
        assert_eq!(doc.content, "");
    }

    #[test]
    fn test_delimiter_inside_body_is_kept() {
        let doc = parse_str("---\nid: A-1\n---\nintro\n---\nmore\n").unwrap();
        assert_eq!(doc.content, "intro\n---\nmore\n");
    }

    #[test]
    fn test_unknown_keys_go_to_metadata() {
        let doc = parse_str(
            "---\nid: RSK-1\ntype: RSK\nrelated:\n  - MIT-1\n  - MIT-2\npriority: 3\n---\n",
        )
        .unwrap();
        assert_eq!(doc.list("related").len(), 2);
        assert_eq!(doc.metadata["priority"], MetadataValue::Integer(3));
    }

    #[test]
    fn test_non_string_scalars_are_stringified() {
        let doc = parse_str("---\nid: 'X-1'\nversion: 2\ntitle: \"Quoted: title\"\n---\n").unwrap();
        assert_eq!(doc.id, "X-1");
        assert_eq!(doc.version, "2");
        assert_eq!(doc.title, "Quoted: title");
    }

    #[test]
    fn test_well_known_numbers_keep_written_text() {
        let doc = parse_str(
            "---\nid: CAP-0012\ntitle: 1.10\ntype: CAP\nstatus: Draft\nversion: 1.0\nowner: 0x1F\n---\n",
        )
        .unwrap();
        assert_eq!(doc.title, "1.10");
        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.owner, "0x1F");
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_typed_values_stay_typed_in_metadata() {
        let doc = parse_str("---\nid: X-1\nversion: 1.0\nratio: 1.10\n---\n").unwrap();
        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.metadata["ratio"], MetadataValue::Float(1.1));
    }

    #[test]
    fn test_invalid_yaml_falls_back_to_lines() {
        let block = "id: \"CAP-1\nowner: Team: Red\ntitle: [broken\nno colon here";
        let doc = parse_str(&format!("---\n{block}\n---\nbody")).unwrap();
        assert_eq!(doc.id, "CAP-1");
        assert_eq!(doc.owner, "Team: Red");
        assert_eq!(doc.title, "[broken");
        assert_eq!(doc.content, "body");
    }

    #[test]
    fn test_parse_lines_strips_quotes() {
        let pairs = parse_lines("title: 'Quoted'\nstatus:  \"Review\" \njunk");
        assert_eq!(
            pairs,
            vec![
                ("title".to_string(), MetadataValue::from("Quoted")),
                ("status".to_string(), MetadataValue::from("Review")),
            ]
        );
    }

    #[test]
    fn test_render_reparses() {
        let original = Document::builder("MSN", "MSN-001")
            .title("Mission: to be #1")
            .owner("yes")
            .version("1.0.0")
            .metadata("success_criteria", vec!["Reach 1M users"])
            .metadata("score", 0.5)
            .content("# Mission\n\nBody text.\n")
            .build();

        let rendered = render(&original);
        assert!(rendered.starts_with("---\nid: MSN-001\n"));

        let reparsed = parse_str(&rendered).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_scalar_quoting() {
        assert_eq!(scalar("Team X"), "Team X");
        assert_eq!(scalar("1.0.0"), "1.0.0");
        assert_eq!(scalar("2024-01-15"), "2024-01-15");
        assert_eq!(scalar("true"), "\"true\"");
        assert_eq!(scalar("1.0"), "\"1.0\"");
        assert_eq!(scalar("a: b"), "\"a: b\"");
        assert_eq!(scalar(""), "\"\"");
    }
}
