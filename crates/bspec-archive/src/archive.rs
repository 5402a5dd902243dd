//! In-memory archive and the directory loader shared by both read paths.

use crate::manifest::{Manifest, MANIFEST_FILE};
use bspec_common_core::{Error, Result};
use bspec_common_fs::{self as fs, path::to_unix_string};
use bspec_document::{Document, Schema};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Directory holding Markdown documents.
pub const DOCUMENTS_DIR: &str = "documents";
/// Directory holding opaque asset files.
pub const ASSETS_DIR: &str = "assets";
/// Directory holding computed JSON blobs.
pub const COMPUTED_DIR: &str = "computed";

/// Computed blob consulted for a validation schema.
pub const SCHEMA_BLOB: &str = "schema";

/// A decoded archive.
///
/// Document and asset keys are unix-style paths relative to their section
/// directory; computed keys additionally drop the `.json` suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    pub manifest: Manifest,
    pub documents: BTreeMap<String, Document>,
    pub assets: BTreeMap<String, Vec<u8>>,
    pub computed: BTreeMap<String, serde_json::Value>,
}

impl Archive {
    /// An archive with no content.
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            documents: BTreeMap::new(),
            assets: BTreeMap::new(),
            computed: BTreeMap::new(),
        }
    }

    /// Documents in path order.
    pub fn document_list(&self) -> Vec<Document> {
        self.documents.values().cloned().collect()
    }

    /// Schema shipped in `computed/schema.json`, if it declares one.
    pub fn schema(&self) -> Option<Schema> {
        self.computed.get(SCHEMA_BLOB).and_then(Schema::from_computed)
    }
}

/// Load an unpacked archive tree rooted at `root`.
///
/// `origin` is the path reported in errors: the directory itself when
/// reading in place, the container file when reading an extracted copy.
pub(crate) fn load_tree(root: &Path, origin: &Path) -> Result<Archive> {
    let manifest_path = root.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(Error::not_found(origin.join(MANIFEST_FILE), "manifest not found"));
    }
    let raw = fs::read_bytes(&manifest_path)?;
    let manifest = Manifest::from_json(&raw)
        .map_err(|e| Error::format(origin.join(MANIFEST_FILE), format!("invalid manifest: {e}")))?;

    let mut archive = Archive::new(manifest);

    for relative in fs::walk_files(root.join(DOCUMENTS_DIR))? {
        let key = to_unix_string(&relative);
        if relative.extension().map_or(true, |ext| ext != "md") {
            debug!(path = %key, "skipping non-markdown file in documents");
            continue;
        }
        let raw = fs::read_bytes(root.join(DOCUMENTS_DIR).join(&relative))?;
        let document = bspec_document::parse(&raw)
            .map_err(|e| Error::format(origin.join(DOCUMENTS_DIR).join(&relative), e.to_string()))?;
        debug!(path = %key, id = %document.id, "loaded document");
        archive.documents.insert(key, document);
    }

    for relative in fs::walk_files(root.join(ASSETS_DIR))? {
        let bytes = fs::read_bytes(root.join(ASSETS_DIR).join(&relative))?;
        archive.assets.insert(to_unix_string(&relative), bytes);
    }

    for relative in fs::walk_files(root.join(COMPUTED_DIR))? {
        let key = to_unix_string(&relative);
        let Some(name) = key.strip_suffix(".json") else {
            debug!(path = %key, "skipping non-json file in computed");
            continue;
        };
        let raw = fs::read_bytes(root.join(COMPUTED_DIR).join(&relative))?;
        let value = serde_json::from_slice(&raw).map_err(|e| {
            Error::format(origin.join(COMPUTED_DIR).join(&relative), format!("invalid JSON: {e}"))
        })?;
        archive.computed.insert(name.to_string(), value);
    }

    info!(
        origin = %origin.display(),
        documents = archive.documents.len(),
        assets = archive.assets.len(),
        computed = archive.computed.len(),
        "archive loaded"
    );
    Ok(archive)
}

/// Read an unpacked archive directory in place.
pub fn read_directory(dir: impl AsRef<Path>) -> Result<Archive> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::not_found(dir, "archive directory not found"));
    }
    load_tree(dir, dir)
}

/// Check that `dir` looks like an archive source tree before packing.
///
/// A missing manifest is fatal; a missing documents directory is only logged.
pub fn validate_source_directory(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::not_found(dir, "source directory not found"));
    }
    if !dir.join(MANIFEST_FILE).is_file() {
        return Err(Error::not_found(dir.join(MANIFEST_FILE), "manifest not found"));
    }
    if !dir.join(DOCUMENTS_DIR).is_dir() {
        warn!(path = %dir.display(), "source has no documents directory");
    }
    Ok(())
}
