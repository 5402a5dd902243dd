//! `.bspec` container codec: a gzip-compressed tar stream of an archive tree.

use crate::archive::{self, Archive, ASSETS_DIR, COMPUTED_DIR, DOCUMENTS_DIR};
use bspec_common_core::{Error, Result, ResultExt};
use bspec_common_fs::path::{safe_join, to_unix_string};
use bspec_common_fs::{self as fs, EntryKind};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// File extension of packed archives.
pub const EXTENSION: &str = "bspec";

/// What a pack run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// Markdown files under `documents/`.
    pub documents: usize,
    /// Files under `assets/`.
    pub assets: usize,
    /// JSON files under `computed/`.
    pub computed: usize,
    /// Every regular file, including the manifest.
    pub files: usize,
    pub directories: usize,
    /// Uncompressed size of all packed files.
    pub content_bytes: u64,
    /// Size of the written container, when packed to a file.
    pub archive_bytes: Option<u64>,
}

impl PackSummary {
    fn record_file(&mut self, name: &str, size: u64) {
        self.files += 1;
        self.content_bytes += size;

        let (section, rest) = name.split_once('/').unwrap_or(("", name));
        match section {
            DOCUMENTS_DIR if rest.ends_with(".md") => self.documents += 1,
            ASSETS_DIR => self.assets += 1,
            COMPUTED_DIR if rest.ends_with(".json") => self.computed += 1,
            _ => {}
        }
    }
}

/// Pack `source` into `writer`, returning the writer once the stream is finished.
///
/// Entries are written depth-first in file-name order with their stored
/// mode bits. Anything that is neither a file nor a directory is skipped.
pub fn pack<W: Write>(source: impl AsRef<Path>, writer: W) -> Result<(W, PackSummary)> {
    pack_excluding(source.as_ref(), writer, &[])
}

fn pack_excluding<W: Write>(source: &Path, writer: W, exclude: &[PathBuf]) -> Result<(W, PackSummary)> {
    if !source.is_dir() {
        return Err(Error::not_found(source, "source directory not found"));
    }
    let source_abs = source.canonicalize().with_path(source)?;

    let mut builder = tar::Builder::new(GzEncoder::new(writer, Compression::default()));
    builder.follow_symlinks(false);
    let mut summary = PackSummary::default();

    for entry in fs::walk(source)? {
        let name = to_unix_string(&entry.relative);
        if exclude.contains(&source_abs.join(&entry.relative)) {
            debug!(path = %name, "skipping pack output");
            continue;
        }

        match entry.kind {
            EntryKind::Dir => {
                builder.append_path_with_name(&entry.path, &name).with_path(&entry.path)?;
                summary.directories += 1;
            }
            EntryKind::File => {
                let size = std::fs::metadata(&entry.path).with_path(&entry.path)?.len();
                builder.append_path_with_name(&entry.path, &name).with_path(&entry.path)?;
                summary.record_file(&name, size);
            }
            EntryKind::Other => {
                warn!(path = %name, "skipping entry that is neither a file nor a directory");
                continue;
            }
        }
        debug!(path = %name, "packed entry");
    }

    let encoder = builder.into_inner().with_path(source)?;
    let writer = encoder.finish().with_path(source)?;

    info!(
        source = %source.display(),
        documents = summary.documents,
        assets = summary.assets,
        computed = summary.computed,
        "packed archive"
    );
    Ok((writer, summary))
}

/// Pack `source` into the file at `output`, replacing it if present.
///
/// The container is written to a sibling temporary file and renamed into
/// place, so a failed pack never leaves a truncated archive behind.
pub fn pack_file(source: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<PackSummary> {
    let source = source.as_ref();
    let output = output.as_ref();

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::ensure_dir(parent)?;
    let parent_abs = parent.canonicalize().with_path(parent)?;

    let temp = NamedTempFile::new_in(parent).with_path(parent)?;
    let mut exclude = vec![parent_abs.join(temp.path().file_name().unwrap_or_default())];
    if let Some(name) = output.file_name() {
        exclude.push(parent_abs.join(name));
    }

    let (writer, mut summary) = pack_excluding(source, BufWriter::new(temp), &exclude)?;
    let temp = writer.into_inner().map_err(|e| Error::io(output, e.into_error()))?;
    temp.as_file().sync_all().with_path(output)?;
    temp.persist(output).map_err(|e| Error::io(output, e.error))?;

    summary.archive_bytes = Some(std::fs::metadata(output).with_path(output)?.len());
    Ok(summary)
}

/// Unpack a container stream beneath `dest`, creating it if absent.
///
/// `origin` names the stream in errors. Entries whose path would land
/// outside `dest` are rejected. Returns the number of entries written.
pub fn extract_from_reader<R: Read>(reader: R, dest: impl AsRef<Path>, origin: &Path) -> Result<usize> {
    let dest = dest.as_ref();
    fs::ensure_dir(dest)?;

    let mut container = tar::Archive::new(GzDecoder::new(reader));
    let entries = container
        .entries()
        .or_format(origin, "invalid container stream")?;

    let mut dir_modes = Vec::new();
    let mut written = 0;

    for entry in entries {
        let mut entry = entry.or_format(origin, "invalid container stream")?;
        let name = entry
            .path()
            .or_format(origin, "invalid entry path")?
            .into_owned();
        let target = safe_join(dest, &name).ok_or_else(|| {
            Error::security(&name, format!("entry escapes extraction directory {}", dest.display()))
        })?;
        let mode = entry.header().mode().ok();
        let kind = entry.header().entry_type();

        if kind.is_dir() {
            fs::ensure_dir(&target)?;
            if let Some(mode) = mode {
                dir_modes.push((target, mode));
            }
        } else if kind.is_file() {
            if let Some(parent) = target.parent() {
                fs::ensure_dir(parent)?;
            }
            let mut file = File::create(&target).with_path(&target)?;
            io::copy(&mut entry, &mut file).map_err(|e| copy_error(origin, &target, e))?;
            drop(file);
            if let Some(mode) = mode {
                set_mode(&target, mode)?;
            }
        } else {
            warn!(path = %name.display(), kind = ?kind, "skipping unsupported entry");
            continue;
        }

        debug!(path = %name.display(), "extracted entry");
        written += 1;
    }

    // Deepest first, so read-only directories are locked only after their contents exist.
    for (dir, mode) in dir_modes.into_iter().rev() {
        set_mode(&dir, mode)?;
    }

    info!(origin = %origin.display(), dest = %dest.display(), entries = written, "extracted archive");
    Ok(written)
}

/// Unpack the container file at `archive` beneath `dest`.
pub fn extract(archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<usize> {
    let archive = archive.as_ref();
    let file = File::open(archive).with_path(archive)?;
    extract_from_reader(BufReader::new(file), dest, archive)
}

/// Decode a container file into memory via a scratch directory.
pub fn read(path: impl AsRef<Path>) -> Result<Archive> {
    let path = path.as_ref();
    let scratch = tempfile::tempdir().with_path(std::env::temp_dir())?;
    extract(path, scratch.path())?;
    archive::load_tree(scratch.path(), path)
}

/// Read either a container file or an unpacked archive directory.
pub fn open(path: impl AsRef<Path>) -> Result<Archive> {
    let path = path.as_ref();
    if path.is_dir() {
        archive::read_directory(path)
    } else if path.is_file() {
        read(path)
    } else {
        Err(Error::not_found(path, "archive not found"))
    }
}

fn copy_error(origin: &Path, target: &Path, e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::UnexpectedEof => {
            Error::format(origin, format!("invalid container stream: {e}"))
        }
        _ => Error::io(target, e),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode & 0o777)).with_path(path)
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
