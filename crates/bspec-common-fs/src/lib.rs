//! File system utilities for BSpec.

pub mod path;

use bspec_common_core::{Error, Result, ResultExt};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Kind of entry discovered by [`walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, sockets, devices and anything else that is neither.
    Other,
}

/// One entry below a walked root.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
    pub kind: EntryKind,
}

/// Walk `root` depth-first, children sorted by file name, excluding the root itself.
///
/// Symlinks are reported as [`EntryKind::Other`] and never followed.
pub fn walk(root: impl AsRef<Path>) -> Result<Vec<WalkEntry>> {
    let root = root.as_ref();
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::io(path, e.into())
        })?;

        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        let relative = entry
            .path()
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| entry.path().to_path_buf());

        entries.push(WalkEntry {
            path: entry.path().to_path_buf(),
            relative,
            kind,
        });
    }

    Ok(entries)
}

/// Relative paths of every regular file below `root`, in walk order.
///
/// A missing root yields an empty list.
pub fn walk_files(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    Ok(walk(root)?
        .into_iter()
        .filter(|e| e.kind == EntryKind::File)
        .map(|e| e.relative)
        .collect())
}

/// Read a file to string.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_path(path)
}

/// Read a file to bytes.
pub fn read_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).with_path(path)
}

/// Write to a file atomically (write to temp, then rename).
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or(Path::new("."));
    ensure_dir(parent)?;

    let mut temp_path = path.to_path_buf();
    if let Some(name) = path.file_name() {
        temp_path.set_file_name(format!(".{}.tmp", name.to_string_lossy()));
    } else {
        temp_path.push(".tmp");
    }

    {
        let mut file = File::create(&temp_path).with_path(&temp_path)?;
        file.write_all(contents).with_path(&temp_path)?;
        file.sync_all().with_path(&temp_path)?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(path, e)
    })
}

/// Write string to file atomically.
pub fn write_string_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    write_atomic(path, contents.as_bytes())
}

/// Ensure a directory exists.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).with_path(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_walk_is_sorted_and_depth_first() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/inner")).unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("b/inner/z.md"), "z").unwrap();
        fs::write(dir.path().join("a/y.md"), "y").unwrap();
        fs::write(dir.path().join("root.json"), "{}").unwrap();

        let rel: Vec<_> = walk(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| path::to_unix_string(e.relative))
            .collect();

        assert_eq!(rel, vec!["a", "a/y.md", "b", "b/inner", "b/inner/z.md", "root.json"]);
    }

    #[test]
    fn test_walk_files_skips_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested/deeper")).unwrap();
        fs::write(dir.path().join("nested/deeper/logo.png"), [0u8, 1, 2]).unwrap();

        let files = walk_files(dir.path()).unwrap();
        assert_eq!(files, vec![PathBuf::from("nested/deeper/logo.png")]);
    }

    #[test]
    fn test_walk_files_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        assert!(walk_files(dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("x/y/manifest.json");
        write_string_atomic(&target, "{}").unwrap();
        assert_eq!(read_to_string(&target).unwrap(), "{}");
        assert!(!dir.path().join("x/y/.manifest.json.tmp").exists());
    }
}
