//! Path manipulation utilities.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` lexically; the filesystem is not consulted.
///
/// A `..` directly below the root or a drive prefix is dropped, and leading
/// `..` components of a relative path are kept.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        let last = out.last().copied();
        match (component, last) {
            (Component::CurDir, _) => {}
            (Component::RootDir, _) => {
                out.retain(|c| matches!(c, Component::Prefix(_)));
                out.push(component);
            }
            (Component::ParentDir, Some(Component::Normal(_))) => {
                out.pop();
            }
            (Component::ParentDir, Some(Component::RootDir | Component::Prefix(_))) => {}
            _ => out.push(component),
        }
    }

    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}

/// Join paths safely, preventing path traversal.
///
/// Returns `None` for absolute paths and for any path containing `..`.
pub fn safe_join(base: impl AsRef<Path>, path: impl AsRef<Path>) -> Option<PathBuf> {
    let base = base.as_ref();
    let path = path.as_ref();

    if path.is_absolute() || path.has_root() {
        return None;
    }

    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_) | Component::RootDir));
    if escapes {
        return None;
    }

    match normalize(path) {
        p if p == Path::new(".") => Some(base.to_path_buf()),
        p => Some(base.join(p)),
    }
}

/// Convert a path to a Unix-style string (forward slashes).
pub fn to_unix_string(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(normalize("documents/draft/../MSN-1.md"), Path::new("documents/MSN-1.md"));
        assert_eq!(normalize("./assets/./logo.png"), Path::new("assets/logo.png"));
        assert_eq!(normalize("a/.."), Path::new("."));
    }

    #[test]
    fn normalize_keeps_leading_parents_and_clamps_at_root() {
        assert_eq!(normalize("../../computed"), Path::new("../../computed"));
        assert_eq!(normalize("/../manifest.json"), Path::new("/manifest.json"));
        assert_eq!(normalize("/tmp/x/../y"), Path::new("/tmp/y"));
    }

    #[test]
    fn safe_join_stays_below_base() {
        let base = Path::new("/work/plan");
        assert_eq!(safe_join(base, "manifest.json"), Some(base.join("manifest.json")));
        assert_eq!(
            safe_join(base, "./documents/CAP-1.md"),
            Some(base.join("documents/CAP-1.md"))
        );
        assert_eq!(safe_join(base, "."), Some(base.to_path_buf()));
        assert!(safe_join(base, "../../etc/passwd").is_none());
        assert!(safe_join(base, "documents/../../x").is_none());
        assert!(safe_join(base, "/etc/passwd").is_none());
    }

    #[test]
    fn unix_string_uses_forward_slashes() {
        let p: PathBuf = ["documents", "strategic", "MSN-001.md"].iter().collect();
        assert_eq!(to_unix_string(p), "documents/strategic/MSN-001.md");
    }
}
