use bspec_common_core::{ErrorCategory, Result};
use bspec_common_fs as fs;
use std::path::PathBuf;

#[test]
fn test_integration_with_core_types() {
    let result: Result<String> = fs::read_to_string("/nonexistent/file");
    assert!(result.is_err());

    let error = result.unwrap_err();
    assert_eq!(error.category(), ErrorCategory::NotFound);
    assert_eq!(error.path(), Some(std::path::Path::new("/nonexistent/file")));
}

#[test]
fn test_path_normalization_integration() {
    let test_cases = vec![
        ("./a/b/../c", "a/c"),
        ("a/./b", "a/b"),
        ("a/../b", "b"),
        ("../../a/b", "../../a/b"),
        ("a/b/c/../../d", "a/d"),
        ("", "."),
        (".", "."),
        ("..", ".."),
    ];

    for (input, expected) in test_cases {
        let normalized = fs::path::normalize(input);
        assert_eq!(normalized, PathBuf::from(expected), "Failed for input: {}", input);
    }
}

#[test]
fn test_safe_join_rejections() {
    let test_cases = vec![
        ("manifest.json", Some("/out/manifest.json")),
        ("documents/", Some("/out/documents")),
        ("./assets/logo.png", Some("/out/assets/logo.png")),
        (".", Some("/out")),
        ("../etc/passwd", None),
        ("documents/../../x", None),
        ("/etc/passwd", None),
    ];

    for (input, expected) in test_cases {
        let joined = fs::path::safe_join("/out", input);
        assert_eq!(joined, expected.map(PathBuf::from), "Failed for input: {}", input);
    }
}

#[test]
fn test_walk_entire_tree() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("documents/strategic")).unwrap();
    std::fs::write(dir.path().join("documents/strategic/MSN-001.md"), "---\n---\n").unwrap();
    std::fs::write(dir.path().join("manifest.json"), "{}").unwrap();

    let entries = fs::walk(dir.path()).unwrap();
    let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![fs::EntryKind::Dir, fs::EntryKind::Dir, fs::EntryKind::File, fs::EntryKind::File]
    );
}
