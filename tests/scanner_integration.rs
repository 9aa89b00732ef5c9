//! Integration tests for the size aggregator and the top-level scanner.

mod common;

use std::fs;

use common::{write_file, FaultyFs, Injected, ReversedFs};
use dirsize::fs::{EntryKind, OsFileSystem};
use dirsize::scanner::{measure, scan_top_level, size_of};
use dirsize::{DirsizeError, TreeCache};
use tempfile::TempDir;

#[test]
fn test_size_of_matches_sum_of_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let mut expected = 0;
    for (i, name) in ["a/b/c.bin", "a/d.bin", "e.bin", "f/g/h/i.bin"].iter().enumerate() {
        let len = (i + 1) * 1000;
        write_file(&root.join(name), len);
        expected += len as u64;
    }
    fs::create_dir_all(root.join("empty/nested")).unwrap();

    assert_eq!(size_of(&OsFileSystem, root).unwrap(), expected);
}

#[test]
fn test_scan_mixed_files_and_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("a"), 10);
    write_file(&root.join("b"), 30);
    write_file(&root.join("c/inner"), 5);

    let result = scan_top_level(&OsFileSystem, root).unwrap();

    let summary: Vec<_> = result
        .iter()
        .map(|e| (e.path.clone(), e.kind, e.size))
        .collect();
    assert_eq!(
        summary,
        vec![
            (root.join("b"), EntryKind::File, 30),
            (root.join("a"), EntryKind::File, 10),
            (root.join("c"), EntryKind::Directory, 5),
        ]
    );
}

#[test]
fn test_permission_denied_child_does_not_fail_scan() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("locked/visible"), 4);
    write_file(&root.join("locked/secret/hidden"), 100);
    write_file(&root.join("b"), 30);
    write_file(&root.join("c/d"), 12);

    let fs = FaultyFs::new().with_fault(root.join("locked/secret"), Injected::DenyListing);
    let result = scan_top_level(&fs, root).unwrap();

    let summary: Vec<_> = result
        .iter()
        .map(|e| (e.name(), e.size, e.warnings))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("b".to_string(), 30, 0),
            ("c".to_string(), 12, 0),
            ("locked".to_string(), 4, 1),
        ]
    );
}

#[test]
fn test_denied_top_level_child_reports_zero() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("private/data"), 500);
    write_file(&root.join("public"), 7);

    let fs = FaultyFs::new().with_fault(root.join("private"), Injected::DenyListing);
    let result = scan_top_level(&fs, root).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].name(), "public");
    assert_eq!(result[1].name(), "private");
    assert_eq!(result[1].size, 0);
    assert!(result[1].is_partial());
}

#[test]
fn test_descriptor_fault_keeps_sibling_sizes() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("tree/flaky/x"), 1000);
    write_file(&root.join("tree/steady/y"), 40);
    write_file(&root.join("tree/z"), 2);

    let fs = FaultyFs::new().with_fault(root.join("tree/flaky"), Injected::BadDescriptor);
    let report = measure(&fs, &root.join("tree")).unwrap();

    assert_eq!(report.bytes, 42);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].path, root.join("tree/flaky"));
}

#[test]
fn test_unexpected_error_fails_scan() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("ok"), 1);
    write_file(&root.join("bad/file"), 1);

    let fs = FaultyFs::new().with_fault(root.join("bad/file"), Injected::Broken);
    let err = scan_top_level(&fs, root).unwrap_err();

    match err {
        DirsizeError::Io { path, .. } => assert_eq!(path, root.join("bad/file")),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_unexpected_error_in_size_of_propagates() {
    let dir = TempDir::new().unwrap();
    write_file(&dir.path().join("f"), 1);

    let fs = FaultyFs::new().with_fault(dir.path().join("f"), Injected::Broken);
    assert!(size_of(&fs, dir.path()).is_err());
}

#[test]
fn test_scan_results_follow_link_metadata() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("elsewhere/big"), 10_000);
    fs::create_dir(root.join("scanned")).unwrap();
    std::os::unix::fs::symlink(root.join("elsewhere"), root.join("scanned/link")).unwrap();

    let result = scan_top_level(&OsFileSystem, &root.join("scanned")).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].kind, EntryKind::File);
    assert!(result[0].size < 10_000);
}

fn create_nested_tree(root: &std::path::Path) {
    write_file(&root.join("a/one.bin"), 11);
    write_file(&root.join("a/two.bin"), 22);
    write_file(&root.join("a/deep/three.bin"), 33);
    write_file(&root.join("a/deep/er/four.bin"), 44);
    write_file(&root.join("b/five.bin"), 55);
    write_file(&root.join("c.bin"), 66);
    fs::create_dir_all(root.join("d/empty")).unwrap();
}

#[test]
fn test_size_of_ignores_listing_order() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    create_nested_tree(root);

    let sorted = measure(&OsFileSystem, root).unwrap();
    let reversed = measure(&ReversedFs::new(), root).unwrap();

    assert_eq!(sorted.bytes, 231);
    assert_eq!(reversed.bytes, sorted.bytes);
    for sub in ["a", "a/deep", "b", "d"] {
        assert_eq!(
            size_of(&ReversedFs::new(), &root.join(sub)).unwrap(),
            size_of(&OsFileSystem, &root.join(sub)).unwrap(),
            "{}",
            sub
        );
    }
}

#[test]
fn test_cache_sizes_ignore_listing_order() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    create_nested_tree(root);

    let mut sorted = TreeCache::new();
    sorted.build(&OsFileSystem, root).unwrap();
    let mut reversed = TreeCache::new();
    reversed.build(&ReversedFs::new(), root).unwrap();

    assert_eq!(sorted.len(), reversed.len());
    for sub in ["", "a", "a/deep", "a/deep/er", "b", "d", "d/empty", "c.bin"] {
        let path = root.join(sub);
        assert_eq!(
            reversed.get(&path).unwrap().size(),
            sorted.get(&path).unwrap().size(),
            "{}",
            path.display()
        );
    }
    assert_eq!(reversed.get(root).unwrap().size(), 231);
}

#[test]
fn test_scan_order_ignores_listing_order() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    create_nested_tree(root);

    let sorted = scan_top_level(&OsFileSystem, root).unwrap();
    let reversed = scan_top_level(&ReversedFs::new(), root).unwrap();

    let sizes = |entries: &[dirsize::scanner::ScanEntry]| -> Vec<(String, u64)> {
        entries.iter().map(|e| (e.name(), e.size)).collect()
    };
    assert_eq!(sizes(&sorted), sizes(&reversed));
}

#[test]
fn test_scan_wide_directory() {
    const WIDTH: usize = 5000;
    let dir = TempDir::new().unwrap();
    for i in 0..WIDTH {
        fs::File::create(dir.path().join(format!("entry{:05}", i))).unwrap();
    }
    write_file(&dir.path().join("largest"), 10);

    let result = scan_top_level(&OsFileSystem, dir.path()).unwrap();

    assert_eq!(result.len(), WIDTH + 1);
    assert_eq!(result[0].name(), "largest");
    assert_eq!(result[1].name(), "entry00000");
    assert_eq!(result[WIDTH].name(), format!("entry{:05}", WIDTH - 1));
}
