use content_combine::combine::combine_with;
use content_combine::config::{CategorySpec, CombineConfig};
use content_combine::contract::{CombineFailure, MockOutputWriter, SourceShape};
use content_combine::output::{copy_to_public, write_primary};
use content_combine::report::render_outcome;
use mockall::Sequence;
use std::fs::{self, create_dir_all};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn test_primary_then_public_write_order() {
    let mut writer = MockOutputWriter::new();
    let mut seq = Sequence::new();

    writer
        .expect_write()
        .withf(|path: &Path, _: &[u8]| path == Path::new("/src/items/items.json"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, contents| Ok(contents.len() as u64));
    writer
        .expect_dir_exists()
        .withf(|dir: &Path| dir == Path::new("/public/items"))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(true);
    writer
        .expect_write()
        .withf(|path: &Path, _: &[u8]| path == Path::new("/public/items/items.json"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, contents| Ok(contents.len() as u64));

    let mut outputs = write_primary(&writer, b"{}", Path::new("/src/items/items.json"))
        .expect("primary write should succeed");
    copy_to_public(&writer, b"{}", Path::new("/public/items"), "items.json", &mut outputs)
        .expect("public copy should succeed");

    assert_eq!(outputs.primary_bytes, 2);
    assert_eq!(outputs.public, Some(PathBuf::from("/public/items/items.json")));
}

#[test]
fn test_absent_public_directory_is_not_written() {
    let mut writer = MockOutputWriter::new();
    writer.expect_write().times(1).returning(|_, _| Ok(10));
    writer.expect_dir_exists().return_const(false);

    let mut outputs = write_primary(&writer, b"0123456789", Path::new("/src/items/items.json"))
        .expect("primary write should succeed");
    copy_to_public(&writer, b"0123456789", Path::new("/public/items"), "items.json", &mut outputs)
        .expect("absent public directory is not an error");

    assert_eq!(outputs.public, None);
}

#[test]
fn test_primary_write_failure_fails_category() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("data/items");
    create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.json"), r#"{"id":"sword"}"#).unwrap();

    let mut writer = MockOutputWriter::new();
    writer
        .expect_write()
        .times(1)
        .returning(|_, _| Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only")));
    writer.expect_dir_exists().never();

    let config = CombineConfig::with_root(tmp.path());
    let category = CategorySpec::new("items", SourceShape::Object);
    let outcome = combine_with(&config, &category, &writer);

    assert!(!outcome.success());
    assert_eq!(outcome.combined_count, 1);
    match outcome.failure {
        Some(CombineFailure::WriteFailed { path, .. }) => assert_eq!(path, dir.join("items.json")),
        other => panic!("expected write failure, got {other:?}"),
    }
}

#[test]
fn test_no_writes_when_nothing_valid() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("data/items");
    create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.json"), "[]").unwrap();

    let mut writer = MockOutputWriter::new();
    writer.expect_write().never();
    writer.expect_dir_exists().never();

    let config = CombineConfig::with_root(tmp.path());
    let outcome = combine_with(&config, &CategorySpec::new("items", SourceShape::Object), &writer);

    assert!(matches!(outcome.failure, Some(CombineFailure::NoValidItems { .. })));
    assert!(outcome.errors.is_empty());
}

#[test]
fn test_public_write_failure_fails_category_but_keeps_primary() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("data/items");
    create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.json"), r#"{"id":"sword"}"#).unwrap();
    let primary = dir.join("items.json");
    let public_dir = tmp.path().join("client/public/data/items");
    let public_path = public_dir.join("items.json");

    let mut writer = MockOutputWriter::new();
    let mut seq = Sequence::new();
    let expected_primary = primary.clone();
    writer
        .expect_write()
        .withf(move |path: &Path, _: &[u8]| path == expected_primary)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, contents| Ok(contents.len() as u64));
    writer
        .expect_dir_exists()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(true);
    let expected_public = public_path.clone();
    writer
        .expect_write()
        .withf(move |path: &Path, _: &[u8]| path == expected_public)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only")));

    let config = CombineConfig::with_root(tmp.path());
    let outcome = combine_with(&config, &CategorySpec::new("items", SourceShape::Object), &writer);

    assert!(!outcome.success());
    match &outcome.failure {
        Some(CombineFailure::WriteFailed { path, .. }) => assert_eq!(path, &public_path),
        other => panic!("expected public write failure, got {other:?}"),
    }
    let outputs = outcome.outputs.as_ref().expect("primary output is kept");
    assert_eq!(outputs.primary, primary);
    assert_eq!(outputs.public, None);

    let report = render_outcome(&outcome);
    assert!(report.contains("Successfully combined 1 items into"), "got: {report}");
    assert!(report.contains("File size:"), "got: {report}");
    assert!(report.contains("Error: writing output file"), "got: {report}");
}
