//! Integration tests for on-disk file intake
//!
//! Stages real files from a temp directory the way the file dialog and the
//! CLI do, and verifies the MIME gate holds regardless of what the file is
//! named.

use std::fs;

use inkcheck::AnalyzeError;
use inkcheck::intake::stage_path;
use inkcheck::preview::decode_preview;
use tempfile::tempdir;

/// 1x1 transparent PNG
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60,
    0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01, 0x7A, 0x5E, 0xAB, 0x3F, 0x00, 0x00, 0x00, 0x00,
    0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[test]
fn stages_and_previews_a_png_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("signature.png");
    fs::write(&path, TINY_PNG).unwrap();

    let file = stage_path(&path).unwrap();
    assert_eq!(file.name, "signature.png");
    assert_eq!(file.mime, "image/png");

    let preview = decode_preview(&file).unwrap();
    assert_eq!(preview.size(), [1, 1]);
}

#[test]
fn rejects_a_text_file_named_like_an_image() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fake.jpg");
    fs::write(&path, "definitely not a jpeg").unwrap();

    let err = stage_path(&path).unwrap_err();
    assert!(matches!(err, AnalyzeError::InvalidFileType { .. }));
}

#[test]
fn missing_file_reports_a_readable_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.png");

    let err = stage_path(&path).unwrap_err();
    assert!(err.user_message().contains("nope.png"));
}
