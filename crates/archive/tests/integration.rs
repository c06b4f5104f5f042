//! Integration tests for asset normalization

use flate2::write::GzEncoder;
use flate2::Compression;
use gh2npm_archive::normalize;
use gh2npm_errors::{Error, ExtractionError};
use gh2npm_events::channel;
use std::path::Path;
use tempfile::tempdir;

fn build_archive(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).unwrap().permissions().mode() & 0o111 != 0
}

#[tokio::test]
async fn test_archive_payload_extracted() {
    let temp = tempdir().unwrap();
    let staged = temp.path().join("tool-linux-amd64.tar.gz");
    build_archive(
        &staged,
        &[
            ("other/file", b"not the payload".as_slice()),
            ("tool-linux-amd64/tool", b"payload bytes"),
        ],
    );

    let (tx, _rx) = channel();
    let final_path = normalize(&staged, "tool-linux-amd64.tar.gz", "tool", &tx)
        .await
        .unwrap();

    assert_eq!(final_path, temp.path().join("tool-linux-amd64"));
    assert_eq!(std::fs::read(&final_path).unwrap(), b"payload bytes");
    assert!(!staged.exists(), "archive deleted after extraction");
    #[cfg(unix)]
    assert!(is_executable(&final_path));
}

#[tokio::test]
async fn test_first_matching_entry_wins() {
    let temp = tempdir().unwrap();
    let staged = temp.path().join("tool.tgz");
    build_archive(
        &staged,
        &[
            ("tool/first", b"first".as_slice()),
            ("tool/second", b"second"),
        ],
    );

    let (tx, _rx) = channel();
    let final_path = normalize(&staged, "tool.tgz", "tool", &tx).await.unwrap();

    assert_eq!(std::fs::read(&final_path).unwrap(), b"first");
}

#[tokio::test]
async fn test_no_payload_keeps_archive() {
    let temp = tempdir().unwrap();
    let staged = temp.path().join("tool.tar.gz");
    build_archive(&staged, &[("unrelated/entry", b"x".as_slice())]);

    let (tx, _rx) = channel();
    let err = normalize(&staged, "tool.tar.gz", "tool", &tx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Extraction(ExtractionError::PayloadNotFound { .. })
    ));
    assert!(staged.exists(), "archive kept on failure");
}

#[tokio::test]
async fn test_empty_archive_fails() {
    let temp = tempdir().unwrap();
    let staged = temp.path().join("tool.tar.gz");
    build_archive(&staged, &[]);

    let (tx, _rx) = channel();
    let err = normalize(&staged, "tool.tar.gz", "tool", &tx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Extraction(ExtractionError::PayloadNotFound { .. })
    ));
}

#[tokio::test]
async fn test_corrupt_stream_keeps_archive() {
    let temp = tempdir().unwrap();
    let staged = temp.path().join("tool.tar.gz");
    std::fs::write(&staged, b"this is not a gzip stream").unwrap();

    let (tx, _rx) = channel();
    let err = normalize(&staged, "tool.tar.gz", "tool", &tx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Extraction(ExtractionError::CorruptStream { .. })
    ));
    assert!(staged.exists());
}

#[tokio::test]
async fn test_plain_file_marked_executable_in_place() {
    let temp = tempdir().unwrap();
    let staged = temp.path().join("tool-darwin-arm64");
    std::fs::write(&staged, b"mach-o bytes").unwrap();

    let (tx, _rx) = channel();
    let final_path = normalize(&staged, "tool-darwin-arm64", "tool", &tx)
        .await
        .unwrap();

    assert_eq!(final_path, staged);
    assert_eq!(std::fs::read(&final_path).unwrap(), b"mach-o bytes");
    #[cfg(unix)]
    assert!(is_executable(&final_path));
}
