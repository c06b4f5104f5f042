#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Staged-asset normalization for gh2npm
//!
//! Each downloaded asset is either a compressed tarball holding the
//! real binary, or the binary itself. Tarballs are scanned in stream
//! order for the first regular entry whose path starts with the package
//! name; that payload replaces the archive under the suffix-stripped
//! name. Plain files are only marked executable.

use flate2::read::GzDecoder;
use gh2npm_errors::{Error, ExtractionError};
use gh2npm_events::{Event, EventSender, EventSenderExt};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive as TarArchive;
use tokio::task;

/// Mode applied to every normalized asset
const EXECUTABLE_MODE: u32 = 0o755;

/// Whether an asset name denotes a gzip-compressed tarball
///
/// Exactly the two suffixes `.tar.gz` and `.tgz` qualify; everything
/// else is treated as a plain executable.
#[must_use]
pub fn is_compressed_tarball(name: &str) -> bool {
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// Strip the archive suffix from an asset name
///
/// Names without a recognized suffix pass through unchanged.
#[must_use]
pub fn strip_archive_suffix(name: &str) -> &str {
    name.strip_suffix(".tar.gz")
        .or_else(|| name.strip_suffix(".tgz"))
        .unwrap_or(name)
}

/// Normalize a staged asset into its final executable form
///
/// Archives are replaced by their extracted payload; the archive file
/// is deleted only after a successful extraction, so a failed scan
/// leaves it in place for inspection. Returns the final staged path.
///
/// # Errors
///
/// Returns [`ExtractionError`] when an archive holds no matching
/// payload or its stream is corrupt, and I/O errors from the
/// filesystem work.
pub async fn normalize(
    staged_path: &Path,
    asset_name: &str,
    package_name: &str,
    tx: &EventSender,
) -> Result<PathBuf, Error> {
    if !is_compressed_tarball(asset_name) {
        mark_executable(staged_path).await?;
        return Ok(staged_path.to_path_buf());
    }

    let dest = staged_path.with_file_name(strip_archive_suffix(asset_name));

    tx.emit(Event::ExtractionStarted {
        archive: asset_name.to_string(),
        dest: dest.display().to_string(),
    });

    let archive = staged_path.to_path_buf();
    let payload_dest = dest.clone();
    let package = package_name.to_string();
    task::spawn_blocking(move || extract_payload(&archive, &payload_dest, &package))
        .await
        .map_err(|_| Error::internal("archive extraction task panicked"))??;

    // The archive only goes away once its payload is safely staged.
    tokio::fs::remove_file(staged_path)
        .await
        .map_err(|e| Error::io_with_path(&e, staged_path))?;

    tx.emit(Event::ExtractionCompleted {
        dest: dest.display().to_string(),
    });

    Ok(dest)
}

/// Scan the tar stream and write the first matching payload to `dest`
fn extract_payload(archive: &Path, dest: &Path, package_name: &str) -> Result<(), Error> {
    let file = File::open(archive).map_err(|e| Error::io_with_path(&e, archive))?;
    let mut tar = TarArchive::new(GzDecoder::new(file));

    let entries = tar.entries().map_err(|e| corrupt(archive, &e))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| corrupt(archive, &e))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path().map_err(|e| corrupt(archive, &e))?;
        let name = path.to_string_lossy().into_owned();
        if !name.starts_with(package_name) {
            continue;
        }

        let mut out = File::create(dest).map_err(|e| write_failed(dest, &e))?;
        io::copy(&mut entry, &mut out).map_err(|e| write_failed(dest, &e))?;
        set_executable_blocking(dest)?;
        return Ok(());
    }

    Err(ExtractionError::PayloadNotFound {
        archive: archive.display().to_string(),
        package: package_name.to_string(),
    }
    .into())
}

async fn mark_executable(path: &Path) -> Result<(), Error> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE))
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;
    }
    Ok(())
}

fn set_executable_blocking(path: &Path) -> Result<(), Error> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE))
            .map_err(|e| Error::io_with_path(&e, path))?;
    }
    Ok(())
}

fn corrupt(archive: &Path, e: &io::Error) -> Error {
    ExtractionError::CorruptStream {
        archive: archive.display().to_string(),
        message: e.to_string(),
    }
    .into()
}

fn write_failed(path: &Path, e: &io::Error) -> Error {
    ExtractionError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    }
    .into()
}
