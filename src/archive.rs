//! Album archive: one zip of the chosen originals.
//!
//! The archive holds one deflated entry per chosen image, in chosen order,
//! named by the original filename. It is written to `{name}.zip.partial` and
//! renamed into place, so an interrupted build never leaves a truncated
//! archive that the next run would mistake for a finished one.

use crate::render::WriteStatus;
use crate::types::AlbumImage;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// One file to put in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub source: PathBuf,
}

/// Which files go in, in which order: every chosen original, as listed.
pub fn plan_archive(images: &[AlbumImage]) -> Vec<ArchiveEntry> {
    images
        .iter()
        .map(|image| ArchiveEntry {
            name: image.filename().to_string(),
            source: image.source_path.clone(),
        })
        .collect()
}

/// Write the archive unless it already exists and `force` is off.
pub fn ensure_archive(
    path: &Path,
    entries: &[ArchiveEntry],
    force: bool,
) -> Result<WriteStatus, ArchiveError> {
    let exists = path.try_exists().map_err(io_error(path))?;
    if exists && !force {
        tracing::debug!(path = %path.display(), "archive exists, skipping");
        return Ok(WriteStatus::Skipped);
    }
    write_archive(path, entries)?;
    Ok(WriteStatus::Written)
}

/// Write `entries` into a new zip at `path`.
pub fn write_archive(path: &Path, entries: &[ArchiveEntry]) -> Result<(), ArchiveError> {
    let partial = partial_path(path);
    let result = write_zip(&partial, entries)
        .and_then(|()| std::fs::rename(&partial, path).map_err(io_error(path)));
    if result.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    result
}

fn write_zip(target: &Path, entries: &[ArchiveEntry]) -> Result<(), ArchiveError> {
    let file = File::create(target).map_err(io_error(target))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        zip.start_file(entry.name.as_str(), options)?;
        let mut source = File::open(&entry.source).map_err(io_error(&entry.source))?;
        io::copy(&mut source, &mut zip).map_err(io_error(&entry.source))?;
    }
    zip.finish()?.flush().map_err(io_error(target))
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ArchiveError + use<> {
    let path = path.to_path_buf();
    move |source| ArchiveError::Io { path, source }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::album_images;
    use std::io::Read;
    use tempfile::TempDir;

    fn write_sources(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), format!("bytes of {name}")).unwrap();
        }
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let mut zip = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn plan_keeps_chosen_order() {
        let tmp = TempDir::new().unwrap();
        let images = album_images(tmp.path(), &["c.jpg", "a.jpg", "b.jpg"], 100, 600);

        let plan = plan_archive(&images);

        let names: Vec<&str> = plan.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c.jpg", "a.jpg", "b.jpg"]);
        assert_eq!(plan[0].source, tmp.path().join("c.jpg"));
    }

    #[test]
    fn archive_contains_originals_in_order() {
        let tmp = TempDir::new().unwrap();
        write_sources(tmp.path(), &["b.jpg", "a.jpg"]);
        let images = album_images(tmp.path(), &["b.jpg", "a.jpg"], 100, 600);
        let path = tmp.path().join("Summer.zip");

        write_archive(&path, &plan_archive(&images)).unwrap();

        assert_eq!(entry_names(&path), vec!["b.jpg", "a.jpg"]);
        let mut zip = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut first = zip.by_index(0).unwrap();
        assert_eq!(first.compression(), CompressionMethod::Deflated);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "bytes of b.jpg");
    }

    #[test]
    fn existing_archive_is_kept_unless_forced() {
        let tmp = TempDir::new().unwrap();
        write_sources(tmp.path(), &["a.jpg"]);
        let entries = plan_archive(&album_images(tmp.path(), &["a.jpg"], 100, 600));
        let path = tmp.path().join("Summer.zip");
        std::fs::write(&path, b"old").unwrap();

        assert_eq!(ensure_archive(&path, &entries, false).unwrap(), WriteStatus::Skipped);
        assert_eq!(std::fs::read(&path).unwrap(), b"old");

        assert_eq!(ensure_archive(&path, &entries, true).unwrap(), WriteStatus::Written);
        assert_eq!(entry_names(&path), vec!["a.jpg"]);
    }

    #[test]
    fn missing_original_fails_without_leaving_files() {
        let tmp = TempDir::new().unwrap();
        write_sources(tmp.path(), &["a.jpg"]);
        let entries = plan_archive(&album_images(tmp.path(), &["a.jpg", "gone.jpg"], 100, 600));
        let path = tmp.path().join("Summer.zip");

        let err = write_archive(&path, &entries).unwrap_err();

        assert!(matches!(err, ArchiveError::Io { path: p, .. } if p.ends_with("gone.jpg")));
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn empty_archive_is_valid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Empty.zip");
        write_archive(&path, &[]).unwrap();
        assert!(entry_names(&path).is_empty());
    }
}
