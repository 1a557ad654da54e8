//! Merging album files.
//!
//! Combines an existing album file with a file of new records into one album
//! file ordered by filename. The sort is stable, so records sharing a filename
//! keep their relative order (existing first). Nothing is de-duplicated.

use crate::metadata::{self, MetadataError};
use crate::types::ImageRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `existing` followed by `additions`, stably sorted by filename.
pub fn merge_records(existing: Vec<ImageRecord>, additions: Vec<ImageRecord>) -> Vec<ImageRecord> {
    let mut merged = existing;
    merged.extend(additions);
    merged.sort_by(|a, b| a.filename.cmp(&b.filename));
    merged
}

/// Merge two album files into `output`. Returns the number of records written.
pub fn merge_album_files(existing: &Path, additions: &Path, output: &Path) -> Result<usize, MergeError> {
    let merged = merge_records(
        metadata::parse_album_file(existing)?,
        metadata::parse_album_file(additions)?,
    );
    metadata::write_album_file(output, &merged).map_err(|source| MergeError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    tracing::debug!(output = %output.display(), records = merged.len(), "merged album files");
    Ok(merged.len())
}
