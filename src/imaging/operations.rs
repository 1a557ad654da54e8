//! High-level image operations.
//!
//! These functions sit between the resize scheduler and the backend. They
//! decide whether a variant needs producing (existence of the output file is
//! the whole cache) and then call the backend.

use super::backend::{BackendError, ImageBackend};
use super::params::{ResizeParams, ThumbnailParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// What happened to one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    /// The backend wrote the file.
    Generated,
    /// The file already existed and was left alone.
    Cached,
}

/// Produce the thumbnail unless it already exists.
pub fn ensure_thumbnail(
    backend: &impl ImageBackend,
    params: &ThumbnailParams,
    force: bool,
) -> Result<VariantStatus> {
    ensure(&params.output, force, || backend.thumbnail(params))
}

/// Produce the large variant unless it already exists.
pub fn ensure_large(
    backend: &impl ImageBackend,
    params: &ResizeParams,
    force: bool,
) -> Result<VariantStatus> {
    ensure(&params.output, force, || backend.resize(params))
}

fn ensure(output: &Path, force: bool, produce: impl FnOnce() -> Result<()>) -> Result<VariantStatus> {
    if !force && output.try_exists()? {
        return Ok(VariantStatus::Cached);
    }
    if let Err(e) = produce() {
        // A half-written variant would be mistaken for a cached one next run.
        let _ = std::fs::remove_file(output);
        return Err(e);
    }
    Ok(VariantStatus::Generated)
}
