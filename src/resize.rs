//! Resize scheduler: materialize both derived variants for every chosen image.
//!
//! Stage 3 of the album pipeline. Each chosen image is one unit of work that
//! produces a square thumbnail and a display-size variant in the album's
//! install directory:
//!
//! ```text
//! install/
//! ├── IMG_0001_150_150.jpg   # thumbnail, {stem}_{size}_{size}.{ext}
//! ├── IMG_0001_1024.jpg      # large,     {stem}_{size}.{ext}
//! └── ...
//! ```
//!
//! ## Worker pool
//!
//! Work runs on a dedicated rayon pool of exactly `workers` threads, built for
//! this call and dropped when it returns. Workers steal records from a shared
//! queue with no ordering between them; the call returns only when every record
//! has been attempted. Outcomes come back in input order regardless.
//!
//! ## Caching
//!
//! A variant whose output file exists is not regenerated unless `force` is
//! set. The key is the output filename alone, so a replaced source with an
//! unchanged name stays stale until forced.
//!
//! ## Failures
//!
//! A bad filename or a failed transform is recorded for that image only, and
//! logged. It never stops other images, and the pass as a whole still succeeds:
//! the image is left without derived paths and pages render a placeholder.

use crate::imaging::{
    BackendError, ImageBackend, Quality, ResizeParams, SizeMode, ThumbnailParams, VariantStatus,
    ensure_large, ensure_thumbnail,
};
use crate::naming::{self, NamingError};
use crate::types::{AlbumImage, DerivedPaths};
use rayon::prelude::*;
use std::fmt;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Why one image has no derived variants.
#[derive(Error, Debug)]
pub enum ResizeError {
    #[error(transparent)]
    InvalidFilename(#[from] NamingError),
    #[error("transform failed for {filename}: {source}")]
    Transform {
        filename: String,
        #[source]
        source: BackendError,
    },
}

/// The pass could not start at all.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not start resize workers: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Settings shared by every image in one pass. Sizes live on each image.
#[derive(Debug, Clone, Copy)]
pub struct ResizeSettings {
    pub mode: SizeMode,
    pub quality: Quality,
    pub workers: usize,
    pub force: bool,
}

/// Progress events for the CLI printer thread.
#[derive(Debug, Clone)]
pub enum ResizeEvent {
    AlbumStarted {
        name: String,
        image_count: usize,
    },
    ImageProcessed {
        index: usize,
        filename: String,
        thumbnail: VariantStatus,
        large: VariantStatus,
    },
    ImageFailed {
        index: usize,
        filename: String,
        error: String,
    },
}

/// Both variants of one image, and what happened to each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPair {
    pub derived: DerivedPaths,
    pub thumbnail: VariantStatus,
    pub large: VariantStatus,
}

#[derive(Debug)]
pub struct RecordOutcome {
    pub filename: String,
    pub result: Result<VariantPair, ResizeError>,
}

/// Per-image outcomes in input order.
#[derive(Debug, Default)]
pub struct ResizeReport {
    pub outcomes: Vec<RecordOutcome>,
}

/// Variant counts for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeStats {
    pub generated: usize,
    pub cached: usize,
    pub failed: usize,
}

impl fmt::Display for ResizeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} generated, {} cached, {} failed",
            self.generated, self.cached, self.failed
        )
    }
}

impl ResizeReport {
    pub fn stats(&self) -> ResizeStats {
        let mut stats = ResizeStats::default();
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(pair) => {
                    for status in [pair.thumbnail, pair.large] {
                        match status {
                            VariantStatus::Generated => stats.generated += 1,
                            VariantStatus::Cached => stats.cached += 1,
                        }
                    }
                }
                Err(_) => stats.failed += 1,
            }
        }
        stats
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ResizeError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.filename.as_str(), e)))
    }
}

/// Ensure thumbnail and large variants exist for every image, filling in
/// `derived` on each image whose variants are both in place.
pub fn generate_images(
    backend: &impl ImageBackend,
    images: &mut [AlbumImage],
    output_dir: &Path,
    settings: &ResizeSettings,
    events: Option<&Sender<ResizeEvent>>,
) -> Result<ResizeReport, SchedulerError> {
    std::fs::create_dir_all(output_dir)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.workers.max(1))
        .build()?;

    let outcomes: Vec<RecordOutcome> = pool.install(|| {
        images
            .par_iter_mut()
            .enumerate()
            .map(|(index, image)| {
                let result = resize_one(backend, image, output_dir, settings);
                image.derived = result.as_ref().ok().map(|pair| pair.derived.clone());
                report_outcome(index, image.filename(), &result, events);
                RecordOutcome {
                    filename: image.filename().to_string(),
                    result,
                }
            })
            .collect()
    });

    Ok(ResizeReport { outcomes })
}

/// Target paths for one image's variants.
pub fn derived_paths(image: &AlbumImage, output_dir: &Path) -> Result<DerivedPaths, NamingError> {
    let thumbnail_filename = naming::thumbnail_variant_name(image.filename(), image.thumbnail_size)?;
    let large_filename = naming::large_variant_name(image.filename(), image.large_size)?;
    Ok(DerivedPaths {
        thumbnail_path: output_dir.join(&thumbnail_filename),
        thumbnail_filename,
        large_path: output_dir.join(&large_filename),
        large_filename,
    })
}

fn resize_one(
    backend: &impl ImageBackend,
    image: &AlbumImage,
    output_dir: &Path,
    settings: &ResizeSettings,
) -> Result<VariantPair, ResizeError> {
    let derived = derived_paths(image, output_dir)?;
    let transform_failed = |source: BackendError| ResizeError::Transform {
        filename: image.filename().to_string(),
        source,
    };

    let thumbnail = ensure_thumbnail(
        backend,
        &ThumbnailParams {
            source: image.source_path.clone(),
            output: derived.thumbnail_path.clone(),
            size: image.thumbnail_size,
            mode: settings.mode,
            quality: settings.quality,
        },
        settings.force,
    )
    .map_err(transform_failed)?;

    let large = ensure_large(
        backend,
        &ResizeParams {
            source: image.source_path.clone(),
            output: derived.large_path.clone(),
            size: image.large_size,
            mode: settings.mode,
            quality: settings.quality,
        },
        settings.force,
    )
    .map_err(transform_failed)?;

    Ok(VariantPair {
        derived,
        thumbnail,
        large,
    })
}

fn report_outcome(
    index: usize,
    filename: &str,
    result: &Result<VariantPair, ResizeError>,
    events: Option<&Sender<ResizeEvent>>,
) {
    let event = match result {
        Ok(pair) => {
            tracing::debug!(
                filename,
                thumbnail = ?pair.thumbnail,
                large = ?pair.large,
                "variants ready"
            );
            ResizeEvent::ImageProcessed {
                index,
                filename: filename.to_string(),
                thumbnail: pair.thumbnail,
                large: pair.large,
            }
        }
        Err(e) => {
            tracing::warn!(filename, error = %e, "skipping image");
            ResizeEvent::ImageFailed {
                index,
                filename: filename.to_string(),
                error: e.to_string(),
            }
        }
    };
    if let Some(tx) = events {
        // A dropped receiver only means nobody is watching progress.
        let _ = tx.send(event);
    }
}
