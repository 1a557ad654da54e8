//! Per-album orchestration.
//!
//! Runs one album through the whole pipeline, one phase after the other:
//!
//! ```text
//! load      album file  → images         (fail-fast)
//! choose    tag filter  → chosen images
//! resize    W workers   → variants       (per-image failures tolerated)
//! render    pages       → *.html         (fail-fast)
//! originals copy        → install_dir/   (optional, fail-fast)
//! archive   zip         → {name}.zip     (optional, fail-fast)
//! ```
//!
//! Every phase error is wrapped in an [`AlbumError`] naming the album and the
//! phase. The one exception is a single image failing to resize: that is
//! logged, reported through the resize event channel, and the image is
//! rendered with a placeholder.

use crate::archive::{self, ArchiveError};
use crate::config::{BuildConfig, ImagesConfig};
use crate::filter;
use crate::imaging::{ImageBackend, is_supported_filename};
use crate::metadata::{self, MetadataError};
use crate::naming::{archive_filename, split_filename, url_component};
use crate::render::{
    self, AlbumView, GalleryLink, HtmlImage, PageStats, RenderError, WriteStatus,
};
use crate::resize::{self, ResizeEvent, ResizeReport, ResizeStats, SchedulerError};
use crate::types::{AlbumImage, DerivedPaths, ImageRecord};
use rand::Rng;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("album {album:?}: loading failed: {source}")]
    Load {
        album: String,
        #[source]
        source: MetadataError,
    },
    #[error("album {album:?}: resizing failed: {source}")]
    Resize {
        album: String,
        #[source]
        source: SchedulerError,
    },
    #[error("album {album:?}: rendering failed: {source}")]
    Render {
        album: String,
        #[source]
        source: RenderError,
    },
    #[error("album {album:?}: copying original {}: {source}", path.display())]
    Originals {
        album: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("album {album:?}: writing archive failed: {source}")]
    Archive {
        album: String,
        #[source]
        source: ArchiveError,
    },
}

impl AlbumError {
    /// Name of the album that failed.
    pub fn album(&self) -> &str {
        match self {
            AlbumError::Load { album, .. }
            | AlbumError::Resize { album, .. }
            | AlbumError::Render { album, .. }
            | AlbumError::Originals { album, .. }
            | AlbumError::Archive { album, .. } => album,
        }
    }
}

/// One album: where it comes from, where it goes, and what it holds once loaded.
#[derive(Debug, Clone)]
pub struct Album {
    pub name: String,
    pub album_file: PathBuf,
    pub image_dir: PathBuf,
    pub install_dir: PathBuf,
    /// Set when the album is installed as part of a gallery.
    pub gallery: Option<GalleryLink>,
    /// Wanted tags. Empty selects every image.
    pub tags: Vec<String>,
    /// Every image in album file order. Empty until [`Album::load`].
    pub images: Vec<AlbumImage>,
    /// The tag-filtered subsequence that gets built.
    pub chosen: Vec<AlbumImage>,
}

/// What one album install did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumSummary {
    pub name: String,
    pub install_dir: PathBuf,
    pub total_images: usize,
    pub chosen_images: usize,
    pub variants: ResizeStats,
    pub pages: PageStats,
    /// Originals copied this run. Existing copies are not counted.
    pub originals_copied: usize,
    /// `None` when no archive was requested or nothing was chosen.
    pub archive: Option<WriteStatus>,
}

/// An album file validated without building anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumCheck {
    pub name: String,
    pub album_file: PathBuf,
    pub total: usize,
    pub chosen: Vec<ImageRecord>,
    /// Chosen images that would be built without variants.
    pub warnings: Vec<String>,
}

/// Parse and filter an album file, and flag chosen images that cannot be
/// resized. With `image_dir`, missing sources are flagged too.
pub fn check_album(
    name: &str,
    album_file: &Path,
    image_dir: Option<&Path>,
    tags: &[String],
) -> Result<AlbumCheck, AlbumError> {
    let records = metadata::parse_album_file(album_file).map_err(|source| AlbumError::Load {
        album: name.to_string(),
        source,
    })?;
    let chosen = filter::select(&records, tags);

    let mut warnings = Vec::new();
    for record in &chosen {
        let filename = &record.filename;
        if let Err(err) = split_filename(filename) {
            warnings.push(err.to_string());
        } else if !is_supported_filename(filename) {
            warnings.push(format!("{filename}: unsupported image format"));
        }
        if let Some(dir) = image_dir {
            if !dir.join(filename).is_file() {
                warnings.push(format!("{filename}: source not found in {}", dir.display()));
            }
        }
    }

    Ok(AlbumCheck {
        name: name.to_string(),
        album_file: album_file.to_path_buf(),
        total: records.len(),
        chosen,
        warnings,
    })
}

impl Album {
    pub fn new(
        name: impl Into<String>,
        album_file: impl Into<PathBuf>,
        image_dir: impl Into<PathBuf>,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            album_file: album_file.into(),
            image_dir: image_dir.into(),
            install_dir: install_dir.into(),
            gallery: None,
            tags: Vec::new(),
            images: Vec::new(),
            chosen: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Link every page back to the gallery index at `index_url`.
    pub fn in_gallery(
        mut self,
        gallery_name: impl Into<String>,
        index_url: impl Into<String>,
    ) -> Self {
        self.gallery = Some(GalleryLink {
            name: gallery_name.into(),
            url: index_url.into(),
        });
        self
    }

    /// Parse the album file. Sources resolve against `image_dir`.
    pub fn load(&mut self, config: &ImagesConfig) -> Result<(), AlbumError> {
        let records = metadata::parse_album_file(&self.album_file).map_err(|source| {
            AlbumError::Load {
                album: self.name.clone(),
                source,
            }
        })?;
        self.images = records
            .into_iter()
            .map(|record| AlbumImage {
                source_path: self.image_dir.join(&record.filename),
                record,
                thumbnail_size: config.thumbnail_size,
                large_size: config.large_size,
                derived: None,
            })
            .collect();
        tracing::debug!(album = %self.name, images = self.images.len(), "loaded album file");
        Ok(())
    }

    /// Apply the tag filter to the loaded images.
    pub fn choose_images(&mut self) {
        self.chosen = filter::select(&self.images, &self.tags);
        tracing::debug!(
            album = %self.name,
            chosen = self.chosen.len(),
            of = self.images.len(),
            "chose images"
        );
    }

    /// Resize every chosen image into the install directory.
    pub fn generate_images(
        &mut self,
        backend: &impl ImageBackend,
        config: &BuildConfig,
        events: Option<&Sender<ResizeEvent>>,
    ) -> Result<ResizeReport, AlbumError> {
        if let Some(tx) = events {
            tx.send(ResizeEvent::AlbumStarted {
                name: self.name.clone(),
                image_count: self.chosen.len(),
            })
            .ok();
        }
        resize::generate_images(
            backend,
            &mut self.chosen,
            &self.install_dir,
            &config.resize_settings(),
            events,
        )
        .map_err(|source| AlbumError::Resize {
            album: self.name.clone(),
            source,
        })
    }

    /// Write album pages and image pages for the chosen images.
    pub fn generate_html(&self, config: &BuildConfig) -> Result<PageStats, AlbumError> {
        let render_err = |source: RenderError| AlbumError::Render {
            album: self.name.clone(),
            source,
        };
        fs::create_dir_all(&self.install_dir)
            .map_err(|source| RenderError::Io {
                path: self.install_dir.clone(),
                source,
            })
            .map_err(render_err)?;

        let view = AlbumView {
            name: &self.name,
            gallery: self.gallery.as_ref(),
            archive_url: config
                .output
                .include_archive
                .then(|| url_component(&archive_filename(&self.name))),
            page_size: config.pages.page_size,
        };
        let images = HtmlImage::from_album_images(&self.chosen, config.output.include_originals);
        render::write_album_pages(&self.install_dir, &view, &images, config.force.html)
            .map_err(render_err)
    }

    /// Copy each chosen source into the install directory unless a copy is
    /// already there. Returns how many files were copied.
    pub fn install_originals(&self, force: bool) -> Result<usize, AlbumError> {
        let mut copied = 0;
        for image in &self.chosen {
            let target = self.install_dir.join(image.filename());
            let originals_err = |path: &Path| {
                let album = self.name.clone();
                let path = path.to_path_buf();
                move |source: io::Error| AlbumError::Originals { album, path, source }
            };
            if !force && target.try_exists().map_err(originals_err(&target))? {
                continue;
            }
            fs::copy(&image.source_path, &target).map_err(originals_err(&image.source_path))?;
            copied += 1;
        }
        tracing::debug!(album = %self.name, copied, "installed originals");
        Ok(copied)
    }

    /// Bundle the chosen originals into `{name}.zip` in the install directory.
    pub fn make_archive(&self, force: bool) -> Result<WriteStatus, AlbumError> {
        let path = self.install_dir.join(archive_filename(&self.name));
        let entries = archive::plan_archive(&self.chosen);
        archive::ensure_archive(&path, &entries, force).map_err(|source| AlbumError::Archive {
            album: self.name.clone(),
            source,
        })
    }

    /// Run every phase in order.
    pub fn install(
        &mut self,
        config: &BuildConfig,
        backend: &impl ImageBackend,
        events: Option<&Sender<ResizeEvent>>,
    ) -> Result<AlbumSummary, AlbumError> {
        tracing::info!(album = %self.name, install_dir = %self.install_dir.display(), "installing album");

        self.load(&config.images)?;
        self.choose_images();

        let report = self.generate_images(backend, config, events)?;
        for (filename, error) in report.failures() {
            tracing::warn!(album = %self.name, %filename, %error, "image left without variants");
        }

        let pages = self.generate_html(config)?;

        let originals_copied = if config.output.include_originals {
            self.install_originals(config.force.images)?
        } else {
            0
        };

        let archive = if config.output.include_archive && !self.chosen.is_empty() {
            Some(self.make_archive(config.force.archive)?)
        } else {
            None
        };

        Ok(AlbumSummary {
            name: self.name.clone(),
            install_dir: self.install_dir.clone(),
            total_images: self.images.len(),
            chosen_images: self.chosen.len(),
            variants: report.stats(),
            pages,
            originals_copied,
            archive,
        })
    }

    /// A random chosen image with a thumbnail, to stand for the album on the
    /// gallery index. `None` when no chosen image has variants.
    pub fn representative<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&DerivedPaths> {
        let candidates: Vec<&DerivedPaths> =
            self.chosen.iter().filter_map(|i| i.derived.as_ref()).collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.random_range(0..candidates.len())])
    }
}
