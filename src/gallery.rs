//! Multi-album orchestration.
//!
//! A gallery is every album listed in a gallery file, each installed into its
//! own subdirectory of one install root, plus a top-level `index.html` with
//! one card per album:
//!
//! ```text
//! site/
//! ├── index.html          # gallery index
//! ├── beach/              # album-subdir of the first album
//! │   ├── index.html
//! │   └── ...
//! └── mountains/
//!     └── ...
//! ```
//!
//! Albums are installed one after another; the only parallelism is inside each
//! album's resize phase. The first album error aborts the whole gallery, and
//! the gallery index is written only after every album succeeded.
//!
//! Two albums sharing an `album-subdir` would overwrite each other's pages, so
//! that is rejected before any album is touched.

use crate::album::{self, Album, AlbumCheck, AlbumError, AlbumSummary};
use crate::config::BuildConfig;
use crate::gallery_file::{self, AlbumSpec, GalleryFileError};
use crate::imaging::ImageBackend;
use crate::naming::{gallery_index_url, url_component, url_path};
use crate::render::{self, GalleryEntry, RenderError, WriteStatus};
use crate::resize::ResizeEvent;
use rand::Rng;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error(transparent)]
    GalleryFile(#[from] GalleryFileError),
    #[error(transparent)]
    Album(#[from] AlbumError),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("albums {first:?} and {second:?} both install into {subdir:?}")]
    DuplicateSubdir {
        subdir: String,
        first: String,
        second: String,
    },
    #[error("gallery index: {0}")]
    Render(#[from] RenderError),
}

/// A gallery to build.
#[derive(Debug, Clone)]
pub struct Gallery {
    /// Title of the gallery index, shown in every album's breadcrumb.
    pub name: String,
    pub gallery_file: PathBuf,
    pub install_dir: PathBuf,
}

/// What one gallery install did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySummary {
    pub albums: Vec<AlbumSummary>,
    pub index: WriteStatus,
}

impl Gallery {
    pub fn new(
        name: impl Into<String>,
        gallery_file: impl Into<PathBuf>,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            gallery_file: gallery_file.into(),
            install_dir: install_dir.into(),
        }
    }

    /// Install every album, picking representatives with the thread rng.
    pub fn install(
        &self,
        config: &BuildConfig,
        backend: &impl ImageBackend,
        events: Option<&Sender<ResizeEvent>>,
    ) -> Result<GallerySummary, GalleryError> {
        self.install_with_rng(config, backend, events, &mut rand::rng())
    }

    /// Install every album, picking representatives with `rng`.
    pub fn install_with_rng<R: Rng + ?Sized>(
        &self,
        config: &BuildConfig,
        backend: &impl ImageBackend,
        events: Option<&Sender<ResizeEvent>>,
        rng: &mut R,
    ) -> Result<GallerySummary, GalleryError> {
        let specs = gallery_file::parse_gallery_file(&self.gallery_file)?;
        check_unique_subdirs(&specs)?;

        std::fs::create_dir_all(&self.install_dir).map_err(|source| GalleryError::Io {
            path: self.install_dir.clone(),
            source,
        })?;
        tracing::info!(
            gallery = %self.name,
            albums = specs.len(),
            install_dir = %self.install_dir.display(),
            "installing gallery"
        );

        let mut summaries = Vec::with_capacity(specs.len());
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            let parts = subdir_parts(&spec.subdir);
            let url_dir = url_path(&parts.join("/"));
            let mut album = Album::new(
                spec.name,
                spec.album_file,
                spec.image_dir,
                self.install_dir.join(&spec.subdir),
            )
            .with_tags(spec.tags)
            .in_gallery(&self.name, gallery_index_url(parts.len()));

            summaries.push(album.install(config, backend, events)?);
            entries.push(GalleryEntry {
                thumb_url: album
                    .representative(rng)
                    .map(|d| format!("{url_dir}/{}", url_component(&d.thumbnail_filename))),
                index_url: (!album.chosen.is_empty()).then(|| format!("{url_dir}/index.html")),
                name: album.name,
            });
        }

        let index = render::write_page(
            &self.install_dir.join("index.html"),
            render::render_gallery_index(&self.name, &entries),
            config.force.html,
        )?;

        Ok(GallerySummary {
            albums: summaries,
            index,
        })
    }
}

/// Parse the gallery file and check every album without building anything.
pub fn check_gallery(gallery_file: &Path) -> Result<Vec<AlbumCheck>, GalleryError> {
    let specs = gallery_file::parse_gallery_file(gallery_file)?;
    check_unique_subdirs(&specs)?;
    specs
        .iter()
        .map(|spec| {
            album::check_album(&spec.name, &spec.album_file, Some(&spec.image_dir), &spec.tags)
                .map_err(GalleryError::from)
        })
        .collect()
}

/// Reject two albums whose subdirectories name the same place.
pub fn check_unique_subdirs(specs: &[AlbumSpec]) -> Result<(), GalleryError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for spec in specs {
        let key = subdir_parts(&spec.subdir).join("/");
        if let Some(first) = seen.insert(key, &spec.name) {
            return Err(GalleryError::DuplicateSubdir {
                subdir: spec.subdir.clone(),
                first: first.to_string(),
                second: spec.name.clone(),
            });
        }
    }
    Ok(())
}

/// Directory names of a subdir. `./a//b/` and `a/b` both give `["a", "b"]`.
fn subdir_parts(subdir: &str) -> Vec<String> {
    Path::new(subdir)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
